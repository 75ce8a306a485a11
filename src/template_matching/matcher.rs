/// Template matching engine
///
/// Region-scoped, masked, multi-result search: scope the image, correlate,
/// keep candidates at or above the threshold, suppress overlapping
/// duplicates, rank, truncate and map positions back to the full image.
use super::config::MatchConfig;
use super::correlation::{TemplatePlan, correlate};
use super::dedup::{rank, suppress_overlapping};
use super::region::{crop, scope};
use super::template::Template;
use super::types::{CropResult, MatchResult, Point, Size};
use crate::error::{MatchError, Result};
use image::{GrayImage, ImageBuffer, Pixel};

/// Find where `template` appears in `image`.
///
/// Returns at most `config.max_results` matches ordered by descending score
/// (ties in scan order), with positions in `image` coordinates even when
/// `config.rect` narrows the search. An empty list means nothing scored at
/// least `config.threshold`; a template larger than the search area also
/// yields an empty list.
pub fn match_template<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    template: &ImageBuffer<P, Vec<u8>>,
    mask: Option<&GrayImage>,
    config: &MatchConfig,
) -> Result<Vec<MatchResult>>
where
    P: Pixel<Subpixel = u8>,
{
    config.validate()?;
    let plan = TemplatePlan::new(template, mask)?;

    log::debug!(
        "🔍 Matching {}x{} template (masked={}) threshold={} max_results={} remove_duplicate={} rect={:?}",
        template.width(),
        template.height(),
        mask.is_some(),
        config.threshold,
        config.max_results,
        config.remove_duplicate,
        config.rect
    );

    let area = scope(image, config.rect)?;
    let area_size = area.size();
    if area.is_empty() {
        return Ok(Vec::new());
    }
    if plan.width() as i32 > area_size.width || plan.height() as i32 > area_size.height {
        log::warn!(
            "⚠️ Template {}x{} larger than search area {}x{}, no matches possible",
            plan.width(),
            plan.height(),
            area_size.width,
            area_size.height
        );
        return Ok(Vec::new());
    }

    let surface = correlate(&area, &plan);
    let size = Size::of(template);

    // Scan order: enumerate_pixels walks rows top-to-bottom, left-to-right
    let mut candidates: Vec<MatchResult> = surface
        .enumerate_pixels()
        .filter(|(_, _, pixel)| pixel[0] >= config.threshold)
        .map(|(x, y, pixel)| {
            let position = area.to_source(Point::new(x as i32, y as i32));
            MatchResult::new(pixel[0], position, size)
        })
        .collect();
    let candidate_count = candidates.len();

    rank(&mut candidates);
    let results = if config.remove_duplicate {
        suppress_overlapping(candidates, config.overlap_threshold, config.max_results)
    } else {
        candidates.truncate(config.max_results);
        candidates
    };

    log::debug!(
        "✅ {} candidates above threshold, {} matches kept",
        candidate_count,
        results.len()
    );
    for (i, m) in results.iter().enumerate() {
        log::trace!("    {}. {}", i + 1, m);
    }

    Ok(results)
}

/// Like [`match_template`], and copy the matched pixels out of `image`.
///
/// Each crop is taken from the full (unscoped) image at the match rectangle
/// and owns its pixels. Matches always lie inside the image, so every crop has
/// the template's size; if one ever did not, the crop is clipped to the image
/// and a warning is logged.
pub fn match_and_crop<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    template: &ImageBuffer<P, Vec<u8>>,
    mask: Option<&GrayImage>,
    config: &MatchConfig,
) -> Result<Vec<CropResult<P>>>
where
    P: Pixel<Subpixel = u8>,
{
    let matches = match_template(image, template, mask, config)?;
    let crops = matches
        .into_iter()
        .map(|result| {
            let pixels = crop(image, result.rect());
            if pixels.dimensions() != template.dimensions() {
                log::warn!(
                    "⚠️ Crop of {} clipped to {}x{}",
                    result,
                    pixels.width(),
                    pixels.height()
                );
            }
            CropResult {
                result,
                image: pixels,
            }
        })
        .collect();
    Ok(crops)
}

/// Best match of `template`, or `None`.
///
/// Uses `config.threshold` and `config.rect`; always returns a single result.
pub fn find<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    template: &Template<P>,
    config: &MatchConfig,
) -> Result<Option<MatchResult>>
where
    P: Pixel<Subpixel = u8>,
{
    let config = config.clone().with_max_results(1);
    let matches = match_template(image, &template.image, template.mask.as_ref(), &config)?;
    if let Some(best) = matches.first() {
        log::debug!("Found '{}' at {}", template.name, best);
    }
    Ok(matches.into_iter().next())
}

/// First template in `templates` (in order) that matches, with its index.
pub fn find_any<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    templates: &[Template<P>],
    config: &MatchConfig,
) -> Result<Option<(usize, MatchResult)>>
where
    P: Pixel<Subpixel = u8>,
{
    for (i, template) in templates.iter().enumerate() {
        if let Some(found) = find(image, template, config)? {
            return Ok(Some((i, found)));
        }
    }
    Ok(None)
}

/// Number of occurrences of `template`, ignoring `config.max_results`.
pub fn count<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    template: &Template<P>,
    config: &MatchConfig,
) -> Result<usize>
where
    P: Pixel<Subpixel = u8>,
{
    let config = config.clone().with_max_results(usize::MAX);
    let matches = match_template(image, &template.image, template.mask.as_ref(), &config)?;
    Ok(matches.len())
}

/// Best match of `template`; a missing template is an error.
pub fn expect<P>(
    image: &ImageBuffer<P, Vec<u8>>,
    template: &Template<P>,
    config: &MatchConfig,
) -> Result<MatchResult>
where
    P: Pixel<Subpixel = u8>,
{
    find(image, template, config)?.ok_or_else(|| MatchError::TemplateNotFound {
        name: template.name.clone(),
    })
}
