//! Scenario tests for the matching pipeline on screen-like images

use super::test_util::{cut, noise_gray, stamp};
use crate::template_matching::{
    MatchConfig, Point, Rect, Template, count, crop, match_and_crop, match_template,
};
use image::{GrayImage, Luma};

/// Portrait phone screen
const SCREEN_WIDTH: u32 = 720;
const SCREEN_HEIGHT: u32 = 1280;

/// Top-left corners of three identical stamps on one row
const STAMPS: [(u32, u32); 3] = [(167, 829), (306, 829), (444, 829)];

/// Side of the square icon stamped on the screen
const ICON_SIZE: u32 = 40;

/// Horizontal band around the stamp row, keeps the scans short
const STAMP_BAND: Rect = Rect::new(0, 800, 720, 80);

fn screen_with_stamps(icon: &GrayImage, positions: &[(u32, u32)]) -> GrayImage {
    let mut screen = noise_gray(SCREEN_WIDTH, SCREEN_HEIGHT, 42);
    for &(x, y) in positions {
        stamp(&mut screen, icon, x, y);
    }
    screen
}

fn within(found: Point, x: u32, y: u32, tolerance: i32) -> bool {
    (found.x - x as i32).abs() <= tolerance && (found.y - y as i32).abs() <= tolerance
}

/// Bright gaussian blob: neighbouring windows correlate strongly with it.
fn blob(size: u32) -> GrayImage {
    let c = (size / 2) as f32;
    let sigma = size as f32 / 4.0;
    GrayImage::from_fn(size, size, |x, y| {
        let d2 = (x as f32 - c).powi(2) + (y as f32 - c).powi(2);
        Luma([(255.0 * (-d2 / (2.0 * sigma * sigma)).exp()) as u8])
    })
}

#[test]
fn test_single_icon_on_screen() {
    let icon = noise_gray(ICON_SIZE, ICON_SIZE, 7);
    let screen = screen_with_stamps(&icon, &STAMPS[..1]);
    let config = MatchConfig::default().with_rect(Some(STAMP_BAND));

    let matches = match_template(&screen, &icon, None, &config).unwrap();
    assert_eq!(matches.len(), 1);
    assert!(within(matches[0].position, 167, 829, 10));
    assert!(matches[0].score > 0.9);
}

#[test]
fn test_three_stamps_without_dedup() {
    let icon = noise_gray(ICON_SIZE, ICON_SIZE, 7);
    let screen = screen_with_stamps(&icon, &STAMPS);
    let config = MatchConfig::default()
        .with_rect(Some(STAMP_BAND))
        .with_max_results(3)
        .with_remove_duplicate(false);

    let matches = match_template(&screen, &icon, None, &config).unwrap();
    assert_eq!(matches.len(), 3);
    for m in &matches {
        assert!(m.score > 0.9);
    }

    let mut xs: Vec<i32> = matches.iter().map(|m| m.position.x).collect();
    xs.sort();
    for (x, &(expected_x, expected_y)) in xs.iter().zip(STAMPS.iter()) {
        assert!((x - expected_x as i32).abs() <= 10);
        let m = matches.iter().find(|m| m.position.x == *x).unwrap();
        assert!(within(m.position, expected_x, expected_y, 10));
    }
}

#[test]
fn test_count_stamps_in_band() {
    let icon = Template::new("stamp", noise_gray(ICON_SIZE, ICON_SIZE, 7));
    let screen = screen_with_stamps(&icon.image, &STAMPS);
    let config = MatchConfig::default().with_rect(Some(STAMP_BAND));
    assert_eq!(count(&screen, &icon, &config).unwrap(), 3);
}

#[test]
fn test_dedup_collapses_one_occurrence() {
    let mut image = GrayImage::new(240, 160);
    let template = blob(21);
    stamp(&mut image, &template, 100, 60);

    let config = MatchConfig::default()
        .with_threshold(0.5)
        .with_max_results(5)
        .with_remove_duplicate(false);
    let raw = match_template(&image, &template, None, &config).unwrap();
    assert_eq!(raw.len(), 5);
    assert_eq!(raw[0].position, Point::new(100, 60));
    for m in &raw {
        assert!(within(m.position, 100, 60, 5));
    }

    let deduped = match_template(&image, &template, None, &config.with_remove_duplicate(true))
        .unwrap();
    assert_eq!(deduped.len(), 1);
    assert_eq!(deduped[0].position, Point::new(100, 60));
}

#[test]
fn test_no_rect_equals_full_image_rect() {
    let image = noise_gray(80, 60, 11);
    let template = cut(&image, 30, 20, 10, 10);
    let config = MatchConfig::default().with_threshold(0.2).with_max_results(4);

    let unscoped = match_template(&image, &template, None, &config).unwrap();
    let full = config.clone().with_rect(Some(Rect::new(0, 0, 80, 60)));
    let scoped = match_template(&image, &template, None, &full).unwrap();
    assert_eq!(unscoped, scoped);
    assert_eq!(unscoped[0].position, Point::new(30, 20));
}

#[test]
fn test_rect_excluding_occurrence_is_empty() {
    let image = noise_gray(80, 60, 12);
    let template = cut(&image, 50, 30, 10, 10);
    let config = MatchConfig::default().with_rect(Some(Rect::new(0, 0, 40, 60)));
    let matches = match_template(&image, &template, None, &config).unwrap();
    assert!(matches.is_empty());
}

#[test]
fn test_scoped_positions_are_offset_by_rect_origin() {
    let image = noise_gray(80, 60, 13);
    let template = cut(&image, 45, 25, 10, 10);
    let rect = Rect::new(30, 15, 40, 35);

    let scoped = match_template(
        &image,
        &template,
        None,
        &MatchConfig::default().with_rect(Some(rect)),
    )
    .unwrap();
    let local = match_template(&crop(&image, rect), &template, None, &MatchConfig::default())
        .unwrap();

    assert_eq!(scoped.len(), 1);
    assert_eq!(local.len(), 1);
    assert_eq!(local[0].position, Point::new(15, 10));
    assert_eq!(scoped[0].position, rect.top_left() + local[0].position);
    assert!((scoped[0].score - local[0].score).abs() < 1e-6);
}

#[test]
fn test_clipped_rect_still_finds_match() {
    let image = noise_gray(80, 60, 14);
    let template = cut(&image, 60, 40, 10, 10);
    let config = MatchConfig::default().with_rect(Some(Rect::new(50, 30, 100, 100)));
    let matches = match_template(&image, &template, None, &config).unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].position, Point::new(60, 40));
}

#[test]
fn test_masked_stamps_on_varying_backgrounds() {
    let icon = noise_gray(24, 24, 21);
    let mask = GrayImage::from_fn(24, 24, |x, y| {
        let inside = (4..20).contains(&x) && (4..20).contains(&y);
        Luma([if inside { 255 } else { 0 }])
    });

    // Only the masked-in pixels are drawn; the border shows whatever noise is underneath
    let mut image = noise_gray(300, 80, 22);
    let positions = [(20u32, 20u32), (120, 30), (230, 10)];
    for &(x, y) in &positions {
        for (px, py, pixel) in icon.enumerate_pixels() {
            if mask.get_pixel(px, py)[0] > 0 {
                image.put_pixel(x + px, y + py, *pixel);
            }
        }
    }

    let config = MatchConfig::default().with_max_results(5);
    let masked = match_template(&image, &icon, Some(&mask), &config).unwrap();
    assert_eq!(masked.len(), 3);
    for m in &masked {
        assert!(m.score > 0.99);
        assert!(positions.iter().any(|&(x, y)| within(m.position, x, y, 0)));
    }

    let unmasked = match_template(&image, &icon, None, &config).unwrap();
    assert!(unmasked.is_empty());
}

#[test]
fn test_crops_match_template_size() {
    let icon = noise_gray(ICON_SIZE, ICON_SIZE, 7);
    let screen = screen_with_stamps(&icon, &STAMPS);
    let config = MatchConfig::default()
        .with_rect(Some(STAMP_BAND))
        .with_max_results(3);

    let crops = match_and_crop(&screen, &icon, None, &config).unwrap();
    assert_eq!(crops.len(), 3);
    for c in &crops {
        assert_eq!(c.image.dimensions(), (ICON_SIZE, ICON_SIZE));
        assert_eq!(c.image, icon);
        assert_eq!(c.size(), c.result.size);
    }
}
