mod args;

use args::Args;
use screen_match::annotate::annotate;
use screen_match::error::{MatchError, Result};
use screen_match::template_matching::{Template, load_screenshot, match_and_crop};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match Args::parse() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("❌ {message}");
            args::print_help();
            return ExitCode::from(2);
        }
    };

    let level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(0) => {
            println!("❌ No match for {}", args.template.display());
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<usize> {
    let screenshot = load_screenshot(&args.screenshot)?;
    let template = if args.transparent {
        Template::open_transparent(&args.template)?
    } else if let Some(mask) = &args.mask {
        Template::open_with_mask(&args.template, mask)?
    } else {
        Template::open(&args.template)?
    };
    println!(
        "📸 Screenshot {}x{}, template '{}' {}x{}{}",
        screenshot.width(),
        screenshot.height(),
        template.name,
        template.image.width(),
        template.image.height(),
        if template.mask.is_some() { " (masked)" } else { "" }
    );

    let started = std::time::Instant::now();
    let crops = match_and_crop(&screenshot, &template.image, template.mask.as_ref(), &args.config)?;
    log::debug!("Matching took {}ms", started.elapsed().as_millis());

    for (i, crop) in crops.iter().enumerate() {
        let center = crop.result.center();
        println!("✅ {}. {} tap=({},{})", i + 1, crop.result, center.x, center.y);
    }

    if let Some(dir) = &args.crop_dir {
        std::fs::create_dir_all(dir).map_err(|source| MatchError::Io {
            path: dir.clone(),
            source,
        })?;
        for (i, crop) in crops.iter().enumerate() {
            let path = dir.join(format!("{}_{}.png", template.name, i + 1));
            save(&crop.image, &path)?;
        }
        println!("💾 Saved {} crops to {}", crops.len(), dir.display());
    }

    if let Some(path) = &args.annotate {
        let results: Vec<_> = crops.iter().map(|c| c.result).collect();
        save(&annotate(&screenshot, &results), path)?;
        println!("💾 Annotated screenshot saved to {}", path.display());
    }

    Ok(crops.len())
}

fn save(image: &image::RgbImage, path: &std::path::Path) -> Result<()> {
    image.save(path).map_err(|source| MatchError::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}
