use screen_match::template_matching::{MatchConfig, Rect};
use std::env;
use std::path::PathBuf;

#[derive(Debug)]
pub struct Args {
    pub screenshot: PathBuf,
    pub template: PathBuf,
    pub mask: Option<PathBuf>,
    pub transparent: bool,
    pub config: MatchConfig,
    pub crop_dir: Option<PathBuf>,
    pub annotate: Option<PathBuf>,
    pub debug_mode: bool,
}

impl Args {
    /// `Ok(None)` after `--help`/`--version`; `Err` carries the message for a bad command line.
    pub fn parse() -> Result<Option<Self>, String> {
        let args: Vec<String> = env::args().skip(1).collect();
        Self::parse_from(&args)
    }

    pub fn parse_from(args: &[String]) -> Result<Option<Self>, String> {
        let mut positional: Vec<PathBuf> = Vec::new();
        let mut mask: Option<PathBuf> = None;
        let mut transparent = false;
        let mut config = MatchConfig::default();
        let mut crop_dir: Option<PathBuf> = None;
        let mut annotate: Option<PathBuf> = None;
        let mut debug_mode = false;

        for arg in args {
            if arg == "--help" || arg == "-h" {
                print_help();
                return Ok(None);
            } else if arg == "--version" || arg == "-v" {
                println!("Screen Match v{}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--transparent" {
                transparent = true;
            } else if arg == "--keep-duplicates" {
                config.remove_duplicate = false;
            } else if let Some(val) = arg.strip_prefix("--mask=") {
                mask = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--crop-dir=") {
                crop_dir = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--annotate=") {
                annotate = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--rect=") {
                match val.parse::<Rect>() {
                    Ok(rect) => config.rect = Some(rect),
                    Err(e) => return Err(format!("Invalid rect '{}': {}", val, e)),
                }
            } else if let Some(val) = arg.strip_prefix("--threshold=") {
                match val.parse::<f32>() {
                    Ok(threshold) => config.threshold = threshold,
                    Err(_) => return Err(format!("Invalid threshold value: {}", val)),
                }
            } else if let Some(val) = arg.strip_prefix("--max=") {
                match val.parse::<usize>() {
                    Ok(max) => config.max_results = max,
                    Err(_) => return Err(format!("Invalid max value: {}", val)),
                }
            } else if arg.starts_with('-') {
                return Err(format!("Unknown argument: {}", arg));
            } else {
                positional.push(PathBuf::from(arg));
            }
        }

        let (screenshot, template) = match <[PathBuf; 2]>::try_from(positional) {
            Ok([screenshot, template]) => (screenshot, template),
            Err(paths) => {
                return Err(format!(
                    "Expected <screenshot> and <template>, got {} paths",
                    paths.len()
                ));
            }
        };
        if transparent && mask.is_some() {
            return Err("--transparent and --mask cannot be combined".to_string());
        }

        Ok(Some(Args {
            screenshot,
            template,
            mask,
            transparent,
            config,
            crop_dir,
            annotate,
            debug_mode,
        }))
    }
}

pub fn print_help() {
    println!("🔍 Screen Match - find a template in a screenshot");
    println!();
    println!("USAGE:");
    println!("    screen-match <SCREENSHOT> <TEMPLATE> [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --mask=PATH         Mask image; white pixels take part in matching");
    println!("    --transparent       Use the template's alpha channel as the mask");
    println!("    --rect=x,y,w,h      Only search inside this rectangle");
    println!("    --threshold=F       Minimum score, 0.0-1.0 (default: 0.9)");
    println!("    --max=N             Maximum number of matches (default: 1)");
    println!("    --keep-duplicates   Report overlapping matches separately");
    println!("    --crop-dir=DIR      Save each matched region as a PNG in DIR");
    println!("    --annotate=PATH     Save the screenshot with matches outlined");
    println!("    --debug             Enable debug logging");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    screen-match screen.png button.png");
    println!("    screen-match screen.png star.png --transparent --max=5 --threshold=0.95");
    println!("    screen-match screen.png icon.png --rect=0,640,720,640 --annotate=out.png");
}
