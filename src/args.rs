use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// List every match of the image (or just capture when no image is given)
    Find,
    /// Require exactly one match and print its center
    Expect,
}

#[derive(Debug, PartialEq)]
pub struct Args {
    pub mode: Mode,
    pub screen: PathBuf,
    pub image: Option<PathBuf>,
    pub timeout: Duration,
    pub report_dir: Option<PathBuf>,
    pub images_dir: Option<PathBuf>,
}

impl Args {
    /// Parse the process arguments. `Ok(None)` means nothing is left to do
    /// (help or version printed).
    pub fn parse() -> Result<Option<Self>, String> {
        let parsed = Self::parse_from(env::args().skip(1));
        if parsed.is_err() {
            print_help();
        }
        parsed
    }

    pub fn parse_from<I>(args: I) -> Result<Option<Self>, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut mode = Mode::Find;
        let mut screen: Option<PathBuf> = None;
        let mut image: Option<PathBuf> = None;
        let mut timeout = Duration::ZERO;
        let mut report_dir: Option<PathBuf> = None;
        let mut images_dir: Option<PathBuf> = None;

        for arg in args {
            if arg == "--help" || arg == "-h" {
                print_help();
                return Ok(None);
            } else if arg == "--version" || arg == "-v" {
                println!(
                    "vnc-match v{} ({})",
                    env!("APP_VERSION_DISPLAY"),
                    env!("APP_BUILD_YEAR")
                );
                return Ok(None);
            } else if arg == "--expect" || arg == "-e" {
                mode = Mode::Expect;
            } else if let Some(val) = arg.strip_prefix("--screen=") {
                screen = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--image=") {
                image = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--timeout=") {
                timeout = val
                    .parse::<f64>()
                    .ok()
                    .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
                    .ok_or_else(|| format!("Invalid timeout value: {val}"))?;
            } else if let Some(val) = arg.strip_prefix("--report-dir=") {
                report_dir = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--images-dir=") {
                images_dir = Some(PathBuf::from(val));
            } else {
                return Err(format!("Unknown argument: {arg}"));
            }
        }

        let screen = screen.ok_or_else(|| "Missing --screen=<file>".to_string())?;
        if mode == Mode::Expect && image.is_none() {
            return Err("--expect requires --image=<file>".to_string());
        }

        Ok(Some(Args {
            mode,
            screen,
            image,
            timeout,
            report_dir,
            images_dir,
        }))
    }
}

fn print_help() {
    println!("🔍 vnc-match - find reference images on a screenshot");
    println!();
    println!("USAGE:");
    println!("    vnc-match --screen=<file> [--image=<file>] [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --screen=<file>     Screenshot to search (re-read on every attempt)");
    println!("    --image=<file>      Image to search for");
    println!("    --expect, -e        Require exactly one match, print its center");
    println!("    --timeout=N         Keep retrying for N seconds (with --expect)");
    println!("    --report-dir=<dir>  Where failure reports go (default: vncmatch_fails)");
    println!("    --images-dir=<dir>  Base directory for relative image paths");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("ENVIRONMENT:");
    println!("    VNCMATCH_REPORT_DIR, VNCMATCH_IMAGES_DIR, VNCMATCH_THRESHOLD");
    println!("    RUST_LOG            Log level (e.g. debug)");
    println!();
    println!("EXAMPLES:");
    println!("    vnc-match --screen=shot.png --image=images/button_clear.png");
    println!("    vnc-match --screen=shot.png --image=images/display_42.png --expect --timeout=3");
}
