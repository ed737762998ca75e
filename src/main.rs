use std::process::ExitCode;
use vnc_match::args::{Args, Mode};
use vnc_match::{FileFrameSource, MatchConfig, ScreenMatch, load_template};

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::parse() {
        Ok(Some(args)) => args,
        Ok(None) => return ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("❌ {msg}");
            return ExitCode::from(2);
        }
    };

    let mut config = match MatchConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::from(2);
        }
    };
    if let Some(dir) = args.report_dir {
        config.report_root = dir;
    }
    if let Some(dir) = args.images_dir {
        config.images_dir = Some(dir);
    }

    let mut screen = ScreenMatch::with_config(FileFrameSource::new(&args.screen), config);

    match args.mode {
        Mode::Find => {
            let template = match &args.image {
                Some(path) => match load_template(&screen.config().template_path(path)) {
                    Ok(img) => Some(img),
                    Err(e) => {
                        eprintln!("❌ {e}");
                        return ExitCode::from(2);
                    }
                },
                None => None,
            };
            match screen.find(template.as_ref()) {
                Ok(result) => {
                    let (w, h) = result.frame().dimensions();
                    println!("📱 Screen {}: {}x{}", args.screen.display(), w, h);
                    match serde_json::to_string(result.boxes()) {
                        Ok(json) => println!("{json}"),
                        Err(e) => {
                            eprintln!("❌ {e}");
                            return ExitCode::from(2);
                        }
                    }
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    ExitCode::from(2)
                }
            }
        }
        Mode::Expect => {
            // Checked by the argument parser
            let Some(image) = args.image else {
                return ExitCode::from(2);
            };
            match screen.expect_single(&image, args.timeout) {
                Ok((x, y)) => {
                    println!("{x} {y}");
                    ExitCode::SUCCESS
                }
                Err(e) if e.is_test_failure() => {
                    eprintln!("❌ {e}");
                    ExitCode::FAILURE
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    ExitCode::from(2)
                }
            }
        }
    }
}
