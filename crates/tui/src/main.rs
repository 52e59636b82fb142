mod renderer;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clock_intro_core::IntroConfig;

/// Log to the file named by `CLOCK_INTRO_LOG`; the terminal belongs to the
/// intro while it runs.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("CLOCK_INTRO_LOG") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("creating log file {}", PathBuf::from(&path).display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<IntroConfig> {
    let Some(path) = path else {
        return Ok(IntroConfig::default());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))?;
    IntroConfig::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        eprintln!("Usage: clock-intro [config.json]");
        std::process::exit(2);
    }

    init_logging()?;
    let config = load_config(path)?;
    let labels = config.labels.clone();

    if renderer::run_intro(config)? {
        eprintln!("{} {}: {}", labels.first_name, labels.last_name, labels.title);
    }
    Ok(())
}
