#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use clock_intro_core::IntroConfig;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {path}"))?;
            IntroConfig::from_json(&text).with_context(|| format!("parsing config {path}"))?
        }
        None => IntroConfig::default(),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 720.0])
            .with_title("clock intro"),
        ..Default::default()
    };
    eframe::run_native(
        "clock-intro",
        options,
        Box::new(move |cc| Ok(Box::new(clock_intro_ui::PortfolioApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe exited: {e}"))
}

#[cfg(target_arch = "wasm32")]
fn main() {}
