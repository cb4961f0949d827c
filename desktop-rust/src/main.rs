mod app;
mod io;
mod model;

use app::FormFillerApp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = sff_common::Config::load()?;
    let api = sff_common::client_from_config(&config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Saccani Form Filler",
        options,
        Box::new(move |_cc| Box::new(FormFillerApp::new(api, config))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}
