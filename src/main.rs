mod app;
mod config;
mod image_loader;
mod layout;
mod models;
mod state;
mod ui;

use app::KhoiApp;
use tracing_subscriber::filter::LevelFilter;

fn main() {
    // Prefer C numeric locale up-front; GTK may later adjust locale again.
    std::env::set_var("LC_NUMERIC", "C");
    unsafe {
        libc::setlocale(libc::LC_NUMERIC, b"C\0".as_ptr().cast());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy()
                .add_directive("khoi=info".parse().unwrap_or_else(|_| LevelFilter::INFO.into())),
        )
        .init();

    let app = KhoiApp::new();
    std::process::exit(app.run());
}
