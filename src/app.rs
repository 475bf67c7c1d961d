use gtk4::prelude::*;
use gtk4::Application;

use crate::config::FeedConfig;
use crate::state::{AppState, Store};
use crate::ui::MainWindow;

const APP_ID: &str = "app.khoi.Khoi";

pub struct KhoiApp {
    app: Application,
}

impl KhoiApp {
    pub fn new() -> Self {
        let app = Application::builder().application_id(APP_ID).build();
        app.connect_activate(Self::on_activate);
        Self { app }
    }

    pub fn run(&self) -> i32 {
        self.app.run().into()
    }

    fn on_activate(app: &Application) {
        // A second activation (e.g. relaunch) only raises the existing window.
        if let Some(window) = app.active_window() {
            window.present();
            return;
        }

        let config = FeedConfig::from_env();
        let store = Store::new(AppState::default());
        let window = MainWindow::new(app, store, &config);
        window.present();
        // Keep the window alive by storing it on the Application.
        unsafe {
            app.set_data("main-window", window);
        }
    }
}

impl Default for KhoiApp {
    fn default() -> Self {
        Self::new()
    }
}
