// Main window for KHOI
// Root stack flips from onboarding to the tab shell once sign-in completes

use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, Stack, StackTransitionType};
use std::rc::Rc;
use tracing::info;

use super::card::CardImageLoader;
use super::onboarding::OnboardingView;
use super::tab_shell::TabShell;
use super::theme;
use crate::config::FeedConfig;
use crate::state::{AppState, Store};

const ONBOARDING_PAGE: &str = "onboarding";
const SHELL_PAGE: &str = "shell";

pub struct MainWindow {
    window: ApplicationWindow,
    stack: Stack,
    _onboarding: OnboardingView,
    shell: TabShell,
    store: Rc<Store>,
}

impl MainWindow {
    pub fn new(app: &Application, store: Rc<Store>, config: &FeedConfig) -> Rc<Self> {
        theme::load_css(config.asset_dir.as_deref());

        let window = ApplicationWindow::builder()
            .application(app)
            .title("KHOI")
            .default_width(theme::WINDOW_WIDTH)
            .default_height(theme::WINDOW_HEIGHT)
            .build();

        let loader = CardImageLoader::new(config);
        let onboarding = OnboardingView::new(&store, config.asset_dir.as_deref());
        let shell = TabShell::new(&store, config, loader);

        let stack = Stack::new();
        stack.set_transition_type(StackTransitionType::SlideLeft);
        stack.add_named(onboarding.widget(), Some(ONBOARDING_PAGE));
        stack.add_named(shell.widget(), Some(SHELL_PAGE));
        window.set_child(Some(&stack));

        let main_window = Rc::new(Self {
            window,
            stack,
            _onboarding: onboarding,
            shell,
            store,
        });

        let window_weak = Rc::downgrade(&main_window);
        main_window.store.subscribe(move |state| {
            if let Some(window) = window_weak.upgrade() {
                window.sync(state);
            }
        });
        main_window.store.with_state(|state| main_window.sync(state));

        info!(
            columns = config.columns,
            strategy = ?config.strategy,
            asset_dir = ?config.asset_dir,
            "Main window ready"
        );
        main_window
    }

    pub fn present(&self) {
        self.window.present();
    }

    fn sync(&self, state: &AppState) {
        let page = if state.onboarding_complete {
            SHELL_PAGE
        } else {
            ONBOARDING_PAGE
        };
        if self.stack.visible_child_name().as_deref() != Some(page) {
            self.stack.set_visible_child_name(page);
        }
        self.shell.sync(state);
    }
}
