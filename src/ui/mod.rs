pub mod card;
pub mod filter_chip;
pub mod home;
pub mod load_tracker;
pub mod masonry_view;
pub mod onboarding;
pub mod tab_shell;
pub mod theme;
pub mod window;

pub use window::MainWindow;
