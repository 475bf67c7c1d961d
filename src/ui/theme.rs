// Design tokens and stylesheet for the KHOI look
// Warm neutrals, pill chips, rounded cards

use gdk4::Display;
use gtk4::{CssProvider, STYLE_PROVIDER_PRIORITY_APPLICATION};
use std::path::{Path, PathBuf};

pub const SPACING_XS: f32 = 4.0;
pub const SPACING_SM: f32 = 8.0;
pub const SPACING_MD: f32 = 12.0;
pub const SPACING_LG: f32 = 16.0;
pub const SPACING_XL: f32 = 24.0;
pub const SPACING_XXL: f32 = 32.0;

/// Phone-sized default window.
pub const WINDOW_WIDTH: i32 = 390;
pub const WINDOW_HEIGHT: i32 = 844;

/// Placeholder fill behind card images (RGBA).
pub const PLACEHOLDER_RGBA: [u8; 4] = [0xe9, 0xe5, 0xe1, 0xff];

/// Embedded stylesheet, used when no `style.css` is found on disk
const FALLBACK_CSS: &str = r#"
window {
    background-color: #F5F1ED;
    color: #2C2420;
    font-family: "Switzer", sans-serif;
}

.logo {
    font-size: 96px;
    font-weight: bold;
    letter-spacing: 2px;
    color: #2C2420;
}

.tagline {
    font-size: 24px;
    letter-spacing: 2px;
    color: #8A827C;
}

.btn-signin {
    border-radius: 12px;
    padding: 16px;
    font-size: 18px;
    box-shadow: none;
}

.btn-apple {
    background: #000000;
    color: #FFFFFF;
    border: none;
}

.btn-google {
    background: #FFFFFF;
    color: #2C2420;
    border: 1px solid #E8E3DD;
}

.filter-chip {
    background: #EDE8E3;
    color: #2C2420;
    border: none;
    border-radius: 100px;
    padding: 8px 16px;
    font-size: 14px;
    box-shadow: none;
}

.filter-chip.selected {
    background: #8B7355;
    color: #FFFFFF;
}

.discover-header {
    font-size: 18px;
    letter-spacing: 2px;
    color: #8A827C;
}

.card-image {
    background-color: rgba(128, 128, 128, 0.2);
    border-radius: 12px;
}

.card-placeholder-icon {
    color: rgba(128, 128, 128, 0.3);
}

.card-handle {
    font-size: 14px;
    font-weight: 500;
    color: #2C2420;
}

.card-tag {
    font-size: 12px;
    color: #8A827C;
}

.tab-bar {
    background-color: #FFFFFF;
    border-top: 1px solid #E8E3DD;
}

.tab-button {
    background: transparent;
    border: none;
    box-shadow: none;
    color: #8A827C;
    font-size: 10px;
}

.tab-button.tab-active {
    color: #8B7355;
}

.page-title {
    font-size: 28px;
    font-weight: bold;
    color: #2C2420;
}

.placeholder-text {
    font-size: 24px;
    color: #8A827C;
}
"#;

/// Applies the stylesheet to the default display.
///
/// Lookup order: `style.css` in the asset directory, `src/style.css` in the
/// source tree, then the embedded sheet.
pub fn load_css(asset_dir: Option<&Path>) {
    let provider = CssProvider::new();

    let dev_path = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/src/style.css"));
    let css_path = asset_dir
        .map(|dir| dir.join("style.css"))
        .into_iter()
        .chain(std::iter::once(dev_path))
        .find(|path| path.is_file());

    match css_path {
        Some(path) => {
            provider.load_from_path(&path);
            tracing::info!(?path, "Loaded stylesheet");
        }
        None => {
            provider.load_from_string(FALLBACK_CSS);
            tracing::info!("Loaded embedded stylesheet");
        }
    }

    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

/// Pixel size for a spacing token.
pub fn px(token: f32) -> i32 {
    token.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_scale() {
        let scale = [SPACING_XS, SPACING_SM, SPACING_MD, SPACING_LG, SPACING_XL, SPACING_XXL];
        assert!(scale.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(px(SPACING_MD), 12);
    }

    #[test]
    fn test_fallback_css_has_chip_states() {
        assert!(FALLBACK_CSS.contains(".filter-chip.selected"));
        assert!(FALLBACK_CSS.contains("#F5F1ED"));
    }
}
