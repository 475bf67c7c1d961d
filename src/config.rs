//! Runtime configuration for the feed.
//!
//! Defaults match the app's design tokens. A few knobs can be overridden from the
//! environment for experimenting without a rebuild:
//! - `KHOI_COLUMNS`: number of masonry columns
//! - `KHOI_MASONRY_STRATEGY`: `round-robin` or `shortest`
//! - `KHOI_IMAGE_WORKERS`: concurrent image fetches
//! - `KHOI_ASSET_DIR`: directory that relative image references resolve against

use std::path::PathBuf;

use directories::ProjectDirs;
use tracing::warn;

use crate::layout::{ColumnStrategy, MasonryLayout};
use crate::ui::theme;

const DEFAULT_IMAGE_WORKERS: usize = 2;
const MAX_IMAGE_WORKERS: usize = 8;
const DEFAULT_PREVIEW_SIZE: u32 = 512;

#[derive(Debug, Clone, PartialEq)]
pub struct FeedConfig {
    pub columns: usize,
    pub spacing: f32,
    pub horizontal_inset: f32,
    pub vertical_inset: f32,
    pub strategy: ColumnStrategy,
    /// Longest edge of decoded card previews.
    pub preview_size: u32,
    pub image_workers: usize,
    pub asset_dir: Option<PathBuf>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            spacing: theme::SPACING_MD,
            horizontal_inset: theme::SPACING_LG,
            vertical_inset: theme::SPACING_MD,
            strategy: ColumnStrategy::RoundRobin,
            preview_size: DEFAULT_PREVIEW_SIZE,
            image_workers: DEFAULT_IMAGE_WORKERS,
            asset_dir: None,
        }
    }
}

impl FeedConfig {
    /// Defaults plus any environment overrides.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("KHOI_COLUMNS") {
            match raw.trim().parse::<usize>().ok().filter(|v| *v > 0) {
                Some(columns) => config.columns = columns,
                None => warn!(value = %raw, "Ignoring invalid KHOI_COLUMNS"),
            }
        }

        if let Some(raw) = lookup("KHOI_MASONRY_STRATEGY") {
            match ColumnStrategy::parse(&raw) {
                Some(strategy) => config.strategy = strategy,
                None => warn!(value = %raw, "Ignoring unknown KHOI_MASONRY_STRATEGY"),
            }
        }

        config.image_workers = lookup("KHOI_IMAGE_WORKERS")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|v| *v > 0)
            .map(|v| v.min(MAX_IMAGE_WORKERS))
            .unwrap_or(DEFAULT_IMAGE_WORKERS);

        config.asset_dir = lookup("KHOI_ASSET_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_asset_dir);

        config
    }

    pub fn masonry_layout(&self) -> MasonryLayout {
        MasonryLayout::new(self.columns, self.spacing, self.horizontal_inset)
            .with_strategy(self.strategy)
    }
}

/// `XDG_DATA_HOME/khoi/assets`, when the platform has one.
fn default_asset_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "khoi").map(|dirs| dirs.data_dir().join("assets"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_design_tokens() {
        let config = FeedConfig::default();
        assert_eq!(config.columns, 2);
        assert_eq!(config.spacing, 12.0);
        assert_eq!(config.horizontal_inset, 16.0);
        assert_eq!(config.strategy, ColumnStrategy::RoundRobin);
    }

    #[test]
    fn test_env_overrides() {
        let config = FeedConfig::from_lookup(lookup_from(&[
            ("KHOI_COLUMNS", "3"),
            ("KHOI_MASONRY_STRATEGY", "shortest"),
            ("KHOI_IMAGE_WORKERS", "64"),
            ("KHOI_ASSET_DIR", "/tmp/khoi-assets"),
        ]));
        assert_eq!(config.columns, 3);
        assert_eq!(config.strategy, ColumnStrategy::ShortestColumn);
        assert_eq!(config.image_workers, MAX_IMAGE_WORKERS);
        assert_eq!(config.asset_dir, Some(PathBuf::from("/tmp/khoi-assets")));
    }

    #[test]
    fn test_invalid_overrides_fall_back() {
        let config = FeedConfig::from_lookup(lookup_from(&[
            ("KHOI_COLUMNS", "0"),
            ("KHOI_MASONRY_STRATEGY", "zigzag"),
            ("KHOI_IMAGE_WORKERS", "many"),
        ]));
        assert_eq!(config.columns, 2);
        assert_eq!(config.strategy, ColumnStrategy::RoundRobin);
        assert_eq!(config.image_workers, DEFAULT_IMAGE_WORKERS);
    }

    #[test]
    fn test_masonry_layout_from_config() {
        let layout = FeedConfig::default().masonry_layout();
        assert_eq!(layout.column_width(344.0).unwrap(), 150.0);
    }
}
