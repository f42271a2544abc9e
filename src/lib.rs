pub mod catalog;
pub mod config;
pub mod db;
pub mod engine;
pub mod features;
pub mod lyrics;
pub mod naming;
pub mod profile;

pub use features::{FEATURE_NAMES, FeatureVector};

/// Application name for XDG paths
pub const APP_NAME: &str = "moodswing";
