#[macro_use]
extern crate tracing;

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use miette::{Context as _, IntoDiagnostic as _};

pub mod appearance;
pub mod indicators;
pub mod magnification;
pub mod utils;

pub use crate::appearance::Color;
pub use crate::indicators::{NotificationBadge, RunningIndicator};
pub use crate::magnification::Magnification;
pub use crate::utils::FloatOrInt;

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub struct Config {
    #[knuffel(child, default)]
    pub magnification: Magnification,
    #[knuffel(child, default)]
    pub running_indicator: RunningIndicator,
    #[knuffel(child, default)]
    pub notification_badge: NotificationBadge,
    #[knuffel(child)]
    pub favorites_only: bool,
    #[knuffel(child)]
    pub peek_hidden_icons: bool,
}

impl Config {
    pub fn load(path: &Path) -> miette::Result<Self> {
        let contents = fs::read_to_string(path)
            .into_diagnostic()
            .with_context(|| format!("error reading {path:?}"))?;

        let config = Self::parse(
            path.file_name()
                .and_then(OsStr::to_str)
                .unwrap_or("config.kdl"),
            &contents,
        )
        .context("error parsing")?;
        debug!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn parse(filename: &str, text: &str) -> Result<Self, knuffel::Error> {
        let _span = tracy_client::span!("Config::parse");
        knuffel::parse(filename, text)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::parse(
            "default-config.kdl",
            include_str!("../../resources/default-config.kdl"),
        )
        .unwrap()
    }
}
