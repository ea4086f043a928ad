//! Walk configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// What the walker does when enumerating a directory fails.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OnError {
    /// Abort the whole walk with the failure.
    #[default]
    Raise,
    /// Record the failure as an error node and keep walking.
    Continue,
}

/// Configuration for a walk.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct WalkConfig {
    /// Root path to walk.
    pub root: PathBuf,

    /// Failure policy for directory enumeration.
    #[builder(default)]
    #[serde(default)]
    pub on_error: OnError,

    /// 0 = silent, 1 = one event per folder and error, 2 = also per file.
    #[builder(default = "0")]
    #[serde(default)]
    pub verbosity: u8,

    /// Entry names to ignore (glob syntax, matched against the name only).
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Skip entries whose name starts with `.`.
    #[builder(default = "false")]
    #[serde(default)]
    pub skip_dotfiles: bool,
}

impl WalkConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            Some(_) => {}
            None => return Err("Root path is required".to_string()),
        }
        if let Some(verbosity) = self.verbosity {
            if verbosity > 2 {
                return Err(format!("Verbosity must be 0, 1 or 2, got {verbosity}"));
            }
        }
        Ok(())
    }
}

impl WalkConfig {
    /// Create a new walk config builder.
    pub fn builder() -> WalkConfigBuilder {
        WalkConfigBuilder::default()
    }

    /// Create a simple config for walking a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            on_error: OnError::default(),
            verbosity: 0,
            ignore_patterns: Vec::new(),
            skip_dotfiles: false,
        }
    }

    /// Whether errors should be recorded instead of aborting.
    pub fn continues_on_error(&self) -> bool {
        self.on_error == OnError::Continue
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = WalkConfig::builder()
            .root("/home/user")
            .on_error(OnError::Continue)
            .verbosity(2u8)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert!(config.continues_on_error());
        assert_eq!(config.verbosity, 2);
    }

    #[test]
    fn test_config_simple() {
        let config = WalkConfig::new("/home/user");
        assert_eq!(config.on_error, OnError::Raise);
        assert_eq!(config.verbosity, 0);
        assert!(!config.skip_dotfiles);
    }

    #[test]
    fn test_builder_validation() {
        assert!(WalkConfig::builder().build().is_err());
        assert!(WalkConfig::builder().root("").build().is_err());
        assert!(WalkConfig::builder().root("/x").verbosity(3u8).build().is_err());
    }

    #[test]
    fn test_on_error_parse() {
        assert_eq!("continue".parse::<OnError>().unwrap(), OnError::Continue);
        assert_eq!("Raise".parse::<OnError>().unwrap(), OnError::Raise);
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: WalkConfig = serde_json::from_str(r#"{"root": "/data"}"#).unwrap();
        assert_eq!(config.root, PathBuf::from("/data"));
        assert_eq!(config.on_error, OnError::Raise);
        assert!(config.ignore_patterns.is_empty());
    }
}
