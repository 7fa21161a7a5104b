//! Browser configuration

use dlna_parser::ParseMode;

use crate::error::{BrowseError, Result};

/// Configuration for [`ContentBrowser`](crate::ContentBrowser)
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Deepest container level a recursive browse descends to; the starting
    /// object is depth 0
    /// Default: None (unbounded)
    pub max_depth: Option<usize>,

    /// Browse each object id at most once per recursive walk
    /// Default: true
    pub detect_cycles: bool,

    /// Containers fetched in parallel during a recursive walk
    /// Default: 1
    pub concurrency: usize,

    /// Emit container records alongside leaf items in recursive listings
    /// Default: false
    pub include_containers: bool,

    /// How DIDL-Lite fragments are read
    /// Default: ParseMode::Structured
    pub parse_mode: ParseMode,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            detect_cycles: true,
            concurrency: 1,
            include_containers: false,
            parse_mode: ParseMode::Structured,
        }
    }
}

impl BrowserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Several containers in flight at once, for large libraries on servers
    /// that cope with parallel requests
    pub fn parallel(concurrency: usize) -> Self {
        Self {
            concurrency,
            ..Default::default()
        }
    }

    /// Behaves like the classic flat dump: containers are listed and the
    /// lossy token parser is used
    pub fn legacy() -> Self {
        Self {
            include_containers: true,
            parse_mode: ParseMode::Legacy,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(BrowseError::InvalidConfig(
                "Concurrency must be greater than 0".to_string(),
            ));
        }

        if self.max_depth.is_none() && !self.detect_cycles {
            tracing::warn!("unbounded recursive browsing without cycle detection");
        }

        Ok(())
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_containers(mut self, include: bool) -> Self {
        self.include_containers = include;
        self
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BrowserConfig::default();
        assert_eq!(config.max_depth, None);
        assert!(config.detect_cycles);
        assert_eq!(config.concurrency, 1);
        assert!(!config.include_containers);
        assert_eq!(config.parse_mode, ParseMode::Structured);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(matches!(
            BrowserConfig::default().with_concurrency(0).validate(),
            Err(BrowseError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_presets() {
        assert_eq!(BrowserConfig::parallel(4).concurrency, 4);

        let legacy = BrowserConfig::legacy();
        assert!(legacy.include_containers);
        assert_eq!(legacy.parse_mode, ParseMode::Legacy);
    }

    #[test]
    fn test_builders() {
        let config = BrowserConfig::new()
            .with_max_depth(2)
            .with_cycle_detection(false)
            .with_containers(true);
        assert_eq!(config.max_depth, Some(2));
        assert!(!config.detect_cycles);
        assert!(config.include_containers);
    }
}
