//! Folio configuration system
//!
//! This crate provides centralized configuration for the Folio shell,
//! loading settings from `folio.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the Folio shell
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FolioConfig {
    /// Hash router and fragment location settings
    pub router: RouterConfig,
    /// Identifiers of the persistent page shell
    pub shell: ShellConfig,
    /// Chrome controller behaviour
    pub chrome: ChromeConfig,
    /// Fragment fetching over HTTP
    pub http: HttpConfig,
    /// Options handed to the enhancement libraries
    pub modules: ModulesConfig,
}

/// Router configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Page token used when the URL carries no fragment identifier
    pub default_page: String,
    /// Prefix prepended to a token to build the fragment location (e.g. "pages/")
    pub pages_path: String,
    /// Suffix appended to a token to build the fragment location
    pub fragment_suffix: String,
}

/// Element identifiers and class names of the persistent shell
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Id of the mount point whose content is replaced on navigation
    pub app_id: String,
    /// Id of the navigation container
    pub nav_id: String,
    /// Class carried by the mobile navigation toggle button
    pub mobile_toggle_class: String,
    /// Id of the preloader overlay
    pub preloader_id: String,
    /// Class carried by the scroll-to-top button
    pub scroll_top_class: String,
    /// Id of the page header
    pub header_id: String,
    /// Header classes that enable the body "scrolled" indicator
    pub sticky_classes: Vec<String>,
}

/// Chrome controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    /// Scroll offset in pixels past which scroll-dependent classes are applied
    pub scroll_threshold: f64,
}

/// HTTP fragment source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Base URL of the site. When unset, fragments are read from a local directory.
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User agent sent with fragment requests
    pub user_agent: String,
    /// Optional allowlist of origins (e.g. "https://example.com:443")
    pub origin_allowlist: Option<Vec<String>>,
}

/// Options for the enhancement library calls
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModulesConfig {
    pub typed: TypedOptions,
    pub reveal: RevealOptions,
    pub skills: SkillsOptions,
    pub isotope: IsotopeOptions,
}

/// Typing effect options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypedOptions {
    pub type_speed: u32,
    pub back_speed: u32,
    pub back_delay: u32,
    #[serde(rename = "loop")]
    pub looped: bool,
}

/// Scroll reveal options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealOptions {
    /// Animation duration in milliseconds
    pub duration: u32,
    pub easing: String,
    /// Animate only the first time an element scrolls into view
    pub once: bool,
    /// Animate again when scrolling back past an element
    pub mirror: bool,
}

/// Skills progress animation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsOptions {
    /// Waypoint trigger offset relative to the viewport
    pub offset: String,
}

/// Filterable masonry defaults, used when an element carries no override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsotopeOptions {
    pub layout: String,
    pub filter: String,
    pub sort: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_page: "home".to_string(),
            pages_path: "pages/".to_string(),
            fragment_suffix: ".html".to_string(),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            app_id: "app".to_string(),
            nav_id: "navmenu".to_string(),
            mobile_toggle_class: "mobile-nav-toggle".to_string(),
            preloader_id: "preloader".to_string(),
            scroll_top_class: "scroll-top".to_string(),
            header_id: "header".to_string(),
            sticky_classes: vec![
                "scroll-up-sticky".to_string(),
                "sticky-top".to_string(),
                "fixed-top".to_string(),
            ],
        }
    }
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: 100.0,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 15,
            user_agent: "Folio/0.1".to_string(),
            origin_allowlist: None,
        }
    }
}

impl Default for TypedOptions {
    fn default() -> Self {
        Self {
            type_speed: 100,
            back_speed: 50,
            back_delay: 2000,
            looped: true,
        }
    }
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            duration: 600,
            easing: "ease-in-out".to_string(),
            once: true,
            mirror: false,
        }
    }
}

impl Default for SkillsOptions {
    fn default() -> Self {
        Self {
            offset: "80%".to_string(),
        }
    }
}

impl Default for IsotopeOptions {
    fn default() -> Self {
        Self {
            layout: "masonry".to_string(),
            filter: "*".to_string(),
            sort: "original-order".to_string(),
        }
    }
}

impl FolioConfig {
    /// Load configuration from a TOML file
    ///
    /// # Returns
    /// * `Ok(FolioConfig)` - Successfully loaded configuration
    /// * `Err(String)` - Error message if reading or parsing failed
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from `folio.toml` in the current directory,
    /// or return the default configuration if the file is missing or invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file("folio.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(page) = std::env::var("FOLIO_DEFAULT_PAGE") {
            if !page.trim().is_empty() {
                self.router.default_page = page.trim().to_string();
            }
        }
        if let Ok(path) = std::env::var("FOLIO_PAGES_PATH") {
            self.router.pages_path = path;
        }
        if let Ok(url) = std::env::var("FOLIO_BASE_URL") {
            self.http.base_url = if url.is_empty() { None } else { Some(url) };
        }
        if let Ok(val) = std::env::var("FOLIO_HTTP_TIMEOUT") {
            if let Ok(secs) = val.parse::<u64>() {
                self.http.timeout_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("FOLIO_SCROLL_THRESHOLD") {
            if let Ok(threshold) = val.parse::<f64>() {
                self.chrome.scroll_threshold = threshold;
            }
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from folio.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
