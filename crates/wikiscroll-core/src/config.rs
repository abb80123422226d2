use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default MediaWiki endpoint queried for random articles
pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Image shown behind articles without a lead image, and behind the welcome panel
pub const DEFAULT_FALLBACK_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1524995997946-a1c2e315a42f?auto=format&fit=crop&w=1920&q=80";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory holding the TUI log file
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// MediaWiki api.php endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Number of random articles requested per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    /// Namespace the random generator is restricted to (0 = articles)
    #[serde(default)]
    pub namespace: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// User-Agent sent with every request (Wikimedia rejects anonymous clients)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// HTTP proxy URL (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            batch_size: default_batch_size(),
            namespace: 0,
            request_timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            proxy_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Download and draw article images
    #[serde(default = "default_true")]
    pub image_preview: bool,
    /// Image used when an article has no lead image
    #[serde(default = "default_fallback_image_url")]
    pub fallback_image_url: String,
    /// Load more once the viewport is this many screens away from the bottom
    #[serde(default = "default_load_ahead")]
    pub load_ahead_viewports: u32,
    /// How much the background image is darkened under text (0.0-1.0)
    #[serde(default = "default_overlay_strength")]
    pub overlay_strength: f32,
    /// Color overrides
    #[serde(default)]
    pub theme: ThemeColorOverrides,
    /// Smooth scrolling
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            image_preview: default_true(),
            fallback_image_url: default_fallback_image_url(),
            load_ahead_viewports: default_load_ahead(),
            overlay_strength: default_overlay_strength(),
            theme: ThemeColorOverrides::default(),
            scroll: ScrollConfig::default(),
        }
    }
}

/// Optional color overrides, each a hex string ("#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Background behind panels without an image
    pub background: Option<String>,
    /// Body text
    pub foreground: Option<String>,
    /// Secondary text
    pub muted: Option<String>,
    /// Titles, chevrons and the active button
    pub accent: Option<String>,
    /// Status bar background
    pub status_bg: Option<String>,
}

/// Easing curve for panel scroll animations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate panel jumps
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Animation duration in milliseconds
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Easing curve
    #[serde(default)]
    pub easing: EasingType,
    /// Frame rate while animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Rows moved per line scroll or mouse wheel notch
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            animation_fps: default_animation_fps(),
            scroll_lines: default_scroll_lines(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-d>" (Ctrl+d), "G" (Shift+g), "<CR>" (Enter), "<Space>"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_key_quit")]
    pub quit: String,
    /// Scroll down by `scroll_lines`
    #[serde(default = "default_key_scroll_down")]
    pub scroll_down: String,
    /// Scroll up by `scroll_lines`
    #[serde(default = "default_key_scroll_up")]
    pub scroll_up: String,
    /// Snap to the next panel
    #[serde(default = "default_key_next_panel")]
    pub next_panel: String,
    /// Snap to the previous panel
    #[serde(default = "default_key_prev_panel")]
    pub prev_panel: String,
    #[serde(default = "default_key_scroll_half_down")]
    pub scroll_half_down: String,
    #[serde(default = "default_key_scroll_half_up")]
    pub scroll_half_up: String,
    /// Jump back to the welcome panel
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    /// Jump to the last loaded panel
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,
    /// Open the current article in the browser
    #[serde(default = "default_key_open_browser")]
    pub open_browser: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            scroll_down: default_key_scroll_down(),
            scroll_up: default_key_scroll_up(),
            next_panel: default_key_next_panel(),
            prev_panel: default_key_prev_panel(),
            scroll_half_down: default_key_scroll_half_down(),
            scroll_half_up: default_key_scroll_half_up(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
            open_browser: default_key_open_browser(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_scroll_down() -> String { "j".to_string() }
fn default_key_scroll_up() -> String { "k".to_string() }
fn default_key_next_panel() -> String { "<Space>".to_string() }
fn default_key_prev_panel() -> String { "<BS>".to_string() }
fn default_key_scroll_half_down() -> String { "<C-d>".to_string() }
fn default_key_scroll_half_up() -> String { "<C-u>".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }
fn default_key_open_browser() -> String { "<CR>".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wikiscroll")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_batch_size() -> u32 {
    20
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!(
        "WikiScroll/{} (terminal random article reader)",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> u64 {
    100
}

fn default_fallback_image_url() -> String {
    DEFAULT_FALLBACK_IMAGE_URL.to_string()
}

fn default_load_ahead() -> u32 {
    2
}

fn default_overlay_strength() -> f32 {
    0.55
}

fn default_animation_duration() -> u64 {
    150
}

fn default_animation_fps() -> u32 {
    60
}

fn default_scroll_lines() -> u32 {
    3
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/wikiscroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("wikiscroll")
            .join("config.toml")
    }

    /// Get the TUI log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("wikiscroll.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.api.batch_size, 20);
        assert_eq!(config.api.namespace, 0);
        assert_eq!(config.ui.load_ahead_viewports, 2);
        assert_eq!(config.ui.scroll.easing, EasingType::Cubic);
        assert!(config.api.user_agent.starts_with("WikiScroll/"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [api]
            endpoint = "https://de.wikipedia.org/w/api.php"
            batch_size = 5

            [ui.scroll]
            easing = "quintic"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.endpoint, "https://de.wikipedia.org/w/api.php");
        assert_eq!(config.api.batch_size, 5);
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.ui.scroll.easing, EasingType::Quintic);
        assert!(config.ui.scroll.smooth_enabled);
        assert_eq!(config.keymap.quit, "q");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[api]\nbatch_size = \"lots\"").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_expand_tilde() {
        let plain = PathBuf::from("/var/tmp/wikiscroll");
        assert_eq!(expand_tilde(&plain), plain);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(&PathBuf::from("~/logs")), home.join("logs"));
        }
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.api.batch_size, config.api.batch_size);
        assert_eq!(parsed.ui.fallback_image_url, config.ui.fallback_image_url);
    }
}
