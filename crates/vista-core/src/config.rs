use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub page: PageSource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log file written while the terminal UI owns the screen
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: default_log_file(),
        }
    }
}

/// Easing curve selection shared by every animator.
///
/// Unit variants are written as plain strings in TOML (`easing = "cubic"`),
/// the bezier variant as a table (`easing = { cubic_bezier = [0.25, 0.46, 0.45, 0.94] }`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump straight to the end value
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    /// Exponential ease-out
    EaseOut,
    /// The soft ease-out used by section reveals: cubic-bezier(0.25, 0.46, 0.45, 0.94)
    EaseOutQuad,
    /// Symmetric ease-in-out for looping motion: cubic-bezier(0.42, 0, 0.58, 1)
    EaseInOut,
    /// Critically damped spring, normalized to land exactly on the target
    Spring,
    CubicBezier([f64; 4]),
}

/// Timing constants for the animation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Lookahead added to the scroll offset before matching sections (nav bar height)
    #[serde(default = "default_scroll_spy_offset")]
    pub scroll_spy_offset: f64,
    /// Root margin for visibility regions; positive values pre-trigger
    #[serde(default = "default_visibility_margin")]
    pub visibility_margin_px: f64,
    /// Fraction of a region that must overlap the viewport (0.0 = any overlap)
    #[serde(default)]
    pub visibility_threshold: f64,
    /// How long the typewriter cursor lingers after the last character
    #[serde(default = "default_typewriter_hold")]
    pub typewriter_hold_ms: u64,
    /// Cursor blink half-period
    #[serde(default = "default_cursor_blink")]
    pub cursor_blink_ms: u64,
    /// Default easing for reveal items that do not name one
    #[serde(default)]
    pub easing: EasingType,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            scroll_spy_offset: default_scroll_spy_offset(),
            visibility_margin_px: default_visibility_margin(),
            visibility_threshold: 0.0,
            typewriter_hold_ms: default_typewriter_hold(),
            cursor_blink_ms: default_cursor_blink(),
            easing: EasingType::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds when nothing is animating
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Page pixels represented by one terminal row
    #[serde(default = "default_px_per_row")]
    pub px_per_row: f64,
    /// Terminal width under which navigation collapses into the overlay menu
    #[serde(default = "default_menu_breakpoint")]
    pub menu_breakpoint: u16,
    /// Smooth scrolling configuration
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            px_per_row: default_px_per_row(),
            menu_breakpoint: default_menu_breakpoint(),
            scroll: ScrollConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animate scrolling instead of jumping
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    /// Duration of one smooth scroll
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    /// Rows moved per scroll step when smooth scrolling is off
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
    /// Frame rate while an animation is running
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_animation_duration(),
            easing: EasingType::default(),
            scroll_lines: default_scroll_lines(),
            animation_fps: default_animation_fps(),
        }
    }
}

/// Where the page description comes from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageSource {
    /// Page description file; the built-in page is used when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vista")
        .join("vista.log")
}

fn default_true() -> bool {
    true
}

fn default_scroll_spy_offset() -> f64 {
    100.0
}

fn default_visibility_margin() -> f64 {
    50.0
}

fn default_typewriter_hold() -> u64 {
    1000
}

fn default_cursor_blink() -> u64 {
    500
}

fn default_tick_rate() -> u64 {
    100
}

fn default_px_per_row() -> f64 {
    20.0
}

fn default_menu_breakpoint() -> u16 {
    80
}

fn default_animation_duration() -> u64 {
    150
}

fn default_scroll_lines() -> u16 {
    1
}

fn default_animation_fps() -> u32 {
    60
}

/// Expand tilde (~) in path to user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
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
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults when it is missing
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/vista/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("vista")
            .join("config.toml")
    }

    /// Get the log file path (with tilde expansion)
    pub fn log_file(&self) -> PathBuf {
        expand_tilde(&self.general.log_file)
    }

    /// Get the page description path, if one is configured
    pub fn page_path(&self) -> Option<PathBuf> {
        self.page.path.as_deref().map(expand_tilde)
    }
}
