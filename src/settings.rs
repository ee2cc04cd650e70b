use image::Rgba;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use crate::pdf::extract::DEFAULT_BACKGROUND;
use crate::widget::boxcutter::BoxCutterConfig;

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "boxcutter";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Initial render scale of a freshly created component
    #[serde(default = "default_scale")]
    pub default_scale: f64,

    /// Outline levels kept by outline extraction, 1 = top level only
    #[serde(default = "default_outline_max_depth")]
    pub outline_max_depth: usize,

    #[serde(default = "default_render_cache_pages")]
    pub render_cache_pages: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Fill colour of combined snippets, `#rrggbb`
    #[serde(default = "default_snippet_background")]
    pub snippet_background: String,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_scale() -> f64 {
    1.5
}

fn default_outline_max_depth() -> usize {
    1
}

fn default_render_cache_pages() -> usize {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_snippet_background() -> String {
    "#ffffff".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            default_scale: default_scale(),
            outline_max_depth: default_outline_max_depth(),
            render_cache_pages: default_render_cache_pages(),
            log_level: default_log_level(),
            snippet_background: default_snippet_background(),
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

pub fn load_settings() {
    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };
    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, &path);
        }
    }
}

/// Load an explicit settings file. Unreadable or malformed files leave the
/// current settings in place.
pub fn load_settings_from_path(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    // Unversioned files predate the outline depth key and were written with
    // a zero depth meaning "top level"
    if settings.version == 0 && settings.outline_max_depth == 0 {
        settings.outline_max_depth = default_outline_max_depth();
    }

    settings.version = CURRENT_VERSION;
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let content = generate_settings_yaml(settings);

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

fn generate_settings_yaml(settings: &Settings) -> String {
    let mut content = String::new();

    content.push_str(&format!("version: {}\n", settings.version));
    content.push_str(&format!("default_scale: {}\n", settings.default_scale));
    content.push_str(&format!(
        "outline_max_depth: {}\n",
        settings.outline_max_depth
    ));
    content.push_str(&format!(
        "render_cache_pages: {}\n",
        settings.render_cache_pages
    ));
    content.push_str(&format!("log_level: \"{}\"\n", settings.log_level));
    content.push_str(&format!(
        "snippet_background: \"{}\"\n",
        settings.snippet_background
    ));

    content
}

/// Parse `#rrggbb` into an opaque colour
#[must_use]
pub fn parse_hex_color(raw: &str) -> Option<Rgba<u8>> {
    let hex = raw.trim().strip_prefix('#').unwrap_or(raw.trim());
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, u8::MAX]))
}

// Public API for accessing settings

pub fn get_default_scale() -> f64 {
    SETTINGS
        .read()
        .map(|s| s.default_scale)
        .unwrap_or_else(|_| default_scale())
}

pub fn get_outline_max_depth() -> usize {
    SETTINGS
        .read()
        .map(|s| s.outline_max_depth)
        .unwrap_or_else(|_| default_outline_max_depth())
}

pub fn get_render_cache_pages() -> usize {
    SETTINGS
        .read()
        .map(|s| s.render_cache_pages)
        .unwrap_or_else(|_| default_render_cache_pages())
}

pub fn get_log_level() -> log::LevelFilter {
    let raw = SETTINGS
        .read()
        .map(|s| s.log_level.clone())
        .unwrap_or_else(|_| default_log_level());
    raw.parse().unwrap_or_else(|_| {
        warn!("Unknown log level {raw:?}, using info");
        log::LevelFilter::Info
    })
}

pub fn get_snippet_background() -> Rgba<u8> {
    let raw = SETTINGS
        .read()
        .map(|s| s.snippet_background.clone())
        .unwrap_or_else(|_| default_snippet_background());
    parse_hex_color(&raw).unwrap_or_else(|| {
        warn!("Invalid snippet background {raw:?}, using white");
        DEFAULT_BACKGROUND
    })
}

/// Component configuration from the loaded settings
pub fn component_config() -> BoxCutterConfig {
    BoxCutterConfig {
        default_scale: get_default_scale(),
        outline_max_depth: get_outline_max_depth(),
        render_cache_pages: get_render_cache_pages(),
        snippet_background: get_snippet_background(),
    }
}

#[cfg(test)]
fn reset_to_defaults() {
    if let Ok(mut settings) = SETTINGS.write() {
        *settings = Settings::default();
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#ffffff"), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_hex_color("1a2B3c"), Some(Rgba([0x1a, 0x2b, 0x3c, 255])));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
    }

    #[test]
    #[serial]
    fn loads_values_from_explicit_path() {
        reset_to_defaults();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "version: 1\ndefault_scale: 2.0\noutline_max_depth: 3\nsnippet_background: \"#000000\"\n",
        )
        .unwrap();

        load_settings_from_path(&path);

        let config = component_config();
        assert!((config.default_scale - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.outline_max_depth, 3);
        assert_eq!(config.render_cache_pages, 8);
        assert_eq!(config.snippet_background, Rgba([0, 0, 0, 255]));
        reset_to_defaults();
    }

    #[test]
    #[serial]
    fn old_files_are_migrated_and_rewritten() {
        reset_to_defaults();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "version: 0\noutline_max_depth: 0\n").unwrap();

        load_settings_from_path(&path);

        assert_eq!(get_outline_max_depth(), 1);
        let rewritten = fs::read_to_string(&path).unwrap();
        assert!(rewritten.contains(&format!("version: {CURRENT_VERSION}")));
        assert!(rewritten.contains("log_level: \"info\""));
        reset_to_defaults();
    }

    #[test]
    #[serial]
    fn malformed_file_keeps_defaults() {
        reset_to_defaults();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "default_scale: [not, a, number]\n").unwrap();

        load_settings_from_path(&path);

        assert!((get_default_scale() - 1.5).abs() < f64::EPSILON);
        assert_eq!(get_log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn generated_yaml_round_trips() {
        let settings = Settings {
            default_scale: 0.75,
            ..Settings::default()
        };
        let parsed: Settings = serde_yaml::from_str(&generate_settings_yaml(&settings)).unwrap();
        assert!((parsed.default_scale - 0.75).abs() < f64::EPSILON);
        assert_eq!(parsed.snippet_background, "#ffffff");
    }
}
