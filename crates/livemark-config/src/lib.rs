use livemark_engine::{
    overlay::OverlayOptions, parsing::blocks::ParseOptions, slash::SlashMenuOptions,
    view::EditorOptions,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub level: String,
    /// Log destination; the terminal belongs to the UI.
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: PathBuf::from("~/.local/state/livemark/livemark.log"),
        }
    }
}

impl LoggingConfig {
    /// `file` with `~` and environment variables expanded.
    pub fn resolved_file(&self) -> PathBuf {
        Config::expand_path(&self.file).unwrap_or_else(|| self.file.clone())
    }
}

/// Overlay keys set in the file. Distances depend on the host's units, so
/// unset keys keep whatever the host starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_scroll_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_interval_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drag_threshold: Option<f64>,
}

impl OverlayConfig {
    pub fn apply_to(&self, base: OverlayOptions) -> OverlayOptions {
        OverlayOptions {
            margin_tolerance: self.margin_tolerance.unwrap_or(base.margin_tolerance),
            edge_threshold: self.edge_threshold.unwrap_or(base.edge_threshold),
            max_scroll_speed: self.max_scroll_speed.unwrap_or(base.max_scroll_speed),
            tick_interval_ms: self.tick_interval_ms.unwrap_or(base.tick_interval_ms),
            handle_width: self.handle_width.unwrap_or(base.handle_width),
            handle_height: self.handle_height.unwrap_or(base.handle_height),
            drag_threshold: self.drag_threshold.unwrap_or(base.drag_threshold),
        }
    }
}

/// Every section is optional; missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParseOptions,
    pub overlay: OverlayConfig,
    pub slash_menu: SlashMenuOptions,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the log file path
        config.logging.file =
            Self::expand_path(&config.logging.file).unwrap_or(config.logging.file);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/livemark");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Options for one editor: `base` carries the host's defaults and the
    /// file overrides the keys it sets.
    pub fn editor_options(&self, base: EditorOptions) -> EditorOptions {
        EditorOptions {
            parser: self.parser,
            overlay: self.overlay.apply_to(base.overlay),
            slash_menu: self.slash_menu.clone(),
            ..base
        }
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/livemark/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.slash_menu.max_query_len, 20);
        assert_eq!(config.overlay, OverlayConfig::default());
        assert!(config.parser.merge_list_items);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config_content = r#"
[parser]
merge_list_items = false

[overlay]
edge_threshold = 2.0

[slash_menu]
blur_grace_ms = 300
"#;
        let config: Config = toml::from_str(config_content).unwrap();

        assert!(!config.parser.merge_list_items);
        assert_eq!(config.overlay.edge_threshold, Some(2.0));
        assert_eq!(config.overlay.max_scroll_speed, None);
        assert_eq!(config.slash_menu.blur_grace_ms, 300);
        assert_eq!(config.slash_menu.max_query_len, 20);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_editor_options_follow_config() {
        let mut config = Config::default();
        config.parser.merge_list_items = false;
        config.slash_menu.max_query_len = 5;

        let options = config.editor_options(EditorOptions::default());
        assert!(!options.parser.merge_list_items);
        assert_eq!(options.slash_menu.max_query_len, 5);
        assert_eq!(options.overlay, OverlayOptions::default());
    }

    fn cell_options() -> EditorOptions {
        EditorOptions {
            overlay: OverlayOptions {
                margin_tolerance: 0.0,
                edge_threshold: 2.0,
                max_scroll_speed: 1.0,
                tick_interval_ms: 60,
                handle_width: 2.0,
                handle_height: 1.0,
                drag_threshold: 1.0,
            },
            ..EditorOptions::default()
        }
    }

    #[test]
    fn test_file_without_overlay_section_keeps_host_overlay() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[logging]\nlevel = \"debug\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        let options = config.editor_options(cell_options());

        assert_eq!(options.overlay, cell_options().overlay);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_overlay_keys_override_only_what_they_set() {
        let config: Config = toml::from_str("[overlay]\nedge_threshold = 3.0\n").unwrap();

        let options = config.editor_options(cell_options());

        assert_eq!(options.overlay.edge_threshold, 3.0);
        assert_eq!(options.overlay.handle_width, 2.0);
        assert_eq!(options.overlay.tick_interval_ms, 60);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/test/path");
        let expanded = Config::expand_path(&path);

        assert!(expanded.is_some());
        let expanded = expanded.unwrap();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("LIVEMARK_TEST_VAR", "/test/env/path");
        }

        let path = PathBuf::from("$LIVEMARK_TEST_VAR/subdir");
        let expanded = Config::expand_path(&path);

        assert_eq!(expanded, Some(PathBuf::from("/test/env/path/subdir")));

        unsafe {
            env::remove_var("LIVEMARK_TEST_VAR");
        }
    }

    #[test]
    fn test_default_log_file_is_expanded() {
        let file = LoggingConfig::default().resolved_file();
        let file = file.to_string_lossy();

        assert!(!file.starts_with('~'));
        assert!(file.ends_with("livemark/livemark.log"));
    }

    #[test]
    fn test_expand_path_with_absolute_path() {
        let path = PathBuf::from("/absolute/path");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_invalid_toml_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[overlay\nedge_threshold = ").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = Config::default();
        test_config.overlay.handle_height = Some(1.0);
        test_config.logging = LoggingConfig {
            level: "debug".to_string(),
            file: PathBuf::from("/tmp/livemark.log"),
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_log_file_with_env_var_in_toml() {
        unsafe {
            env::set_var("LIVEMARK_LOG_ROOT", "/custom/logs");
        }
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "[logging]\nfile = \"$LIVEMARK_LOG_ROOT/livemark.log\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.logging.file, PathBuf::from("/custom/logs/livemark.log"));
        assert_eq!(config.logging.level, "warn");

        unsafe {
            env::remove_var("LIVEMARK_LOG_ROOT");
        }
    }
}
