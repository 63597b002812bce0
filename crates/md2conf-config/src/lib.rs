//! Configuration management for md2conf.
//!
//! Parses `md2conf.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! Values are layered: defaults, then the config file, then [`CliSettings`]
//! (command-line flags, which already carry their environment variable
//! fallbacks). The result is resolved once at startup.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `confluence.url`
//! - `confluence.space`
//! - `confluence.username`
//! - `confluence.password`
//! - `confluence.ancestor_id`
//! - `links.job_url`
//! - `links.repo_url`

mod expand;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Confluence URL.
    pub url: Option<String>,
    /// Override target space key.
    pub space: Option<String>,
    /// Override username.
    pub username: Option<String>,
    /// Override password or API token.
    pub password: Option<String>,
    /// Override parent page ID.
    pub ancestor_id: Option<String>,
    /// Override table of contents flag.
    pub toc: Option<bool>,
    /// Override table of contents layout.
    pub toc_layout: Option<TocLayout>,
    /// Override notice panel mode.
    pub notice: Option<NoticeMode>,
    /// Override CI job link.
    pub job_url: Option<String>,
    /// Override repository link.
    pub repo_url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "md2conf.toml";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confluence connection configuration.
    pub confluence: ConfluenceConfig,
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Links shown in the notice panel.
    pub links: LinksConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Confluence configuration as read from the `[confluence]` section.
///
/// Every connection field is optional here; [`Config::require_confluence`]
/// checks them when publishing.
#[derive(Deserialize)]
#[serde(default)]
pub struct ConfluenceConfig {
    /// Confluence base URL, with or without the `/rest/api` suffix.
    pub url: Option<String>,
    /// Target space key.
    pub space: Option<String>,
    /// Username for basic auth.
    pub username: Option<String>,
    /// Password or API token for basic auth.
    pub password: Option<String>,
    /// Parent page ID for new pages.
    pub ancestor_id: Option<String>,
    /// HTTP timeout in seconds.
    pub timeout: u64,
    /// Normalize local content through the server before comparing.
    pub server_normalize: bool,
}

impl Default for ConfluenceConfig {
    fn default() -> Self {
        Self {
            url: None,
            space: None,
            username: None,
            password: None,
            ancestor_id: None,
            timeout: DEFAULT_TIMEOUT,
            server_normalize: true,
        }
    }
}

impl fmt::Debug for ConfluenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfluenceConfig")
            .field("url", &self.url)
            .field("space", &self.space)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("ancestor_id", &self.ancestor_id)
            .field("timeout", &self.timeout)
            .field("server_normalize", &self.server_normalize)
            .finish()
    }
}

/// Rendering configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Add a table of contents macro.
    pub toc: bool,
    /// Where the table of contents goes.
    pub toc_layout: TocLayout,
    /// When to add the auto-generated notice panel.
    pub notice: NoticeMode,
}

/// Table of contents placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TocLayout {
    /// TOC macro placed above the body.
    #[default]
    Inline,
    /// Two-column page layout with the TOC in the right sidebar.
    Sidebar,
}

impl FromStr for TocLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(Self::Inline),
            "sidebar" => Ok(Self::Sidebar),
            other => Err(format!("unknown TOC layout '{other}' (expected inline or sidebar)")),
        }
    }
}

impl fmt::Display for TocLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inline => "inline",
            Self::Sidebar => "sidebar",
        })
    }
}

/// When to add the auto-generated notice panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeMode {
    /// Only when a job or repository link is configured.
    #[default]
    Auto,
    /// Always, even without links.
    Always,
    /// Never.
    Never,
}

impl FromStr for NoticeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!(
                "unknown notice mode '{other}' (expected auto, always or never)"
            )),
        }
    }
}

impl fmt::Display for NoticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        })
    }
}

/// Links shown in the notice panel.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
    /// CI job that generated the page.
    pub job_url: Option<String>,
    /// Repository holding the markdown source.
    pub repo_url: Option<String>,
}

/// Validated Confluence connection settings.
#[derive(Clone)]
pub struct ConfluenceSettings {
    /// Confluence base URL.
    pub url: String,
    /// Target space key.
    pub space: String,
    /// Username for basic auth.
    pub username: String,
    /// Password or API token for basic auth.
    pub password: String,
    /// Parent page ID for new pages.
    pub ancestor_id: Option<String>,
    /// HTTP timeout.
    pub timeout: Duration,
    /// Normalize local content through the server before comparing.
    pub server_normalize: bool,
}

impl fmt::Debug for ConfluenceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfluenceSettings")
            .field("url", &self.url)
            .field("space", &self.space)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("ancestor_id", &self.ancestor_id)
            .field("timeout", &self.timeout)
            .field("server_normalize", &self.server_normalize)
            .finish()
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.password`").
        field: String,
        /// Error message (e.g., "${`CONFLUENCE_PSW`} not set").
        message: String,
    },
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `md2conf.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments (and their
    /// environment variables) to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// a value is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let confluence = &mut self.confluence;
        for (target, value) in [
            (&mut confluence.url, &settings.url),
            (&mut confluence.space, &settings.space),
            (&mut confluence.username, &settings.username),
            (&mut confluence.password, &settings.password),
            (&mut confluence.ancestor_id, &settings.ancestor_id),
            (&mut self.links.job_url, &settings.job_url),
            (&mut self.links.repo_url, &settings.repo_url),
        ] {
            if let Some(value) = value {
                *target = Some(value.clone());
            }
        }
        if let Some(toc) = settings.toc {
            self.render.toc = toc;
        }
        if let Some(toc_layout) = settings.toc_layout {
            self.render.toc_layout = toc_layout;
        }
        if let Some(notice) = settings.notice {
            self.render.notice = notice;
        }
    }

    /// Get validated Confluence connection settings.
    ///
    /// Use this instead of reading the `confluence` field directly when the
    /// command talks to Confluence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming every missing setting, or if the
    /// URL is invalid.
    pub fn require_confluence(&self) -> Result<ConfluenceSettings, ConfigError> {
        let conf = &self.confluence;
        let required = [
            (&conf.url, "url (--url / CONFLUENCE_URL)"),
            (&conf.space, "space (--space / CONFLUENCE_SPACE)"),
            (&conf.username, "username (--username / CONFLUENCE_USR)"),
            (&conf.password, "password (--password / CONFLUENCE_PSW)"),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(value, _)| value.as_deref().is_none_or(str::is_empty))
            .map(|(_, name)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Validation(format!(
                "missing Confluence settings: {}",
                missing.join(", ")
            )));
        }

        let url = conf.url.clone().unwrap_or_default();
        require_http_url(&url, "confluence.url")?;

        Ok(ConfluenceSettings {
            url,
            space: conf.space.clone().unwrap_or_default(),
            username: conf.username.clone().unwrap_or_default(),
            password: conf.password.clone().unwrap_or_default(),
            ancestor_id: conf.ancestor_id.clone().filter(|id| !id.is_empty()),
            timeout: Duration::from_secs(conf.timeout),
            server_normalize: conf.server_normalize,
        })
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Only settings every run depends on are checked here. Connection
    /// settings are checked by [`require_confluence`](Self::require_confluence)
    /// and links are shown as given, so a render-only run never fails on them.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.confluence.timeout == 0 {
            return Err(ConfigError::Validation(
                "confluence.timeout must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let confluence = &mut self.confluence;
        expand::expand_opt(&mut confluence.url, "confluence.url")?;
        expand::expand_opt(&mut confluence.space, "confluence.space")?;
        expand::expand_opt(&mut confluence.username, "confluence.username")?;
        expand::expand_opt(&mut confluence.password, "confluence.password")?;
        expand::expand_opt(&mut confluence.ancestor_id, "confluence.ancestor_id")?;
        expand::expand_opt(&mut self.links.job_url, "links.job_url")?;
        expand::expand_opt(&mut self.links.repo_url, "links.repo_url")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_cli_settings() -> CliSettings {
        CliSettings {
            url: Some("https://wiki.example.com".to_owned()),
            space: Some("DOCS".to_owned()),
            username: Some("bot".to_owned()),
            password: Some("token".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.confluence.url, None);
        assert_eq!(config.confluence.timeout, 30);
        assert!(config.confluence.server_normalize);
        assert!(!config.render.toc);
        assert_eq!(config.render.toc_layout, TocLayout::Inline);
        assert_eq!(config.render.notice, NoticeMode::Auto);
        assert_eq!(config.links.job_url, None);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.confluence.timeout, 30);
        assert!(config.confluence.server_normalize);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[confluence]
url = "https://example.atlassian.net/wiki"
space = "DOCS"
username = "bot"
password = "secret"
ancestor_id = "123456"
timeout = 10
server_normalize = false

[render]
toc = true
toc_layout = "sidebar"
notice = "never"

[links]
job_url = "https://ci.example.com/job/docs"
repo_url = "https://git.example.com/docs"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.confluence.url.as_deref(),
            Some("https://example.atlassian.net/wiki")
        );
        assert_eq!(config.confluence.space.as_deref(), Some("DOCS"));
        assert_eq!(config.confluence.ancestor_id.as_deref(), Some("123456"));
        assert_eq!(config.confluence.timeout, 10);
        assert!(!config.confluence.server_normalize);
        assert!(config.render.toc);
        assert_eq!(config.render.toc_layout, TocLayout::Sidebar);
        assert_eq!(config.render.notice, NoticeMode::Never);
        assert_eq!(
            config.links.repo_url.as_deref(),
            Some("https://git.example.com/docs")
        );
    }

    #[test]
    fn test_parse_unknown_toc_layout_fails() {
        let result: Result<Config, _> = toml::from_str("[render]\ntoc_layout = \"floating\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_toc_layout_from_str() {
        assert_eq!("inline".parse::<TocLayout>(), Ok(TocLayout::Inline));
        assert_eq!("sidebar".parse::<TocLayout>(), Ok(TocLayout::Sidebar));
        assert!("left".parse::<TocLayout>().is_err());
    }

    #[test]
    fn test_notice_mode_from_str() {
        assert_eq!("always".parse::<NoticeMode>(), Ok(NoticeMode::Always));
        assert_eq!(NoticeMode::Never.to_string(), "never");
        assert!("sometimes".parse::<NoticeMode>().is_err());
    }

    #[test]
    fn test_apply_cli_settings_overrides_file_values() {
        let mut config: Config = toml::from_str(
            r#"
[confluence]
url = "https://file.example.com"
space = "FILE"

[render]
toc_layout = "sidebar"
"#,
        )
        .unwrap();
        let settings = CliSettings {
            space: Some("CLI".to_owned()),
            toc: Some(true),
            notice: Some(NoticeMode::Always),
            job_url: Some("https://ci.example.com/1".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.confluence.space.as_deref(), Some("CLI"));
        assert_eq!(
            config.confluence.url.as_deref(),
            Some("https://file.example.com")
        ); // Unchanged
        assert!(config.render.toc);
        assert_eq!(config.render.toc_layout, TocLayout::Sidebar); // Unchanged
        assert_eq!(config.render.notice, NoticeMode::Always);
        assert_eq!(
            config.links.job_url.as_deref(),
            Some("https://ci.example.com/1")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.confluence.space, None);
        assert!(!config.render.toc);
    }

    #[test]
    fn test_require_confluence_lists_all_missing() {
        let config = Config::default();
        let err = config.require_confluence().unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(message.contains("CONFLUENCE_URL"));
        assert!(message.contains("CONFLUENCE_SPACE"));
        assert!(message.contains("CONFLUENCE_USR"));
        assert!(message.contains("CONFLUENCE_PSW"));
    }

    #[test]
    fn test_require_confluence_treats_empty_as_missing() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            password: Some(String::new()),
            ..full_cli_settings()
        });
        let message = config.require_confluence().unwrap_err().to_string();
        assert!(message.contains("password"));
        assert!(!message.contains("space"));
    }

    #[test]
    fn test_require_confluence_returns_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            ancestor_id: Some("42".to_owned()),
            ..full_cli_settings()
        });

        let settings = config.require_confluence().unwrap();

        assert_eq!(settings.url, "https://wiki.example.com");
        assert_eq!(settings.space, "DOCS");
        assert_eq!(settings.ancestor_id.as_deref(), Some("42"));
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(!format!("{settings:?}").contains("token"));
    }

    #[test]
    fn test_require_confluence_rejects_bad_scheme() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            url: Some("wiki.example.com".to_owned()),
            ..full_cli_settings()
        });
        let err = config.require_confluence().unwrap_err();
        assert!(err.to_string().contains("http://"));
    }

    #[test]
    fn test_validate_timeout_zero() {
        let mut config = Config::default();
        config.confluence.timeout = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_load_accepts_unchecked_urls_for_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("md2conf.toml");
        std::fs::write(&path, "[links]\nrepo_url = \"git@example.com:docs.git\"\n").unwrap();
        let settings = CliSettings {
            url: Some("wiki.example.com".to_owned()),
            job_url: Some("ci/job/1".to_owned()),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.links.job_url.as_deref(), Some("ci/job/1"));
        assert_eq!(
            config.links.repo_url.as_deref(),
            Some("git@example.com:docs.git")
        );
        // The connection URL is only checked once publishing needs it
        assert!(config.require_confluence().is_err());
    }

    #[test]
    fn test_load_explicit_file_with_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("md2conf.toml");
        std::fs::write(
            &path,
            r#"
[confluence]
url = "https://wiki.example.com"
space = "DOCS"

[render]
toc = true
"#,
        )
        .unwrap();
        let settings = CliSettings {
            space: Some("OPS".to_owned()),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.confluence.space.as_deref(), Some("OPS"));
        assert!(config.render.toc);
    }

    #[test]
    fn test_load_expands_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MD2CONF_TEST_CONFIG_PSW", "s3cret");
            std::env::remove_var("MD2CONF_TEST_CONFIG_SPACE");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("md2conf.toml");
        std::fs::write(
            &path,
            r#"
[confluence]
password = "${MD2CONF_TEST_CONFIG_PSW}"
space = "${MD2CONF_TEST_CONFIG_SPACE:-DOCS}"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.confluence.password.as_deref(), Some("s3cret"));
        assert_eq!(config.confluence.space.as_deref(), Some("DOCS"));
        unsafe {
            std::env::remove_var("MD2CONF_TEST_CONFIG_PSW");
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("md2conf.toml");
        std::fs::write(&path, "[confluence\nurl = 1").unwrap();
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut config = Config::default();
        config.confluence.password = Some("hunter2".to_owned());
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
