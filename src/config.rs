use std::fs;
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::{Error, consts};

/// Process-wide configuration, read once at startup.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the OneBot HTTP API
    #[serde(default = "default_onebot_api_url")]
    pub onebot_api_url: String,
    /// Tracing configuration
    #[serde(default)]
    pub tracing: TracingConfig,
}

/// Logging and span export configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct TracingConfig {
    /// Export spans over OTLP
    #[serde(default)]
    pub enabled: bool,
    /// Format of the log lines written to stderr
    #[serde(default)]
    pub format: Format,
}

/// Output format of the log lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Newline-delimited JSON objects.
    Json,
    /// Multi-line, human readable output.
    Pretty,
    /// Single-line, human readable output.
    #[default]
    Compact,
}

/// Where the configuration returned by [`load_or_create`] came from.
#[derive(Debug)]
pub enum Origin {
    /// The configuration file existed and was loaded.
    File,
    /// The configuration file did not exist and was created with the default values.
    Created,
    /// The configuration file could not be loaded or created, so the defaults are used.
    Fallback(Error),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            onebot_api_url: default_onebot_api_url(),
            tracing: TracingConfig::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from the TOML file at `path`, with environment variables prefixed
    /// with `SENDLIKE_` taking precedence.
    ///
    /// A missing file yields the default values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LoadConfig`] if the file cannot be parsed or a value has the wrong type.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(consts::ENV_PREFIX).split("__"))
            .extract()
            .map_err(|err| Error::LoadConfig {
                path: path.to_path_buf(),
                source: Box::new(err),
            })
    }
}

/// Loads the configuration file at `path`, creating it with the default values first if it does
/// not exist.
///
/// This never fails: if the file cannot be created or loaded, the default configuration is
/// returned together with the error in [`Origin::Fallback`].
pub fn load_or_create(path: impl AsRef<Path>) -> (Config, Origin) {
    let path = path.as_ref();

    if !path.exists() {
        return match create_default(path) {
            Ok(()) => (Config::default(), Origin::Created),
            Err(err) => (Config::default(), Origin::Fallback(err)),
        };
    }

    match Config::load(path) {
        Ok(config) => (config, Origin::File),
        Err(err) => (Config::default(), Origin::Fallback(err)),
    }
}

/// Writes the default configuration to `path`, creating parent directories as needed.
fn create_default(path: &Path) -> Result<(), Error> {
    let create = || -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, default_contents())
    };

    create().map_err(|source| Error::CreateConfig {
        path: path.to_path_buf(),
        source,
    })
}

/// Returns the contents of a freshly created configuration file.
fn default_contents() -> String {
    format!(
        "# Base URL of the OneBot HTTP API\nonebot_api_url = \"{}\"\n",
        consts::DEFAULT_ONEBOT_API_URL
    )
}

/// Returns the default OneBot API address.
#[must_use]
pub fn default_onebot_api_url() -> String {
    consts::DEFAULT_ONEBOT_API_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_create_missing_config_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let (config, origin) = load_or_create(&path);

        assert!(matches!(origin, Origin::Created));
        assert_eq!(config.onebot_api_url, "http://127.0.0.1:3000");
        assert!(path.exists());

        let (config, origin) = load_or_create(&path);

        assert!(matches!(origin, Origin::File));
        assert_eq!(config.onebot_api_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn it_should_create_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugins").join("sendlike").join("config.toml");

        let (_, origin) = load_or_create(&path);

        assert!(matches!(origin, Origin::Created));
        assert!(path.exists());
    }

    #[test]
    fn it_should_load_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "onebot_api_url = \"http://10.0.0.2:6700\"\n\n[tracing]\nformat = \"json\"\n",
        )
        .unwrap();

        let (config, origin) = load_or_create(&path);

        assert!(matches!(origin, Origin::File));
        assert_eq!(config.onebot_api_url, "http://10.0.0.2:6700");
        assert_eq!(config.tracing.format, Format::Json);
        assert!(!config.tracing.enabled);
    }

    #[test]
    fn it_should_default_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let (config, origin) = load_or_create(&path);

        assert!(matches!(origin, Origin::File));
        assert_eq!(config.onebot_api_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn it_should_fall_back_on_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "onebot_api_url = [1, 2\n").unwrap();

        let (config, origin) = load_or_create(&path);

        assert!(matches!(origin, Origin::Fallback(Error::LoadConfig { .. })));
        assert_eq!(config.onebot_api_url, "http://127.0.0.1:3000");
    }
}
