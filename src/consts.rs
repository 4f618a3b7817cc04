use std::time::Duration;

/// The `User-Agent` header to send when issuing HTTP requests.
pub const HTTP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The duration before a HTTP request to the OneBot API times out.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// The OneBot API address used when none is configured.
pub const DEFAULT_ONEBOT_API_URL: &str = "http://127.0.0.1:3000";

/// The default path of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// The prefix of environment variables that override configuration values.
pub const ENV_PREFIX: &str = "SENDLIKE_";
