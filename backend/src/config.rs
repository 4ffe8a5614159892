//! Server settings read from the environment.
//!
//! | Variable              | Default     |
//! |-----------------------|-------------|
//! | `SIGPP_HOST`          | `127.0.0.1` |
//! | `SIGPP_PORT`          | `8080`      |
//! | `SIGPP_MAX_UPLOAD_MB` | `10`        |
//! | `SIGPP_OPEN_BROWSER`  | `true`      |

use log::warn;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_UPLOAD_MB: usize = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Largest spreadsheet accepted by the upload endpoints, in bytes.
    pub max_upload_bytes: usize,
    /// Open the tool in the default browser once the server is up.
    pub open_browser: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            open_browser: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("SIGPP_HOST")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.host);

        let port = parse_or_default(&lookup, "SIGPP_PORT", defaults.port);
        let max_upload_mb = parse_or_default(&lookup, "SIGPP_MAX_UPLOAD_MB", DEFAULT_MAX_UPLOAD_MB);

        let open_browser = lookup("SIGPP_OPEN_BROWSER")
            .map(|value| flag_enabled(&value))
            .unwrap_or(defaults.open_browser);

        Self {
            host,
            port,
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
            open_browser,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        None => default,
    }
}

fn flag_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
