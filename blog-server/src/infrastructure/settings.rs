use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use super::logging::LogFormat;

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_CLIENT_URL: &str = "http://localhost:3000";
const MAX_JWT_TTL_SECONDS: i64 = 10 * 365 * 24 * 3600;

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    /// `None` selects the in-memory store.
    pub(crate) database_url: Option<String>,
    pub(crate) database_max_connections: u32,
    pub(crate) jwt_secret: String,
    pub(crate) jwt_ttl_seconds: i64,
    pub(crate) http_addr: String,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) uploads_dir: PathBuf,
    pub(crate) log_level: String,
    pub(crate) log_format: LogFormat,
    pub(crate) http_request_body_limit_bytes: usize,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let jwt_secret = env.required("JWT_SECRET")?;
        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }
        let jwt_ttl_seconds: i64 = env
            .get("JWT_TTL_SECONDS")
            .unwrap_or_else(|| "3600".to_string())
            .parse()
            .context("Failed to parse JWT_TTL_SECONDS, expecting integer")?;
        if !(1..=MAX_JWT_TTL_SECONDS).contains(&jwt_ttl_seconds) {
            return Err(anyhow!(
                "JWT_TTL_SECONDS must be between 1 and {MAX_JWT_TTL_SECONDS}"
            ));
        }

        let http_addr = match env.get("PORT") {
            Some(port) => {
                let port: u16 = port
                    .parse()
                    .context("Failed to parse PORT, expecting 0..65535")?;
                format!("0.0.0.0:{port}")
            }
            None => env
                .get("HTTP_ADDR")
                .unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
        };

        let cors_origins = parse_cors_origins(
            &env.get("CLIENT_URL")
                .or_else(|| env.get("CORS_ORIGINS"))
                .unwrap_or_else(|| DEFAULT_CLIENT_URL.to_string()),
        );
        if cors_origins.is_empty() {
            return Err(anyhow!("CLIENT_URL must list at least one origin"));
        }

        let log_level = env
            .get("LOG_LEVEL")
            .or_else(|| env.get("RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());
        let log_format = LogFormat::parse(&env.get("LOG_FORMAT").unwrap_or_default())?;

        let database_max_connections =
            u32::try_from(env.positive_usize("DATABASE_MAX_CONNECTIONS", 5)?)
                .context("DATABASE_MAX_CONNECTIONS is too large")?;
        let uploads_dir = env
            .get("UPLOADS_DIR")
            .unwrap_or_else(|| "uploads".to_string());

        Ok(Self {
            database_url: env.get("DATABASE_URL"),
            database_max_connections,
            jwt_secret,
            jwt_ttl_seconds,
            http_addr,
            cors_origins,
            uploads_dir: PathBuf::from(uploads_dir),
            log_level,
            log_format,
            http_request_body_limit_bytes: env
                .positive_usize("HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?,
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Blank values count as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key).ok_or_else(|| anyhow!("{key} is required"))
    }

    fn positive_usize(&self, key: &str, default: usize) -> Result<usize> {
        let value = match self.get(key) {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?,
            None => default,
        };

        if value == 0 {
            return Err(anyhow!("{key} must be > 0"));
        }
        Ok(value)
    }
}

fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{LogFormat, Settings};

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn settings(vars: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let settings = settings(&[("JWT_SECRET", SECRET)]).expect("settings must parse");

        assert!(settings.database_url.is_none());
        assert_eq!(settings.http_addr, "0.0.0.0:5000");
        assert_eq!(settings.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(settings.uploads_dir.to_str(), Some("uploads"));
        assert_eq!(settings.jwt_ttl_seconds, 3600);
        assert_eq!(settings.log_format, LogFormat::Compact);
        assert_eq!(settings.http_request_body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn port_overrides_http_addr() {
        let settings = settings(&[
            ("JWT_SECRET", SECRET),
            ("HTTP_ADDR", "127.0.0.1:8080"),
            ("PORT", "5050"),
        ])
        .expect("settings must parse");

        assert_eq!(settings.http_addr, "0.0.0.0:5050");
    }

    #[test]
    fn client_url_is_split_into_origins() {
        let settings = settings(&[
            ("JWT_SECRET", SECRET),
            ("CLIENT_URL", "http://a.test, http://b.test ,"),
        ])
        .expect("settings must parse");

        assert_eq!(settings.cors_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn short_secret_is_rejected() {
        assert!(settings(&[("JWT_SECRET", "short")]).is_err());
    }

    #[test]
    fn missing_secret_is_rejected() {
        assert!(settings(&[]).is_err());
    }

    #[test]
    fn zero_body_limit_is_rejected() {
        let result = settings(&[
            ("JWT_SECRET", SECRET),
            ("HTTP_REQUEST_BODY_LIMIT_BYTES", "0"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn jwt_ttl_outside_ten_years_is_rejected() {
        for ttl in ["0", "-60", "315360001", "9223372036854775807"] {
            let result = settings(&[("JWT_SECRET", SECRET), ("JWT_TTL_SECONDS", ttl)]);
            assert!(result.is_err(), "ttl {ttl} must be rejected");
        }
    }

    #[test]
    fn jwt_ttl_of_ten_years_is_accepted() {
        let settings = settings(&[("JWT_SECRET", SECRET), ("JWT_TTL_SECONDS", "315360000")])
            .expect("settings must parse");

        assert_eq!(settings.jwt_ttl_seconds, 315_360_000);
    }
}
