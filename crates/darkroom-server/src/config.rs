use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};

/// JWT secrets that must never reach production.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Server configuration, read once at start-up.
///
/// | Env var                   | Default                 |
/// |---------------------------|-------------------------|
/// | `DARKROOM_ENV`            | `development`           |
/// | `DARKROOM_HOST`           | `0.0.0.0`               |
/// | `DARKROOM_PORT`           | `3000`                  |
/// | `DARKROOM_DB_PATH`        | `darkroom.db`           |
/// | `DARKROOM_JWT_SECRET`     | `dev-secret-change-me`  |
/// | `DARKROOM_JWT_EXPIRES_IN` | `7d`                    |
/// | `DARKROOM_CLIENT_URL`     | `http://localhost:5173` |
/// | `DARKROOM_STATIC_DIR`     | unset                   |
#[derive(Debug, Clone)]
pub struct Config {
    pub env: Environment,
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub client_url: String,
    pub static_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let env = match or("DARKROOM_ENV", "development").as_str() {
            "development" => Environment::Development,
            "production" => Environment::Production,
            other => bail!("DARKROOM_ENV must be `development` or `production`, got `{other}`"),
        };

        let host = or("DARKROOM_HOST", "0.0.0.0");
        let port: u16 = or("DARKROOM_PORT", "3000")
            .parse()
            .context("DARKROOM_PORT must be a valid port number")?;
        let addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("invalid bind address {host}:{port}"))?;

        let jwt_secret = or("DARKROOM_JWT_SECRET", "dev-secret-change-me");
        if env == Environment::Production && PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("DARKROOM_JWT_SECRET is unset or still a placeholder; set a random secret for production");
        }

        let token_ttl = parse_lifetime(&or("DARKROOM_JWT_EXPIRES_IN", "7d"))?;

        Ok(Self {
            env,
            addr,
            db_path: or("DARKROOM_DB_PATH", "darkroom.db").into(),
            jwt_secret,
            token_ttl,
            client_url: or("DARKROOM_CLIENT_URL", "http://localhost:5173"),
            static_dir: var("DARKROOM_STATIC_DIR").map(PathBuf::from),
        })
    }

    pub fn is_production(&self) -> bool {
        self.env == Environment::Production
    }
}

/// `7d`, `12h`, `30m`, `45s` or bare seconds.
fn parse_lifetime(raw: &str) -> anyhow::Result<chrono::Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => (&raw[..i], Some(c)),
        _ => (raw, None),
    };
    let n: i64 = digits
        .parse()
        .with_context(|| format!("DARKROOM_JWT_EXPIRES_IN: invalid lifetime `{raw}`"))?;
    if n <= 0 {
        bail!("DARKROOM_JWT_EXPIRES_IN must be positive, got `{raw}`");
    }

    let ttl = match unit {
        Some('d') => chrono::Duration::try_days(n),
        Some('h') => chrono::Duration::try_hours(n),
        Some('m') => chrono::Duration::try_minutes(n),
        Some('s') | None => chrono::Duration::try_seconds(n),
        Some(other) => bail!("DARKROOM_JWT_EXPIRES_IN: unknown unit `{other}`"),
    };
    ttl.with_context(|| format!("DARKROOM_JWT_EXPIRES_IN: `{raw}` is out of range"))
}
