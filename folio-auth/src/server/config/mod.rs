use serde::Deserialize;

// Bounds bcrypt accepts for its work factor
const MIN_HASH_COST: u32 = 4;
const MAX_HASH_COST: u32 = 31;

/// Longest token lifetime accepted: one year
const MAX_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Deserialize, Clone)]
pub struct Configuration {
    #[serde(default)]
    pub server: ServerConfiguration,
    pub auth: AuthConfiguration,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfiguration {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfiguration {
    pub access_secret: String,
    pub refresh_secret: String,

    #[serde(default = "default_access_ttl")]
    pub access_ttl_seconds: i64,

    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_seconds: i64,

    #[serde(default = "default_hash_cost")]
    pub password_hash_cost: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_access_ttl() -> i64 {
    15 * 60
}

fn default_refresh_ttl() -> i64 {
    7 * 24 * 60 * 60
}

fn default_hash_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Configuration {
    /// Optional `config.toml`, then `FOLIO_SERVER__*` environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(config::File::with_name("config"));
        }

        builder =
            builder.add_source(config::Environment::with_prefix("FOLIO_SERVER").separator("__"));

        builder.build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        let auth = &self.auth;
        if auth.access_secret.is_empty() || auth.refresh_secret.is_empty() {
            return Err("auth.access_secret and auth.refresh_secret are required".to_string());
        }
        if auth.access_secret == auth.refresh_secret {
            return Err("auth.access_secret and auth.refresh_secret must differ".to_string());
        }
        for (name, ttl) in [
            ("auth.access_ttl_seconds", auth.access_ttl_seconds),
            ("auth.refresh_ttl_seconds", auth.refresh_ttl_seconds),
        ] {
            if !(1..=MAX_TTL_SECONDS).contains(&ttl) {
                return Err(format!(
                    "{} must be between 1 and {}",
                    name, MAX_TTL_SECONDS
                ));
            }
        }
        if !(MIN_HASH_COST..=MAX_HASH_COST).contains(&auth.password_hash_cost) {
            return Err(format!(
                "auth.password_hash_cost must be between {} and {}",
                MIN_HASH_COST, MAX_HASH_COST
            ));
        }
        Ok(())
    }
}
