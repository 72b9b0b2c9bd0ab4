use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub pix: PixConfig,
    #[serde(default)]
    pub affiliate: AffiliateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL used when building webhook callbacks and share links.
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PixConfig {
    pub api_token: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateConfig {
    /// Subscription price in cents.
    pub subscription_value: i64,
    /// Commission share in percent of the subscription value.
    pub commission_percent: i64,
    /// Minimum paid balance (cents) before a withdrawal is accepted.
    pub min_withdrawal: i64,
    /// Free trial window granted at registration, in hours.
    pub trial_hours: i64,
}

impl Default for AffiliateConfig {
    fn default() -> Self {
        Self {
            subscription_value: 2990,
            commission_percent: 45,
            min_withdrawal: 1000,
            trial_hours: 48,
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                toml::from_str(&config_str)
                    .map_err(|e| format!("Failed to parse config file: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // No config file: build from environment variables and defaults.
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is required when no config.toml is present")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 5000u16),
                        base_url: get_env("BASE_URL"),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 86_400i64),
                        refresh_token_expires_in: get_env_parse(
                            "JWT_REFRESH_EXPIRES_IN",
                            2_592_000i64,
                        ),
                    },
                    pix: PixConfig {
                        api_token: get_env("PIX_API_TOKEN").unwrap_or_default(),
                        base_url: get_env("PIX_BASE_URL")
                            .unwrap_or_else(|| "https://api.pushinpay.com.br".to_string()),
                    },
                    affiliate: AffiliateConfig {
                        subscription_value: get_env_parse("SUBSCRIPTION_VALUE", 2990i64),
                        commission_percent: get_env_parse("COMMISSION_PERCENT", 45i64),
                        min_withdrawal: get_env_parse("MIN_WITHDRAWAL", 1000i64),
                        trial_hours: get_env_parse("TRIAL_HOURS", 48i64),
                    },
                }
            }
            Err(e) => {
                return Err(format!("Failed to read config file {config_path}: {e}").into());
            }
        };

        // Environment overrides apply even when the file exists.
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("BASE_URL") {
            config.server.base_url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.refresh_token_expires_in = n;
        }
        if let Ok(v) = env::var("PIX_API_TOKEN") {
            config.pix.api_token = v;
        }
        if let Ok(v) = env::var("PIX_BASE_URL") {
            config.pix.base_url = v;
        }
        if let Ok(v) = env::var("SUBSCRIPTION_VALUE")
            && let Ok(n) = v.parse()
        {
            config.affiliate.subscription_value = n;
        }
        if let Ok(v) = env::var("COMMISSION_PERCENT")
            && let Ok(n) = v.parse()
        {
            config.affiliate.commission_percent = n;
        }
        if let Ok(v) = env::var("MIN_WITHDRAWAL")
            && let Ok(n) = v.parse()
        {
            config.affiliate.min_withdrawal = n;
        }
        if let Ok(v) = env::var("TRIAL_HOURS")
            && let Ok(n) = v.parse()
        {
            config.affiliate.trial_hours = n;
        }

        Ok(config)
    }
}
