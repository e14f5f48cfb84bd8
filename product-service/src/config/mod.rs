use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

pub const SERVICE_NAME: &str = "product-service";

const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017/productDB";

#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    /// Overrides the database named in `uri`.
    pub database: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Mongodb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::Mongodb),
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown STORE_BACKEND '{}', expected 'mongodb' or 'memory'",
                other
            ))),
        }
    }
}

impl ProductConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let store = match env::var("STORE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StoreBackend::default(),
        };

        // Only the MongoDB backend needs a URI.
        let uri_required = is_prod && store == StoreBackend::Mongodb;

        Ok(ProductConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: Secret::new(get_env(
                    "MONGODB_URI",
                    Some(DEFAULT_MONGODB_URI),
                    uri_required,
                )?),
                database: env::var("MONGODB_DATABASE").ok().filter(|s| !s.is_empty()),
            },
            store,
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    const ENV_KEYS: [&str; 5] = [
        "ENVIRONMENT",
        "STORE_BACKEND",
        "MONGODB_URI",
        "MONGODB_DATABASE",
        "PORT",
    ];

    /// Runs `f` with exactly `vars` set among the variables `load` reads.
    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        for key in ENV_KEYS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = f();
        for key in ENV_KEYS {
            env::remove_var(key);
        }
        result
    }

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("mongodb".parse::<StoreBackend>().unwrap(), StoreBackend::Mongodb);
        assert_eq!(" Memory ".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert!("redis".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_get_env_falls_back_outside_prod() {
        let value = get_env("PRODUCT_SERVICE_TEST_UNSET_VAR", Some("fallback"), false).unwrap();
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_get_env_required_in_prod() {
        let result = get_env("PRODUCT_SERVICE_TEST_UNSET_VAR", Some("fallback"), true);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    #[serial]
    fn test_load_defaults_to_local_mongodb() {
        let config = with_env(&[], ProductConfig::load).unwrap();

        assert_eq!(config.store, StoreBackend::Mongodb);
        assert_eq!(config.mongodb.uri.expose_secret(), DEFAULT_MONGODB_URI);
        assert!(config.mongodb.database.is_none());
    }

    #[test]
    #[serial]
    fn test_load_reads_backend_database_and_port() {
        let config = with_env(
            &[
                ("STORE_BACKEND", "memory"),
                ("MONGODB_DATABASE", "catalog"),
                ("PORT", "4321"),
            ],
            ProductConfig::load,
        )
        .unwrap();

        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.mongodb.database.as_deref(), Some("catalog"));
        assert_eq!(config.common.port, 4321);
    }

    #[test]
    #[serial]
    fn test_load_ignores_empty_database_override() {
        let config = with_env(&[("MONGODB_DATABASE", "")], ProductConfig::load).unwrap();
        assert!(config.mongodb.database.is_none());
    }

    #[test]
    #[serial]
    fn test_load_rejects_unknown_backend() {
        let result = with_env(&[("STORE_BACKEND", "redis")], ProductConfig::load);
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }

    #[test]
    #[serial]
    fn test_load_requires_uri_in_prod_for_mongodb() {
        let result = with_env(&[("ENVIRONMENT", "prod")], ProductConfig::load);
        assert!(matches!(result, Err(AppError::ConfigError(_))));

        let config = with_env(
            &[
                ("ENVIRONMENT", "prod"),
                ("MONGODB_URI", "mongodb://db.internal:27017/products"),
            ],
            ProductConfig::load,
        )
        .unwrap();
        assert_eq!(
            config.mongodb.uri.expose_secret(),
            "mongodb://db.internal:27017/products"
        );
    }

    #[test]
    #[serial]
    fn test_load_memory_backend_in_prod_needs_no_uri() {
        let config = with_env(
            &[("ENVIRONMENT", "prod"), ("STORE_BACKEND", "memory")],
            ProductConfig::load,
        )
        .unwrap();

        assert_eq!(config.store, StoreBackend::Memory);
    }
}
