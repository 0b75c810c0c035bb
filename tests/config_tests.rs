use pretty_assertions::assert_eq;
use serial_test::serial;
use society_be::config::{Config, MEMORY_DATABASE_URL};
use std::env;

mod common;

const KEYS: [&str; 8] = [
    "DATABASE_URL",
    "JWT_SECRET",
    "JWT_EXPIRATION_DAYS",
    "BCRYPT_COST",
    "HOST",
    "PORT",
    "ENVIRONMENT",
    "CORS_ORIGIN",
];

/// Runs `f` with the config variables cleared, restoring them afterwards.
fn with_clean_env<F: FnOnce()>(f: F) {
    let saved: Vec<(&str, Option<String>)> =
        KEYS.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in KEYS {
        unsafe {
            env::remove_var(key);
        }
    }

    f();

    for (key, value) in saved {
        unsafe {
            match value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }
}

#[test]
#[serial]
fn test_config_defaults() {
    common::setup_test_env();

    with_clean_env(|| {
        let config = Config::from_env_only().unwrap();

        assert_eq!(config.database_url, "postgres://localhost:5432/society");
        assert_eq!(config.jwt_expiration_days, 7);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 5000);
        assert_eq!(config.environment, "development");
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert!(config.is_development());
        assert!(!config.uses_memory_store());
    });
}

#[test]
#[serial]
fn test_config_custom_values() {
    with_clean_env(|| {
        unsafe {
            env::set_var("DATABASE_URL", MEMORY_DATABASE_URL);
            env::set_var("JWT_SECRET", "custom-secret");
            env::set_var("JWT_EXPIRATION_DAYS", "3");
            env::set_var("BCRYPT_COST", "6");
            env::set_var("HOST", "0.0.0.0");
            env::set_var("PORT", "8081");
            env::set_var("ENVIRONMENT", "production");
        }

        let config = Config::from_env_only().unwrap();

        assert!(config.uses_memory_store());
        assert_eq!(config.jwt_secret, "custom-secret");
        assert_eq!(config.jwt_expiration_days, 3);
        assert_eq!(config.bcrypt_cost, 6);
        assert_eq!(config.server_address(), "0.0.0.0:8081");
        assert!(config.is_production());
    });
}

#[test]
#[serial]
fn test_unparseable_numbers_fall_back_to_defaults() {
    with_clean_env(|| {
        unsafe {
            env::set_var("PORT", "not-a-port");
            env::set_var("JWT_EXPIRATION_DAYS", "soon");
            env::set_var("BCRYPT_COST", "high");
        }

        let config = Config::from_env_only().unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.jwt_expiration_days, 7);
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
    });
}
