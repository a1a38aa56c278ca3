//! # CLI Configuration Loading
//!
//! ## Resolution Order
//! ```text
//! CartConfig::default()
//!      │
//!      ▼
//! TOML file: --config PATH, else <config dir>/cartkit/cart.toml if present
//!      │
//!      ▼
//! Environment overrides
//!   CARTKIT_SESSION_KEY     session_key
//!   CARTKIT_PRECISION       precision
//!   CARTKIT_PRICE_REQUIRED  price_required (true/false/1/0)
//!      │
//!      ▼
//! validate()
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cartkit_core::CartConfig;
use tracing::{debug, info, warn};

pub const ENV_SESSION_KEY: &str = "CARTKIT_SESSION_KEY";
pub const ENV_PRECISION: &str = "CARTKIT_PRECISION";
pub const ENV_PRICE_REQUIRED: &str = "CARTKIT_PRICE_REQUIRED";

/// Loads the cart configuration for this invocation.
///
/// An explicit `path` must exist; the default path is optional.
pub fn load(path: Option<&Path>) -> Result<CartConfig> {
    load_with_env(path, |name| std::env::var(name).ok())
}

fn load_with_env(path: Option<&Path>, env: impl Fn(&str) -> Option<String>) -> Result<CartConfig> {
    let mut config = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            read_file(path)?
        }
        None => match default_config_path() {
            Some(path) if path.exists() => read_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                CartConfig::default()
            }
            None => CartConfig::default(),
        },
    };

    apply_env_overrides(&mut config, env);
    config.validate().context("Invalid cart configuration")?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<CartConfig> {
    info!(?path, "Loading cart config from file");
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    CartConfig::from_toml_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// `<config dir>/cartkit/cart.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "cartkit", "cartkit")
        .map(|dirs| dirs.config_dir().join("cart.toml"))
}

/// Applies environment overrides. Unparseable values are ignored with a warning.
fn apply_env_overrides(config: &mut CartConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(key) = env(ENV_SESSION_KEY) {
        debug!(session_key = %key, "Overriding session key from environment");
        config.session_key = key;
    }

    if let Some(raw) = env(ENV_PRECISION) {
        match raw.trim().parse::<u32>() {
            Ok(precision) => config.precision = precision,
            Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_PRECISION),
        }
    }

    if let Some(raw) = env(ENV_PRICE_REQUIRED) {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => config.price_required = true,
            "false" | "0" => config.price_required = false,
            _ => warn!(value = %raw, "Ignoring invalid {}", ENV_PRICE_REQUIRED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(
            &path,
            r#"
session_key = "shop"
precision = 3

[model_attributes]
Product = ["name", "image"]

[model_price_field]
BuyableProduct = "price_vat_inc"
"#,
        )
        .unwrap();

        let config = load_with_env(Some(path.as_path()), no_env).unwrap();
        assert_eq!(config.session_key, "shop");
        assert_eq!(config.precision, 3);
        assert!(config.price_required);
        assert_eq!(
            config.attributes_for("Product"),
            Some(&["name".to_string(), "image".to_string()][..])
        );
        assert_eq!(config.price_field_for("BuyableProduct"), Some("price_vat_inc"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let err = load_with_env(Some(dir.path().join("nope.toml").as_path()), no_env).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "precision = \"two\"").unwrap();

        assert!(load_with_env(Some(path.as_path()), no_env).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "session_key = \"shop\"\nprecision = 3\n").unwrap();

        let env = env_from(&[
            (ENV_SESSION_KEY, "guest_1"),
            (ENV_PRECISION, "4"),
            (ENV_PRICE_REQUIRED, "false"),
        ]);
        let config = load_with_env(Some(path.as_path()), env).unwrap();
        assert_eq!(config.session_key, "guest_1");
        assert_eq!(config.precision, 4);
        assert!(!config.price_required);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = CartConfig::default();
        apply_env_overrides(
            &mut config,
            env_from(&[(ENV_PRECISION, "lots"), (ENV_PRICE_REQUIRED, "maybe")]),
        );
        assert_eq!(config, CartConfig::default());
    }

    #[test]
    fn test_overrides_are_validated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(&path, "").unwrap();

        let env = env_from(&[(ENV_PRECISION, "42")]);
        let err = load_with_env(Some(path.as_path()), env).unwrap_err();
        assert!(err.to_string().contains("Invalid cart configuration"));
    }
}
