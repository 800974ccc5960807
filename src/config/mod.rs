//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::package::{Package, PackageCatalog};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Environment variable overriding [`StoreConfig::url`]
pub const STORE_URL_ENV: &str = "ENROLL_STORE_URL";

/// Environment variable overriding [`StoreConfig::api_key`]
pub const STORE_KEY_ENV: &str = "ENROLL_STORE_KEY";

/// Connection settings of the remote store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project endpoint (e.g., "https://xyz.supabase.co")
    #[serde(default)]
    pub url: Option<String>,

    /// Public access key sent with every request
    #[serde(default)]
    pub api_key: Option<String>,

    /// Table receiving the enrollments
    #[serde(default = "default_table")]
    pub table: String,

    /// Upper bound on one remote write; `None` waits forever
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,
}

fn default_table() -> String {
    "enrollments".to_string()
}

fn default_timeout_secs() -> Option<u64> {
    Some(30)
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// Whether both endpoint and credential are present
    pub fn has_credentials(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        filled(&self.url) && filled(&self.api_key)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Complete configuration of an enrollment page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentConfig {
    #[serde(default)]
    pub store: StoreConfig,

    /// Packages offered by the selector
    #[serde(default = "default_packages")]
    pub packages: Vec<Package>,

    /// Constant written to `payment_method` by the payment step
    #[serde(default = "default_payment_method")]
    pub payment_method: String,

    /// Currency prefix of price labels
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_packages() -> Vec<Package> {
    vec![
        Package {
            id: "3_days_workshop".to_string(),
            name: "3 Days Workshop".to_string(),
            price: 3000,
        },
        Package {
            id: "3_days_with_support".to_string(),
            name: "3 Days Workshop + 6 Month Support".to_string(),
            price: 5000,
        },
    ]
}

fn default_payment_method() -> String {
    "bKash".to_string()
}

fn default_currency() -> String {
    "BDT".to_string()
}

impl Default for EnrollmentConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

impl EnrollmentConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Take the store endpoint and key from the environment when set
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(STORE_URL_ENV).ok(),
            std::env::var(STORE_KEY_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, api_key: Option<String>) {
        if let Some(url) = url.filter(|v| !v.trim().is_empty()) {
            self.store.url = Some(url);
        }
        if let Some(key) = api_key.filter(|v| !v.trim().is_empty()) {
            self.store.api_key = Some(key);
        }
    }

    /// Check the catalog and store settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.packages.is_empty() {
            return Err(ConfigError::MissingField {
                field: "packages".to_string(),
                context: "enrollment config".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for package in &self.packages {
            if package.id.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "packages.id".to_string(),
                    value: package.id.clone(),
                    message: "package id must not be empty".to_string(),
                });
            }
            if !seen.insert(package.id.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "packages.id".to_string(),
                    value: package.id.clone(),
                    message: "package ids must be unique".to_string(),
                });
            }
            if package.name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "packages.name".to_string(),
                    value: package.id.clone(),
                    message: "package name must not be empty".to_string(),
                });
            }
            if package.price == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "packages.price".to_string(),
                    value: package.id.clone(),
                    message: "price must be positive".to_string(),
                });
            }
        }

        if self.store.table.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.table".to_string(),
                value: self.store.table.clone(),
                message: "table name must not be empty".to_string(),
            });
        }
        if self.store.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "store.timeout_secs".to_string(),
                value: "0".to_string(),
                message: "timeout must be at least one second".to_string(),
            });
        }
        if self.payment_method.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "payment_method".to_string(),
                context: "enrollment config".to_string(),
            });
        }

        Ok(())
    }

    /// The package catalog described by this configuration
    pub fn catalog(&self) -> PackageCatalog {
        PackageCatalog::new(self.packages.clone(), self.currency.clone())
    }

    /// Configuration without store credentials, used for testing
    pub fn default_config() -> Self {
        Self {
            store: StoreConfig::default(),
            packages: default_packages(),
            payment_method: default_payment_method(),
            currency: default_currency(),
        }
    }
}
