//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! screens and stores behind an `Arc`. Nothing in this crate reads process-wide
//! environment variables during request handling; callers pass already-read
//! values in as plain `Option<String>`, which keeps behaviour consistent in
//! multi-threaded runtimes and test harnesses.

use crate::error::{WardError, WardResult};
use serde::Deserialize;
use std::path::Path;

/// Specialty list used when neither the config file nor the caller supplies one.
pub const DEFAULT_SPECIALTIES: &[&str] = &[
    "General Internal Medicine",
    "Neurology",
    "Hematology",
    "Cardiology",
];

/// On-disk configuration file shape. All fields optional; anything missing
/// falls back to caller-supplied values or defaults.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    store_url: Option<String>,
    api_key: Option<String>,
    specialties: Option<Vec<String>>,
}

/// Ward configuration resolved at startup.
///
/// `store_url` is absent only for store-less runs built via
/// [`local`](Self::local); [`load`](Self::load) always requires one.
#[derive(Clone, Debug)]
pub struct WardConfig {
    store_url: Option<String>,
    api_key: Option<String>,
    specialties: Vec<String>,
}

impl WardConfig {
    /// Create a new `WardConfig`.
    ///
    /// # Errors
    ///
    /// Returns `WardError::InvalidInput` if the store URL is empty or the
    /// specialty list is empty.
    pub fn new(
        store_url: String,
        api_key: Option<String>,
        specialties: Vec<String>,
    ) -> WardResult<Self> {
        if store_url.trim().is_empty() {
            return Err(WardError::InvalidInput(
                "store_url cannot be empty".into(),
            ));
        }
        if specialties.is_empty() {
            return Err(WardError::InvalidInput(
                "specialty list cannot be empty".into(),
            ));
        }

        Ok(Self {
            store_url: Some(store_url.trim_end_matches('/').to_string()),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            specialties,
        })
    }

    /// Resolve configuration from an optional YAML file plus explicit override
    /// values (typically read from the environment by the binary).
    ///
    /// Precedence, highest first: override values, config file, defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resolved values fail validation.
    pub fn load(
        file: Option<&Path>,
        store_url_override: Option<String>,
        api_key_override: Option<String>,
    ) -> WardResult<Self> {
        let file_cfg = Self::read_file(file)?;

        let store_url = store_url_override
            .or(file_cfg.store_url)
            .ok_or_else(|| WardError::InvalidInput("no store URL configured".into()))?;
        let api_key = api_key_override.or(file_cfg.api_key);
        let specialties = file_cfg
            .specialties
            .unwrap_or_else(|| DEFAULT_SPECIALTIES.iter().map(|s| s.to_string()).collect());

        Self::new(store_url, api_key, specialties)
    }

    /// Resolve configuration for runs that never touch the remote store,
    /// such as the CLI's demo mode: the specialty list comes from the
    /// optional file or the defaults, and no store URL is recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// file supplies an empty specialty list.
    pub fn local(file: Option<&Path>) -> WardResult<Self> {
        let file_cfg = Self::read_file(file)?;
        let specialties = file_cfg
            .specialties
            .unwrap_or_else(|| DEFAULT_SPECIALTIES.iter().map(|s| s.to_string()).collect());
        if specialties.is_empty() {
            return Err(WardError::InvalidInput(
                "specialty list cannot be empty".into(),
            ));
        }

        Ok(Self {
            store_url: None,
            api_key: None,
            specialties,
        })
    }

    fn read_file(file: Option<&Path>) -> WardResult<ConfigFile> {
        match file {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(WardError::ConfigRead)?;
                serde_yaml::from_str::<ConfigFile>(&raw).map_err(WardError::ConfigParse)
            }
            None => Ok(ConfigFile {
                store_url: None,
                api_key: None,
                specialties: None,
            }),
        }
    }

    /// Base URL of the remote store, without a trailing slash. `None` for
    /// store-less configurations.
    pub fn store_url(&self) -> Option<&str> {
        self.store_url.as_deref()
    }

    /// API key for the remote store, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Configured specialty names, in display order.
    pub fn specialties(&self) -> &[String] {
        &self.specialties
    }

    /// Whether `name` exactly matches a configured specialty.
    pub fn is_known_specialty(&self, name: &str) -> bool {
        self.specialties.iter().any(|s| s == name)
    }
}
