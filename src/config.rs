use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::{
    parser::{ParseOptions, DEFAULT_MAX_SKIPPED_SAMPLES, DEFAULT_MAX_UPLOAD_BYTES},
    query::MatchMode,
    storage::{self, StorageManager},
};

const CONFIG_FILE: &str = "config.yaml";

/// Settings for bookmark file imports
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Url schemes an anchor may use to be imported
    #[serde(default = "default_allowed_schemes")]
    pub allowed_schemes: Vec<String>,

    /// How many skipped hrefs are reported back
    #[serde(default = "default_max_skipped_samples")]
    pub max_skipped_samples: usize,

    /// Largest accepted upload in bytes, 0 disables the limit
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            allowed_schemes: default_allowed_schemes(),
            max_skipped_samples: DEFAULT_MAX_SKIPPED_SAMPLES,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn default_allowed_schemes() -> Vec<String> {
    vec!["http".to_string(), "https".to_string()]
}

fn default_max_skipped_samples() -> usize {
    DEFAULT_MAX_SKIPPED_SAMPLES
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub match_mode: MatchMode,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub query: QueryConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: String,
}

impl Config {
    fn validate(&mut self) -> anyhow::Result<()> {
        let import = &mut self.import;

        if import.allowed_schemes.is_empty() {
            bail!("import.allowed_schemes must list at least one scheme");
        }

        for scheme in import.allowed_schemes.iter_mut() {
            *scheme = scheme.trim().to_lowercase();
            let valid = scheme
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if !valid {
                bail!("import.allowed_schemes contains invalid scheme '{scheme}'");
            }
        }

        Ok(())
    }

    pub fn load_with(base_path: &str) -> anyhow::Result<Self> {
        let store = storage::BackendLocal::new(base_path)
            .with_context(|| format!("couldn't create {base_path}"))?;

        // create new if does not exist
        if !store.exists(CONFIG_FILE) {
            log::info!("writing default config to {base_path}/{CONFIG_FILE}");
            store.write(
                CONFIG_FILE,
                serde_yml::to_string(&Self::default())?.as_bytes(),
            )?;
        }

        let config_str =
            String::from_utf8(store.read(CONFIG_FILE)?).context("config file is not valid utf8")?;
        let mut config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.base_path = base_path.to_string();

        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let store = storage::BackendLocal::new(&self.base_path)?;

        let config_str = serde_yml::to_string(&self)?;
        store.write(CONFIG_FILE, config_str.as_bytes())?;
        Ok(())
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            allowed_schemes: self.import.allowed_schemes.clone(),
            max_skipped_samples: self.import.max_skipped_samples,
            max_upload_bytes: match self.import.max_upload_bytes {
                0 => None,
                limit => Some(limit),
            },
        }
    }
}
