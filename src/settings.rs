use std::path::Path;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::links::DEFAULT_BASE_URL;
use crate::normalize::rules::{Replacement, Rules};
use crate::term;

/// One faculty overview page plus its formatting options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Plan {
    pub url: String,
    pub faculty: String,
    /// Labels are written as "long name (shorthand) info".
    #[serde(default)]
    pub shorthand_syntax: bool,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default = "default_graphical")]
    pub graphical: bool,
}

fn default_graphical() -> bool {
    true
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub blacklist: Vec<String>,
    /// e.g. `ws24`; derived from today's date when unset.
    #[serde(default)]
    pub current_term: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Pause between two overview page requests.
    #[serde(default)]
    pub fetch_delay_ms: u64,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    #[serde(default)]
    pub id_rules: Vec<Replacement>,
    #[serde(default)]
    pub label_noise: Vec<String>,

    // secrets file
    #[serde(default)]
    sked: Option<Credentials>,
    // OSTFALIA_USER / OSTFALIA_PASS
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    pass: Option<String>,
}

impl Settings {
    /// Load the main yaml config, the optional secrets file and the
    /// `OSTFALIA_*` environment. The secrets file wins over the environment.
    pub fn load(config_file: &Path, secrets_file: &Path) -> Result<Self> {
        Config::builder()
            .add_source(Environment::with_prefix("OSTFALIA"))
            .add_source(File::from(config_file).format(FileFormat::Yaml))
            .add_source(
                File::from(secrets_file)
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {}", config_file.display()))?
            .try_deserialize()
            .context("Invalid configuration")
    }

    #[cfg(test)]
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()?
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn credentials(&self) -> Result<Credentials> {
        if let Some(sked) = &self.sked {
            return Ok(sked.clone());
        }
        match (&self.user, &self.pass) {
            (Some(user), Some(pass)) => Ok(Credentials {
                user: user.clone(),
                pass: pass.clone(),
            }),
            _ => bail!(
                "Please specify your Ostfalia credentials either via a secrets.yaml file or via \
                 the OSTFALIA_USER and OSTFALIA_PASS environment variables"
            ),
        }
    }

    pub fn term_tag(&self) -> String {
        self.current_term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(term::current)
    }

    pub fn rules(&self) -> Rules {
        Rules::with_extra(&self.id_rules, &self.label_noise)
    }
}

// ── Tests ──
