// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{find_in_parent, resolve_config_path, ConfigLocation};
use crate::validation::validate;
use crate::yaml::load_yaml_with_env;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use psi_fhe_params::{SecurityTier, DEFAULT_PLAINTEXT_MODULUS};
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};
use strum::{Display, EnumString};
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "psi.config.yaml";
pub const ENV_PREFIX: &str = "PSI_";

/// Which scheme adaptor runs the protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Backend {
    /// Real BFV over fhe.rs
    #[default]
    Bfv,
    /// Plain modular arithmetic with depth tracking, for tests and dry runs
    Mock,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BfvConfig {
    /// Parameter tier. `insecure` is only fit for tests and local runs
    pub security: SecurityTier,
    /// Plaintext modulus t. Should be prime
    pub plaintext_modulus: u64,
    /// Provisioned multiplicative depth. Defaults to the clear set size
    pub depth: Option<usize>,
}

impl Default for BfvConfig {
    fn default() -> Self {
        Self {
            security: SecurityTier::default(),
            plaintext_modulus: DEFAULT_PLAINTEXT_MODULUS,
            depth: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlindingConfig {
    /// Scalars are drawn from `[1, bound]`
    pub bound: u64,
    /// Seed a reproducible scalar stream instead of the OS rng
    pub seed: Option<u64>,
}

impl Default for BlindingConfig {
    fn default() -> Self {
        Self {
            bound: 100,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Worker threads. Defaults to all but one of the available cores
    pub threads: Option<usize>,
    /// Element pipelines allowed in flight at once
    pub max_tasks: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            threads: None,
            max_tasks: 64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputsConfig {
    pub clear: Vec<i64>,
    pub protected: Vec<i64>,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            clear: vec![3, 2, 1, 4],
            protected: vec![1, 2, 3, 5],
        }
    }
}

/// The resolved configuration of a run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PsiConfig {
    pub backend: Backend,
    pub bfv: BfvConfig,
    pub blinding: BlindingConfig,
    pub pool: PoolConfig,
    pub inputs: InputsConfig,
    /// File the configuration was read from, if any
    #[serde(skip)]
    pub config_file: Option<PathBuf>,
}

impl PsiConfig {
    /// Depth to provision for a clear set of `clear_len` elements.
    pub fn depth_for(&self, clear_len: usize) -> usize {
        self.bfv.depth.unwrap_or(clear_len)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Could not serialize configuration")
    }
}

/// Values given on the command line. Unset fields leave the lower layers alone.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<Backend>,
    pub bfv: BfvOverrides,
    pub blinding: BlindingOverrides,
    pub pool: PoolOverrides,
    pub inputs: InputsOverrides,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct BfvOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plaintext_modulus: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct BlindingOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct PoolOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tasks: Option<usize>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct InputsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<Vec<i64>>,
}

/// Load defaults, then the config file, then `PSI_` environment variables,
/// then the command line overrides, and validate the result.
///
/// A file named with `config_file` must exist. Without one, a
/// `psi.config.yaml` in the working directory or its parents is used, then
/// the per-user default, and finally no file at all.
pub fn load_config(config_file: Option<String>, overrides: CliOverrides) -> Result<PsiConfig> {
    let location = resolve_config_path(
        find_in_parent,
        env::current_dir()?,
        OsDirs::config_dir(),
        DEFAULT_CONFIG_NAME,
        config_file.map(PathBuf::from),
    );

    let yaml = match &location {
        ConfigLocation::Default(path) if !path.is_file() => None,
        other => Some(
            load_yaml_with_env(other.path())
                .with_context(|| format!("Could not read {}", other.path().display()))?,
        ),
    };
    debug!(location = ?location, loaded = yaml.is_some(), "Resolved configuration file");

    let mut figment = Figment::from(Serialized::defaults(PsiConfig::default()));
    if let Some(yaml) = &yaml {
        figment = figment.merge(Yaml::string(yaml));
    }
    let mut config: PsiConfig = figment
        .merge(
            Env::prefixed(ENV_PREFIX)
                .split("__")
                .filter(|key| is_config_section(key.as_str())),
        )
        .merge(Serialized::defaults(overrides))
        .extract()
        .context("Could not parse configuration")?;

    config.config_file = yaml.map(|_| location.path().to_path_buf());
    validate(&config)?;
    Ok(config)
}

const SECTIONS: &[&str] = &["backend", "bfv", "blinding", "pool", "inputs"];

/// Only `PSI_` variables naming a config section are read, other tools
/// sharing the prefix are left alone.
fn is_config_section(key: &str) -> bool {
    key.split('.')
        .next()
        .is_some_and(|section| SECTIONS.iter().any(|s| s.eq_ignore_ascii_case(section)))
}

pub struct OsDirs;
impl OsDirs {
    /// `~/.config/psi` on linux, the working directory when the OS has no config dir.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("psi"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
