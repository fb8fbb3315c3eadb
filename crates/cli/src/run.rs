// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::engine::intersect_sets;
use crate::output::{print_report, OutputFormat};
use anyhow::Result;
use clap::Args;
use psi_config::{
    Backend, BfvOverrides, BlindingOverrides, CliOverrides, InputsOverrides, PoolOverrides,
    PsiConfig,
};
use psi_fhe::SecurityTier;

/// Scheme, blinding and scheduling flags shared by `run` and `csv`.
#[derive(Args, Debug, Clone, Default)]
pub struct SchemeArgs {
    /// Scheme backend: bfv or mock
    #[arg(long)]
    pub backend: Option<Backend>,

    /// BFV parameter tier: insecure or secure
    #[arg(long, value_parser = SecurityTier::from_name)]
    pub security: Option<SecurityTier>,

    /// Plaintext modulus t
    #[arg(long)]
    pub plaintext_modulus: Option<u64>,

    /// Multiplicative depth to provision. Defaults to the clear set size
    #[arg(long)]
    pub depth: Option<usize>,

    /// Blinding scalars are drawn from [1, R]
    #[arg(long = "blinding-bound", value_name = "R")]
    pub blinding_bound: Option<u64>,

    /// Seed the blinding scalar stream for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads for --pooled
    #[arg(long)]
    pub threads: Option<usize>,

    /// Process elements concurrently on a worker pool
    #[arg(long)]
    pub pooled: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl SchemeArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            backend: self.backend,
            bfv: BfvOverrides {
                security: self.security,
                plaintext_modulus: self.plaintext_modulus,
                depth: self.depth,
            },
            blinding: BlindingOverrides {
                bound: self.blinding_bound,
                seed: self.seed,
            },
            pool: PoolOverrides {
                threads: self.threads,
                max_tasks: None,
            },
            inputs: InputsOverrides::default(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Comma separated clear set held by the evaluator
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub clear: Option<Vec<i64>>,

    /// Comma separated protected set held by the key owner
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub protected: Option<Vec<i64>>,

    #[command(flatten)]
    pub scheme: SchemeArgs,
}

impl RunArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            inputs: InputsOverrides {
                clear: self.clear.clone(),
                protected: self.protected.clone(),
            },
            ..self.scheme.overrides()
        }
    }
}

pub async fn execute(args: RunArgs, config: PsiConfig) -> Result<()> {
    let clear = config.inputs.clear.clone();
    let protected = config.inputs.protected.clone();
    let report = intersect_sets(&config, &clear, &protected, args.scheme.pooled).await?;
    print_report(config.backend, &clear, &protected, &report, args.scheme.format)
}
