// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::csv::CsvArgs;
use crate::helpers::telemetry::setup_simple_tracing;
use crate::run::RunArgs;
use crate::{config_show, csv, run};
use anyhow::Result;
use clap::{command, ArgAction, Parser, Subcommand};
use psi_config::{load_config, CliOverrides, PsiConfig};
use tracing::{info, instrument, Level};

#[derive(Parser, Debug)]
#[command(name = "psi")]
#[command(
    about = "Private set intersection over homomorphic encryption",
    long_about = None,
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PSI_GIT_SHA"), ")")
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `psi -vvv` will give you
    /// trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> Result<()> {
        setup_simple_tracing(self.log_level());

        match self.command {
            Commands::Run(args) => {
                let config = load(self.config, args.overrides())?;
                run::execute(args, config).await?
            }
            Commands::Csv(args) => {
                let config = load(self.config, args.overrides())?;
                csv::execute(args, config).await?
            }
            Commands::Config => {
                let config = load(self.config, CliOverrides::default())?;
                config_show::execute(&config)?
            }
        }

        Ok(())
    }
}

fn load(config_file: Option<String>, overrides: CliOverrides) -> Result<PsiConfig> {
    let config = load_config(config_file, overrides)?;
    info!("Config loaded from: {:?}", config.config_file);
    Ok(config)
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Intersect two integer sets
    Run(RunArgs),

    /// Intersect the n-grams of two record files
    Csv(CsvArgs),

    /// Print the resolved configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;
    use psi_config::Backend;

    #[test]
    fn log_levels() {
        let cli = Cli::try_parse_from(["psi", "config"]).unwrap();
        assert_eq!(cli.log_level(), Level::WARN);
        let cli = Cli::try_parse_from(["psi", "-vv", "config"]).unwrap();
        assert_eq!(cli.log_level(), Level::DEBUG);
        let cli = Cli::try_parse_from(["psi", "config", "-q"]).unwrap();
        assert_eq!(cli.log_level(), Level::ERROR);
        assert!(Cli::try_parse_from(["psi", "-v", "-q", "config"]).is_err());
    }

    #[test]
    fn parses_run_arguments() {
        let cli = Cli::try_parse_from([
            "psi",
            "run",
            "--clear",
            "3,2,1,4",
            "--protected=-1,5",
            "--backend",
            "mock",
            "--security",
            "insecure",
            "--seed",
            "9",
            "--pooled",
        ])
        .unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("run expected");
        };
        assert!(args.scheme.pooled);
        let overrides = args.overrides();
        assert_eq!(overrides.backend, Some(Backend::Mock));
        assert_eq!(overrides.inputs.clear, Some(vec![3, 2, 1, 4]));
        assert_eq!(overrides.inputs.protected, Some(vec![-1, 5]));
        assert_eq!(overrides.blinding.seed, Some(9));
        assert_eq!(overrides.blinding.bound, None);
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(Cli::try_parse_from(["psi", "run", "--backend", "ckks"]).is_err());
    }
}
