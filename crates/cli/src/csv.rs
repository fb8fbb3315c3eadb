// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::engine::intersect_sets;
use crate::output::print_report;
use crate::run::SchemeArgs;
use anyhow::{Context, Result};
use clap::Args;
use psi_config::{CliOverrides, PsiConfig};
use psi_ingest::{read_records, record_identifiers, tokenize_records, DEFAULT_GRAM_SIZE};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct CsvArgs {
    /// Records of the evaluator, used in the clear
    #[arg(long = "clear-file")]
    pub clear_file: PathBuf,

    /// Records of the key owner, encrypted before evaluation
    #[arg(long = "protected-file")]
    pub protected_file: PathBuf,

    /// N-gram size
    #[arg(long, default_value_t = DEFAULT_GRAM_SIZE)]
    pub ngram: usize,

    /// Treat the first line of each file as a header
    #[arg(long)]
    pub header: bool,

    #[command(flatten)]
    pub scheme: SchemeArgs,
}

impl CsvArgs {
    pub fn overrides(&self) -> CliOverrides {
        self.scheme.overrides()
    }
}

/// Distinct n-gram identifiers of every record in `path`.
pub fn load_identifiers(path: &Path, ngram: usize, header: bool) -> Result<Vec<i64>> {
    let records = read_records(path, header)?;
    let tokens = tokenize_records(&records, ngram)?;
    let ids = record_identifiers(&tokens)
        .with_context(|| format!("Could not encode n-grams of {}", path.display()))?;
    info!(path = %path.display(), records = records.len(), identifiers = ids.len(), "Records tokenized");
    Ok(ids)
}

pub async fn execute(args: CsvArgs, config: PsiConfig) -> Result<()> {
    let clear = load_identifiers(&args.clear_file, args.ngram, args.header)?;
    let protected = load_identifiers(&args.protected_file, args.ngram, args.header)?;
    let report = intersect_sets(&config, &clear, &protected, args.scheme.pooled).await?;
    print_report(config.backend, &clear, &protected, &report, args.scheme.format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use psi_config::Backend;
    use psi_test_helpers::write_file_with_dirs;

    #[tokio::test]
    async fn intersects_record_bigrams() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        write_file_with_dirs(&a, b"rec-0,bob,0\n").unwrap();
        write_file_with_dirs(&b, b"rec-7,obi,7\n").unwrap();

        let clear = load_identifiers(&a, 2, false).unwrap();
        let protected = load_identifiers(&b, 2, false).unwrap();
        assert_eq!(clear.len(), 2);

        let mut config = PsiConfig::default();
        config.backend = Backend::Mock;
        let report = intersect_sets(&config, &clear, &protected, false)
            .await
            .unwrap();
        // only "ob" is shared between "bob" and "obi"
        assert_eq!(report.intersection(), vec![0x6f62]);
    }
}
