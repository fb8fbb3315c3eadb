// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{bail, Result};
use clap::ValueEnum;
use psi_config::Backend;
use psi_protocol::IntersectionReport;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct Summary<'a> {
    backend: Backend,
    clear: &'a [i64],
    protected: &'a [i64],
    intersection: Vec<i64>,
    report: &'a IntersectionReport,
}

/// Print the sets and their intersection to stdout, failed elements to
/// stderr. Fails when any element did not reach a verdict.
pub fn print_report(
    backend: Backend,
    clear: &[i64],
    protected: &[i64],
    report: &IntersectionReport,
    format: OutputFormat,
) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write_report(&mut stdout, backend, clear, protected, report, format)?;

    let failures: Vec<_> = report.failures().collect();
    for failure in &failures {
        if let Err(e) = &failure.result {
            eprintln!(
                "Element {} (value {}) failed: {}",
                failure.index, failure.value, e
            );
        }
    }
    if !failures.is_empty() {
        bail!(
            "{} of {} elements could not be classified",
            failures.len(),
            report.outcomes().len()
        );
    }
    Ok(())
}

pub fn write_report<W: Write>(
    out: &mut W,
    backend: Backend,
    clear: &[i64],
    protected: &[i64],
    report: &IntersectionReport,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "Clear set: {:?}", clear)?;
            writeln!(out, "Protected set: {:?}", protected)?;
            writeln!(out, "Intersection: {:?}", report.intersection())?;
        }
        OutputFormat::Json => {
            let summary = Summary {
                backend,
                clear,
                protected,
                intersection: report.intersection(),
                report,
            };
            serde_json::to_writer_pretty(&mut *out, &summary)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
