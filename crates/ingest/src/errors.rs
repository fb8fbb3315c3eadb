// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Could not read records from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read records: {0}")]
    Read(#[from] std::io::Error),

    /// A record needs a key and a trailing id at least
    #[error("Line {line} has {fields} field(s), a record needs at least 2")]
    MalformedRecord { line: usize, fields: usize },

    #[error("N-gram size must be at least 1")]
    InvalidGramSize,

    /// The n-gram does not fit in a positive 64 bit identifier
    #[error("N-gram {gram:?} is {bytes} bytes long, identifiers hold at most 7")]
    GramTooWide { gram: String, bytes: usize },
}
