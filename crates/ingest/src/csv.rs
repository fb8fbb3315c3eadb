// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::errors::IngestError;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};
use tracing::{debug, instrument};

/// One row of a record file.
///
/// Rows look like `rec_id,field,...,field,gt_id`. The first field becomes
/// the key, the trailing ground truth id is dropped and the fields in between
/// are concatenated into `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub text: String,
}

impl Record {
    /// Parse a single comma separated line. `line_no` is only used for errors.
    pub fn parse(line: &str, line_no: usize) -> Result<Self, IngestError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 2 {
            return Err(IngestError::MalformedRecord {
                line: line_no,
                fields: fields.len(),
            });
        }

        Ok(Self {
            key: fields[0].to_string(),
            text: fields[1..fields.len() - 1].concat(),
        })
    }
}

/// Parse records from a reader, skipping blank lines and, when asked, the
/// first line as a header.
pub fn parse_records<R: BufRead>(reader: R, skip_header: bool) -> Result<Vec<Record>, IngestError> {
    let mut records = vec![];
    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        if (skip_header && line_no == 1) || line.trim().is_empty() {
            continue;
        }
        records.push(Record::parse(line.trim_end_matches('\r'), line_no)?);
    }
    Ok(records)
}

/// Read every record of the file at `path`.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_records<P: AsRef<Path>>(path: P, skip_header: bool) -> Result<Vec<Record>, IngestError> {
    let path = path.as_ref();
    let with_path = |e: IngestError| match e {
        IngestError::Read(source) => IngestError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    };

    let file = File::open(path).map_err(|e| with_path(IngestError::Read(e)))?;
    let records = parse_records(BufReader::new(file), skip_header).map_err(with_path)?;

    debug!(records = records.len(), "Records read");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_key_and_trailing_id() {
        let record = Record::parse("rec-1-org,aus,m,tanmay,ghai,12", 1).unwrap();
        assert_eq!(record.key, "rec-1-org");
        assert_eq!(record.text, "ausmtanmayghai");

        let record = Record::parse("rec-2,7", 1).unwrap();
        assert_eq!(record.text, "");
    }

    #[test]
    fn rejects_single_field_rows() {
        assert!(matches!(
            Record::parse("lonely", 4),
            Err(IngestError::MalformedRecord { line: 4, fields: 1 })
        ));
    }

    #[test]
    fn parses_lines_with_header_and_blanks() {
        let input = "rec_id,given_name,surname,gt_id\r\nrec-1,ada,lovelace,1\n\nrec-2,alan,turing,2\n";
        let records = parse_records(input.as_bytes(), true).unwrap();
        assert_eq!(
            records,
            vec![
                Record {
                    key: "rec-1".to_string(),
                    text: "adalovelace".to_string()
                },
                Record {
                    key: "rec-2".to_string(),
                    text: "alanturing".to_string()
                },
            ]
        );

        let Err(IngestError::MalformedRecord { line, .. }) =
            parse_records("a,b,c\nbad\n".as_bytes(), false)
        else {
            panic!("malformed record expected");
        };
        assert_eq!(line, 2);
    }
}
