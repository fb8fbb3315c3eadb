// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::csv::Record;
use crate::errors::IngestError;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Bigrams, as used for fuzzy record linkage.
pub const DEFAULT_GRAM_SIZE: usize = 2;

/// Widest n-gram, in UTF-8 bytes, that packs into a positive `i64`.
const MAX_GRAM_BYTES: usize = 7;

/// Sliding window n-grams over the characters of `text`.
///
/// `"tanmay"` with `n = 2` gives `["ta", "an", "nm", "ma", "ay"]`. Text
/// shorter than `n` has no n-grams.
pub fn ngrams(text: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if n == 0 || chars.len() < n {
        return vec![];
    }
    chars.windows(n).map(|w| w.iter().collect()).collect()
}

/// N-grams of every record, keyed by record key. A repeated key keeps its
/// first record.
pub fn tokenize_records(
    records: &[Record],
    n: usize,
) -> Result<BTreeMap<String, Vec<String>>, IngestError> {
    if n == 0 {
        return Err(IngestError::InvalidGramSize);
    }

    let mut tokens = BTreeMap::new();
    for record in records {
        if tokens.contains_key(&record.key) {
            debug!(key = %record.key, "Duplicate record key ignored");
            continue;
        }
        tokens.insert(record.key.clone(), ngrams(&record.text, n));
    }
    Ok(tokens)
}

/// Character codes of each record's n-grams, concatenated in order.
pub fn preprocess(tokens: &BTreeMap<String, Vec<String>>) -> BTreeMap<String, Vec<i64>> {
    tokens
        .iter()
        .map(|(key, grams)| {
            let codes = grams
                .iter()
                .flat_map(|g| g.chars())
                .map(|c| c as i64)
                .collect();
            (key.clone(), codes)
        })
        .collect()
}

/// Pack the UTF-8 bytes of an n-gram big endian into one identifier.
pub fn gram_identifier(gram: &str) -> Result<i64, IngestError> {
    let bytes = gram.as_bytes();
    if bytes.len() > MAX_GRAM_BYTES {
        return Err(IngestError::GramTooWide {
            gram: gram.to_string(),
            bytes: bytes.len(),
        });
    }
    Ok(bytes.iter().fold(0i64, |acc, b| (acc << 8) | *b as i64))
}

/// One identifier per distinct n-gram across all records, in ascending
/// order. This is the set a party feeds into the intersection.
pub fn record_identifiers(tokens: &BTreeMap<String, Vec<String>>) -> Result<Vec<i64>, IngestError> {
    let ids = tokens
        .values()
        .flatten()
        .map(|g| gram_identifier(g))
        .collect::<Result<BTreeSet<_>, _>>()?;
    Ok(ids.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(key: &str, text: &str) -> Record {
        Record {
            key: key.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn bigrams() {
        assert_eq!(ngrams("tanmay", 2), vec!["ta", "an", "nm", "ma", "ay"]);
        assert_eq!(ngrams("abc", 3), vec!["abc"]);
        assert!(ngrams("", 2).is_empty());
        assert!(ngrams("a", 2).is_empty());
        assert!(ngrams("abc", 0).is_empty());
        assert_eq!(ngrams("né", 1), vec!["n", "é"]);
    }

    #[test]
    fn tokenizes_in_key_order_and_keeps_first_duplicate() {
        let tokens = tokenize_records(
            &[record("b", "xyz"), record("a", "ab"), record("b", "other")],
            2,
        )
        .unwrap();
        assert_eq!(tokens.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(tokens["b"], vec!["xy", "yz"]);
        assert!(matches!(
            tokenize_records(&[], 0),
            Err(IngestError::InvalidGramSize)
        ));
    }

    #[test]
    fn preprocess_emits_character_codes() {
        let tokens = tokenize_records(&[record("k", "abc")], 2).unwrap();
        assert_eq!(preprocess(&tokens)["k"], vec![97, 98, 98, 99]);
    }

    #[test]
    fn identifiers_are_distinct_and_packed() {
        let tokens = tokenize_records(&[record("1", "abab"), record("2", "bab")], 2).unwrap();
        // "ab" = 0x6162, "ba" = 0x6261
        assert_eq!(record_identifiers(&tokens).unwrap(), vec![0x6162, 0x6261]);
        assert!(matches!(
            gram_identifier("abcdefgh"),
            Err(IngestError::GramTooWide { bytes: 8, .. })
        ));
        assert_eq!(gram_identifier("").unwrap(), 0);
    }

    proptest! {
        #[test]
        fn ngram_count(text in "[a-z]{0,20}", n in 1usize..5) {
            let grams = ngrams(&text, n);
            let expected = if text.len() >= n { text.len() - n + 1 } else { 0 };
            prop_assert_eq!(grams.len(), expected);
            prop_assert!(grams.iter().all(|g| g.len() == n));
        }

        #[test]
        fn ascii_bigram_identifiers_fit_the_default_modulus(text in "[ -~]{0,40}") {
            let tokens = tokenize_records(&[record("k", &text)], DEFAULT_GRAM_SIZE).unwrap();
            let ids = record_identifiers(&tokens).unwrap();
            prop_assert!(ids.iter().all(|id| (0..65537).contains(id)));
        }
    }
}
