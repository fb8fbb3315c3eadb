// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::classifier::Verdict;
use crate::errors::ElementError;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// What happened to one protected element.
#[derive(Debug)]
pub struct ElementOutcome {
    pub index: usize,
    pub value: i64,
    pub result: Result<Verdict, ElementError>,
}

impl ElementOutcome {
    pub fn is_member(&self) -> bool {
        matches!(self.result, Ok(Verdict::Member))
    }
}

impl Serialize for ElementOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ElementOutcome", 4)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("value", &self.value)?;
        match &self.result {
            Ok(verdict) => {
                state.serialize_field("verdict", verdict)?;
                state.serialize_field("error", &Option::<String>::None)?;
            }
            Err(e) => {
                state.serialize_field("verdict", &Option::<Verdict>::None)?;
                state.serialize_field("error", &Some(e.to_string()))?;
            }
        }
        state.end()
    }
}

/// Outcomes of a run, one per protected element, in protected set order.
#[derive(Debug, Default, Serialize)]
pub struct IntersectionReport {
    outcomes: Vec<ElementOutcome>,
}

impl IntersectionReport {
    pub fn new(outcomes: Vec<ElementOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[ElementOutcome] {
        &self.outcomes
    }

    /// Protected values classified as members, in input order, duplicates kept.
    pub fn intersection(&self) -> Vec<i64> {
        self.members().map(|o| o.value).collect()
    }

    pub fn members(&self) -> impl Iterator<Item = &ElementOutcome> {
        self.outcomes.iter().filter(|o| o.is_member())
    }

    /// Elements whose classification failed or never ran.
    pub fn failures(&self) -> impl Iterator<Item = &ElementOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// Every element reached a verdict.
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}
