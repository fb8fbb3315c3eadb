// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

/// A clear set, a protected set and the intersection they must produce.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub clear: &'static [i64],
    pub protected: &'static [i64],
    pub expected: &'static [i64],
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "reference",
        clear: &[3, 2, 1, 4],
        protected: &[1, 2, 3, 5],
        expected: &[1, 2, 3],
    },
    Scenario {
        name: "empty_clear_set",
        clear: &[],
        protected: &[7, 8],
        expected: &[],
    },
    Scenario {
        name: "duplicates_kept",
        clear: &[2],
        protected: &[2, 2, 9],
        expected: &[2, 2],
    },
    Scenario {
        name: "singletons",
        clear: &[5],
        protected: &[5],
        expected: &[5],
    },
];
