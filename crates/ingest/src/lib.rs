// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Turns comma separated person records into integer sets the intersection
//! protocol can consume.

mod csv;
mod errors;
mod tokenize;

pub use csv::*;
pub use errors::*;
pub use tokenize::*;
