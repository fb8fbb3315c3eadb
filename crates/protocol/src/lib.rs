// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Private set intersection by evaluating the vanishing polynomial of a
//! clear set over encrypted elements.

mod blinding;
mod cancel;
mod classifier;
mod context;
mod errors;
mod evaluator;
mod intersect;
mod pipeline;
mod pool;
mod report;

pub use blinding::*;
pub use cancel::*;
pub use classifier::*;
pub use context::*;
pub use errors::*;
pub use evaluator::*;
pub use intersect::*;
pub use pipeline::*;
pub use pool::*;
pub use report::*;
