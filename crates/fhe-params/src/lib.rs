// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Depth-driven planning and builders for BFV FHE parameters.

pub mod builder;
pub mod constants;
pub mod presets;

pub use builder::build_bfv_params_arc;
pub use constants::{DEFAULT_PLAINTEXT_MODULUS, MAX_PLAINTEXT_MODULUS};
pub use presets::{plan_for_depth, BfvParamSet, PresetError, SecurityTier};
