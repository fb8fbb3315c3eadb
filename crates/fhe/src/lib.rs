// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod bfv;
mod mock;
mod scheme;
mod utils;

pub use bfv::*;
pub use mock::*;
pub use scheme::*;
pub use utils::*;

// Re-export params so dependents can use psi_fhe::SecurityTier etc. without depending on psi-fhe-params.
pub use psi_fhe_params::{
    plan_for_depth, BfvParamSet, PresetError, SecurityTier, DEFAULT_PLAINTEXT_MODULUS,
    MAX_PLAINTEXT_MODULUS,
};
