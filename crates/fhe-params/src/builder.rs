// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::presets::{BfvParamSet, PresetError};
use fhe::bfv::{BfvParameters, BfvParametersBuilder};
use std::sync::Arc;

pub fn build_bfv_params_arc(param_set: &BfvParamSet) -> Result<Arc<BfvParameters>, PresetError> {
    let mut builder = BfvParametersBuilder::new();
    builder
        .set_degree(param_set.degree)
        .set_plaintext_modulus(param_set.plaintext_modulus)
        .set_moduli_sizes(&param_set.moduli_sizes);

    builder
        .build_arc()
        .map_err(|e| PresetError::Build(e.to_string()))
}
