// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::PsiConfig;
use anyhow::{bail, Result};
use fhe_util::is_prime;
use psi_fhe_params::MAX_PLAINTEXT_MODULUS;
use tracing::warn;

/// Reject configurations the protocol cannot run with.
///
/// A composite plaintext modulus is only warned about: zero divisors in Z_t
/// can turn a non-member into a false positive, but small composite moduli
/// are still useful when exercising the mock backend.
pub fn validate(config: &PsiConfig) -> Result<()> {
    let t = config.bfv.plaintext_modulus;
    if t < 2 {
        bail!("plaintext modulus {t} must be at least 2");
    }
    if t > MAX_PLAINTEXT_MODULUS {
        bail!("plaintext modulus {t} must fit in 62 bits");
    }

    let bound = config.blinding.bound;
    if bound == 0 {
        bail!("blinding bound must be at least 1");
    }
    if bound >= t {
        bail!("blinding bound {bound} must be below the plaintext modulus {t}");
    }

    if config.pool.threads == Some(0) {
        bail!("pool threads must be at least 1");
    }

    if !is_prime(t) {
        warn!(plaintext_modulus = t, "Plaintext modulus is not prime");
    }

    Ok(())
}
