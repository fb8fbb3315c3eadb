// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::builder::build_bfv_params_arc;
use crate::constants::{
    insecure_2048, BASE_MODULI, MAX_PLAINTEXT_MODULUS, MODULUS_BITS, SECURE_LOG_Q_BOUNDS,
};
use fhe::bfv::BfvParameters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error as ThisError;

/// Security tier used when planning BFV parameters for a requested depth.
///
/// **Insecure**: a fixed degree 2048 ring whatever the modulus chain length.
/// Fast enough for tests and local runs - DO NOT USE IN PRODUCTION.
///
/// **Secure**: the smallest power-of-two degree whose 128-bit security bound
/// on `log2(q)` admits the modulus chain needed for the depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityTier {
    Insecure,
    #[default]
    Secure,
}

impl SecurityTier {
    pub fn from_name(name: &str) -> Result<Self, PresetError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "insecure" => Ok(Self::Insecure),
            "secure" => Ok(Self::Secure),
            _ => Err(PresetError::UnknownTier(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SecurityTier::Insecure => "insecure",
            SecurityTier::Secure => "secure",
        }
    }
}

impl fmt::Display for SecurityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(ThisError, Debug, PartialEq, Eq)]
pub enum PresetError {
    #[error("Unknown security tier: {0}")]
    UnknownTier(String),
    #[error(
        "Depth {depth} needs log2(q) = {log_q} bits which no ring degree supports at the {tier} tier"
    )]
    DepthUnsupported {
        depth: usize,
        log_q: usize,
        tier: SecurityTier,
    },
    #[error("Plaintext modulus {0} is too small, it must be at least 2")]
    PlaintextModulusTooSmall(u64),
    #[error("Plaintext modulus {0} is too large, it must fit in 62 bits")]
    PlaintextModulusTooLarge(u64),
    #[error("Failed to build BFV parameters: {0}")]
    Build(String),
}

/// A complete BFV parameter set definition
///
/// This struct contains all the values needed to construct a `BfvParameters`
/// instance. The ciphertext moduli are given by bit size; the scheme library
/// picks NTT-friendly primes of those sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BfvParamSet {
    /// Degree of the polynomial ring R_q = Z_q[X]/(X^d + 1), a power of 2
    pub degree: usize,
    /// Plaintext modulus t - encoded integers live in Z_t
    pub plaintext_modulus: u64,
    /// Bit sizes of the ciphertext moduli q_i, q = ∏q_i
    pub moduli_sizes: Vec<usize>,
    /// Multiplicative depth this set was planned for
    pub depth: usize,
}

impl BfvParamSet {
    /// Total bit size of the ciphertext modulus q.
    pub fn log_q(&self) -> usize {
        self.moduli_sizes.iter().sum()
    }

    pub fn build_arc(&self) -> Result<Arc<BfvParameters>, PresetError> {
        build_bfv_params_arc(self)
    }
}

/// Plan a parameter set able to evaluate `depth` chained multiplications.
pub fn plan_for_depth(
    tier: SecurityTier,
    plaintext_modulus: u64,
    depth: usize,
) -> Result<BfvParamSet, PresetError> {
    if plaintext_modulus < 2 {
        return Err(PresetError::PlaintextModulusTooSmall(plaintext_modulus));
    }
    if plaintext_modulus > MAX_PLAINTEXT_MODULUS {
        return Err(PresetError::PlaintextModulusTooLarge(plaintext_modulus));
    }

    let moduli_sizes = vec![MODULUS_BITS; depth + BASE_MODULI];
    let log_q: usize = moduli_sizes.iter().sum();

    let degree = match tier {
        SecurityTier::Insecure => insecure_2048::DEGREE,
        SecurityTier::Secure => SECURE_LOG_Q_BOUNDS
            .iter()
            .find(|(_, bound)| log_q <= *bound)
            .map(|(degree, _)| *degree)
            .ok_or(PresetError::DepthUnsupported { depth, log_q, tier })?,
    };

    Ok(BfvParamSet {
        degree,
        plaintext_modulus,
        moduli_sizes,
        depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_accepts_all_tiers() {
        for tier in [SecurityTier::Insecure, SecurityTier::Secure] {
            assert_eq!(SecurityTier::from_name(tier.name()).unwrap(), tier);
        }
        assert_eq!(
            SecurityTier::from_name(" SECURE ").unwrap(),
            SecurityTier::Secure
        );
        assert!(matches!(
            SecurityTier::from_name("paranoid"),
            Err(PresetError::UnknownTier(_))
        ));
    }

    #[test]
    fn insecure_plan_keeps_degree_fixed() {
        for depth in [0, 1, 4, 20] {
            let set = plan_for_depth(SecurityTier::Insecure, 65537, depth).unwrap();
            assert_eq!(set.degree, insecure_2048::DEGREE);
            assert_eq!(set.moduli_sizes.len(), depth + BASE_MODULI);
            assert_eq!(set.depth, depth);
        }
    }

    #[test]
    fn secure_plan_grows_degree_with_depth() {
        // 3 * 62 = 186 bits fits under the 8192 bound
        let set = plan_for_depth(SecurityTier::Secure, 65537, 1).unwrap();
        assert_eq!(set.degree, 8192);
        assert_eq!(set.log_q(), 186);

        // 6 * 62 = 372 bits needs 16384
        let set = plan_for_depth(SecurityTier::Secure, 65537, 4).unwrap();
        assert_eq!(set.degree, 16384);

        // 14 * 62 = 868 bits still fits at 32768
        let set = plan_for_depth(SecurityTier::Secure, 65537, 12).unwrap();
        assert_eq!(set.degree, 32768);
    }

    #[test]
    fn secure_plan_rejects_unsupported_depth() {
        let err = plan_for_depth(SecurityTier::Secure, 65537, 13).unwrap_err();
        assert_eq!(
            err,
            PresetError::DepthUnsupported {
                depth: 13,
                log_q: 930,
                tier: SecurityTier::Secure
            }
        );
    }

    #[test]
    fn rejects_degenerate_plaintext_modulus() {
        assert_eq!(
            plan_for_depth(SecurityTier::Insecure, 1, 2).unwrap_err(),
            PresetError::PlaintextModulusTooSmall(1)
        );
        assert_eq!(
            plan_for_depth(SecurityTier::Insecure, MAX_PLAINTEXT_MODULUS + 1, 2).unwrap_err(),
            PresetError::PlaintextModulusTooLarge(MAX_PLAINTEXT_MODULUS + 1)
        );
        assert!(plan_for_depth(SecurityTier::Insecure, MAX_PLAINTEXT_MODULUS, 2).is_ok());
    }
}
