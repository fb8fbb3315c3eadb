// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::blinding::Blinded;
use psi_fhe::{HomomorphicScheme, SchemeError};
use serde::Serialize;
use strum::Display;

/// Membership of one protected element in the clear set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Member,
    NonMember,
}

impl Verdict {
    pub fn is_member(&self) -> bool {
        matches!(self, Verdict::Member)
    }
}

pub fn decrypt_masked<S: HomomorphicScheme>(
    scheme: &S,
    secret_key: &S::SecretKey,
    masked: &Blinded<S::Ciphertext>,
) -> Result<S::Plaintext, SchemeError> {
    scheme.decrypt(secret_key, masked.ciphertext())
}

/// Member iff the decrypted masked value is exactly zero.
pub fn classify<S: HomomorphicScheme>(
    scheme: &S,
    plaintext: &S::Plaintext,
) -> Result<Verdict, SchemeError> {
    Ok(match scheme.decode(plaintext)? {
        0 => Verdict::Member,
        _ => Verdict::NonMember,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use psi_fhe::MockScheme;
    use psi_test_helpers::create_shared_rng_from_u64;

    #[test]
    fn zero_is_the_only_member_value() {
        let scheme = MockScheme::new(17, 1, create_shared_rng_from_u64(5)).unwrap();
        assert_eq!(
            classify(&scheme, &scheme.encode(0).unwrap()).unwrap(),
            Verdict::Member
        );
        assert_eq!(
            classify(&scheme, &scheme.encode(17).unwrap()).unwrap(),
            Verdict::Member
        );
        for v in [1, 16, -1, 34 + 3] {
            assert_eq!(
                classify(&scheme, &scheme.encode(v).unwrap()).unwrap(),
                Verdict::NonMember
            );
        }
    }

    #[test]
    fn verdict_display() {
        assert_eq!(Verdict::Member.to_string(), "member");
        assert_eq!(Verdict::NonMember.to_string(), "non_member");
        assert!(Verdict::Member.is_member());
        assert!(!Verdict::NonMember.is_member());
    }
}
