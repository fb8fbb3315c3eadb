// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Plain-arithmetic stand-in for a homomorphic scheme.
//!
//! Encryption and decryption are the identity and evaluation is integer
//! arithmetic modulo t. Key ids and consumed depth are still tracked so that
//! the protocol's provisioning and error paths behave like they do against
//! the real scheme.

use crate::scheme::{next_depth, reduce, HomomorphicScheme, KeyPair, Result, SchemeError};
use crate::utils::{lock_rng, SharedRng};
use psi_fhe_params::MAX_PLAINTEXT_MODULUS;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPublicKey {
    key_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSecretKey {
    key_id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPlaintext(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockCiphertext {
    value: u64,
    depth: usize,
    key_id: u64,
}

pub struct MockScheme {
    plaintext_modulus: u64,
    provisioned_depth: usize,
    relinearization_key: Option<u64>,
    rng: SharedRng,
}

impl MockScheme {
    pub fn new(plaintext_modulus: u64, provisioned_depth: usize, rng: SharedRng) -> Result<Self> {
        if plaintext_modulus < 2 {
            return Err(SchemeError::Provisioning(format!(
                "plaintext modulus {plaintext_modulus} is too small"
            )));
        }
        if plaintext_modulus > MAX_PLAINTEXT_MODULUS {
            return Err(SchemeError::Provisioning(format!(
                "plaintext modulus {plaintext_modulus} does not fit in 62 bits"
            )));
        }
        Ok(Self {
            plaintext_modulus,
            provisioned_depth,
            relinearization_key: None,
            rng,
        })
    }

    fn sub_mod(&self, a: u64, b: u64) -> u64 {
        if a >= b {
            a - b
        } else {
            self.plaintext_modulus - (b - a)
        }
    }

    fn mul_mod(&self, a: u64, b: u64) -> u64 {
        ((a as u128 * b as u128) % self.plaintext_modulus as u128) as u64
    }
}

impl HomomorphicScheme for MockScheme {
    type PublicKey = MockPublicKey;
    type SecretKey = MockSecretKey;
    type Plaintext = MockPlaintext;
    type Ciphertext = MockCiphertext;

    fn name(&self) -> &'static str {
        "mock"
    }

    fn plaintext_modulus(&self) -> u64 {
        self.plaintext_modulus
    }

    fn provisioned_depth(&self) -> usize {
        self.provisioned_depth
    }

    fn key_gen(&self) -> Result<KeyPair<MockPublicKey, MockSecretKey>> {
        let key_id = lock_rng(&self.rng)?.gen::<u64>();
        Ok(KeyPair {
            public_key: MockPublicKey { key_id },
            secret_key: MockSecretKey { key_id },
        })
    }

    fn prepare_multiplication(&mut self, secret_key: &MockSecretKey) -> Result<()> {
        self.relinearization_key = Some(secret_key.key_id);
        Ok(())
    }

    fn encode(&self, value: i64) -> Result<MockPlaintext> {
        Ok(MockPlaintext(reduce(value, self.plaintext_modulus)))
    }

    fn decode(&self, plaintext: &MockPlaintext) -> Result<u64> {
        Ok(plaintext.0)
    }

    fn encrypt(&self, public_key: &MockPublicKey, plaintext: &MockPlaintext) -> Result<MockCiphertext> {
        Ok(MockCiphertext {
            value: plaintext.0,
            depth: 0,
            key_id: public_key.key_id,
        })
    }

    fn subtract(&self, ciphertext: &MockCiphertext, plaintext: &MockPlaintext) -> Result<MockCiphertext> {
        Ok(MockCiphertext {
            value: self.sub_mod(ciphertext.value, plaintext.0),
            ..*ciphertext
        })
    }

    fn multiply(&self, lhs: &MockCiphertext, rhs: &MockCiphertext) -> Result<MockCiphertext> {
        match self.relinearization_key {
            None => Err(SchemeError::MultiplicationNotPrepared),
            Some(key_id) if key_id != lhs.key_id || key_id != rhs.key_id => Err(
                SchemeError::Evaluation("operands were encrypted under a different key".to_string()),
            ),
            Some(_) => Ok(MockCiphertext {
                value: self.mul_mod(lhs.value, rhs.value),
                depth: next_depth(lhs.depth, rhs.depth),
                key_id: lhs.key_id,
            }),
        }
    }

    fn multiply_plain(
        &self,
        ciphertext: &MockCiphertext,
        plaintext: &MockPlaintext,
    ) -> Result<MockCiphertext> {
        Ok(MockCiphertext {
            value: self.mul_mod(ciphertext.value, plaintext.0),
            depth: ciphertext.depth + 1,
            key_id: ciphertext.key_id,
        })
    }

    fn decrypt(&self, secret_key: &MockSecretKey, ciphertext: &MockCiphertext) -> Result<MockPlaintext> {
        if secret_key.key_id != ciphertext.key_id {
            return Err(SchemeError::Decryption(
                "secret key does not match the ciphertext".to_string(),
            ));
        }
        if ciphertext.depth > self.provisioned_depth {
            return Err(SchemeError::DepthExceeded {
                consumed: ciphertext.depth,
                provisioned: self.provisioned_depth,
            });
        }
        Ok(MockPlaintext(ciphertext.value))
    }

    fn depth(&self, ciphertext: &MockCiphertext) -> usize {
        ciphertext.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::sync::{Arc, Mutex};

    fn mock(depth: usize) -> (MockScheme, KeyPair<MockPublicKey, MockSecretKey>) {
        let rng = Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(7)));
        let mut scheme = MockScheme::new(65537, depth, rng).unwrap();
        let keys = scheme.key_gen().unwrap();
        scheme.prepare_multiplication(&keys.secret_key).unwrap();
        (scheme, keys)
    }

    #[test]
    fn arithmetic_is_modular() {
        let (scheme, keys) = mock(2);
        let c = scheme
            .encrypt(&keys.public_key, &scheme.encode(3).unwrap())
            .unwrap();
        let diff = scheme.subtract(&c, &scheme.encode(5).unwrap()).unwrap();
        let pt = scheme.decrypt(&keys.secret_key, &diff).unwrap();
        assert_eq!(scheme.decode(&pt).unwrap(), 65535);

        let sq = scheme.multiply(&diff, &diff).unwrap();
        let pt = scheme.decrypt(&keys.secret_key, &sq).unwrap();
        assert_eq!(scheme.decode(&pt).unwrap(), 4);
        assert_eq!(scheme.depth(&sq), 1);
    }

    #[test]
    fn arithmetic_holds_at_the_largest_modulus() {
        let rng = Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(7)));
        let t = MAX_PLAINTEXT_MODULUS;
        let mut scheme = MockScheme::new(t, 1, rng).unwrap();
        let keys = scheme.key_gen().unwrap();
        scheme.prepare_multiplication(&keys.secret_key).unwrap();

        let c = scheme
            .encrypt(&keys.public_key, &scheme.encode(100).unwrap())
            .unwrap();
        let diff = scheme.subtract(&c, &scheme.encode(3).unwrap()).unwrap();
        let pt = scheme.decrypt(&keys.secret_key, &diff).unwrap();
        assert_eq!(scheme.decode(&pt).unwrap(), 97);

        let wrapped = scheme.subtract(&c, &scheme.encode(101).unwrap()).unwrap();
        let pt = scheme.decrypt(&keys.secret_key, &wrapped).unwrap();
        assert_eq!(scheme.decode(&pt).unwrap(), t - 1);
    }

    #[test]
    fn rejects_out_of_range_modulus() {
        for t in [0, 1, MAX_PLAINTEXT_MODULUS + 1, 18_446_744_073_709_551_557] {
            let rng = Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(7)));
            assert!(matches!(
                MockScheme::new(t, 1, rng),
                Err(SchemeError::Provisioning(_))
            ));
        }
    }

    #[test]
    fn rejects_foreign_secret_key() {
        let (scheme, keys) = mock(1);
        let other = scheme.key_gen().unwrap();
        let c = scheme
            .encrypt(&keys.public_key, &scheme.encode(9).unwrap())
            .unwrap();
        assert!(matches!(
            scheme.decrypt(&other.secret_key, &c),
            Err(SchemeError::Decryption(_))
        ));
    }

    #[test]
    fn rejects_excess_depth() {
        let (scheme, keys) = mock(0);
        let c = scheme
            .encrypt(&keys.public_key, &scheme.encode(9).unwrap())
            .unwrap();
        let masked = scheme.multiply_plain(&c, &scheme.encode(2).unwrap()).unwrap();
        assert!(matches!(
            scheme.decrypt(&keys.secret_key, &masked),
            Err(SchemeError::DepthExceeded {
                consumed: 1,
                provisioned: 0
            })
        ));
    }

    #[test]
    fn multiply_requires_preparation() {
        let rng = Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(7)));
        let scheme = MockScheme::new(17, 3, rng).unwrap();
        let keys = scheme.key_gen().unwrap();
        let c = scheme
            .encrypt(&keys.public_key, &scheme.encode(1).unwrap())
            .unwrap();
        assert!(matches!(
            scheme.multiply(&c, &c),
            Err(SchemeError::MultiplicationNotPrepared)
        ));
    }
}
