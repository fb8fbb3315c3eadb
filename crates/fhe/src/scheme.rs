// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum SchemeError {
    #[error("Parameter provisioning failed: {0}")]
    Provisioning(String),
    #[error("Could not encode value {value}: {reason}")]
    Encoding { value: i64, reason: String },
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Homomorphic evaluation failed: {0}")]
    Evaluation(String),
    #[error("Ciphertext multiplication requested before relinearization material was provisioned")]
    MultiplicationNotPrepared,
    #[error("Ciphertext consumed depth {consumed} but only {provisioned} was provisioned")]
    DepthExceeded { consumed: usize, provisioned: usize },
    #[error("Decryption failed: {0}")]
    Decryption(String),
    #[error("Decoding failed: {0}")]
    Decoding(String),
    #[error("Random number generator unavailable: {0}")]
    Rng(String),
}

/// Result that returns a type T or a SchemeError
pub type Result<T> = std::result::Result<T, SchemeError>;

#[derive(Debug, Clone)]
pub struct KeyPair<P, S> {
    pub public_key: P,
    pub secret_key: S,
}

/// The capability an encryption scheme exposes to the intersection protocol.
///
/// Every evaluation method is functional: operands are borrowed and a new
/// value is returned. Ciphertexts carry the multiplicative depth they have
/// consumed so far; decrypting one that went beyond
/// [`provisioned_depth`](HomomorphicScheme::provisioned_depth) fails with
/// [`SchemeError::DepthExceeded`] instead of returning noise.
pub trait HomomorphicScheme: Send + Sync + 'static {
    type PublicKey: Send + Sync + 'static;
    type SecretKey: Send + Sync + 'static;
    type Plaintext: Send + Sync + 'static;
    type Ciphertext: Send + Sync + 'static;

    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Modulus t of the plaintext ring Z_t.
    fn plaintext_modulus(&self) -> u64;

    /// Number of chained multiplications the parameters were provisioned for.
    fn provisioned_depth(&self) -> usize;

    fn key_gen(&self) -> Result<KeyPair<Self::PublicKey, Self::SecretKey>>;

    /// Provision relinearization material. Must run once, before any
    /// ciphertext-ciphertext multiplication.
    fn prepare_multiplication(&mut self, secret_key: &Self::SecretKey) -> Result<()>;

    fn encode(&self, value: i64) -> Result<Self::Plaintext>;

    /// Residue in `[0, t)` held by a plaintext.
    fn decode(&self, plaintext: &Self::Plaintext) -> Result<u64>;

    fn encrypt(
        &self,
        public_key: &Self::PublicKey,
        plaintext: &Self::Plaintext,
    ) -> Result<Self::Ciphertext>;

    fn subtract(
        &self,
        ciphertext: &Self::Ciphertext,
        plaintext: &Self::Plaintext,
    ) -> Result<Self::Ciphertext>;

    fn multiply(&self, lhs: &Self::Ciphertext, rhs: &Self::Ciphertext) -> Result<Self::Ciphertext>;

    /// Scalar multiplication. Counted as one level of depth.
    fn multiply_plain(
        &self,
        ciphertext: &Self::Ciphertext,
        plaintext: &Self::Plaintext,
    ) -> Result<Self::Ciphertext>;

    fn decrypt(
        &self,
        secret_key: &Self::SecretKey,
        ciphertext: &Self::Ciphertext,
    ) -> Result<Self::Plaintext>;

    /// Multiplicative depth consumed by a ciphertext.
    fn depth(&self, ciphertext: &Self::Ciphertext) -> usize;
}

/// Reduce a signed integer into `[0, t)`.
pub fn reduce(value: i64, plaintext_modulus: u64) -> u64 {
    (value as i128).rem_euclid(plaintext_modulus as i128) as u64
}

/// Depth a ciphertext reaches after combining operands of the given depths.
pub(crate) fn next_depth(lhs: usize, rhs: usize) -> usize {
    lhs.max(rhs) + 1
}
