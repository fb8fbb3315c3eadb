//! Constants for BFV parameter planning
//!
//! This module contains all hardcoded values used when a parameter set is
//! planned for a requested multiplicative depth.

/// Insecure constants (degree 2048) - DO NOT USE IN PRODUCTION
pub mod insecure_2048 {
    pub const DEGREE: usize = 2048;
}

/// Plaintext modulus used by the reference intersection run.
///
/// 65537 is a Fermat prime, so the plaintext ring Z_t is a field and a
/// product of nonzero differences can never vanish.
pub const DEFAULT_PLAINTEXT_MODULUS: u64 = 65537;

/// Largest plaintext modulus the scheme library accepts (62 bits).
pub const MAX_PLAINTEXT_MODULUS: u64 = (1 << 62) - 1;

/// Bit size of every ciphertext modulus in the chain.
pub const MODULUS_BITS: usize = 62;

/// Extra moduli on top of one modulus per level: headroom for fresh
/// encryption noise and for the final decryption.
pub const BASE_MODULI: usize = 2;

/// Maximum `log2(q)` per ring degree for 128-bit classical security with a
/// ternary secret (HomomorphicEncryption.org standard).
pub const SECURE_LOG_Q_BOUNDS: &[(usize, usize)] = &[
    (1024, 27),
    (2048, 54),
    (4096, 109),
    (8192, 218),
    (16384, 438),
    (32768, 881),
];
