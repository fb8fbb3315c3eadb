// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use psi_fhe::{HomomorphicScheme, SchemeError, SharedRng};
use rand::rngs::OsRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::num::NonZeroU64;
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Bound used by the reference run: scalars are drawn from `[1, 100]`.
pub const DEFAULT_BLINDING_BOUND: u64 = 100;

/// Source of blinding scalars.
pub trait ScalarSource: Send + Sync {
    /// Draw uniformly from `[1, bound]`.
    fn draw(&self, bound: NonZeroU64) -> Result<u64, SchemeError>;
}

/// Draws from the operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecureScalarSource;

impl ScalarSource for SecureScalarSource {
    fn draw(&self, bound: NonZeroU64) -> Result<u64, SchemeError> {
        Ok(OsRng.gen_range(1..=bound.get()))
    }
}

/// Draws from a seeded ChaCha20 stream. Reproducible, for tests and replays.
#[derive(Debug, Clone)]
pub struct SeededScalarSource {
    rng: SharedRng,
}

impl SeededScalarSource {
    pub fn new(rng: SharedRng) -> Self {
        Self { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed))))
    }
}

impl ScalarSource for SeededScalarSource {
    fn draw(&self, bound: NonZeroU64) -> Result<u64, SchemeError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| SchemeError::Rng(e.to_string()))?;
        Ok(rng.gen_range(1..=bound.get()))
    }
}

/// Blinding configuration shared by every element pipeline.
#[derive(Clone)]
pub struct Blinding {
    bound: NonZeroU64,
    source: Arc<dyn ScalarSource>,
}

impl Blinding {
    /// Returns `None` when `bound` is zero.
    pub fn new(bound: u64, source: Arc<dyn ScalarSource>) -> Option<Self> {
        NonZeroU64::new(bound).map(|bound| Self { bound, source })
    }

    pub fn secure(bound: u64) -> Option<Self> {
        Self::new(bound, Arc::new(SecureScalarSource))
    }

    pub fn seeded(bound: u64, seed: u64) -> Option<Self> {
        Self::new(bound, Arc::new(SeededScalarSource::from_seed(seed)))
    }

    pub fn bound(&self) -> u64 {
        self.bound.get()
    }
}

/// An evaluated product multiplied by a fresh secret scalar.
pub struct Blinded<C> {
    ciphertext: C,
}

impl<C> Blinded<C> {
    pub fn ciphertext(&self) -> &C {
        &self.ciphertext
    }
}

/// Multiply `product` by a freshly drawn scalar `r ∈ [1, R]`.
pub fn blind<S: HomomorphicScheme>(
    scheme: &S,
    product: &S::Ciphertext,
    blinding: &Blinding,
) -> Result<Blinded<S::Ciphertext>, SchemeError> {
    let r = blinding.source.draw(blinding.bound)?;
    let scalar = scheme.encode(r as i64)?;
    let ciphertext = scheme.multiply_plain(product, &scalar)?;
    trace!(depth = scheme.depth(&ciphertext), "Product blinded");
    Ok(Blinded { ciphertext })
}

#[cfg(test)]
mod tests {
    use super::*;
    use psi_fhe::MockScheme;
    use psi_test_helpers::create_shared_rng_from_u64;
    use std::collections::HashSet;

    struct Fixed(u64);

    impl ScalarSource for Fixed {
        fn draw(&self, _: NonZeroU64) -> Result<u64, SchemeError> {
            Ok(self.0)
        }
    }

    #[test]
    fn zero_bound_is_rejected() {
        assert!(Blinding::secure(0).is_none());
        assert_eq!(Blinding::secure(1).unwrap().bound(), 1);
    }

    #[test]
    fn draws_stay_in_range_and_are_nonzero() {
        let bound = NonZeroU64::new(5).unwrap();
        for source in [
            Box::new(SecureScalarSource) as Box<dyn ScalarSource>,
            Box::new(SeededScalarSource::from_seed(9)),
        ] {
            let draws: HashSet<u64> = (0..500).map(|_| source.draw(bound).unwrap()).collect();
            assert!(draws.iter().all(|r| (1..=5).contains(r)));
            // 500 draws cover a 5 element range
            assert_eq!(draws.len(), 5);
        }
    }

    #[test]
    fn seeded_source_is_reproducible() {
        let bound = NonZeroU64::new(DEFAULT_BLINDING_BOUND).unwrap();
        let a = SeededScalarSource::from_seed(11);
        let b = SeededScalarSource::from_seed(11);
        let xs: Vec<u64> = (0..32).map(|_| a.draw(bound).unwrap()).collect();
        let ys: Vec<u64> = (0..32).map(|_| b.draw(bound).unwrap()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn blinding_scales_the_product() {
        let mut scheme = MockScheme::new(65537, 1, create_shared_rng_from_u64(1)).unwrap();
        let keys = scheme.key_gen().unwrap();
        scheme.prepare_multiplication(&keys.secret_key).unwrap();
        let blinding = Blinding::new(100, Arc::new(Fixed(7))).unwrap();

        let d = scheme
            .encrypt(&keys.public_key, &scheme.encode(6).unwrap())
            .unwrap();
        let masked = blind(&scheme, &d, &blinding).unwrap();
        let pt = scheme.decrypt(&keys.secret_key, masked.ciphertext()).unwrap();
        assert_eq!(scheme.decode(&pt).unwrap(), 42);
        assert_eq!(scheme.depth(masked.ciphertext()), 1);
    }
}
