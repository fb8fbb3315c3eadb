// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::scheme::{next_depth, reduce, HomomorphicScheme, KeyPair, Result, SchemeError};
use crate::utils::{lock_rng, SharedRng};
use fhe::bfv::{
    BfvParameters, Ciphertext, Encoding, Multiplicator, Plaintext, PublicKey,
    RelinearizationKey, SecretKey,
};
use fhe_traits::{FheDecoder, FheDecrypter, FheEncoder, FheEncrypter};
use psi_fhe_params::{plan_for_depth, BfvParamSet, SecurityTier};
use std::sync::Arc;
use tracing::{debug, info};

/// A BFV ciphertext together with the multiplicative depth it consumed.
#[derive(Debug, Clone)]
pub struct BfvCiphertext {
    inner: Ciphertext,
    depth: usize,
}

/// Fhe library adaptor for the BFV scheme.
pub struct BfvScheme {
    params: Arc<BfvParameters>,
    param_set: BfvParamSet,
    multiplicator: Option<Multiplicator>,
    rng: SharedRng,
}

impl BfvScheme {
    pub fn new(param_set: BfvParamSet, rng: SharedRng) -> Result<Self> {
        let params = param_set
            .build_arc()
            .map_err(|e| SchemeError::Provisioning(e.to_string()))?;

        info!(
            degree = param_set.degree,
            plaintext_modulus = param_set.plaintext_modulus,
            log_q = param_set.log_q(),
            depth = param_set.depth,
            "BFV parameters built"
        );

        Ok(Self {
            params,
            param_set,
            multiplicator: None,
            rng,
        })
    }

    /// Plan parameters for `depth` and build the scheme.
    pub fn for_depth(
        tier: SecurityTier,
        plaintext_modulus: u64,
        depth: usize,
        rng: SharedRng,
    ) -> Result<Self> {
        let param_set = plan_for_depth(tier, plaintext_modulus, depth)
            .map_err(|e| SchemeError::Provisioning(e.to_string()))?;
        Self::new(param_set, rng)
    }
}

impl HomomorphicScheme for BfvScheme {
    type PublicKey = PublicKey;
    type SecretKey = SecretKey;
    type Plaintext = Plaintext;
    type Ciphertext = BfvCiphertext;

    fn name(&self) -> &'static str {
        "bfv"
    }

    fn plaintext_modulus(&self) -> u64 {
        self.params.plaintext()
    }

    fn provisioned_depth(&self) -> usize {
        self.param_set.depth
    }

    fn key_gen(&self) -> Result<KeyPair<PublicKey, SecretKey>> {
        let mut rng = lock_rng(&self.rng)?;
        let secret_key = SecretKey::random(&self.params, &mut *rng);
        let public_key = PublicKey::new(&secret_key, &mut *rng);
        Ok(KeyPair {
            public_key,
            secret_key,
        })
    }

    fn prepare_multiplication(&mut self, secret_key: &SecretKey) -> Result<()> {
        let relin_key = {
            let mut rng = lock_rng(&self.rng)?;
            RelinearizationKey::new(secret_key, &mut *rng)
                .map_err(|e| SchemeError::Provisioning(e.to_string()))?
        };
        let multiplicator = Multiplicator::default(&relin_key)
            .map_err(|e| SchemeError::Provisioning(e.to_string()))?;
        self.multiplicator = Some(multiplicator);
        debug!("Relinearization key generated");
        Ok(())
    }

    fn encode(&self, value: i64) -> Result<Plaintext> {
        let coeffs: &[u64] = &[reduce(value, self.params.plaintext())];
        Plaintext::try_encode(coeffs, Encoding::poly(), &self.params).map_err(|e| {
            SchemeError::Encoding {
                value,
                reason: e.to_string(),
            }
        })
    }

    fn decode(&self, plaintext: &Plaintext) -> Result<u64> {
        let coeffs = Vec::<u64>::try_decode(plaintext, Encoding::poly())
            .map_err(|e| SchemeError::Decoding(e.to_string()))?;

        // Values are encoded as constant polynomials and every operation keeps
        // them constant, so a stray higher coefficient means the noise budget
        // was exhausted.
        if coeffs.iter().skip(1).any(|c| *c != 0) {
            return Err(SchemeError::Decoding(
                "plaintext is not a constant polynomial".to_string(),
            ));
        }
        Ok(coeffs.first().copied().unwrap_or(0))
    }

    fn encrypt(&self, public_key: &PublicKey, plaintext: &Plaintext) -> Result<BfvCiphertext> {
        let mut rng = lock_rng(&self.rng)?;
        let inner = public_key
            .try_encrypt(plaintext, &mut *rng)
            .map_err(|e| SchemeError::Encryption(e.to_string()))?;
        Ok(BfvCiphertext { inner, depth: 0 })
    }

    fn subtract(&self, ciphertext: &BfvCiphertext, plaintext: &Plaintext) -> Result<BfvCiphertext> {
        Ok(BfvCiphertext {
            inner: &ciphertext.inner - plaintext,
            depth: ciphertext.depth,
        })
    }

    fn multiply(&self, lhs: &BfvCiphertext, rhs: &BfvCiphertext) -> Result<BfvCiphertext> {
        let multiplicator = self
            .multiplicator
            .as_ref()
            .ok_or(SchemeError::MultiplicationNotPrepared)?;
        let inner = multiplicator
            .multiply(&lhs.inner, &rhs.inner)
            .map_err(|e| SchemeError::Evaluation(e.to_string()))?;
        Ok(BfvCiphertext {
            inner,
            depth: next_depth(lhs.depth, rhs.depth),
        })
    }

    fn multiply_plain(
        &self,
        ciphertext: &BfvCiphertext,
        plaintext: &Plaintext,
    ) -> Result<BfvCiphertext> {
        Ok(BfvCiphertext {
            inner: &ciphertext.inner * plaintext,
            depth: ciphertext.depth + 1,
        })
    }

    fn decrypt(&self, secret_key: &SecretKey, ciphertext: &BfvCiphertext) -> Result<Plaintext> {
        let provisioned = self.provisioned_depth();
        if ciphertext.depth > provisioned {
            return Err(SchemeError::DepthExceeded {
                consumed: ciphertext.depth,
                provisioned,
            });
        }
        secret_key
            .try_decrypt(&ciphertext.inner)
            .map_err(|e| SchemeError::Decryption(e.to_string()))
    }

    fn depth(&self, ciphertext: &BfvCiphertext) -> usize {
        ciphertext.depth
    }
}
