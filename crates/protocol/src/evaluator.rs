// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use psi_fhe::{HomomorphicScheme, SchemeError};
use tracing::trace;

/// The clear set, encoded once and shared read-only by every element pipeline.
pub struct ClearPlaintexts<P> {
    plaintexts: Vec<P>,
}

impl<P> ClearPlaintexts<P> {
    pub fn encode<S>(scheme: &S, clear: &[i64]) -> Result<Self, (i64, SchemeError)>
    where
        S: HomomorphicScheme<Plaintext = P>,
    {
        let plaintexts = clear
            .iter()
            .map(|x| scheme.encode(*x).map_err(|e| (*x, e)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { plaintexts })
    }

    pub fn len(&self) -> usize {
        self.plaintexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plaintexts.is_empty()
    }
}

/// Result of evaluating the vanishing polynomial at one protected element.
pub enum Evaluation<C> {
    /// The clear set is empty: nothing to compare against.
    NoClearSet,
    /// Encryption of `∏_k (y − x_k)`.
    Product(C),
}

/// Multiplications needed to classify one element against a clear set of
/// `clear_len` elements: `n − 1` for the product plus one for blinding.
pub fn required_depth(clear_len: usize) -> usize {
    clear_len
}

/// Homomorphically compute `∏_k (c − x_k)` over the clear set.
pub fn evaluate<S: HomomorphicScheme>(
    scheme: &S,
    ciphertext: &S::Ciphertext,
    clear: &ClearPlaintexts<S::Plaintext>,
) -> Result<Evaluation<S::Ciphertext>, SchemeError> {
    let mut factors = clear.plaintexts.iter();

    let Some(first) = factors.next() else {
        return Ok(Evaluation::NoClearSet);
    };

    let mut product = scheme.subtract(ciphertext, first)?;
    for x in factors {
        let difference = scheme.subtract(ciphertext, x)?;
        product = scheme.multiply(&product, &difference)?;
    }

    trace!(depth = scheme.depth(&product), "Vanishing polynomial evaluated");
    Ok(Evaluation::Product(product))
}
