// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::errors::ProtocolError;
use psi_fhe::HomomorphicScheme;
use tracing::{info, instrument};

/// Scheme instance plus its keys. Immutable once set up and shared
/// read-only by every element pipeline.
pub struct PsiContext<S: HomomorphicScheme> {
    scheme: S,
    public_key: S::PublicKey,
    secret_key: S::SecretKey,
}

impl<S: HomomorphicScheme> PsiContext<S> {
    /// Generate keys and provision multiplication. Runs once, before any
    /// element is processed.
    #[instrument(skip_all, fields(backend = scheme.name()))]
    pub fn setup(mut scheme: S) -> Result<Self, ProtocolError> {
        let keys = scheme.key_gen().map_err(ProtocolError::Setup)?;
        scheme
            .prepare_multiplication(&keys.secret_key)
            .map_err(ProtocolError::Setup)?;

        info!(
            depth = scheme.provisioned_depth(),
            plaintext_modulus = scheme.plaintext_modulus(),
            "Scheme ready"
        );

        Ok(Self {
            scheme,
            public_key: keys.public_key,
            secret_key: keys.secret_key,
        })
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    pub fn public_key(&self) -> &S::PublicKey {
        &self.public_key
    }

    pub fn secret_key(&self) -> &S::SecretKey {
        &self.secret_key
    }
}
