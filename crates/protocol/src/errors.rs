// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Error types for the intersection protocol.

use crate::pipeline::ElementStage;
use psi_fhe::SchemeError;
use thiserror::Error;

/// Errors that halt a whole intersection run.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The scheme cannot carry the multiplications the clear set needs
    #[error("Scheme provisioned for depth {provisioned} but the clear set needs depth {required}")]
    Provisioning { required: usize, provisioned: usize },

    /// Key generation or multiplication provisioning failed
    #[error("Scheme setup failed: {0}")]
    Setup(#[source] SchemeError),

    /// An input value could not be encoded or encrypted
    #[error("Could not encode or encrypt input value {value}: {source}")]
    Encryption {
        value: i64,
        #[source]
        source: SchemeError,
    },

    /// Input values alias each other modulo the plaintext modulus
    #[error("Input values span [{min}, {max}] which does not fit in plaintext modulus {plaintext_modulus}")]
    ValueRange {
        min: i64,
        max: i64,
        plaintext_modulus: u64,
    },

    /// Blinding scalars must be drawn from a nonzero range below the plaintext modulus
    #[error("Blinding bound {bound} must be at least 1 and below plaintext modulus {plaintext_modulus}")]
    BlindingBound { bound: u64, plaintext_modulus: u64 },

    /// The worker pool could not be built
    #[error("Worker pool error: {0}")]
    Pool(String),
}

/// Errors isolated to the pipeline of a single protected element.
#[derive(Debug, Error)]
pub enum ElementError {
    /// The scheme failed while moving the element into `stage`
    #[error("Element pipeline failed before reaching {stage}: {source}")]
    Failed {
        stage: ElementStage,
        #[source]
        source: SchemeError,
    },

    /// The run was cancelled before this element's pipeline started
    #[error("Cancelled before the element pipeline started")]
    Cancelled,

    /// The worker running the pipeline went away
    #[error("Worker error: {0}")]
    Worker(String),
}

impl ElementError {
    pub(crate) fn at(stage: ElementStage) -> impl FnOnce(SchemeError) -> Self {
        move |source| ElementError::Failed { stage, source }
    }
}
