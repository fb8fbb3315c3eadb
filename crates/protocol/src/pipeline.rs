// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::blinding::{blind, Blinding};
use crate::classifier::{classify, decrypt_masked, Verdict};
use crate::context::PsiContext;
use crate::errors::ElementError;
use crate::evaluator::{evaluate, ClearPlaintexts, Evaluation};
use psi_fhe::HomomorphicScheme;
use serde::Serialize;
use strum::Display;
use tracing::trace;

/// Stages a protected element moves through. Transitions only go forward
/// and none is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ElementStage {
    Encrypted,
    Evaluated,
    Blinded,
    Decrypted,
    Classified,
}

/// One encrypted element of the protected set.
pub struct ProtectedElement<C> {
    pub index: usize,
    pub ciphertext: C,
}

/// Drive one element from `Encrypted` to `Classified`.
pub fn run_element<S: HomomorphicScheme>(
    context: &PsiContext<S>,
    clear: &ClearPlaintexts<S::Plaintext>,
    element: &ProtectedElement<S::Ciphertext>,
    blinding: &Blinding,
) -> Result<Verdict, ElementError> {
    let scheme = context.scheme();

    let product = match evaluate(scheme, &element.ciphertext, clear)
        .map_err(ElementError::at(ElementStage::Evaluated))?
    {
        Evaluation::NoClearSet => {
            trace!(index = element.index, "Empty clear set, classified without evaluation");
            return Ok(Verdict::NonMember);
        }
        Evaluation::Product(product) => product,
    };
    trace!(index = element.index, stage = %ElementStage::Evaluated, "Stage reached");

    let masked = blind(scheme, &product, blinding).map_err(ElementError::at(ElementStage::Blinded))?;
    drop(product);
    trace!(index = element.index, stage = %ElementStage::Blinded, "Stage reached");

    let plaintext = decrypt_masked(scheme, context.secret_key(), &masked)
        .map_err(ElementError::at(ElementStage::Decrypted))?;
    trace!(index = element.index, stage = %ElementStage::Decrypted, "Stage reached");

    let verdict =
        classify(scheme, &plaintext).map_err(ElementError::at(ElementStage::Classified))?;
    trace!(index = element.index, stage = %ElementStage::Classified, %verdict, "Stage reached");

    Ok(verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use psi_fhe::{MockScheme, SchemeError};
    use psi_test_helpers::create_shared_rng_from_u64;
    use std::sync::Arc;

    fn context(depth: usize) -> PsiContext<MockScheme> {
        let scheme = MockScheme::new(65537, depth, create_shared_rng_from_u64(21)).unwrap();
        PsiContext::setup(scheme).unwrap()
    }

    fn element(context: &PsiContext<MockScheme>, value: i64) -> ProtectedElement<psi_fhe::MockCiphertext> {
        let scheme = context.scheme();
        ProtectedElement {
            index: 0,
            ciphertext: scheme
                .encrypt(context.public_key(), &scheme.encode(value).unwrap())
                .unwrap(),
        }
    }

    #[test]
    fn classifies_members_and_non_members() {
        let context = context(3);
        let clear = ClearPlaintexts::encode(context.scheme(), &[4, 8, 15]).unwrap();
        let blinding = Blinding::seeded(100, 1).unwrap();

        let verdict = run_element(&context, &clear, &element(&context, 8), &blinding).unwrap();
        assert_eq!(verdict, Verdict::Member);
        let verdict = run_element(&context, &clear, &element(&context, 16), &blinding).unwrap();
        assert_eq!(verdict, Verdict::NonMember);
    }

    #[test]
    fn empty_clear_set_is_non_member() {
        let context = context(0);
        let clear = ClearPlaintexts::encode(context.scheme(), &[]).unwrap();
        let blinding = Blinding::secure(100).unwrap();
        let verdict = run_element(&context, &clear, &element(&context, 8), &blinding).unwrap();
        assert_eq!(verdict, Verdict::NonMember);
    }

    #[test]
    fn decryption_failure_is_reported_with_its_stage() {
        // Provisioned for 1 but the product of 3 differences plus blinding needs 3
        let context = context(1);
        let clear = ClearPlaintexts::encode(context.scheme(), &[1, 2, 3]).unwrap();
        let blinding = Blinding::new(100, Arc::new(crate::SecureScalarSource)).unwrap();
        let err = run_element(&context, &clear, &element(&context, 2), &blinding).unwrap_err();
        assert!(matches!(
            err,
            ElementError::Failed {
                stage: ElementStage::Decrypted,
                source: SchemeError::DepthExceeded {
                    consumed: 3,
                    provisioned: 1
                }
            }
        ));
    }

    #[test]
    fn stages_are_ordered() {
        assert!(ElementStage::Encrypted < ElementStage::Evaluated);
        assert!(ElementStage::Decrypted < ElementStage::Classified);
        assert_eq!(ElementStage::Blinded.to_string(), "blinded");
    }
}
