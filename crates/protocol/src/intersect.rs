// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::blinding::Blinding;
use crate::cancel::CancelToken;
use crate::context::PsiContext;
use crate::errors::{ElementError, ProtocolError};
use crate::evaluator::{required_depth, ClearPlaintexts};
use crate::pipeline::{run_element, ProtectedElement};
use crate::pool::ElementPool;
use crate::report::{ElementOutcome, IntersectionReport};
use futures::future::join_all;
use psi_fhe::HomomorphicScheme;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The protected set: owner-side values next to their encryptions.
pub struct ProtectedSet<C> {
    values: Vec<i64>,
    elements: Vec<ProtectedElement<C>>,
}

impl<C> ProtectedSet<C> {
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Intersects protected sets against one clear set.
pub struct Intersector<S: HomomorphicScheme> {
    context: Arc<PsiContext<S>>,
    clear_values: Vec<i64>,
    clear: Arc<ClearPlaintexts<S::Plaintext>>,
    blinding: Blinding,
}

impl<S: HomomorphicScheme> Intersector<S> {
    /// Check provisioning and the blinding bound, then encode the clear set.
    pub fn new(
        context: Arc<PsiContext<S>>,
        clear: &[i64],
        blinding: Blinding,
    ) -> Result<Self, ProtocolError> {
        let scheme = context.scheme();
        let required = required_depth(clear.len());
        let provisioned = scheme.provisioned_depth();
        if provisioned < required {
            return Err(ProtocolError::Provisioning {
                required,
                provisioned,
            });
        }

        let plaintext_modulus = scheme.plaintext_modulus();
        if blinding.bound() >= plaintext_modulus || blinding.bound() > i64::MAX as u64 {
            return Err(ProtocolError::BlindingBound {
                bound: blinding.bound(),
                plaintext_modulus,
            });
        }

        let encoded = ClearPlaintexts::encode(scheme, clear)
            .map_err(|(value, source)| ProtocolError::Encryption { value, source })?;

        debug!(clear_len = clear.len(), required, provisioned, "Clear set encoded");

        Ok(Self {
            context,
            clear_values: clear.to_vec(),
            clear: Arc::new(encoded),
            blinding,
        })
    }

    /// Encrypt the protected set under the context's public key.
    ///
    /// Fails when the clear and protected values together span at least the
    /// plaintext modulus, since distinct values would then share a residue.
    pub fn protect(&self, values: &[i64]) -> Result<ProtectedSet<S::Ciphertext>, ProtocolError> {
        let scheme = self.context.scheme();
        check_value_range(
            self.clear_values.iter().chain(values.iter()),
            scheme.plaintext_modulus(),
        )?;

        let elements = values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let ciphertext = scheme
                    .encode(*value)
                    .and_then(|pt| scheme.encrypt(self.context.public_key(), &pt))
                    .map_err(|source| ProtocolError::Encryption {
                        value: *value,
                        source,
                    })?;
                Ok(ProtectedElement { index, ciphertext })
            })
            .collect::<Result<Vec<_>, ProtocolError>>()?;

        Ok(ProtectedSet {
            values: values.to_vec(),
            elements,
        })
    }

    /// Process the elements one after the other.
    #[instrument(skip_all, fields(backend = self.context.scheme().name(), elements = protected.len()))]
    pub fn run(&self, protected: &ProtectedSet<S::Ciphertext>, cancel: &CancelToken) -> IntersectionReport {
        let outcomes = protected
            .elements
            .iter()
            .map(|element| {
                let result = if cancel.is_cancelled() {
                    Err(ElementError::Cancelled)
                } else {
                    run_element(&self.context, &self.clear, element, &self.blinding)
                };
                outcome(element.index, protected.values[element.index], result)
            })
            .collect();

        finish(outcomes)
    }

    /// Process the elements concurrently on `pool`, each pipeline run to
    /// completion on one worker. Outcomes keep protected set order.
    #[instrument(skip_all, fields(backend = self.context.scheme().name(), elements = protected.len(), threads = pool.threads()))]
    pub async fn run_pooled(
        &self,
        protected: ProtectedSet<S::Ciphertext>,
        pool: &ElementPool,
        cancel: &CancelToken,
    ) -> IntersectionReport {
        let ProtectedSet { values, elements } = protected;

        let jobs = elements.into_iter().map(|element| {
            let context = self.context.clone();
            let clear = self.clear.clone();
            let blinding = self.blinding.clone();
            let cancel = cancel.clone();
            let index = element.index;
            let job = pool.spawn(format!("element-{index}"), move || {
                if cancel.is_cancelled() {
                    return Err(ElementError::Cancelled);
                }
                run_element(&context, &clear, &element, &blinding)
            });
            async move { (index, job.await) }
        });

        let outcomes = join_all(jobs)
            .await
            .into_iter()
            .map(|(index, result)| {
                let result = result.unwrap_or_else(|e| Err(ElementError::Worker(e)));
                outcome(index, values[index], result)
            })
            .collect();

        finish(outcomes)
    }
}

fn outcome(
    index: usize,
    value: i64,
    result: Result<crate::Verdict, ElementError>,
) -> ElementOutcome {
    if let Err(e) = &result {
        warn!(index, error = %e, "Element classification failed");
    }
    ElementOutcome {
        index,
        value,
        result,
    }
}

fn finish(outcomes: Vec<ElementOutcome>) -> IntersectionReport {
    let report = IntersectionReport::new(outcomes);
    info!(
        elements = report.outcomes().len(),
        members = report.members().count(),
        failures = report.failures().count(),
        "Intersection complete"
    );
    report
}

/// Values must fit in one window narrower than the plaintext modulus so that
/// no two distinct values are congruent modulo t.
pub fn check_value_range<'a>(
    values: impl IntoIterator<Item = &'a i64>,
    plaintext_modulus: u64,
) -> Result<(), ProtocolError> {
    let mut values = values.into_iter();
    let Some(first) = values.next() else {
        return Ok(());
    };
    let (min, max) = values.fold((*first, *first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let span = (max as i128) - (min as i128);
    if span >= plaintext_modulus as i128 {
        return Err(ProtocolError::ValueRange {
            min,
            max,
            plaintext_modulus,
        });
    }
    Ok(())
}

/// Set up `scheme`, encrypt `protected` and intersect it with `clear`.
pub fn intersect<S: HomomorphicScheme>(
    scheme: S,
    clear: &[i64],
    protected: &[i64],
    blinding: Blinding,
) -> Result<IntersectionReport, ProtocolError> {
    check_provisioning(&scheme, clear.len())?;
    let context = Arc::new(PsiContext::setup(scheme)?);
    let intersector = Intersector::new(context, clear, blinding)?;
    let protected = intersector.protect(protected)?;
    Ok(intersector.run(&protected, &CancelToken::new()))
}

/// Fail before key generation when the scheme cannot carry the clear set.
pub fn check_provisioning<S: HomomorphicScheme>(
    scheme: &S,
    clear_len: usize,
) -> Result<(), ProtocolError> {
    let required = required_depth(clear_len);
    let provisioned = scheme.provisioned_depth();
    if provisioned < required {
        return Err(ProtocolError::Provisioning {
            required,
            provisioned,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_range_accepts_window_below_modulus() {
        assert!(check_value_range(&[0, 16], 17).is_ok());
        assert!(check_value_range(&[-8, 8], 17).is_ok());
        assert!(check_value_range(&[], 17).is_ok());
    }

    #[test]
    fn value_range_rejects_aliasing_values() {
        assert!(matches!(
            check_value_range(&[0, 17], 17),
            Err(ProtocolError::ValueRange {
                min: 0,
                max: 17,
                plaintext_modulus: 17
            })
        ));
        assert!(check_value_range(&[i64::MIN, i64::MAX], u64::MAX).is_err());
    }
}
