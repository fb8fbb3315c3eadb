// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, Context, Result};
use psi_config::{Backend, PsiConfig};
use psi_fhe::{create_shared_rng, BfvScheme, HomomorphicScheme, MockScheme};
use psi_protocol::{
    check_provisioning, Blinding, CancelToken, ElementPool, IntersectionReport, Intersector,
    PsiContext,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the configured backend and intersect `clear` with `protected`.
pub async fn intersect_sets(
    config: &PsiConfig,
    clear: &[i64],
    protected: &[i64],
    pooled: bool,
) -> Result<IntersectionReport> {
    let depth = config.depth_for(clear.len());
    let t = config.bfv.plaintext_modulus;

    match config.backend {
        Backend::Bfv => {
            let scheme = BfvScheme::for_depth(config.bfv.security, t, depth, create_shared_rng())
                .context("Could not provision BFV parameters")?;
            intersect_with(scheme, config, clear, protected, pooled).await
        }
        Backend::Mock => {
            let scheme = MockScheme::new(t, depth, create_shared_rng())?;
            intersect_with(scheme, config, clear, protected, pooled).await
        }
    }
}

fn blinding(config: &PsiConfig) -> Result<Blinding> {
    let bound = config.blinding.bound;
    let blinding = match config.blinding.seed {
        Some(seed) => {
            warn!("Blinding scalars are seeded, masked values are reproducible");
            Blinding::seeded(bound, seed)
        }
        None => Blinding::secure(bound),
    };
    blinding.ok_or_else(|| anyhow!("blinding bound must be at least 1"))
}

async fn intersect_with<S: HomomorphicScheme>(
    scheme: S,
    config: &PsiConfig,
    clear: &[i64],
    protected: &[i64],
    pooled: bool,
) -> Result<IntersectionReport> {
    check_provisioning(&scheme, clear.len())?;
    let context = Arc::new(PsiContext::setup(scheme)?);
    let intersector = Intersector::new(context, clear, blinding(config)?)?;
    let protected = intersector.protect(protected)?;

    if !pooled {
        return Ok(intersector.run(&protected, &CancelToken::new()));
    }

    let threads = config
        .pool
        .threads
        .unwrap_or_else(|| ElementPool::get_max_threads_minus(1));
    let pool = ElementPool::new(threads, config.pool.max_tasks)?;

    // Elements not yet started when Ctrl-C arrives are reported as cancelled
    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, cancelling remaining elements");
            on_interrupt.cancel();
        }
    });

    let report = intersector.run_pooled(protected, &pool, &cancel).await;
    interrupt.abort();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use psi_protocol::ProtocolError;

    fn mock_config(clear: &[i64], protected: &[i64]) -> PsiConfig {
        let mut config = PsiConfig::default();
        config.backend = Backend::Mock;
        config.blinding.seed = Some(3);
        config.inputs.clear = clear.to_vec();
        config.inputs.protected = protected.to_vec();
        config
    }

    #[tokio::test]
    async fn reference_sets_on_both_schedules() {
        let config = mock_config(&[3, 2, 1, 4], &[1, 2, 3, 5]);
        for pooled in [false, true] {
            let report = intersect_sets(&config, &[3, 2, 1, 4], &[1, 2, 3, 5], pooled)
                .await
                .unwrap();
            assert_eq!(report.intersection(), vec![1, 2, 3]);
        }
    }

    #[tokio::test]
    async fn explicit_depth_below_clear_set_fails() {
        let mut config = mock_config(&[1, 2, 3], &[1]);
        config.bfv.depth = Some(2);
        let err = intersect_sets(&config, &[1, 2, 3], &[1], false)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProtocolError>(),
            Some(ProtocolError::Provisioning {
                required: 3,
                provisioned: 2
            })
        ));
    }

    #[tokio::test]
    async fn bfv_insecure_tier_runs_end_to_end() {
        let mut config = mock_config(&[5], &[5, 6]);
        config.backend = Backend::Bfv;
        config.bfv.security = psi_fhe::SecurityTier::Insecure;
        let report = intersect_sets(&config, &[5], &[5, 6], true).await.unwrap();
        assert_eq!(report.intersection(), vec![5]);
    }
}
