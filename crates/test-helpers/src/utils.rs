// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use psi_fhe::{MockScheme, SharedRng, DEFAULT_PLAINTEXT_MODULUS};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::{
    fs,
    io::Write,
    path::Path,
    sync::{Arc, Mutex},
};
use tracing::trace;
use tracing_subscriber::EnvFilter;

pub fn create_shared_rng_from_u64(value: u64) -> SharedRng {
    Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(value)))
}

/// Mock scheme over the default plaintext modulus with a deterministic rng.
pub fn mock_scheme(depth: usize, seed: u64) -> MockScheme {
    match MockScheme::new(DEFAULT_PLAINTEXT_MODULUS, depth, create_shared_rng_from_u64(seed)) {
        Ok(scheme) => scheme,
        Err(e) => panic!("mock scheme over the default modulus must build: {e}"),
    }
}

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn write_file_with_dirs(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(path)?;
    file.write_all(content)?;
    trace!(path = %path.display(), "File written");
    Ok(())
}
