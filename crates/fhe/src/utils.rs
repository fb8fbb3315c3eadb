// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::scheme::{Result, SchemeError};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::{Arc, Mutex, MutexGuard};

pub type SharedRng = Arc<Mutex<ChaCha20Rng>>;

/// Shared rng seeded from the operating system.
pub fn create_shared_rng() -> SharedRng {
    Arc::new(Mutex::new(ChaCha20Rng::from_entropy()))
}

pub(crate) fn lock_rng(rng: &SharedRng) -> Result<MutexGuard<'_, ChaCha20Rng>> {
    rng.lock().map_err(|e| SchemeError::Rng(e.to_string()))
}
