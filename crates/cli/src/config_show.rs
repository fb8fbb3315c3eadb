// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use psi_config::PsiConfig;

pub fn execute(config: &PsiConfig) -> Result<()> {
    if let Some(path) = &config.config_file {
        println!("# {}", path.display());
    }
    print!("{}", config.to_yaml()?);
    Ok(())
}
