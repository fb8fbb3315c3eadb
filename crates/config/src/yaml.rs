// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Read a YAML file and substitute `${VAR}` references from the environment.
pub fn load_yaml_with_env(file_path: &Path) -> Result<String> {
    let content = fs::read_to_string(file_path)?;
    let expanded = shellexpand::env(&content)
        .with_context(|| format!("Could not expand variables in {}", file_path.display()))?;
    Ok(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn substitutes_environment_variables() {
        Jail::expect_with(|jail| {
            jail.set_env("PSI_TEST_BOUND", "250");
            jail.create_file("psi.config.yaml", "blinding:\n  bound: ${PSI_TEST_BOUND}\n")?;
            let yaml = load_yaml_with_env(Path::new("psi.config.yaml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(yaml, "blinding:\n  bound: 250\n");
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_yaml_with_env(Path::new("/nope/psi.config.yaml")).unwrap_err();
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }
}
