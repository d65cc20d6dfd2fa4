use log::{debug, info};
use std::path::Path;
use std::process::Command;

use crate::error::{HarnessError, Result};
use crate::keys::derive::derive_public;
use crate::utils::hex_lower;

/// Key type identifier for the block-production key
const AURA_KEY_TYPE: &str = "aura";
/// Key type identifier for the finality key
const GRANDPA_KEY_TYPE: &str = "gran";

/// Seed a validator's keystore with its aura and grandpa session keys.
///
/// Runs `<binary> key insert` once per role so the on-disk keystore matches
/// the authorities patched into the chain spec for the same seed.
pub fn insert_node_keys(
    binary: &Path,
    base_path: &Path,
    chain_spec: &Path,
    seed: &str,
) -> Result<()> {
    info!(
        "Inserting session keys for seed {seed} into {}",
        base_path.display()
    );
    insert_key(binary, base_path, chain_spec, seed, "sr25519", AURA_KEY_TYPE)?;
    insert_key(binary, base_path, chain_spec, seed, "ed25519", GRANDPA_KEY_TYPE)?;
    Ok(())
}

fn insert_key(
    binary: &Path,
    base_path: &Path,
    chain_spec: &Path,
    seed: &str,
    scheme: &str,
    key_type: &str,
) -> Result<()> {
    let suri = format!("//{seed}");
    debug!(
        "key insert: scheme={scheme} key-type={key_type} public=0x{}",
        hex_lower(&derive_public(scheme, seed))
    );

    let output = Command::new(binary)
        .arg("key")
        .arg("insert")
        .arg("--base-path")
        .arg(base_path)
        .arg("--chain")
        .arg(chain_spec)
        .arg("--suri")
        .arg(&suri)
        .arg("--scheme")
        .arg(scheme)
        .arg("--key-type")
        .arg(key_type)
        .output()
        .map_err(|e| {
            HarnessError::Key(format!(
                "Failed to run {} key insert: {e}",
                binary.display()
            ))
        })?;

    if !output.status.success() {
        return Err(HarnessError::Key(format!(
            "key insert ({key_type}) exited with {:?}: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    Ok(())
}
