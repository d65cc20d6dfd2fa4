use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{HarnessError, Result};
use crate::spec::patch::SpecPatch;

/// Default genesis endowment for patched-in authorities
pub const DEFAULT_ENDOWMENT: u64 = 1 << 60;

/// Generate a raw chain spec at `output`, optionally patching the genesis
/// document first.
///
/// Without a patch function the binary is invoked once in raw mode and its
/// stdout is written verbatim. With a patch function the non-raw document is
/// generated, parsed, patched, written to an intermediate file next to the
/// output, and the binary is invoked a second time to rawify it. The
/// intermediate file is left on disk as a debugging artifact.
pub fn generate(
    binary: &Path,
    output: &Path,
    patch_fn: Option<&dyn Fn(&mut SpecPatch)>,
) -> Result<()> {
    let patch_fn = match patch_fn {
        None => {
            info!("Generating raw chain spec at {}", output.display());
            let raw = run_build_spec(binary, true, "local")?;
            fs::write(output, raw)?;
            return Ok(());
        }
        Some(f) => f,
    };

    info!("Generating patched chain spec at {}", output.display());
    let plain = run_build_spec(binary, false, "local")?;
    let doc: serde_json::Value = serde_json::from_str(&plain)?;

    let mut patch = SpecPatch::new(doc);
    patch_fn(&mut patch);

    let intermediate = intermediate_path(output);
    fs::write(
        &intermediate,
        serde_json::to_string_pretty(&patch.into_document())?,
    )?;
    debug!("Wrote patched intermediate spec to {}", intermediate.display());

    let chain_arg = intermediate.to_str().ok_or_else(|| {
        HarnessError::Io(format!("Non-UTF8 intermediate path: {}", intermediate.display()))
    })?;
    let raw = run_build_spec(binary, true, chain_arg)?;
    fs::write(output, raw)?;
    Ok(())
}

/// Invoke `<binary> build-spec` and capture its stdout.
fn run_build_spec(binary: &Path, raw: bool, chain: &str) -> Result<String> {
    let mut command = Command::new(binary);
    command.arg("build-spec").arg("--disable-default-bootnode");
    if raw {
        command.arg("--raw");
    }
    command.arg("--chain").arg(chain);

    let output = command.output().map_err(|e| {
        HarnessError::Process(format!("Failed to run {} build-spec: {e}", binary.display()))
    })?;

    if !output.status.success() {
        return Err(HarnessError::SpecGeneration {
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        });
    }

    String::from_utf8(output.stdout)
        .map_err(|e| HarnessError::MalformedSpec(format!("Non-UTF8 build-spec output: {e}")))
}

/// Sibling path for the patched non-raw document. The random suffix keeps
/// concurrent harness runs against the same output directory from clobbering
/// each other's intermediates.
fn intermediate_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("chain-spec");
    let suffix: u32 = rand::random();
    let file_name = format!("{stem}-plain-{suffix:08x}.json");
    output.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intermediate_path_stays_in_output_directory() {
        let output = Path::new("/tmp/net/spec.json");
        let intermediate = intermediate_path(output);
        assert_eq!(intermediate.parent(), output.parent());
        let name = intermediate.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("spec-plain-"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn test_intermediate_paths_are_unique() {
        let output = Path::new("spec.json");
        assert_ne!(intermediate_path(output), intermediate_path(output));
    }

    #[test]
    fn test_missing_binary_is_a_process_error() {
        let err = run_build_spec(Path::new("/nonexistent/node-binary"), true, "local")
            .expect_err("binary does not exist");
        assert!(matches!(err, HarnessError::Process(_)));
    }
}
