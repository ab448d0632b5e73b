use anyhow::{anyhow, Result as AnyhowResult};
use std::path::Path;
use std::process::Output;

pub fn run_nanopore_mods(args: &[&str]) -> AnyhowResult<Output> {
    let exe = Path::new(env!("CARGO_BIN_EXE_nanopore-mods"));
    assert!(exe.exists());

    let output = std::process::Command::new(exe)
        .args(args)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::piped())
        .spawn()?
        .wait_with_output()?;
    if output.status.success() {
        Ok(output)
    } else {
        Err(anyhow!(
            "failed to run {:?}, {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        ))
    }
}

/// 256-long histogram with the given (quality, count) entries set.
pub fn histogram(entries: &[(usize, u64)]) -> Vec<u64> {
    let mut hist = vec![0u64; 256];
    for &(q, n) in entries {
        hist[q] = n;
    }
    hist
}

pub fn load_json(fp: &Path) -> serde_json::Value {
    let raw = std::fs::read_to_string(fp).unwrap();
    serde_json::from_str(&raw).unwrap()
}
