#![cfg(unix)]

use anyhow::Result;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

// Swallows all input, then emits a mix of valid JSON and plain text.
const NOISY_SERVER: &str = r#"#!/bin/sh
cat >/dev/null
printf '{"jsonrpc":"2.0","id":1,"result":null}\n'
printf 'not json at all\n'
printf '{"jsonrpc":"2.0","id":2,"result":{"ok":true}}\n'
"#;

fn fake_server(dir: &Path, script: &str) -> Result<PathBuf> {
    let path = dir.join("fake-mcp-server.sh");
    fs::write(&path, script)?;
    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms)?;
    Ok(path)
}

#[test]
fn malformed_lines_are_kept_verbatim_in_emission_order() -> Result<()> {
    let dir = tempdir()?;
    let server = fake_server(dir.path(), NOISY_SERVER)?;

    // This server answers nothing until stdin closes, so the readiness wait
    // is kept short.
    let output = Command::new(env!("CARGO_BIN_EXE_mcp-probe"))
        .arg(&server)
        .args(["--ready-timeout-ms", "200", "--drain-timeout-ms", "5000"])
        .output()?;

    assert!(output.status.success(), "harness exit: {:?}", output.status);
    let stdout = String::from_utf8(output.stdout)?;

    let first = stdout.find("\"id\": 1").expect("first response");
    let raw = stdout.find("not json at all").expect("raw line kept");
    let second = stdout.find("\"ok\": true").expect("second response");
    assert!(first < raw && raw < second, "order lost:\n{stdout}");
    Ok(())
}
