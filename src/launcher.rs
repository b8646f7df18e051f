use crate::error::HarnessError;
use std::path::Path;
use std::process::{Child, Command, Stdio};

/// The spawned server and its pipes, exclusively owned for the run.
#[derive(Debug)]
pub struct ServerProcess {
    pub child: Child,
}

/// Spawn the server binary with the connection string in its environment and
/// all three standard streams piped. The only side effect is the spawn itself;
/// no requests are sent here.
pub fn launch(binary: &Path, database_url: &str) -> Result<ServerProcess, HarnessError> {
    let child = Command::new(binary)
        .env("DATABASE_URL", database_url)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| HarnessError::Launch {
            binary: binary.to_path_buf(),
            source,
        })?;
    Ok(ServerProcess { child })
}
