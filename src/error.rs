use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("failed to launch server binary {}: {source}", .binary.display())]
    Launch {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write request: {0}")]
    Write(#[source] io::Error),
    #[error("failed while draining server output: {0}")]
    Drain(#[source] io::Error),
}
