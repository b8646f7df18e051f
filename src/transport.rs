use crate::error::HarnessError;
use crate::launcher::ServerProcess;
use serde_json::Value;
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::process::ChildStdin;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Line-oriented access to the server's stdin and stdout. The stdout side is
/// drained by a reader thread into a channel so callers can wait for output
/// with a deadline instead of a blind sleep.
pub struct Transport {
    stdin: Option<ChildStdin>,
    lines: Receiver<String>,
    reader: Option<JoinHandle<()>>,
}

impl Transport {
    /// Take ownership of the process's stdin and stdout pipes.
    pub fn attach(process: &mut ServerProcess) -> Self {
        let stdin = process.child.stdin.take();
        let stdout = process.child.stdout.take();
        let (sender, lines) = mpsc::channel();
        let reader = stdout.map(|stdout| {
            thread::spawn(move || {
                for line in BufReader::new(stdout).lines() {
                    let Ok(line) = line else {
                        break;
                    };
                    if sender.send(line).is_err() {
                        break;
                    }
                }
            })
        });
        Self {
            stdin,
            lines,
            reader,
        }
    }

    /// Serialize one request to a single JSON line, write it, flush it.
    pub fn send(&mut self, request: &Value) -> Result<(), HarnessError> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(HarnessError::Write(io::Error::new(
                ErrorKind::BrokenPipe,
                "input already closed",
            )));
        };
        let serialized =
            serde_json::to_string(request).map_err(|err| HarnessError::Write(io::Error::other(err)))?;
        writeln!(stdin, "{serialized}").map_err(HarnessError::Write)?;
        stdin.flush().map_err(HarnessError::Write)
    }

    /// Close the input stream, signaling end-of-requests to the server.
    pub fn close_input(&mut self) {
        self.stdin.take();
    }

    /// Wait up to `timeout` for the next stdout line. `Disconnected` means the
    /// stream hit end-of-file.
    pub fn recv_line(&self, timeout: Duration) -> Result<String, RecvTimeoutError> {
        self.lines.recv_timeout(timeout)
    }

    /// Collect whatever lines were buffered without waiting. Used after the
    /// process is down so partial output is never dropped.
    pub fn sweep(&self) -> Vec<String> {
        self.lines.try_iter().collect()
    }

    /// Join the reader thread. Call only once the stream has reached
    /// end-of-file (process exited or was killed).
    pub fn shutdown(&mut self) {
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}
