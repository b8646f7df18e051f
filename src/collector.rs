use crate::error::HarnessError;
use crate::launcher::ServerProcess;
use crate::transport::Transport;
use serde_json::Value;
use std::io::Read;
use std::process::ExitStatus;
use std::thread;
use std::time::{Duration, Instant};

/// One line of captured server stdout: decoded JSON, or the original text
/// when decoding fails. Order matches emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseLine {
    Parsed(Value),
    Raw(String),
}

/// How the server run ended.
#[derive(Debug)]
pub enum Outcome {
    /// The server exited on its own within the bounded wait.
    Exited(ExitStatus),
    /// The bounded wait elapsed and the server was forcibly terminated.
    Killed,
}

/// Everything captured from one run.
pub struct RunResult {
    pub responses: Vec<ResponseLine>,
    pub stderr: String,
    pub outcome: Outcome,
}

const EXIT_POLL: Duration = Duration::from_millis(20);

/// Close the input side, then collect output until end-of-file or the
/// deadline, forcing termination if the server outlives the bound. `captured`
/// holds lines already received during the readiness wait; they stay at the
/// front so emission order is preserved. Never fails: any trouble while
/// draining degrades to a partial result.
pub fn drain(
    mut process: ServerProcess,
    mut transport: Transport,
    captured: Vec<String>,
    timeout: Duration,
) -> RunResult {
    transport.close_input();

    let deadline = Instant::now() + timeout;
    let mut lines = captured;
    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        match transport.recv_line(deadline - now) {
            Ok(line) => lines.push(line),
            // Timeout or end-of-file; the exit wait below decides which.
            Err(_) => break,
        }
    }

    let outcome = wait_for_exit(&mut process, deadline);
    // The reader sees end-of-file once the process is down; join it first so
    // the sweep picks up everything written before the exit or kill.
    transport.shutdown();
    lines.extend(transport.sweep());

    let stderr = read_stderr(&mut process);

    RunResult {
        responses: classify_lines(&lines),
        stderr,
        outcome,
    }
}

fn wait_for_exit(process: &mut ServerProcess, deadline: Instant) -> Outcome {
    loop {
        match process.child.try_wait() {
            Ok(Some(status)) => return Outcome::Exited(status),
            Ok(None) => {}
            Err(_) => break,
        }
        if Instant::now() >= deadline {
            break;
        }
        thread::sleep(EXIT_POLL);
    }
    let _ = process.child.kill();
    let _ = process.child.wait();
    Outcome::Killed
}

fn read_stderr(process: &mut ServerProcess) -> String {
    let Some(mut stderr) = process.child.stderr.take() else {
        return String::new();
    };
    let mut buffer = Vec::new();
    if let Err(err) = stderr.read_to_end(&mut buffer) {
        eprintln!("warning: {}", HarnessError::Drain(err));
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Parse each non-empty line as JSON, keeping undecodable lines verbatim.
/// Only truly empty lines are skipped; whitespace-only lines stay raw.
pub fn classify_lines(lines: &[String]) -> Vec<ResponseLine> {
    lines
        .iter()
        .filter(|line| !line.is_empty())
        .map(|line| match serde_json::from_str(line) {
            Ok(value) => ResponseLine::Parsed(value),
            Err(_) => ResponseLine::Raw(line.clone()),
        })
        .collect()
}
