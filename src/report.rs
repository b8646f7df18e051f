use crate::collector::{Outcome, ResponseLine, RunResult};
use crate::plan::TestCase;

pub const SEPARATOR: &str = "==================================================";

/// Substring of server stderr that marks the database being unreachable.
pub const DB_DOWN_MARKER: &str = "Failed to connect to database";

const DB_DOWN_EXIT_CODE: i32 = 1;

/// Print a test case before it is sent: its description and the literal
/// request body that goes on the wire.
pub fn announce(case: &TestCase) {
    println!();
    println!("{}", case.description);
    println!("Request: {}", case.request);
}

/// Print everything captured from the run and classify the error stream.
/// Returns the harness exit code: non-zero only for the dependency-unavailable
/// signature; protocol-level errors in the responses are reported, not judged.
pub fn summarize(result: &RunResult) -> i32 {
    println!();
    println!("{SEPARATOR}");
    println!("Server responses:");
    println!("{SEPARATOR}");

    for line in &result.responses {
        match line {
            ResponseLine::Parsed(value) => match serde_json::to_string_pretty(value) {
                Ok(pretty) => println!("{pretty}"),
                Err(_) => println!("{value}"),
            },
            ResponseLine::Raw(text) => println!("{text}"),
        }
    }

    if matches!(result.outcome, Outcome::Killed) {
        println!();
        println!("Server did not exit within the bound and was terminated.");
    }

    if !result.stderr.is_empty() {
        println!();
        println!("STDERR (server logs):");
        print!("{}", result.stderr);
        if !result.stderr.ends_with('\n') {
            println!();
        }
    }

    println!();
    println!("{SEPARATOR}");
    println!("Run complete.");

    let code = classify_stderr(&result.stderr);
    if code == DB_DOWN_EXIT_CODE {
        println!();
        println!("Note: the server could not reach its database. This is expected when PostgreSQL is not running.");
        println!("To run the full conformance pass, start PostgreSQL first:");
        println!("  docker-compose up -d");
        println!("  or");
        println!("  sudo systemctl start postgresql");
    }
    code
}

/// Exit code for the captured error stream: 1 when the
/// dependency-unavailable marker is present, 0 otherwise.
pub fn classify_stderr(stderr: &str) -> i32 {
    if stderr.contains(DB_DOWN_MARKER) {
        DB_DOWN_EXIT_CODE
    } else {
        0
    }
}
