use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

mod collector;
mod error;
mod launcher;
mod plan;
mod report;
mod transport;

const DEFAULT_DATABASE_URL: &str =
    "host=localhost port=5432 user=postgres password=postgres dbname=mcp_restaurant sslmode=disable";

#[derive(Parser)]
#[command(name = "mcp-probe")]
#[command(
    version,
    about = "Black-box conformance harness for MCP servers speaking JSON-RPC over stdio"
)]
struct Cli {
    /// Path to the MCP server binary under test
    #[arg(default_value = "./mcp-server")]
    binary: PathBuf,
    /// Connection string passed to the server as DATABASE_URL
    #[arg(long, default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
    /// Bound on the wait for the initialize response before the rest of the
    /// plan is sent
    #[arg(long, default_value_t = 2000)]
    ready_timeout_ms: u64,
    /// Bound on the wait for the server to exit after input is closed
    #[arg(long, default_value_t = 2000)]
    drain_timeout_ms: u64,
}

fn main() {
    let cli = Cli::parse();
    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    println!("Starting MCP server conformance run");
    println!("{}", report::SEPARATOR);

    let mut process = match launcher::launch(&cli.binary, &cli.database_url) {
        Ok(process) => process,
        Err(err) => {
            eprintln!("{err}");
            eprintln!(
                "Build the server under test first, then point the harness at it, e.g. `mcp-probe ./mcp-server`."
            );
            return 0;
        }
    };

    let mut transport = transport::Transport::attach(&mut process);
    let cases = plan::plan();
    let mut captured = Vec::new();

    for (index, case) in cases.iter().enumerate() {
        report::announce(case);
        if let Err(err) = transport.send(&case.request) {
            eprintln!("warning: {err}");
            continue;
        }
        // The initialize reply gates the rest of the plan.
        if index == 0 {
            let ready = Duration::from_millis(cli.ready_timeout_ms);
            match transport.recv_line(ready) {
                Ok(line) => captured.push(line),
                Err(_) => eprintln!(
                    "warning: no initialize response within {}ms, continuing",
                    cli.ready_timeout_ms
                ),
            }
        }
    }

    let timeout = Duration::from_millis(cli.drain_timeout_ms);
    let result = collector::drain(process, transport, captured, timeout);
    report::summarize(&result)
}
