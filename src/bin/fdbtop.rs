//! fdbtop - display and update sorted information about FoundationDB processes.
//!
//! Interactive mode (stdin is a terminal): runs `fdbcli --exec "status json"`
//! on a fixed interval and shows the result full-screen.
//!
//! One-shot mode (stdin is piped): reads a status json document from stdin,
//! renders one table to stdout and exits.
//!
//! Usage:
//!   fdbtop
//!   fdbtop -i 10 -- -C fdb.cluster --tls_certificate_file cert
//!   ssh foo 'fdbcli --exec "status json"' | fdbtop

use std::io::{self, IsTerminal, Read};
use std::process::exit;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fdbtop::collector::CliStatusSource;
use fdbtop::sort::SortState;
use fdbtop::tui::App;
use fdbtop::view::render_status;

/// Display and update sorted information about FoundationDB processes.
#[derive(Parser)]
#[command(
    name = "fdbtop",
    about = "Display and update sorted information about FoundationDB processes",
    version,
    after_help = "Use '<' and '>' to change the sort column. Press ESC, q or CTRL-C to exit.\n\
                  Pipe an fdb status json in for non-interactive mode.\n\
                  Arguments after '--' are passed to fdbcli."
)]
struct Args {
    /// Refresh interval in seconds.
    #[arg(short, long, default_value = "1", value_name = "SEC")]
    interval: u64,

    /// Show disk iops for all roles (otherwise only for storage and log).
    #[arg(long)]
    show_stateless_iops: bool,

    /// Arguments passed through to fdbcli.
    #[arg(last = true, value_name = "FDBCLI_ARGS")]
    fdbcli_args: Vec<String>,
}

/// Silent unless RUST_LOG is set; diagnostics go to stderr so one-shot
/// stdout stays clean.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging();

    if io::stdin().is_terminal() {
        run_interactive(&args);
    } else {
        run_once(&args);
    }
}

fn run_interactive(args: &Args) {
    let source = CliStatusSource::new(&args.fdbcli_args);
    let app = App::new(Box::new(source), args.show_stateless_iops);
    // An interval of 0 would busy-loop; clamp to the 1s default cadence.
    let tick_rate = Duration::from_secs(args.interval.max(1));

    if let Err(e) = app.run(tick_rate) {
        eprintln!("Error running fdbtop: {}", e);
        exit(1);
    }
}

fn run_once(args: &Args) {
    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        eprintln!("Error reading stdin: {}", e);
        exit(1);
    }

    let sort = SortState::new();
    match render_status(&input, sort.active(), args.show_stateless_iops) {
        Ok(table) => print!("{}", table),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}
