#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `RECYCLIST_DEMO_*` prefix; explicit flags win.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Recyclist Demo: a map extent drives a paged city list over recycled rows

USAGE:
    recyclist-demo [OPTIONS]

OPTIONS:
    --capacity=N        Render nodes in the pool (default: 8)
    --page-size=N       Cities fetched per page (default: 10)
    --rows=N            Visible list rows (default: 5)
    --steps=N           Scroll steps per pass (default: 6)
    --step-rows=N       Rows scrolled per step (default: 2)
    --fail-every=N      Fail every N-th provider query, 0 disables (default: 0)
    --latency-ms=N      Simulated provider latency (default: 0)
    --frames            Print the list after every step
    --json-logs         Emit logs as JSON lines on stderr
    --help, -h          Show this help message
    --version, -V       Show version

ENVIRONMENT VARIABLES:
    RECYCLIST_DEMO_CAPACITY     Override --capacity
    RECYCLIST_DEMO_PAGE_SIZE    Override --page-size
    RECYCLIST_DEMO_ROWS         Override --rows
    RECYCLIST_DEMO_STEPS        Override --steps
    RECYCLIST_DEMO_FAIL_EVERY   Override --fail-every
    RECYCLIST_THRESHOLD_PX      Edge tolerance in layout pixels (default: 3)
    RECYCLIST_QUIESCENCE_MS     Map settle time (default: 200)
    RECYCLIST_LOG               Log filter, e.g. 'info' or 'recyclist_list=debug'";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub capacity: usize,
    pub page_size: usize,
    pub rows: usize,
    pub steps: usize,
    pub step_rows: u32,
    pub fail_every: u32,
    pub latency_ms: u64,
    pub frames: bool,
    pub json_logs: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            capacity: 8,
            page_size: 10,
            rows: 5,
            steps: 6,
            step_rows: 2,
            fail_every: 0,
            latency_ms: 0,
            frames: false,
            json_logs: false,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

fn parse_flag<T: std::str::FromStr>(name: &str, val: &str) -> Result<T, String> {
    val.parse()
        .map_err(|_| format!("Invalid --{name} value: {val}"))
}

impl Opts {
    /// Parse the process arguments and environment, exiting on `--help`,
    /// `--version`, or bad input.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("recyclist-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with `get_env` as the environment.
    pub fn parse_from<I, F>(args: I, get_env: F) -> Result<Command, String>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = get_env("RECYCLIST_DEMO_CAPACITY")
            && let Ok(n) = val.parse()
        {
            opts.capacity = n;
        }
        if let Some(val) = get_env("RECYCLIST_DEMO_PAGE_SIZE")
            && let Ok(n) = val.parse()
        {
            opts.page_size = n;
        }
        if let Some(val) = get_env("RECYCLIST_DEMO_ROWS")
            && let Ok(n) = val.parse()
        {
            opts.rows = n;
        }
        if let Some(val) = get_env("RECYCLIST_DEMO_STEPS")
            && let Ok(n) = val.parse()
        {
            opts.steps = n;
        }
        if let Some(val) = get_env("RECYCLIST_DEMO_FAIL_EVERY")
            && let Ok(n) = val.parse()
        {
            opts.fail_every = n;
        }

        // Command-line args override env vars
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--frames" => opts.frames = true,
                "--json-logs" => opts.json_logs = true,
                other => {
                    let Some((name, val)) = other.strip_prefix("--").and_then(|s| s.split_once('='))
                    else {
                        return Err(format!("Unknown argument: {other}"));
                    };
                    match name {
                        "capacity" => opts.capacity = parse_flag(name, val)?,
                        "page-size" => opts.page_size = parse_flag(name, val)?,
                        "rows" => opts.rows = parse_flag(name, val)?,
                        "steps" => opts.steps = parse_flag(name, val)?,
                        "step-rows" => opts.step_rows = parse_flag(name, val)?,
                        "fail-every" => opts.fail_every = parse_flag(name, val)?,
                        "latency-ms" => opts.latency_ms = parse_flag(name, val)?,
                        _ => return Err(format!("Unknown argument: {other}")),
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}
