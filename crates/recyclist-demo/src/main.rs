#![forbid(unsafe_code)]

//! Recyclist demo binary entry point.

use std::time::Duration;

use recyclist::ListConfig;
use recyclist::core::logging::{DEFAULT_LOG_FILTER, ENV_LOG_FILTER, init_json_logging};
use recyclist_demo::cli;
use recyclist_demo::layer::CityLayer;
use recyclist_demo::map::marker_size;
use recyclist_demo::session::{Session, SessionConfig, default_script};
use tracing_subscriber::EnvFilter;

fn init_logging(json: bool) {
    if json {
        init_json_logging();
        return;
    }
    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let opts = cli::Opts::parse();
    init_logging(opts.json_logs);

    let layer = match CityLayer::embedded() {
        Ok(layer) => layer
            .with_fail_every(opts.fail_every)
            .with_latency(Duration::from_millis(opts.latency_ms)),
        Err(e) => {
            eprintln!("Failed to load city data: {e}");
            std::process::exit(1);
        }
    };

    let config = SessionConfig {
        list: ListConfig::from_env()
            .with_capacity(opts.capacity)
            .with_page_size(opts.page_size),
        viewport_rows: opts.rows,
    };
    tracing::info!(
        capacity = config.list.capacity,
        page_size = config.list.page_size,
        rows = config.viewport_rows,
        "starting session"
    );

    let mut session = Session::new(config, layer);
    let script = default_script(opts.steps, f64::from(opts.step_rows));
    let report = if opts.frames {
        for step in &script {
            session.step(step);
            println!("-- {step:?}");
            for line in session.frame() {
                println!("{line}");
            }
        }
        session.settle();
        session.report()
    } else {
        session.run(&script)
    };

    for line in session.frame() {
        println!("{line}");
    }
    println!();
    println!(
        "records {} | window {:?} | nodes {} | rewrites {}",
        report.records,
        report.window.range(),
        report.nodes_created,
        report.rewrites
    );
    println!(
        "pages {} | refreshes {} | failures {} | extents coalesced {}",
        report.pages, report.refreshes, report.failures, report.coalesced_extents
    );
    if let Some(first) = session.list().records().get(session.list().window().first()) {
        println!(
            "top row: {} ({}), marker size {:.1}",
            first.areaname,
            first.st,
            marker_size(first.pop2000)
        );
    }
}
