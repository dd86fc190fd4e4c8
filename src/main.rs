use articlegen::build::build_site;
use articlegen::config::Config;
use clap::{App, Arg};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = App::new("articlegen")
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            "Converts the Markdown documents listed in docs/metadata.json \
             into HTML article pages",
        )
        .arg(
            Arg::with_name("project")
                .value_name("PROJECT_DIR")
                .help("The project root (defaults to the current directory)")
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .help(
                    "Write pages into DIR instead of the configured output \
                     directory",
                )
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more detail (-v for debug, -vv for trace)"),
        )
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    let root = Path::new(matches.value_of("project").unwrap_or("."));
    let config = match Config::from_directory(root) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    let config = match matches.value_of("output") {
        Some(dir) => config.with_output_directory(PathBuf::from(dir)),
        None => config,
    };

    if let Err(e) = build_site(&config) {
        fail(&e);
    }
}

fn init_logging(verbose: u64) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

// Every error's `Display` already includes its cause.
fn fail(err: &dyn std::error::Error) -> ! {
    eprintln!("error: {}", err);
    std::process::exit(1)
}
