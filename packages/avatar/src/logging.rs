//! Global logging system.

use std::{
    fs::File,
    path::Path,
    sync::Arc,
    env,
    panic,
};
use backtrace::Backtrace;
use tracing_subscriber::{
    fmt::{
        self,
        time::uptime,
    },
    prelude::*,
    Registry,
    EnvFilter,
};
use anyhow::*;


/// Default logging environment filter. Our crates are debug, everything else is warn.
pub const DEFAULT_FILTER: &'static str = "warn,avatar=debug,chunk_data=debug";

/// Build the filter string: the default, with `RUST_LOG` directives appended so they take priority.
fn filter_directives(env_filter: Option<&str>) -> String {
    let mut filter = DEFAULT_FILTER.to_owned();
    if let Some(env_filter) = env_filter {
        filter.push(',');
        filter.push_str(env_filter);
    }
    filter
}

/// Initializes a `tracing` logging backend which outputs to stdout and, if given, also a log file.
/// Accepts ecosystem-standard `RUST_LOG` env filters. Routes panics through the logging system.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer()
        .event_format(format);

    let log_file_log = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            Some(fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file)))
        }
        None => None,
    };

    let env_filter = env::var(EnvFilter::DEFAULT_ENV).ok();
    let subscriber = Registry::default()
        .with(EnvFilter::new(filter_directives(env_filter.as_deref())))
        .with(stdout_log)
        .with(log_file_log);
    tracing::subscriber::set_global_default(subscriber)
        .context("installing log subscriber")?;
    info!("starting program");

    // make panic messages and backtrace go through logging system
    panic::set_hook(Box::new(|info| {
        error!("{}", info);
        if env::var("RUST_BACKTRACE").map(|val| val == "1").unwrap_or(true) {
            error!("{:?}", Backtrace::new());
        }
    }));
    trace!("installed custom panic hook");
    Ok(())
}


#[test]
fn test_env_directives_appended() {
    assert_eq!(filter_directives(None), DEFAULT_FILTER);
    assert_eq!(
        filter_directives(Some("avatar::physics=trace")),
        "warn,avatar=debug,chunk_data=debug,avatar::physics=trace",
    );
}

#[test]
fn test_unwritable_log_file_is_an_error() {
    let path = env::temp_dir().join("avatar-no-such-dir").join("nested").join("log");
    let e = init_logging(Some(path.as_path())).unwrap_err();
    assert!(format!("{:#}", e).contains("creating log file"));
}
