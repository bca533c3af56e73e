use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over both; `--verbose` wins over the configured level.
pub fn init_cli_logger(verbose: bool, log_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn default_directive(verbose: bool, log_level: Option<&str>) -> String {
    match (verbose, log_level) {
        (true, _) => "print_pricing=debug,info".to_string(),
        (false, Some(level)) => format!("print_pricing={}", level),
        (false, None) => "print_pricing=info".to_string(),
    }
}
