use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the stderr subscriber for the binary. `RUST_LOG` wins over `verbose`.
///
/// Results go to stdout, so logs must never share it.
pub fn init_cli_logger(verbose: bool) {
    let default_filter = if verbose {
        "bounded_calc=debug,warn"
    } else {
        "bounded_calc=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
