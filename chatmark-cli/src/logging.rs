use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when RUST_LOG is not set
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "chatmark=debug,chatmark_cli=debug"
    } else {
        "chatmark=info,chatmark_cli=info"
    }
}

/// Initialize tracing to stderr; stdout is reserved for parse output
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(verbose).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
