use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise the `-v` count picks the filter.
pub fn init(verbose: u8) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let filter_str = match verbose {
            0 => "warn,cli=info,runtime=info,rmcp=warn,tool_host=info",
            1 => "info,cli=debug,runtime=debug,rmcp=info,tool_host=debug",
            _ => "debug,cli=trace,runtime=trace,rmcp=debug,tool_host=trace",
        };
        EnvFilter::new(filter_str)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}
