use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "nptaxon=info,nptaxon_cli=info,nptaxon_core=info";
const VERBOSE_DIRECTIVES: &str = "nptaxon=debug,nptaxon_cli=debug,nptaxon_core=debug";

/// Install the console subscriber. `RUST_LOG` wins when set; `verbose`
/// raises the crate default to debug.
///
/// Logs go to stderr so stdout stays clean for the printed reports.
pub fn init_logging(verbose: bool) {
    let defaults = if verbose {
        VERBOSE_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(defaults));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // second init is a no-op
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
