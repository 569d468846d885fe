use crate::stderr_buffer::BufferedStderr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "CLASS_SCORES_LOG";

/// Install the global subscriber. `CLASS_SCORES_LOG` wins over `--verbose`.
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "class_scores=debug"
    } else {
        "class_scores=warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| default_directive.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(BufferedStderr),
        )
        .init();
}
