//! Selection of the tracing events written to standard error.

use std::collections::HashSet;
use std::fmt::Display;

use tracing_subscriber::{
    Layer, filter::Targets, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Type of event to trace.
#[derive(Clone, Debug, Eq, Hash, PartialEq, clap::ValueEnum)]
pub enum TraceEvent {
    /// Traces launching and reaping of the programs under comparison.
    #[clap(name = "execution")]
    Execution,
    /// Traces operator decisions and movement between cases.
    #[clap(name = "navigation")]
    Navigation,
    /// Traces parsing of the case-definition file.
    #[clap(name = "parse")]
    Parse,
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Execution => write!(f, "execution"),
            Self::Navigation => write!(f, "navigation"),
            Self::Parse => write!(f, "parse"),
        }
    }
}

impl TraceEvent {
    const fn target(&self) -> &'static str {
        match self {
            Self::Execution => "execution",
            Self::Navigation => "navigation",
            Self::Parse => "parse",
        }
    }
}

/// The set of trace events enabled for this process.
#[derive(Default)]
pub struct TraceEventConfig {
    enabled_trace_events: HashSet<TraceEvent>,
}

impl TraceEventConfig {
    /// Installs a global subscriber writing enabled events to standard error.
    pub fn init(enabled_log_events: &[TraceEvent]) -> Self {
        let config = Self {
            enabled_trace_events: enabled_log_events.iter().cloned().collect(),
        };

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .with_filter(config.compose_filter());

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            // Something went wrong; proceed on anyway but complain audibly.
            eprintln!("warning: failed to initialize tracing.");
        }

        config
    }

    /// Returns the enabled events.
    pub const fn enabled_events(&self) -> &HashSet<TraceEvent> {
        &self.enabled_trace_events
    }

    fn compose_filter(&self) -> Targets {
        Targets::new()
            .with_default(tracing_subscriber::filter::LevelFilter::INFO)
            .with_targets(
                self.enabled_trace_events
                    .iter()
                    .map(|event| (event.target(), tracing::Level::DEBUG)),
            )
    }
}
