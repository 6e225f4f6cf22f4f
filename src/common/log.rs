use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

const DEFAULT_FILTER: &str = "info";

/// Installs the global subscriber. Embedders call this once at startup;
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging() {
    if let Err(e) = try_init_logging() {
        eprintln!("dock-layout: logging already initialized: {e}");
    }
}

pub fn try_init_logging() -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    Registry::default()
        .with(filter)
        .with(
            HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true)
                .with_bracketed_fields(true),
        )
        .try_init()
}
