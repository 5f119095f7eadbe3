//! Tracing subscriber setup for the `kiln` binary.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing once per process.
///
/// Silent unless `RUST_LOG` is set. `KILN_LOG_TREE` switches from flat
/// lines to an indented span tree. Output goes to stderr so optimized text
/// printed on stdout stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());

        if std::env::var_os("KILN_LOG_TREE").is_some() {
            registry
                .with(
                    tracing_tree::HierarchicalLayer::new(2)
                        .with_targets(true)
                        .with_bracketed_fields(true),
                )
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
