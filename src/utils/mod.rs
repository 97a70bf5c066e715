pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "snapbooks=info";

/// Installs the global subscriber. `RUST_LOG` directives are honoured and
/// `snapbooks=info` is always added on top.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = DEFAULT_DIRECTIVE.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
        // Another subscriber may already be installed by an embedding test harness.
        let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
    });
}
