use tracing_subscriber::EnvFilter;

const QUIET_CRATES: [&str; 5] = [
    "alloy_transport_http=off",
    "alloy_rpc_client=off",
    "alloy_pubsub=warn",
    "reqwest=off",
    "hyper_util=off",
];

/// Builds the log filter from `RUST_LOG` (defaulting to `info`) and silences
/// the chatty transport crates.
pub fn env_filter() -> EnvFilter {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    for directive in QUIET_CRATES {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter()) // reads RUST_LOG
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_crates_are_silenced() {
        let filter = env_filter().to_string();
        assert!(filter.contains("alloy_transport_http=off"));
        assert!(filter.contains("hyper_util=off"));
    }
}
