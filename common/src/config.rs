use alloy::primitives::Address;
use anyhow::Error;
use std::{fmt, time::Duration};
use tracing::warn;

const DEFAULT_RPC_TIMEOUT_SEC: u64 = 60;
const DEFAULT_HTTP_POLL_INTERVAL_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct ContractAddresses {
    pub taiko_inbox: Address,
    pub taiko_anchor: Option<Address>,
    pub surge_proposer_wrapper: Option<Address>,
}

#[derive(Clone)]
pub struct Config {
    pub l1_rpc_url: String,
    pub l2_rpc_url: Option<String>,
    pub contract_addresses: ContractAddresses,
    pub private_key: Option<String>,
    pub l1_start_block: u64,
    pub rpc_timeout: Duration,
    /// Interval for polling log filters. `None` uses `eth_subscribe`, which
    /// requires a websocket endpoint.
    pub watch_poll_interval: Option<Duration>,
}

impl Config {
    pub fn read_env_variables() -> Result<Self, Error> {
        // Load environment variables from .env file
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let l1_rpc_url =
            lookup("L1_RPC_URL").ok_or_else(|| anyhow::anyhow!("L1_RPC_URL env var not found"))?;

        let l2_rpc_url = lookup("L2_RPC_URL").filter(|url| !url.is_empty());
        if l2_rpc_url.is_none() {
            warn!("No L2_RPC_URL set, L2 anchor queries are disabled");
        }

        let taiko_inbox = lookup("TAIKO_INBOX_ADDRESS")
            .ok_or_else(|| anyhow::anyhow!("TAIKO_INBOX_ADDRESS env var not found"))
            .and_then(|value| parse_address("TAIKO_INBOX_ADDRESS", &value))?;

        let taiko_anchor = read_optional_address(&lookup, "TAIKO_ANCHOR_ADDRESS")?;
        let surge_proposer_wrapper =
            read_optional_address(&lookup, "SURGE_PROPOSER_WRAPPER_ADDRESS")?;

        let private_key = lookup("PRIVATE_KEY").filter(|key| !key.is_empty());

        let l1_start_block = lookup("L1_START_BLOCK")
            .unwrap_or("0".to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("L1_START_BLOCK must be a number"))?;

        let rpc_timeout = lookup("RPC_TIMEOUT_SEC")
            .unwrap_or(DEFAULT_RPC_TIMEOUT_SEC.to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("RPC_TIMEOUT_SEC must be a number"))
            .and_then(|val| {
                if val == 0 {
                    return Err(anyhow::anyhow!("RPC_TIMEOUT_SEC must be a positive number"));
                }
                Ok(Duration::from_secs(val))
            })?;

        let watch_poll_interval = match lookup("WATCH_POLL_INTERVAL_MS") {
            Some(value) => {
                let ms = value
                    .parse::<u64>()
                    .map_err(|_| anyhow::anyhow!("WATCH_POLL_INTERVAL_MS must be a number"))?;
                (ms > 0).then(|| Duration::from_millis(ms))
            }
            None if is_websocket_url(&l1_rpc_url) => None,
            None => Some(Duration::from_millis(DEFAULT_HTTP_POLL_INTERVAL_MS)),
        };

        Ok(Config {
            l1_rpc_url,
            l2_rpc_url,
            contract_addresses: ContractAddresses {
                taiko_inbox,
                taiko_anchor,
                surge_proposer_wrapper,
            },
            private_key,
            l1_start_block,
            rpc_timeout,
            watch_poll_interval,
        })
    }
}

pub fn is_websocket_url(url: &str) -> bool {
    url.starts_with("ws://") || url.starts_with("wss://")
}

fn parse_address(name: &str, value: &str) -> Result<Address, Error> {
    value
        .parse::<Address>()
        .map_err(|e| anyhow::anyhow!("{name} is not a valid address: {e}"))
}

fn read_optional_address<F>(lookup: &F, name: &str) -> Result<Option<Address>, Error>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).filter(|value| !value.is_empty()) {
        Some(value) => {
            let address = parse_address(name, &value)?;
            Ok((address != Address::ZERO).then_some(address))
        }
        None => Ok(None),
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "L1 RPC URL: {}", self.l1_rpc_url)?;
        writeln!(
            f,
            "L2 RPC URL: {}",
            self.l2_rpc_url.as_deref().unwrap_or("not set")
        )?;
        writeln!(f, "Contract addresses: {:#?}", self.contract_addresses)?;
        writeln!(
            f,
            "private key: {}",
            if self.private_key.is_some() {
                "set"
            } else {
                "not set"
            }
        )?;
        writeln!(f, "L1 start block: {}", self.l1_start_block)?;
        writeln!(f, "RPC timeout: {}s", self.rpc_timeout.as_secs())?;
        match self.watch_poll_interval {
            Some(interval) => writeln!(f, "watch poll interval: {}ms", interval.as_millis())?,
            None => writeln!(f, "watch mode: subscription")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const INBOX: &str = "0x79C9109b764609df928d16fC4a91e9081F7e87DB";

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_for_http_endpoint() {
        let config = Config::from_lookup(lookup_from(&[
            ("L1_RPC_URL", "http://localhost:8545"),
            ("TAIKO_INBOX_ADDRESS", INBOX),
        ]))
        .unwrap();

        assert_eq!(config.contract_addresses.taiko_inbox, INBOX.parse::<Address>().unwrap());
        assert!(config.contract_addresses.taiko_anchor.is_none());
        assert!(config.l2_rpc_url.is_none());
        assert_eq!(config.l1_start_block, 0);
        assert_eq!(config.rpc_timeout, Duration::from_secs(60));
        assert_eq!(config.watch_poll_interval, Some(Duration::from_millis(2000)));
    }

    #[test]
    fn test_websocket_endpoint_subscribes_by_default() {
        let config = Config::from_lookup(lookup_from(&[
            ("L1_RPC_URL", "wss://l1.example.org"),
            ("TAIKO_INBOX_ADDRESS", INBOX),
        ]))
        .unwrap();
        assert!(config.watch_poll_interval.is_none());

        let config = Config::from_lookup(lookup_from(&[
            ("L1_RPC_URL", "wss://l1.example.org"),
            ("TAIKO_INBOX_ADDRESS", INBOX),
            ("WATCH_POLL_INTERVAL_MS", "500"),
        ]))
        .unwrap();
        assert_eq!(config.watch_poll_interval, Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_zero_optional_address_is_unset() {
        let config = Config::from_lookup(lookup_from(&[
            ("L1_RPC_URL", "http://localhost:8545"),
            ("TAIKO_INBOX_ADDRESS", INBOX),
            (
                "SURGE_PROPOSER_WRAPPER_ADDRESS",
                "0x0000000000000000000000000000000000000000",
            ),
            ("TAIKO_ANCHOR_ADDRESS", "0x1670000000000000000000000000000000010001"),
        ]))
        .unwrap();
        assert!(config.contract_addresses.surge_proposer_wrapper.is_none());
        assert!(config.contract_addresses.taiko_anchor.is_some());
    }

    #[test]
    fn test_missing_and_invalid_values() {
        let err = Config::from_lookup(lookup_from(&[("TAIKO_INBOX_ADDRESS", INBOX)]))
            .err()
            .unwrap();
        assert!(err.to_string().contains("L1_RPC_URL"));

        let err = Config::from_lookup(lookup_from(&[
            ("L1_RPC_URL", "http://localhost:8545"),
            ("TAIKO_INBOX_ADDRESS", "0x1234"),
        ]))
        .err()
        .unwrap();
        assert!(err.to_string().contains("TAIKO_INBOX_ADDRESS"));

        let err = Config::from_lookup(lookup_from(&[
            ("L1_RPC_URL", "http://localhost:8545"),
            ("TAIKO_INBOX_ADDRESS", INBOX),
            ("RPC_TIMEOUT_SEC", "0"),
        ]))
        .err()
        .unwrap();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_display_hides_private_key() {
        let config = Config::from_lookup(lookup_from(&[
            ("L1_RPC_URL", "http://localhost:8545"),
            ("TAIKO_INBOX_ADDRESS", INBOX),
            (
                "PRIVATE_KEY",
                "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            ),
        ]))
        .unwrap();
        let shown = config.to_string();
        assert!(shown.contains("private key: set"));
        assert!(!shown.contains("ac0974bec"));
    }
}
