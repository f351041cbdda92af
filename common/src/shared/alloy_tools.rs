use crate::config::is_websocket_url;
use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use anyhow::Error;
use std::str::FromStr;
use tracing::debug;

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn parse_http_url(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| anyhow::anyhow!("Failed to parse URL {url}: {e}"))
}

pub async fn create_alloy_provider_without_wallet(url: &str) -> Result<DynProvider, Error> {
    if is_websocket_url(url) {
        let ws = WsConnect::new(url);
        Ok(ProviderBuilder::new()
            .connect_ws(ws)
            .await
            .map_err(|e| Error::msg(format!("Execution layer: Failed to connect to WS: {e}")))?
            .erased())
    } else if is_http_url(url) {
        Ok(ProviderBuilder::new()
            .connect_http(parse_http_url(url)?)
            .erased())
    } else {
        Err(anyhow::anyhow!(
            "Invalid URL, only websocket and http are supported: {}",
            url
        ))
    }
}

pub fn signer_from_private_key(private_key: &str) -> Result<PrivateKeySigner, Error> {
    PrivateKeySigner::from_str(private_key)
        .map_err(|e| anyhow::anyhow!("Failed to parse private key: {e}"))
}

/// Creates a provider that signs and fills transactions with `signer`.
pub async fn create_alloy_provider_with_wallet(
    url: &str,
    signer: PrivateKeySigner,
) -> Result<(DynProvider, Address), Error> {
    let address = signer.address();
    debug!("Creating alloy provider for {url} with signer {address}");
    let wallet = EthereumWallet::from(signer);

    let provider = if is_websocket_url(url) {
        ProviderBuilder::new()
            .wallet(wallet)
            .connect_ws(WsConnect::new(url))
            .await
            .map_err(|e| Error::msg(format!("Execution layer: Failed to connect to WS: {e}")))?
            .erased()
    } else if is_http_url(url) {
        ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(parse_http_url(url)?)
            .erased()
    } else {
        return Err(anyhow::anyhow!(
            "Invalid URL, only websocket and http are supported: {}",
            url
        ));
    };

    Ok((provider, address))
}
