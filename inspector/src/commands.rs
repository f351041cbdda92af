use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider},
};
use anyhow::Error;
use bindings::{
    FilterOpts,
    pacaya::{
        ComposeVerifierClient, EssentialContractClient, SurgeVerifierClient,
        surge_verifier::InternalVerifier,
    },
};
use common::utils::rpc::with_timeout;
use pacaya::PacayaClients;
use std::time::Duration;
use tracing::{info, warn};

type Clients = PacayaClients<DynProvider>;

pub async fn status(clients: &Clients) -> Result<(), Error> {
    println!("TaikoInbox: {}", clients.l1.inbox().address());
    println!("Verifier: {}", clients.l1.verifier_address());
    println!("Protocol config: {}", clients.l1.protocol_config());
    println!("L1 height: {}", clients.l1.get_l1_height().await?);

    let state = clients.l1.get_protocol_state().await?;
    println!("{state}");

    if clients.l2.is_some() {
        let fork_info = clients.get_fork_info().await?;
        println!("Current fork: {}", fork_info.fork);
        match fork_info.next_fork_height() {
            Some((fork, height)) => println!("Next fork: {fork} at L2 block {height}"),
            None => println!("Next fork: not scheduled"),
        }
    } else {
        warn!("No L2 RPC URL configured, skipping fork info");
    }
    Ok(())
}

pub async fn batch(clients: &Clients, batch_id: u64) -> Result<(), Error> {
    let batch = clients.l1.get_batch(batch_id).await?;
    println!("batch {}", batch.batchId);
    println!("  meta hash: {}", batch.metaHash);
    println!(
        "  last block: {} at {}",
        batch.lastBlockId, batch.lastBlockTimestamp
    );
    println!("  anchor block: {}", batch.anchorBlockId);
    println!("  liveness bond: {}", batch.livenessBond);
    println!("  next transition id: {}", batch.nextTransitionId);
    println!("  verified transition id: {}", batch.verifiedTransitionId);
    Ok(())
}

pub async fn events(
    clients: &Clients,
    from: u64,
    to: Option<u64>,
    rpc_timeout: Duration,
) -> Result<(), Error> {
    let opts = FilterOpts { start: from, end: to };
    let inbox = clients.l1.inbox();
    info!("Listing inbox events from block {from} to {to:?}");

    let proposed = with_timeout(
        rpc_timeout,
        "filter BatchProposed",
        inbox.filter_batch_proposed(&opts),
    )
    .await?;
    for log in proposed {
        let log = log?;
        println!(
            "[{}] BatchProposed batch {} last block {} by {}",
            log.block_number().unwrap_or_default(),
            log.event.meta.batchId,
            log.event.info.lastBlockId,
            log.event.meta.proposer
        );
    }
    let proved = with_timeout(
        rpc_timeout,
        "filter BatchesProved",
        inbox.filter_batches_proved(&opts),
    )
    .await?;
    for log in proved {
        let log = log?;
        println!(
            "[{}] BatchesProved batches {:?} by verifier {}",
            log.block_number().unwrap_or_default(),
            log.event.batchIds,
            log.event.verifier
        );
    }
    let verified = with_timeout(
        rpc_timeout,
        "filter BatchesVerified",
        inbox.filter_batches_verified(&opts),
    )
    .await?;
    for log in verified {
        let log = log?;
        println!(
            "[{}] BatchesVerified up to batch {} block hash {}",
            log.block_number().unwrap_or_default(),
            log.event.batchId,
            log.event.blockHash
        );
    }
    Ok(())
}

/// Sub-verifier addresses of a compose verifier, in slot order.
pub async fn compose_verifier_slots<P: Provider + Clone + 'static>(
    verifier: &ComposeVerifierClient<P>,
    rpc_timeout: Duration,
) -> Result<Vec<(&'static str, Address)>, Error> {
    let op = with_timeout(rpc_timeout, "read op verifier", verifier.op_verifier()).await?;
    let sgx_reth = with_timeout(
        rpc_timeout,
        "read sgx_reth verifier",
        verifier.sgx_reth_verifier(),
    )
    .await?;
    let sgx_geth = with_timeout(
        rpc_timeout,
        "read sgx_geth verifier",
        verifier.sgx_geth_verifier(),
    )
    .await?;
    let tdx_geth = with_timeout(
        rpc_timeout,
        "read tdx_geth verifier",
        verifier.tdx_geth_verifier(),
    )
    .await?;
    let risc0_reth = with_timeout(
        rpc_timeout,
        "read risc0_reth verifier",
        verifier.risc0_reth_verifier(),
    )
    .await?;
    let sp1_reth = with_timeout(
        rpc_timeout,
        "read sp1_reth verifier",
        verifier.sp1_reth_verifier(),
    )
    .await?;
    Ok(vec![
        ("op", op),
        ("sgx_reth", sgx_reth),
        ("sgx_geth", sgx_geth),
        ("tdx_geth", tdx_geth),
        ("risc0_reth", risc0_reth),
        ("sp1_reth", sp1_reth),
    ])
}

/// Internal verifier slots of a Surge verifier.
pub async fn surge_verifier_slots<P: Provider + Clone + 'static>(
    verifier: &SurgeVerifierClient<P>,
    rpc_timeout: Duration,
) -> Result<Vec<(&'static str, InternalVerifier)>, Error> {
    let sgx_reth = with_timeout(
        rpc_timeout,
        "read sgx_reth slot",
        verifier.sgx_reth_verifier(),
    )
    .await?;
    let risc0_reth = with_timeout(
        rpc_timeout,
        "read risc0_reth slot",
        verifier.risc0_reth_verifier(),
    )
    .await?;
    let sp1_reth = with_timeout(
        rpc_timeout,
        "read sp1_reth slot",
        verifier.sp1_reth_verifier(),
    )
    .await?;
    let sgx_geth = with_timeout(
        rpc_timeout,
        "read sgx_geth slot",
        verifier.sgx_geth_verifier(),
    )
    .await?;
    Ok(vec![
        ("sgx_reth", sgx_reth),
        ("risc0_reth", risc0_reth),
        ("sp1_reth", sp1_reth),
        ("sgx_geth", sgx_geth),
    ])
}

pub async fn verifiers(clients: &Clients, surge: bool, rpc_timeout: Duration) -> Result<(), Error> {
    if surge {
        let slots = surge_verifier_slots(&clients.l1.surge_verifier(), rpc_timeout).await?;
        for (name, slot) in slots {
            print_slot(name, slot);
        }
    } else {
        let slots = compose_verifier_slots(&clients.l1.compose_verifier(), rpc_timeout).await?;
        for (name, address) in slots {
            println!("{name}: {address}");
        }
    }
    Ok(())
}

fn print_slot(name: &str, slot: InternalVerifier) {
    println!(
        "{name}: {}{}",
        slot.addr,
        if slot.upgradeable { " (upgradeable)" } else { "" }
    );
}

/// Ownership and upgrade state of an upgradeable contract.
#[derive(Debug, PartialEq, Eq)]
pub struct ProxyInfo {
    pub owner: Address,
    pub paused: bool,
    pub implementation: Address,
    pub resolver: Address,
}

pub async fn proxy_info<P: Provider + Clone + 'static>(
    essential: &EssentialContractClient<P>,
    rpc_timeout: Duration,
) -> Result<ProxyInfo, Error> {
    Ok(ProxyInfo {
        owner: with_timeout(rpc_timeout, "read owner", essential.owner()).await?,
        paused: with_timeout(rpc_timeout, "read paused", essential.paused()).await?,
        implementation: with_timeout(
            rpc_timeout,
            "read implementation",
            essential.implementation(),
        )
        .await?,
        resolver: with_timeout(rpc_timeout, "read resolver", essential.resolver()).await?,
    })
}

pub async fn bond(clients: &Clients, address: Address) -> Result<(), Error> {
    let balance = clients.l1.get_bond_balance(address).await?;
    println!("{address}: {balance} wei");
    Ok(())
}

pub async fn owner(clients: &Clients, rpc_timeout: Duration) -> Result<(), Error> {
    let info = proxy_info(&clients.l1.inbox().essential(), rpc_timeout).await?;
    println!("owner: {}", info.owner);
    println!("paused: {}", info.paused);
    println!("implementation: {}", info.implementation);
    println!("resolver: {}", info.resolver);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        primitives::address,
        providers::ProviderBuilder,
        sol_types::SolCall,
    };
    use bindings::{
        pacaya::{
            compose_verifier::ComposeVerifier, essential::IEssentialContract,
            surge_verifier::SurgeVerifier,
        },
        test_util::{MockRpc, call_input, encode_result, encode_results, mocked_provider},
    };
    use tokio::net::TcpListener;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn verifier_address() -> Address {
        address!("0x00000000000000000000000000000000000000f1")
    }

    /// Node that accepts connections and never answers.
    async fn silent_node() -> DynProvider {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut open = vec![];
            while let Ok((socket, _)) = listener.accept().await {
                open.push(socket);
            }
        });
        ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(url.parse().unwrap())
            .erased()
    }

    #[tokio::test]
    async fn test_compose_verifier_slots_in_order() {
        let sgx = address!("0x0000000000000000000000000000000000000a01");
        let sp1 = address!("0x0000000000000000000000000000000000000a02");
        let rpc = MockRpc::start(move |_, params| {
            let input = call_input(params);
            if input.starts_with(&ComposeVerifier::sgxRethVerifierCall::SELECTOR) {
                Ok(encode_result(&sgx))
            } else if input.starts_with(&ComposeVerifier::sp1RethVerifierCall::SELECTOR) {
                Ok(encode_result(&sp1))
            } else {
                Ok(encode_result(&Address::ZERO))
            }
        })
        .await;
        let verifier = ComposeVerifierClient::new(verifier_address(), mocked_provider(&rpc));

        let slots = compose_verifier_slots(&verifier, TIMEOUT).await.unwrap();
        assert_eq!(
            slots,
            vec![
                ("op", Address::ZERO),
                ("sgx_reth", sgx),
                ("sgx_geth", Address::ZERO),
                ("tdx_geth", Address::ZERO),
                ("risc0_reth", Address::ZERO),
                ("sp1_reth", sp1),
            ]
        );
        assert_eq!(rpc.requests_for("eth_call").len(), 6);
    }

    #[tokio::test]
    async fn test_surge_verifier_slots_report_upgradeable() {
        let risc0 = address!("0x0000000000000000000000000000000000000b02");
        let rpc = MockRpc::start(move |_, params| {
            let input = call_input(params);
            if input.starts_with(&SurgeVerifier::risc0RethVerifierCall::SELECTOR) {
                Ok(encode_results(&(true, risc0)))
            } else {
                Ok(encode_results(&(false, Address::ZERO)))
            }
        })
        .await;
        let verifier = SurgeVerifierClient::new(verifier_address(), mocked_provider(&rpc));

        let slots = surge_verifier_slots(&verifier, TIMEOUT).await.unwrap();
        let names: Vec<_> = slots.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["sgx_reth", "risc0_reth", "sp1_reth", "sgx_geth"]);
        assert_eq!(
            slots[1].1,
            InternalVerifier {
                upgradeable: true,
                addr: risc0,
            }
        );
        assert!(!slots[3].1.upgradeable);
    }

    #[tokio::test]
    async fn test_proxy_info() {
        let owner = address!("0x00000000000000000000000000000000000000aa");
        let implementation = address!("0x00000000000000000000000000000000000000bb");
        let rpc = MockRpc::start(move |_, params| {
            let input = call_input(params);
            if input.starts_with(&IEssentialContract::ownerCall::SELECTOR) {
                Ok(encode_result(&owner))
            } else if input.starts_with(&IEssentialContract::pausedCall::SELECTOR) {
                Ok(encode_result(&false))
            } else if input.starts_with(&IEssentialContract::implCall::SELECTOR) {
                Ok(encode_result(&implementation))
            } else {
                Ok(encode_result(&Address::ZERO))
            }
        })
        .await;
        let essential = EssentialContractClient::new(verifier_address(), mocked_provider(&rpc));

        assert_eq!(
            proxy_info(&essential, TIMEOUT).await.unwrap(),
            ProxyInfo {
                owner,
                paused: false,
                implementation,
                resolver: Address::ZERO,
            }
        );
    }

    #[tokio::test]
    async fn test_verifier_reads_time_out_on_silent_node() {
        let provider = silent_node().await;
        let verifier = ComposeVerifierClient::new(verifier_address(), provider.clone());

        let err = compose_verifier_slots(&verifier, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Timed out after 0s while trying to read op verifier"
        );

        let essential = EssentialContractClient::new(verifier_address(), provider);
        let err = proxy_info(&essential, Duration::from_millis(100))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Timed out after 0s while trying to read owner"
        );
    }
}
