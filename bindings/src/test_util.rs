use alloy::{
    json_abi::JsonAbi,
    primitives::{Address, B256, Bytes, LogData, hex},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::Log,
    sol_types::{SolType, SolValue, abi::TokenSeq},
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

pub struct RpcFailure {
    code: i64,
    message: String,
    data: Option<String>,
}

/// Node response for a call that reverted with `data`.
pub fn revert(data: impl AsRef<[u8]>) -> RpcFailure {
    RpcFailure {
        code: 3,
        message: "execution reverted".to_string(),
        data: Some(hex::encode_prefixed(data)),
    }
}

pub type RpcResult = Result<Value, RpcFailure>;

/// JSON-RPC node backed by mockito. Every request is answered by `handler`
/// and recorded for later inspection.
pub struct MockRpc {
    server: mockito::ServerGuard,
    _mock: mockito::Mock,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockRpc {
    pub async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> RpcResult + Send + Sync + 'static,
    {
        let mut server = mockito::Server::new_async().await;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();

        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body_from_request(move |request| {
                let body: Value =
                    serde_json::from_slice(request.body().expect("request body")).expect("json");
                recorded.lock().expect("lock").push(body.clone());
                let method = body["method"].as_str().unwrap_or_default();
                let response = match handler(method, &body["params"]) {
                    Ok(result) => json!({ "jsonrpc": "2.0", "id": body["id"], "result": result }),
                    Err(failure) => json!({
                        "jsonrpc": "2.0",
                        "id": body["id"],
                        "error": {
                            "code": failure.code,
                            "message": failure.message,
                            "data": failure.data,
                        },
                    }),
                };
                serde_json::to_vec(&response).expect("serialize")
            })
            .expect_at_least(0)
            .create_async()
            .await;

        Self {
            server,
            _mock: mock,
            requests,
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().expect("lock").clone()
    }

    pub fn requests_for(&self, method: &str) -> Vec<Value> {
        self.requests()
            .into_iter()
            .filter(|request| request["method"] == method)
            .collect()
    }
}

pub fn mocked_provider(rpc: &MockRpc) -> DynProvider {
    ProviderBuilder::new()
        .disable_recommended_fillers()
        .connect_http(rpc.url().parse().expect("url"))
        .erased()
}

/// Encodes a single return value the way `eth_call` returns it.
pub fn encode_result<T: SolValue>(value: &T) -> Value {
    json!(Bytes::from(value.abi_encode()))
}

/// Encodes several return values the way `eth_call` returns them.
pub fn encode_results<T>(values: &T) -> Value
where
    T: SolValue,
    for<'a> <T::SolType as SolType>::Token<'a>: TokenSeq<'a>,
{
    json!(Bytes::from(values.abi_encode_params()))
}

/// Calldata of the transaction object in the first request param.
pub fn call_input(params: &Value) -> Vec<u8> {
    let tx = &params[0];
    let input = tx
        .get("input")
        .or_else(|| tx.get("data"))
        .and_then(Value::as_str)
        .expect("calldata");
    hex::decode(input).expect("hex calldata")
}

pub fn rpc_log(address: Address, block_number: u64, data: LogData) -> Value {
    rpc_log_at(address, block_number, 0, data)
}

/// Like [`rpc_log`], at a given position within the block.
pub fn rpc_log_at(address: Address, block_number: u64, log_index: u64, data: LogData) -> Value {
    let log = Log {
        inner: alloy::primitives::Log { address, data },
        block_hash: Some(B256::repeat_byte(0x0b)),
        block_number: Some(block_number),
        transaction_hash: Some(B256::repeat_byte(0x0c)),
        transaction_index: Some(0),
        log_index: Some(log_index),
        ..Default::default()
    };
    serde_json::to_value(log).expect("serialize log")
}

/// Function, event and error selectors declared by a JSON ABI.
pub fn abi_selectors(abi: &str) -> (Vec<[u8; 4]>, Vec<[u8; 32]>, Vec<[u8; 4]>) {
    let abi: JsonAbi = serde_json::from_str(abi).expect("valid abi");
    (
        abi.functions().map(|f| f.selector().0).collect(),
        abi.events().map(|e| e.selector().0).collect(),
        abi.errors().map(|e| e.selector().0).collect(),
    )
}
