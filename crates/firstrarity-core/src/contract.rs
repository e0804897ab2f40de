//! Read-only access to the collection contract
//!
//! The contract exposes `getString(uint256) returns (string)`. Its ABI is
//! fetched once from Etherscan to confirm the function exists; calls go
//! through a plain JSON-RPC `eth_call`.

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{RarityError, Result};
use crate::TokenId;

/// First four bytes of `keccak256("getString(uint256)")`.
pub const GET_STRING_SELECTOR: &str = "b7c763b5";

const GET_STRING_NAME: &str = "getString";

/// Source of the raw per-identifier text
pub trait TextSource {
    /// Return the text stored for `id`, exactly as the source reports it.
    fn fetch_raw(&self, id: TokenId) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    result: String,
}

#[derive(Debug, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
    #[serde(default)]
    outputs: Vec<AbiParam>,
}

#[derive(Debug, Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    kind: String,
}

/// Check an Etherscan `getabi` response body for a usable `getString`.
pub fn check_abi_response(body: &str) -> Result<()> {
    let response: EtherscanResponse = serde_json::from_str(body)?;
    if response.status != "1" {
        return Err(RarityError::Contract(format!(
            "ABI lookup failed: {} ({})",
            response.message, response.result
        )));
    }

    let abi: Vec<AbiEntry> = serde_json::from_str(&response.result)?;
    let found = abi.iter().any(|entry| {
        entry.kind == "function"
            && entry.name == GET_STRING_NAME
            && entry.inputs.len() == 1
            && entry.inputs[0].kind == "uint256"
            && entry.outputs.len() == 1
            && entry.outputs[0].kind == "string"
    });
    if !found {
        return Err(RarityError::Contract(
            "ABI has no getString(uint256) returning string".into(),
        ));
    }
    Ok(())
}

/// Fetch the contract ABI and confirm the text accessor is present.
pub fn fetch_contract_abi(agent: &ureq::Agent, config: &Config) -> Result<()> {
    info!(address = %config.contract_address, "fetching contract ABI");
    let body = agent
        .get(&config.etherscan_url)
        .query("module", "contract")
        .query("action", "getabi")
        .query("address", &config.contract_address)
        .query("apikey", &config.etherscan_api_key)
        .call()?
        .into_string()?;
    check_abi_response(&body)
}

/// ABI-encode a `getString(id)` call.
pub fn encode_get_string(id: TokenId) -> String {
    format!("0x{GET_STRING_SELECTOR}{id:064x}")
}

/// Decode a single ABI-encoded dynamic `string` return value.
pub fn decode_string_return(data: &str) -> Result<String> {
    let raw = data.strip_prefix("0x").unwrap_or(data);
    let bytes = hex::decode(raw).map_err(|e| RarityError::Decode(e.to_string()))?;

    let offset = read_word(&bytes, 0)?;
    let len = read_word(&bytes, offset)?;
    let start = offset
        .checked_add(32)
        .ok_or_else(|| RarityError::Decode("string offset overflow".into()))?;
    let end = start
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| RarityError::Decode("string data out of bounds".into()))?;

    String::from_utf8(bytes[start..end].to_vec())
        .map_err(|e| RarityError::Decode(e.to_string()))
}

/// Read a 32-byte big-endian word at `at` as a usize.
fn read_word(bytes: &[u8], at: usize) -> Result<usize> {
    let word = at
        .checked_add(32)
        .and_then(|end| bytes.get(at..end))
        .ok_or_else(|| RarityError::Decode(format!("no ABI word at byte {at}")))?;
    let (high, low) = word.split_at(24);
    if high.iter().any(|&b| b != 0) {
        return Err(RarityError::Decode(format!("ABI word at byte {at} too large")));
    }
    let mut value = [0u8; 8];
    value.copy_from_slice(low);
    usize::try_from(u64::from_be_bytes(value))
        .map_err(|_| RarityError::Decode(format!("ABI word at byte {at} too large")))
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Pull the hex result out of a JSON-RPC response, surfacing call errors.
pub fn parse_rpc_response(body: Value) -> Result<String> {
    let response: RpcResponse = serde_json::from_value(body)?;
    if let Some(error) = response.error {
        return Err(RarityError::Contract(format!(
            "{} (code {})",
            error.message, error.code
        )));
    }
    response
        .result
        .ok_or_else(|| RarityError::Decode("JSON-RPC response has no result".into()))
}

/// `getString` via `eth_call` against a JSON-RPC node
pub struct EthCallSource {
    agent: ureq::Agent,
    rpc_url: String,
    contract_address: String,
}

impl EthCallSource {
    /// Confirm the contract ABI, then build the call source.
    pub fn connect(config: &Config) -> Result<Self> {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.http_timeout())
            .build();
        fetch_contract_abi(&agent, config)?;
        Ok(Self {
            agent,
            rpc_url: config.rpc_url.clone(),
            contract_address: config.contract_address.clone(),
        })
    }
}

impl TextSource for EthCallSource {
    fn fetch_raw(&self, id: TokenId) -> Result<String> {
        debug!(id, "eth_call getString");
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [
                { "to": self.contract_address, "data": encode_get_string(id) },
                "latest"
            ],
        });
        let body: Value = self
            .agent
            .post(&self.rpc_url)
            .send_json(request)?
            .into_json()?;
        decode_string_return(&parse_rpc_response(body)?)
    }
}
