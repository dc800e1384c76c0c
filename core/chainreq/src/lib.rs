


/*  ------------------------------
   | chain client request crate
   |------------------------------
   | process adapter to spawn the chain cli
   | balance gate on top of the account query
   | cli chain client for query and tx send
   |
*/


use std::time::Duration;
use async_trait::async_trait;
use log::info;
use serde::Deserialize;

pub mod process;
pub mod gate;

pub use process::{CommandLine, ProcessAdapter, ProcessOutput, Readiness};
pub use gate::{AccountSnapshot, BalanceGate, Coin, GateError, BALANCE_THRESHOLD};


#[derive(thiserror::Error, Debug)]
pub enum ChainError{
    #[error("[CHAIN CLIENT] - failed to spawn `{program}`: {source}")]
    Spawn{
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("[CHAIN CLIENT] - {0} pipe is not available")]
    Pipe(&'static str),
    #[error("[CHAIN CLIENT] - io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("[CHAIN CLIENT] - exited with status {0:?}")]
    ExitStatus(Option<i32>),
    #[error("[CHAIN CLIENT] - timed out after {0:?}")]
    Timeout(Duration),
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferParams{
    pub key: String,
    pub recipient: String,
    pub amount: String,
    pub chain_id: String,
    pub node: String,
    pub passphrase: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TxReceipt{
    pub tx_hash: Option<String>,
    pub raw_output: String,
}

impl TxReceipt{

    /* best effort, the cli prints either json or a yaml like text */
    pub fn from_output(stdout: &[u8]) -> Self{

        #[derive(Deserialize)]
        struct JsonReceipt{
            txhash: String,
        }

        let raw_output = String::from_utf8_lossy(stdout).to_string();
        let tx_hash = match serde_json::from_slice::<JsonReceipt>(stdout){
            Ok(receipt) => Some(receipt.txhash),
            Err(_) => raw_output
                .lines()
                .filter_map(|line| {
                    let (key, value) = line.trim().split_once(':')?;
                    if key.trim().eq_ignore_ascii_case("txhash"){
                        Some(value.trim().to_string())
                    } else{
                        None
                    }
                })
                .find(|hash| !hash.is_empty()),
        };

        Self{ tx_hash, raw_output }
    }
}


/// Capabilities the faucet needs from a chain node.
#[async_trait]
pub trait ChainClient: Send + Sync{

    /// Raw output of the account query, `Ok(None)` when the client exited
    /// non zero which is what it does for accounts it has never seen.
    async fn query_account(&self, address: &str, chain_id: &str, node: &str) -> Result<Option<Vec<u8>>, ChainError>;

    async fn submit_transfer(&self, params: &TransferParams) -> Result<TxReceipt, ChainError>;
}


#[derive(Clone, Debug)]
pub struct CliChainClient{
    pub client: CommandLine, // the binary plus any wrapper args, like `docker exec node gaiacli`
    pub adapter: ProcessAdapter,
}

impl CliChainClient{

    pub fn new(client: CommandLine, adapter: ProcessAdapter) -> Self{
        Self{ client, adapter }
    }

    pub fn query_command(&self, address: &str, chain_id: &str, node: &str) -> CommandLine{
        self.client.clone()
            .arg("query").arg("account").arg(address)
            .arg("--chain-id").arg(chain_id)
            .arg("--node").arg(node)
            .arg("-o").arg("json")
    }

    /* the passphrase is not part of it, it goes through stdin */
    pub fn send_command(&self, params: &TransferParams) -> CommandLine{
        self.client.clone()
            .arg("tx").arg("send")
            .arg(&params.key)
            .arg(&params.recipient)
            .arg(&params.amount)
            .arg("--chain-id").arg(&params.chain_id)
            .arg("--node").arg(&params.node)
            .arg("-y")
    }
}

#[async_trait]
impl ChainClient for CliChainClient{

    async fn query_account(&self, address: &str, chain_id: &str, node: &str) -> Result<Option<Vec<u8>>, ChainError>{
        let command = self.query_command(address, chain_id, node);
        let output = self.adapter.capture_output(&command).await?;
        if output.success(){
            Ok(Some(output.stdout))
        } else{
            info!("account query for {} exited with {:?}", address, output.status_code);
            Ok(None)
        }
    }

    async fn submit_transfer(&self, params: &TransferParams) -> Result<TxReceipt, ChainError>{
        let command = self.send_command(params);
        let output = self.adapter
            .run_with_input(&command, &[params.passphrase.clone()])
            .await?
            .checked()?;
        Ok(TxReceipt::from_output(&output.stdout))
    }
}


#[cfg(test)]
mod tests{

    use super::*;

    fn params() -> TransferParams{
        TransferParams{
            key: "faucet".to_string(),
            recipient: "cosmos1recipient".to_string(),
            amount: "1000x3ngm".to_string(),
            chain_id: "testnet".to_string(),
            node: "tcp://localhost:26657".to_string(),
            passphrase: "secret".to_string(),
        }
    }

    #[test]
    fn send_command_keeps_the_passphrase_off_argv(){
        let client = CliChainClient::new(CommandLine::new("gaiacli"), ProcessAdapter::default());
        let command = client.send_command(&params());
        assert_eq!(
            command.to_string(),
            "gaiacli tx send faucet cosmos1recipient 1000x3ngm --chain-id testnet --node tcp://localhost:26657 -y"
        );
        assert!(!command.args.contains(&"secret".to_string()));
    }

    #[test]
    fn query_command_asks_for_json(){
        let client = CliChainClient::new(CommandLine::new("gaiacli"), ProcessAdapter::default());
        let command = client.query_command("cosmos1addr", "testnet", "tcp://node:26657");
        assert_eq!(
            command.to_string(),
            "gaiacli query account cosmos1addr --chain-id testnet --node tcp://node:26657 -o json"
        );
    }

    #[test]
    fn wrapped_client_prefixes_every_command(){
        let wrapper = CommandLine::parse("  docker exec node   gaiacli ").unwrap();
        let client = CliChainClient::new(wrapper, ProcessAdapter::default());
        let command = client.query_command("cosmos1addr", "testnet", "tcp://node:26657");
        assert_eq!(command.program, "docker");
        assert_eq!(
            command.to_string(),
            "docker exec node gaiacli query account cosmos1addr --chain-id testnet --node tcp://node:26657 -o json"
        );
        assert!(client.send_command(&params()).to_string().starts_with("docker exec node gaiacli tx send faucet "));
        assert_eq!(CommandLine::parse("   "), None);
    }

    #[test]
    fn receipt_hash_from_json_or_text(){
        let json = TxReceipt::from_output(br#"{"height":"0","txhash":"ABC123"}"#);
        assert_eq!(json.tx_hash.as_deref(), Some("ABC123"));

        let text = TxReceipt::from_output(b"Response:\n  Height: 0\n  TxHash: DEF456\n");
        assert_eq!(text.tx_hash.as_deref(), Some("DEF456"));

        let none = TxReceipt::from_output(b"confirm transaction before signing");
        assert_eq!(none.tx_hash, None);
    }

    #[tokio::test]
    async fn failing_send_is_an_exit_status_error(){
        /* `false` ignores its args and exits with 1 */
        let adapter = ProcessAdapter::new(Readiness::Immediate, Duration::from_secs(5));
        let client = CliChainClient::new(CommandLine::new("false"), adapter);
        let err = client.submit_transfer(&params()).await.unwrap_err();
        assert!(matches!(err, ChainError::ExitStatus(Some(1))));
    }

    #[tokio::test]
    async fn non_zero_query_means_unknown_account(){
        let adapter = ProcessAdapter::new(Readiness::Immediate, Duration::from_secs(5));
        let client = CliChainClient::new(CommandLine::new("false"), adapter);
        let out = client.query_account("cosmos1addr", "testnet", "tcp://node:26657").await.unwrap();
        assert!(out.is_none());
    }
}
