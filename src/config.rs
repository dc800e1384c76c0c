


use std::collections::HashMap;
use std::time::Duration;
use chainreq::CommandLine;
use s3req::{DbConfig, Engine, StorageError};
use crate::constants::*;
use crate::models::transactions::OrPrecedence;


#[derive(thiserror::Error, Debug)]
pub enum ConfigError{
    #[error("⚠️ no {0} variable set")]
    Missing(&'static str),
    #[error("⚠️ invalid {var} variable: {reason}")]
    Invalid{ var: &'static str, reason: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}


/*
    built once at startup then shared behind an Arc,
    nothing in here changes for the process lifetime
*/
#[derive(Clone)]
pub struct FaucetConfig{
    pub host: String,
    pub port: u16,
    pub recaptcha_secret: String,
    pub amount: String,
    pub key: String,
    pub pass: String,
    pub nodes: HashMap<String, String>, // chain name -> node rpc endpoint
    pub denom: String,
    pub chain_client: CommandLine, // program plus wrapper args
    pub settle_delay: Duration,
    pub chain_client_timeout: Duration,
    pub captcha_timeout: Duration,
    pub or_precedence: OrPrecedence,
    pub db: DbConfig,
}

impl std::fmt::Debug for FaucetConfig{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result{
        f.debug_struct("FaucetConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("amount", &self.amount)
            .field("key", &self.key)
            .field("nodes", &self.nodes)
            .field("denom", &self.denom)
            .field("chain_client", &self.chain_client)
            .field("or_precedence", &self.or_precedence)
            .finish_non_exhaustive()
    }
}

impl FaucetConfig{

    /// Loads `.env.local` then `.env` (first one wins) and reads the process env.
    pub fn from_env() -> Result<Self, ConfigError>{
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>{

        let required = |var: &'static str| lookup(var).ok_or(ConfigError::Missing(var));
        let or_default = |var: &'static str, default: &str| lookup(var).unwrap_or(default.to_string());
        let millis = |var: &'static str, default: Duration| -> Result<Duration, ConfigError>{
            match lookup(var){
                Some(value) => value.parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| ConfigError::Invalid{ var, reason: e.to_string() }),
                None => Ok(default),
            }
        };
        let secs = |var: &'static str, default: Duration| -> Result<Duration, ConfigError>{
            match lookup(var){
                Some(value) => value.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| ConfigError::Invalid{ var, reason: e.to_string() }),
                None => Ok(default),
            }
        };

        let nodes = serde_json::from_str::<HashMap<String, String>>(&required("FAUCET_NODE")?)
            .map_err(|e| ConfigError::Invalid{ var: "FAUCET_NODE", reason: e.to_string() })?;

        let port = or_default("FAUCET_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::Invalid{ var: "FAUCET_PORT", reason: e.to_string() })?;

        let or_precedence = match or_default("LEDGER_LEGACY_OR_PRECEDENCE", "false").as_str(){
            "true" | "1" => OrPrecedence::LastWins,
            "false" | "0" => OrPrecedence::Conjunctive,
            other => return Err(ConfigError::Invalid{
                var: "LEDGER_LEGACY_OR_PRECEDENCE",
                reason: format!("expected true or false, got {}", other),
            }),
        };

        let chain_client = CommandLine::parse(&or_default("FAUCET_CHAIN_CLIENT", DEFAULT_CHAIN_CLIENT))
            .ok_or(ConfigError::Invalid{ var: "FAUCET_CHAIN_CLIENT", reason: "empty command".to_string() })?;

        let engine = or_default("DB_ENGINE", "mongodb").parse::<Engine>()?;

        Ok(
            Self{
                host: or_default("HOST", "0.0.0.0"),
                port,
                recaptcha_secret: required("FAUCET_RECAPTCHA_SECRET_KEY")?,
                amount: required("FAUCET_AMOUNT_FAUCET")?,
                key: required("FAUCET_KEY")?,
                pass: required("FAUCET_PASS")?,
                nodes,
                denom: or_default("FAUCET_DENOM", DEFAULT_DENOM),
                chain_client,
                settle_delay: millis("FAUCET_SETTLE_DELAY_MS", DEFAULT_SETTLE_DELAY)?,
                chain_client_timeout: secs("CHAIN_CLIENT_TIMEOUT_SECS", DEFAULT_CHAIN_CLIENT_TIMEOUT)?,
                captcha_timeout: secs("CAPTCHA_TIMEOUT_SECS", DEFAULT_CAPTCHA_TIMEOUT)?,
                or_precedence,
                db: DbConfig{
                    engine,
                    name: or_default("DB_NAME", "faucet"),
                    host: or_default("DB_HOST", "localhost"),
                    port: or_default("DB_PORT", "27017"),
                    username: or_default("DB_USERNAME", ""),
                    password: or_default("DB_PASSWORD", ""),
                    environment: or_default("ENVIRONMENT", "dev"),
                },
            }
        )
    }

    /// Node endpoint of a chain, empty endpoints count as unknown.
    pub fn node(&self, chain: &str) -> Option<&str>{
        self.nodes
            .get(chain)
            .map(String::as_str)
            .filter(|node| !node.is_empty())
    }
}
