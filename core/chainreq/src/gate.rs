


use std::num::IntErrorKind;
use std::sync::Arc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use crate::{ChainClient, ChainError};


/// Balances at or above this many minor units can't claim again.
pub const BALANCE_THRESHOLD: i64 = 1000;


#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Coin{
    pub denom: String,
    pub amount: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountSnapshot{
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub coins: Option<Vec<Coin>>, // null for fresh accounts on some cli versions
}

/*
    older clis wrap the account inside an amino envelope
    like {"type": "cosmos-sdk/Account", "value": {...}}
    newer ones print the account directly
*/
#[derive(Deserialize)]
#[serde(untagged)]
enum AccountQueryRes{
    Wrapped{ value: AccountSnapshot },
    Bare(AccountSnapshot),
}

impl AccountSnapshot{

    pub fn parse(raw: &[u8]) -> Result<Self, serde_json::Error>{
        let res = serde_json::from_slice::<AccountQueryRes>(raw)?;
        Ok(
            match res{
                AccountQueryRes::Wrapped{ value } => value,
                AccountQueryRes::Bare(snapshot) => snapshot,
            }
        )
    }

    pub fn coin(&self, denom: &str) -> Option<&Coin>{
        self.coins.as_ref()?.iter().find(|coin| coin.denom == denom)
    }
}


#[derive(thiserror::Error, Debug)]
pub enum GateError{
    #[error("You have enough tokens in your account")]
    AlreadyFunded{ balance: i64 },
    #[error("invalid amount `{amount}` for {denom}")]
    InvalidAmount{
        denom: String,
        amount: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error(transparent)]
    Chain(#[from] ChainError),
}


#[derive(Clone)]
pub struct BalanceGate{
    pub client: Arc<dyn ChainClient>,
    pub denom: String,
    pub threshold: i64,
}

impl BalanceGate{

    pub fn new(client: Arc<dyn ChainClient>, denom: impl Into<String>) -> Self{
        Self{
            client,
            denom: denom.into(),
            threshold: BALANCE_THRESHOLD,
        }
    }

    /// `Ok(())` means the address may receive funds.
    pub async fn decide(&self, address: &str, node: &str, chain_id: &str) -> Result<(), GateError>{

        let Some(raw) = self.client.query_account(address, chain_id, node).await? else{
            return Ok(()); // account not known to the chain yet
        };

        let snapshot = match AccountSnapshot::parse(&raw){
            Ok(snapshot) => snapshot,
            Err(e) => {
                /* unreadable output is treated as zero balance */
                info!("can't decode account query output for {}: {}", address, e);
                return Ok(());
            }
        };

        self.check(&snapshot)
    }

    pub fn check(&self, snapshot: &AccountSnapshot) -> Result<(), GateError>{

        let Some(coin) = snapshot.coin(&self.denom) else{
            return Ok(());
        };

        /* amounts are arbitrary precision on chain, anything past i64 saturates */
        let balance = match coin.amount.trim().parse::<i64>(){
            Ok(balance) => balance,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
            Err(e) => return Err(GateError::InvalidAmount{
                denom: coin.denom.clone(),
                amount: coin.amount.clone(),
                source: e,
            }),
        };
        debug!("balance of {} is {}{}", snapshot.address, balance, self.denom);

        if balance < self.threshold{
            Ok(())
        } else{
            Err(GateError::AlreadyFunded{ balance })
        }
    }
}
