


/*
     ------------------------------
    |       CLAIM ORCHESTRATOR
    | -----------------------------
    |
    |   validate ➔ captcha ➔ balance gate ➔ disburse ➔ granted
    |
    |   each step runs after the previous one finished and nothing
    |   is retried, the gate and the disbursement run while holding
    |   the lock of the signing key so two claims can't both pass
    |   the gate before the first transfer went out
    |
*/


use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use captchareq::CaptchaVerifier;
use chainreq::{BalanceGate, ChainClient, TransferParams, TxReceipt};
use log::{error, info};
use serde::Deserialize;
use crate::config::FaucetConfig;
use crate::constants::*;
use crate::error::FaucetError;


#[derive(Deserialize, Clone, Debug, Default)]
pub struct ClaimRequest{
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub response: String, // captcha token
    #[serde(default)]
    pub chain: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Granted{
    pub address: String,
    pub receipt: TxReceipt,
}


/* one async mutex per signing key, handed out on demand */
#[derive(Default)]
pub struct KeyLocks{
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyLocks{

    pub fn get(&self, key: &str) -> Arc<tokio::sync::Mutex<()>>{
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(key.to_string()).or_default().clone()
    }
}


pub struct ClaimOrchestrator{
    config: Arc<FaucetConfig>,
    captcha: Arc<dyn CaptchaVerifier>,
    chain: Arc<dyn ChainClient>,
    gate: BalanceGate,
    locks: KeyLocks,
}

impl ClaimOrchestrator{

    pub fn new(config: Arc<FaucetConfig>, captcha: Arc<dyn CaptchaVerifier>, chain: Arc<dyn ChainClient>) -> Self{
        let gate = BalanceGate::new(chain.clone(), config.denom.clone());
        Self{
            config,
            captcha,
            chain,
            gate,
            locks: KeyLocks::default(),
        }
    }

    pub async fn claim(&self, request: &ClaimRequest, client_ip: &str) -> Result<Granted, FaucetError>{

        /* -=-=-=-=-=-=-=-=-=-=-= 1. SHAPE -=-=-=-=-=-=-=-=-=-=-= */
        let Some(node) = self.config.node(&request.chain) else{
            return Err(FaucetError::BadRequest(CHAIN_NOT_AVAILABLE.to_string()));
        };
        if request.address.chars().count() != ADDRESS_LENGTH{
            return Err(FaucetError::BadRequest(INVALID_ADDRESS.to_string()));
        }

        /* -=-=-=-=-=-=-=-=-=-=-= 2. CAPTCHA -=-=-=-=-=-=-=-=-=-=-= */
        let passed = self.captcha.verify(client_ip, &request.response).await?;
        if !passed{
            return Err(FaucetError::CaptchaFailed(None));
        }

        let key_lock = self.locks.get(&self.config.key);
        let _guard = key_lock.lock().await;

        /* -=-=-=-=-=-=-=-=-=-=-= 3. BALANCE -=-=-=-=-=-=-=-=-=-=-= */
        self.gate.decide(&request.address, node, &request.chain).await?;

        /* -=-=-=-=-=-=-=-=-=-=-= 4. DISBURSE -=-=-=-=-=-=-=-=-=-=-= */
        let params = TransferParams{
            key: self.config.key.clone(),
            recipient: request.address.clone(),
            amount: self.config.amount.clone(),
            chain_id: request.chain.clone(),
            node: node.to_string(),
            passphrase: self.config.pass.clone(),
        };
        info!(
            "➔ 💸 sending {} to {} on {} at {}",
            params.amount, params.recipient, params.chain_id, chrono::Local::now().naive_local()
        );
        let receipt = self.chain.submit_transfer(&params).await.map_err(|e| {
            error!("😕 disbursement to {} failed - {}", request.address, e);
            FaucetError::from(e)
        })?;

        /* -=-=-=-=-=-=-=-=-=-=-= 5. GRANTED -=-=-=-=-=-=-=-=-=-=-= */
        info!("➔ ✅ sent to {} with tx hash {:?}", request.address, receipt.tx_hash);
        Ok(
            Granted{
                address: request.address.clone(),
                receipt,
            }
        )
    }
}
