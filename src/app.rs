


/*
=======================
     FAUCET SERVER
=======================

    GET  /claim                ---> captcha gated token claim for an address on a chain
    POST /transactions         ---> store the send and receive legs of a transfer
    GET  /transactions         ---> query stored transfers by from, to, address or txhash
    GET  /health/check-server  ---> liveness

    the claim flow spawns the configured chain cli, once to read the
    account balance and once to sign the transfer with the faucet key
*/



use std::io;
use std::sync::Arc;
use env_logger::Env;
use log::{error, info};
use captchareq::ReCaptcha;
use chainreq::{CliChainClient, ProcessAdapter, Readiness};
use s3req::Storage;
use crate::claim::ClaimOrchestrator;
use crate::config::FaucetConfig;
use crate::server::AppState;


mod apis;
mod claim;
mod config;
mod constants;
mod error;
mod misc;
mod models;
mod server;
mod services;


fn startup_error(stage: &str, e: impl std::fmt::Display) -> io::Error{
    error!("😕 {} failed at startup - {}", stage, e);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", stage, e))
}


#[actix_web::main]
async fn main() -> io::Result<()> {

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Arc::new(FaucetConfig::from_env().map_err(|e| startup_error("config", e))?);
    info!("➔ 🎛️ loaded {:?}", config);

    let mut app_storage = Storage::connect(&config.db)
        .await
        .map_err(|e| startup_error("storage", e))?;
    let ledger = models::transactions::from_storage(&app_storage, config.or_precedence)
        .map_err(|e| startup_error("ledger", e))?;

    let captcha = ReCaptcha::new(config.recaptcha_secret.clone(), config.captcha_timeout)
        .map_err(|e| startup_error("captcha client", e))?;
    let adapter = ProcessAdapter::new(
        Readiness::FixedDelay(config.settle_delay),
        config.chain_client_timeout,
    );
    let chain = CliChainClient::new(config.chain_client.clone(), adapter);

    let app_state = AppState{
        orchestrator: Arc::new(ClaimOrchestrator::new(config.clone(), Arc::new(captcha), Arc::new(chain))),
        ledger,
    };

    let served = server!{
        config.host.clone(),
        config.port,
        app_state
    };

    app_storage.switch_off();
    info!("➔ 🛑 {} stopped", constants::APP_NAME);

    served

}
