


use std::time::Duration;

pub const APP_NAME: &str = "Faucet";
pub type FaucetHttpResponse = Result<actix_web::HttpResponse, actix_web::Error>;

/* cosmos bech32 account addresses the faucet serves are fixed length */
pub const ADDRESS_LENGTH: usize = 45;
pub const DEFAULT_DENOM: &str = "x3ngm";
pub const DEFAULT_CHAIN_CLIENT: &str = "gaiacli";
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_CHAIN_CLIENT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CAPTCHA_TIMEOUT: Duration = Duration::from_secs(10);
pub const TRANSACTIONS_COLLECTION: &str = "transactions";


pub static CHAIN_NOT_AVAILABLE: &str = "chain info not available, please try another chain";
pub static INVALID_ADDRESS: &str = "Invalid address";
pub static INVALID_CAPTCHA: &str = "Invalid captcha";
pub static ENOUGH_TOKENS: &str = "You have enough tokens in your account";
pub static CHAIN_CLIENT_FAILED: &str = "Chain Client Failed, Try Again Later";
pub static UPSTREAM_TIMEOUT: &str = "Upstream Service Timed Out, Try Again Later";
pub static TX_ADDED: &str = "Transaction details added successfully";
pub static TX_BODY_ISSUE: &str = "Error while reading req body";
pub static TX_INSERT_ISSUE: &str = "Error while inserting data into DB";
pub static TX_FETCH_ISSUE: &str = "Error while fetching transaction details";
pub static FETCHED: &str = "request processed successfully";
pub static IAM_HEALTHY: &str = "Ok";
