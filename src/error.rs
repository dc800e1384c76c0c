


/*
   -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=
        FAUCET CUSTOM ERROR HANDLER
   -=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=-=

   every claim failure ends up in one of the
   FaucetError variants, each variant knows its http code
   and the message the caller gets back
*/


use actix_web::http::StatusCode;
use captchareq::CaptchaError;
use chainreq::{ChainError, GateError};
use crate::constants::*;


#[derive(thiserror::Error, Debug)]
pub enum FaucetError{
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid captcha")]
    CaptchaFailed(Option<String>), // transport error text, if any
    #[error("You have enough tokens in your account")]
    AlreadyFunded(String),
    #[error("[UPSTREAM] - {0}")]
    UpstreamProcess(String),
    #[error("[UPSTREAM] - {0} timed out")]
    Timeout(&'static str),
}

impl FaucetError{

    pub fn status_code(&self) -> StatusCode{
        match self{
            FaucetError::BadRequest(_)
            | FaucetError::CaptchaFailed(_)
            | FaucetError::AlreadyFunded(_) => StatusCode::BAD_REQUEST,
            FaucetError::UpstreamProcess(_)
            | FaucetError::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message field of the response body.
    pub fn message(&self) -> &str{
        match self{
            FaucetError::BadRequest(msg) => msg.as_str(),
            FaucetError::CaptchaFailed(_) => INVALID_CAPTCHA,
            FaucetError::AlreadyFunded(_) => ENOUGH_TOKENS,
            FaucetError::UpstreamProcess(_) => CHAIN_CLIENT_FAILED,
            FaucetError::Timeout(_) => UPSTREAM_TIMEOUT,
        }
    }

    /// The optional error field of the response body.
    pub fn detail(&self) -> Option<String>{
        match self{
            FaucetError::BadRequest(_) => None,
            FaucetError::CaptchaFailed(detail) => detail.clone(),
            FaucetError::AlreadyFunded(detail) => Some(detail.clone()),
            _ => Some(self.to_string()),
        }
    }
}

impl From<CaptchaError> for FaucetError{
    fn from(error: CaptchaError) -> Self{
        match error{
            CaptchaError::Timeout => FaucetError::Timeout("captcha verification"),
            e => FaucetError::CaptchaFailed(Some(e.to_string())),
        }
    }
}

impl From<ChainError> for FaucetError{
    fn from(error: ChainError) -> Self{
        match error{
            ChainError::Timeout(_) => FaucetError::Timeout("chain client"),
            e => FaucetError::UpstreamProcess(e.to_string()),
        }
    }
}

impl From<GateError> for FaucetError{
    fn from(error: GateError) -> Self{
        match error{
            GateError::AlreadyFunded{ balance } => FaucetError::AlreadyFunded(format!("current balance is {}", balance)),
            GateError::Chain(e) => e.into(),
            e @ GateError::InvalidAmount{ .. } => FaucetError::UpstreamProcess(e.to_string()),
        }
    }
}
