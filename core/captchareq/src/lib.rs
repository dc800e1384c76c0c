


use std::time::Duration;
use async_trait::async_trait;
use log::{error, info};
use serde::{Deserialize, Serialize};


pub const RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";


#[derive(thiserror::Error, Debug)]
pub enum CaptchaError{
    #[error("[CAPTCHA] - verification request timed out")]
    Timeout,
    #[error("[CAPTCHA] - failed to send verification request: {0}")]
    Reqwest(#[from] reqwest::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SiteVerifyResponse{
    pub success: bool,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}


#[async_trait]
pub trait CaptchaVerifier: Send + Sync{
    async fn verify(&self, client_ip: &str, token: &str) -> Result<bool, CaptchaError>;
}


#[derive(Clone)]
pub struct ReCaptcha{
    secret: String,
    verify_url: String,
    client: reqwest::Client,
}

impl ReCaptcha{

    pub fn new(secret: impl Into<String>, timeout: Duration) -> Result<Self, CaptchaError>{
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(
            Self{
                secret: secret.into(),
                verify_url: RECAPTCHA_VERIFY_URL.to_string(),
                client,
            }
        )
    }

    pub fn with_verify_url(mut self, url: impl Into<String>) -> Self{
        self.verify_url = url.into();
        self
    }
}

#[async_trait]
impl CaptchaVerifier for ReCaptcha{

    async fn verify(&self, client_ip: &str, token: &str) -> Result<bool, CaptchaError>{

        let mut form = vec![
            ("secret", self.secret.as_str()),
            ("response", token),
        ];
        if !client_ip.is_empty(){
            form.push(("remoteip", client_ip));
        }

        let sent = self.client
            .post(self.verify_url.as_str())
            .form(&form)
            .send()
            .await;

        let res = match sent{
            Ok(res) => res,
            Err(e) if e.is_timeout() => return Err(CaptchaError::Timeout),
            Err(e) => return Err(CaptchaError::Reqwest(e)),
        };

        let verdict = res
            .json::<SiteVerifyResponse>()
            .await
            .map_err(|e| if e.is_timeout(){ CaptchaError::Timeout } else{ CaptchaError::Reqwest(e) })?;

        if verdict.success{
            info!("➔ 🤖 captcha passed for {}", client_ip);
        } else{
            error!("😕 captcha rejected for {} - {:?}", client_ip, verdict.error_codes);
        }

        Ok(verdict.success)
    }
}
