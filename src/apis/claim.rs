


use std::net::SocketAddr;
use actix_web::{get, web, HttpRequest};
use actix_web::http::StatusCode;
use log::error;
use crate::claim::ClaimRequest;
use crate::constants::FaucetHttpResponse;
use crate::resp;
use crate::server::AppState;


/* X-Forwarded-For or Forwarded first then the peer, without the port */
fn client_ip(req: &HttpRequest) -> String{
    let info = req.connection_info();
    let ip = info.realip_remote_addr().unwrap_or_default();
    match ip.parse::<SocketAddr>(){
        Ok(addr) => addr.ip().to_string(),
        Err(_) => ip.to_string(),
    }
}


#[get("/claim")]
pub(self) async fn claim(
        req: HttpRequest,
        query: web::Query<ClaimRequest>,
        app_state: web::Data<AppState>,
    ) -> FaucetHttpResponse {

    let client_ip = client_ip(&req);

    match app_state.orchestrator.claim(&query, &client_ip).await{
        Ok(granted) => {

            resp!{
                String, // the data type
                Some(granted.address), // response data
                "", // response message
                None, // error
                StatusCode::OK, // status code
            }
        },
        Err(e) => {

            error!("😕 claim for {} on {} rejected - {}", query.address, query.chain, e);
            resp!{
                (),
                None,
                e.message(),
                e.detail(),
                e.status_code(),
            }
        }
    }

}


pub mod exports{
    pub use super::claim;
}
