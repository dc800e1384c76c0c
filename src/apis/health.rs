


use actix_web::{get, web};
use actix_web::http::StatusCode;
use crate::constants::*;
use crate::resp;
use crate::server::AppState;


#[get("/check-server")]
pub(self) async fn index(_app_state: web::Data<AppState>) -> FaucetHttpResponse {

    resp!{
        (), // the data type
        None, // response data
        IAM_HEALTHY, // response message
        None, // error
        StatusCode::OK, // status code
    }

}


pub mod exports{
    pub use super::index;
}
