


/*  > ---------------------------------------------------------------------------
    | every api return type is Result<actix_web::HttpResponse, actix_web::Error>
    | and every body has the misc::Response shape
    |
    |   claim        ---> captcha gated token claim
    |   transactions ---> transfer ledger writes and queries
    |   health       ---> server health
    |
*/
pub mod claim;
pub mod transactions;
pub mod health;
