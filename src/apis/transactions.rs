


use actix_web::{get, post, web};
use actix_web::http::StatusCode;
use log::{error, info};
use crate::constants::*;
use crate::models::transactions::{TransactionFilter, TransferDetails, TransferRecord};
use crate::resp;
use crate::server::AppState;



/*
   -------------------------------------------------------------------------
    relayers post the two legs of a transfer once both are settled, the
    body is read as raw bytes so a malformed one gets our own 422 answer
    instead of the default json extractor error
*/
#[post("/transactions")]
pub(self) async fn add_transaction(
        body: web::Bytes,
        app_state: web::Data<AppState>,
    ) -> FaucetHttpResponse {

    let details = match serde_json::from_slice::<TransferDetails>(&body){
        Ok(details) => details,
        Err(e) => {

            error!("😕 can't decode transfer details - {}", e);
            resp!{
                (), // the data type
                None, // response data
                TX_BODY_ISSUE, // response message
                Some(e.to_string()), // error
                StatusCode::UNPROCESSABLE_ENTITY, // status code
            }
        }
    };

    match app_state.ledger.insert(details).await{
        Ok(id) => {

            info!("➔ 📝 transfer {} added to the ledger", id);
            resp!{
                String,
                Some(id),
                TX_ADDED,
                None,
                StatusCode::CREATED,
            }
        },
        Err(e) => {

            error!("😕 can't store transfer - {}", e);
            resp!{
                (),
                None,
                TX_INSERT_ISSUE,
                Some(e.to_string()),
                StatusCode::BAD_REQUEST,
            }
        }
    }

}


/*
   -------------------------------------------------------------------------
    from, to, address and txhash are all optional, no filter at all
    returns the whole ledger in insertion order
*/
#[get("/transactions")]
pub(self) async fn get_transactions(
        filter: web::Query<TransactionFilter>,
        app_state: web::Data<AppState>,
    ) -> FaucetHttpResponse {

    match app_state.ledger.query(&filter).await{
        Ok(records) => {

            resp!{
                Vec<TransferRecord>,
                Some(records),
                FETCHED,
                None,
                StatusCode::OK,
            }
        },
        Err(e) => {

            error!("😕 can't query transfers with {:?} - {}", filter.0, e);
            resp!{
                (),
                None,
                TX_FETCH_ISSUE,
                Some(e.to_string()),
                StatusCode::BAD_REQUEST,
            }
        }
    }

}


pub mod exports{
    pub use super::add_transaction;
    pub use super::get_transactions;
}


#[cfg(test)]
mod tests{

    use std::sync::Arc;
    use actix_web::{test, web::Data, App};
    use serde_json::{json, Value};
    use crate::claim::ClaimOrchestrator;
    use crate::claim::tests::{config, StubCaptcha, StubChain};
    use crate::models::transactions::{MemoryLedger, OrPrecedence};
    use crate::server::AppState;
    use crate::services;

    fn state(precedence: OrPrecedence) -> AppState{
        AppState{
            orchestrator: Arc::new(ClaimOrchestrator::new(
                Arc::new(config()),
                Arc::new(StubCaptcha::new(true)),
                Arc::new(StubChain::with_balance(None)),
            )),
            ledger: Arc::new(MemoryLedger::new(precedence)),
        }
    }

    fn transfer(from: &str, to: &str, txhash: &str) -> Value{
        json!({
            "type": "ibc",
            "from": from,
            "to": to,
            "amount": "100",
            "denom": "x3ngm",
            "channel1": "channel-0",
            "channel2": "channel-1",
            "client1": "07-tendermint-0",
            "client2": "07-tendermint-1",
            "connection1": "connection-0",
            "connection2": "connection-1",
            "fromChain": "testnet",
            "fromNode": "tcp://localhost:26657",
            "toChain": "othernet",
            "toNode": "tcp://localhost:36657",
            "transfer": {
                "success": true,
                "message": "",
                "txHash": txhash,
                "height": 42,
                "timestamp": "2020-05-01T10:00:00Z"
            },
            "receive": {
                "success": true,
                "message": "",
                "txHash": format!("{}-recv", txhash),
                "height": "43"
            }
        })
    }

    #[actix_web::test]
    async fn posted_transfers_are_queryable(){
        let app = test::init_service(
            App::new()
                .app_data(Data::new(state(OrPrecedence::Conjunctive)))
                .configure(services::init_faucet)
        ).await;

        let mut ids = vec![];
        for (from, to, txhash) in [("abc123", "zzz", "H1"), ("qqq", "abc123", "H2"), ("qqq", "rrr", "H3")]{
            let req = test::TestRequest::post()
                .uri("/transactions")
                .set_json(transfer(from, to, txhash))
                .to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status().as_u16(), 201);
            let body: Value = test::read_body_json(res).await;
            assert_eq!(body["status"], true);
            assert_eq!(body["message"], "Transaction details added successfully");
            ids.push(body["data"].as_str().unwrap().to_string());
        }

        let req = test::TestRequest::get().uri("/transactions?address=abc123").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], "request processed successfully");
        let records = body["data"].as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], ids[0].as_str());
        assert_eq!(records[1]["id"], ids[1].as_str());
        assert_eq!(records[0]["fromChain"], "testnet");
        assert_eq!(records[1]["receive"]["height"], 43);

        let req = test::TestRequest::get().uri("/transactions?from=abc123&to=zzz").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get().uri("/transactions?txhash=H2-recv").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let records = body["data"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], ids[1].as_str());

        let req = test::TestRequest::get().uri("/transactions").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let req = test::TestRequest::get().uri("/transactions?from=nobody").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], true);
        assert_eq!(body["data"], json!([]));
    }

    #[actix_web::test]
    async fn address_and_txhash_precedence(){
        for (precedence, expected) in [(OrPrecedence::Conjunctive, 0), (OrPrecedence::LastWins, 1)]{
            let app = test::init_service(
                App::new()
                    .app_data(Data::new(state(precedence)))
                    .configure(services::init_faucet)
            ).await;
            for (from, to, txhash) in [("abc123", "zzz", "H1"), ("qqq", "rrr", "H2")]{
                let req = test::TestRequest::post()
                    .uri("/transactions")
                    .set_json(transfer(from, to, txhash))
                    .to_request();
                assert_eq!(test::call_service(&app, req).await.status().as_u16(), 201);
            }
            let req = test::TestRequest::get().uri("/transactions?address=abc123&txhash=H2").to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["data"].as_array().unwrap().len(), expected, "{:?}", precedence);
        }
    }

    #[actix_web::test]
    async fn unknown_txhash_is_an_empty_result(){
        let app = test::init_service(
            App::new()
                .app_data(Data::new(state(OrPrecedence::Conjunctive)))
                .configure(services::init_faucet)
        ).await;

        let body = json!({"from": "addrA", "to": "addrB", "transfer": {"txHash": "abc123"}, "receive": {"txHash": ""}});
        let req = test::TestRequest::post().uri("/transactions").set_json(body).to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 201);

        let mut answers = vec![];
        for _ in 0..2{
            let req = test::TestRequest::get().uri("/transactions?txhash=abc123").to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status().as_u16(), 200);
            let body: Value = test::read_body_json(res).await;
            answers.push(body);
        }
        let records = answers[0]["data"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["from"], "addrA");
        assert_eq!(records[0]["transfer"]["txHash"], "abc123");
        assert_eq!(answers[0], answers[1]);

        let req = test::TestRequest::get().uri("/transactions?txhash=zzz").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 200);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"], json!([]));
    }

    #[actix_web::test]
    async fn malformed_body_is_unprocessable(){
        let app = test::init_service(
            App::new()
                .app_data(Data::new(state(OrPrecedence::Conjunctive)))
                .configure(services::init_faucet)
        ).await;

        let req = test::TestRequest::post()
            .uri("/transactions")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"from\": ")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status().as_u16(), 422);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], false);
        assert_eq!(body["message"], "Error while reading req body");

        let req = test::TestRequest::get().uri("/transactions").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], json!([]));
    }
}
