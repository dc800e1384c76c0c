



use std::sync::Arc;
use crate::claim::ClaimOrchestrator;
use crate::models::transactions::TransferLedger;


/*
    shared between actix worker threads through web::Data, each
    worker builds its own App but they all point to one orchestrator
    (so one set of signing key locks) and one ledger
*/
#[derive(Clone)]
pub struct AppState{
    pub orchestrator: Arc<ClaimOrchestrator>,
    pub ledger: Arc<dyn TransferLedger>,
}


#[macro_export]
macro_rules! server {
    (
        $host:expr,
        $port:expr,
        $app_state:expr

    ) => {

        {

            use actix_cors::Cors;
            use actix_web::{web, web::Data, App, HttpServer};
            use actix_web::middleware::Logger;
            use log::{error, info};
            use $crate::constants::*;
            use $crate::services;

            let host: String = $host;
            let port: u16 = $port;
            let shared_state = Data::new($app_state);

            info!("➔ 🚀 {} HTTP server has launched from [{}:{}] at {}", APP_NAME, host, port, chrono::Local::now().naive_local());
            match HttpServer::new(move ||{
                    App::new()
                        /*
                            SHARED STATE DATA
                        */
                        .app_data(Data::clone(&shared_state))
                        .wrap(Cors::permissive())
                        .wrap(Logger::new("%a %{User-Agent}i %t %r %s %b %T"))
                        /*
                            INIT FAUCET SERVICE APIs
                        */
                        .configure(services::init_faucet)
                        /*
                            INIT HEALTH SERVICE
                        */
                        .service(
                            web::scope("/health")
                                .configure(services::init_health)
                        )
                })
                .bind((host.as_str(), port)){
                    Ok(server) => server.run().await,
                    Err(e) => {
                        error!("😕 can't bind to [{}:{}] - {}", host, port, e);
                        Err(e)
                    }
                }
        }
    }
}
