


use actix_web::web;
use crate::apis;


/*
     --------------------------------
    |      REGISTER FAUCET ROUTES
    | -------------------------------
    |
    |

*/
pub fn init_faucet(config: &mut web::ServiceConfig){

    config.service(apis::claim::exports::claim);
    config.service(apis::transactions::exports::add_transaction);
    config.service(apis::transactions::exports::get_transactions);

}

/*
     --------------------------------
    |      REGISTER HEALTH ROUTES
    | -------------------------------
    |
    |

*/
pub fn init_health(config: &mut web::ServiceConfig){

    config.service(apis::health::exports::index);

}
