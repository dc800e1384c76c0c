


use serde::Serialize;


/*
    every api answers with this shape, status is true
    only for 2xx codes, empty message and none data or
    error are left out of the json
*/
#[derive(Serialize, Debug)]
pub struct Response<'m, T>{
    pub status: bool,
    #[serde(skip_serializing_if = "is_empty")]
    pub message: &'m str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn is_empty(message: &&str) -> bool{
    message.is_empty()
}


#[macro_export]
macro_rules! resp {
    (
        $data_type:ty,
        $data:expr,
        $msg:expr,
        $error:expr,
        $code:expr,
    ) => {

        {
            use actix_web::HttpResponse;
            use $crate::misc::Response;

            let code = $code;
            let response_data = Response::<$data_type>{
                status: code.is_success(),
                message: $msg,
                data: $data,
                error: $error,
            };

            return Ok(HttpResponse::build(code).json(response_data));
        }
    }
}
