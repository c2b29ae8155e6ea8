use actix_web::http::header;
use actix_web::HttpResponse;
use url::form_urlencoded;

pub const LIST_ROUTE: &str = "/employees";

/// `path?notice=<message>` with the message form-encoded.
pub fn with_notice(path: &str, notice: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(notice.as_bytes()).collect();
    format!("{}?notice={}", path, encoded)
}

pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}
