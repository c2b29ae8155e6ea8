use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::user::{LoginRequest, LoginView};
use crate::utils::nav::see_other;
use crate::utils::validation::validate_payload;

#[derive(Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

pub async fn login_view(query: web::Query<NoticeQuery>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(LoginView {
        view: "login",
        notice: query.into_inner().notice,
    }))
}

pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&req.0)?;
    state.session.login(&req.0.username)?;
    Ok(see_other("/"))
}

pub async fn logout(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.session.logout()?;
    Ok(see_other("/login"))
}
