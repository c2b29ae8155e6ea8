use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::user::HomeView;

pub async fn home(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let username = state.session.require()?;
    Ok(HttpResponse::Ok().json(HomeView::new(username)))
}
