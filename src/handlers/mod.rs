pub mod auth;
pub mod employee;
pub mod home;
pub mod multipart;

use std::sync::Arc;

use actix_web::web;

use crate::config::AppConfig;
use crate::db::SharedSlot;
use crate::store::employee::EmployeeStore;
use crate::store::session::SessionGate;
use crate::utils::clock::Clock;

pub struct AppState {
    pub store: EmployeeStore,
    pub session: SessionGate,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(slot: SharedSlot, clock: Arc<dyn Clock>, config: AppConfig) -> Self {
        AppState {
            store: EmployeeStore::new(slot.clone(), clock),
            session: SessionGate::new(slot),
            config,
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login")
            .route(web::get().to(auth::login_view))
            .route(web::post().to(auth::login)),
    )
    .service(web::resource("/logout").route(web::post().to(auth::logout)))
    .service(web::resource("/").route(web::get().to(home::home)))
    .service(web::resource("/employees").route(web::get().to(employee::list_employees)))
    .service(
        web::resource("/employees/create")
            .route(web::get().to(employee::create_form))
            .route(web::post().to(employee::create_employee)),
    )
    .service(
        web::resource("/employees/edit/{id}")
            .route(web::get().to(employee::edit_form))
            .route(web::post().to(employee::update_employee)),
    );
}
