use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use log::{error, warn};
use serde::Serialize;

use crate::controllers::form::{FormController, FormMode};
use crate::errors::AppError;
use crate::handlers::auth::NoticeQuery;
use crate::handlers::multipart::read_employee_form;
use crate::handlers::AppState;
use crate::models::employee::{Course, Designation, Employee, EmployeeDraft, Gender};
use crate::utils::nav::{see_other, with_notice, LIST_ROUTE};

const NOT_FOUND_NOTICE: &str = "Employee not found";
const CORRUPT_NOTICE: &str = "Stored employee data was corrupt and has been reset";

#[derive(Serialize)]
struct EmployeeListView {
    view: &'static str,
    username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
    total: usize,
    employees: Vec<Employee>,
}

#[derive(Serialize)]
struct FormOptions {
    designations: Vec<&'static str>,
    genders: Vec<&'static str>,
    courses: Vec<&'static str>,
}

impl FormOptions {
    fn all() -> Self {
        FormOptions {
            designations: Designation::ALL.iter().map(|d| d.as_str()).collect(),
            genders: Gender::ALL.iter().map(|g| g.as_str()).collect(),
            courses: Course::ALL.iter().map(|c| c.as_str()).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmployeeFormView<'a> {
    view: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    submit_label: &'static str,
    draft: &'a EmployeeDraft,
    options: FormOptions,
}

fn render_form(form: &FormController) -> HttpResponse {
    let (view, id, submit_label) = match form.mode() {
        FormMode::Create => ("create", None, "Create Employee"),
        FormMode::Edit(id) => ("edit", Some(id), "Update Employee"),
    };
    HttpResponse::Ok().json(EmployeeFormView {
        view,
        id,
        submit_label,
        draft: form.draft(),
        options: FormOptions::all(),
    })
}

/// Turns store-level failures into a notice on the list view.
fn recover(state: &AppState, err: AppError) -> Result<HttpResponse, AppError> {
    match err {
        AppError::NotFound(_) => Ok(see_other(&with_notice(LIST_ROUTE, NOT_FOUND_NOTICE))),
        err if err.is_decode() => {
            error!("{}", err);
            state.store.reset()?;
            Ok(see_other(&with_notice(LIST_ROUTE, CORRUPT_NOTICE)))
        }
        err => Err(err),
    }
}

fn submit(state: &AppState, form: &FormController) -> Result<HttpResponse, AppError> {
    match form.submit(&state.store) {
        Ok(submitted) => Ok(see_other(&with_notice(submitted.redirect, submitted.notice))),
        Err(AppError::Validation(failure)) => {
            warn!("Rejected employee form: {}", failure);
            Err(AppError::Validation(failure))
        }
        Err(err) => recover(state, err),
    }
}

/// Ids that are not numbers can never match a record.
fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

pub async fn list_employees(
    state: web::Data<AppState>,
    query: web::Query<NoticeQuery>,
) -> Result<HttpResponse, AppError> {
    let username = state.session.require()?;
    let mut notice = query.into_inner().notice;

    let employees = match state.store.list() {
        Ok(employees) => employees,
        Err(err) if err.is_decode() => {
            error!("{}", err);
            state.store.reset()?;
            notice = Some(CORRUPT_NOTICE.to_string());
            Vec::new()
        }
        Err(err) => return Err(err),
    };

    Ok(HttpResponse::Ok().json(EmployeeListView {
        view: "employees",
        username,
        notice,
        total: employees.len(),
        employees,
    }))
}

pub async fn create_form(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    state.session.require()?;
    Ok(render_form(&FormController::create()))
}

pub async fn create_employee(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    state.session.require()?;
    let mut form = FormController::create();
    read_employee_form(payload, &mut form, state.config.max_image_bytes).await?;
    submit(&state, &form)
}

pub async fn edit_form(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.session.require()?;
    let Some(id) = parse_id(&id) else {
        return Ok(see_other(&with_notice(LIST_ROUTE, NOT_FOUND_NOTICE)));
    };
    match FormController::edit(&state.store, id) {
        Ok(form) => Ok(render_form(&form)),
        Err(err) => recover(&state, err),
    }
}

pub async fn update_employee(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    state.session.require()?;
    let Some(id) = parse_id(&id) else {
        return Ok(see_other(&with_notice(LIST_ROUTE, NOT_FOUND_NOTICE)));
    };
    let mut form = match FormController::edit(&state.store, id) {
        Ok(form) => form,
        Err(err) => return recover(&state, err),
    };
    read_employee_form(payload, &mut form, state.config.max_image_bytes).await?;
    submit(&state, &form)
}
