//! Employee management service: a login-gated record store for employee
//! entries, persisted as JSON in a single key-value file.

pub mod config;
pub mod controllers;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod store;
pub mod utils;
