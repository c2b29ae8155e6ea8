pub mod employee;
pub mod session;
