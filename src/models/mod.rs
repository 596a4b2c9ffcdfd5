//! Data models exchanged with the employee backend.

pub mod employee;

pub use employee::{Employee, EmployeePage};
