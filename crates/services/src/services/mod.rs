pub mod archive;
pub mod auth;
pub mod billing;
pub mod config;
pub mod fixtures;
pub mod payroll;
pub mod permissions;
pub mod sync;
