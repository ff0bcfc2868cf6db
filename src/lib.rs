// Library exports for restblog
// This allows integration tests and external code to use restblog modules

pub mod config;
pub mod db;
pub mod error;
pub mod failure;
pub mod routes;
pub mod sanitize;
pub mod state;
pub mod store;
