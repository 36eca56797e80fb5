//! Request/response data transfer objects

pub mod auth;
pub mod bills;
pub mod health;
