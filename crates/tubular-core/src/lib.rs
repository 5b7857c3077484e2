pub mod config;
pub mod logging;

pub mod ami;
pub mod api;
pub mod auth;
pub mod error;
pub mod rest;
pub mod retry;

pub use error::ApiError;
