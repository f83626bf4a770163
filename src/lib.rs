pub mod api;
pub mod breaks;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod notice;
pub mod roster;

pub use error::{AppError, Result};
