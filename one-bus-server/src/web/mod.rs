//! Web layer for nearest-stop arrivals.
//!
//! Provides the flat and grouped arrival boards as HTML pages or JSON.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
