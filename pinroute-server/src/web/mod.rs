//! Web layer for the pin routing tool.
//!
//! JSON endpoints for resolving locations, comparing routes across travel
//! modes, routing through the stored pins, and managing pins and history.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
