//! HTTP API module for the labor engine.
//!
//! This module exposes each calculator as a JSON endpoint and lets users
//! save, list and delete calculation results.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{LeaveRequest, ListCalculationsQuery, MinimumWageRequest, SeveranceRequest};
pub use response::{ApiError, ApiErrorResponse, MinimumWageRateResponse, SeveranceResponse};
pub use state::AppState;
