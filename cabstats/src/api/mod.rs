//! HTTP front-end
//!
//! - `GET /` redirects to `/static/`
//! - `GET /static/*` serves the front-end assets
//! - `GET /all` runs a time-windowed aggregation
//! - `GET /health`, `GET /metrics`

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::CalendarData;
pub use server::{ApiServer, AppState};
