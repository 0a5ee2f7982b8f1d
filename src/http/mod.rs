//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → handlers.rs::dispatch (route table lookup)
//!     → exchange.rs (Unmatched → Matched → Finalized)
//!     → request.rs (Content-Length, JSON decode)
//!     → handlers.rs (store operation)
//!     → response.rs (encode body, set headers)
//!     → Send to client
//! ```

pub mod error;
pub mod exchange;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use response::{Reply, ResponseBody};
pub use server::{AppState, HttpServer};
