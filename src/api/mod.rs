//! API Module
//!
//! HTTP handlers and routing that expose groups over the network.
//!
//! # Endpoints
//! - `GET <base_path>/<group>/<key>` - Fetch a value (raw bytes)
//! - `GET /stats/:group` - Get group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
