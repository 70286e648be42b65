//! API Module
//!
//! Diagnostics HTTP handlers and routing over the named caches.
//!
//! # Endpoints
//! - `GET /stats` - Statistics of every named cache
//! - `GET /stats/:name` - Statistics of one cache
//! - `POST /caches/:name/clear` - Empty one cache
//! - `POST /caches/:name/purge` - Remove expired entries of one cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
