//! scrawl-server: users/posts REST API with hypermedia envelopes
//!
//! Request flow: router -> validated input -> repository -> rows ->
//! envelope construction -> JSON response.

pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use http::server::{serve, ServerConfig, ServerError};
pub use state::AppState;
