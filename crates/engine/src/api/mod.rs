//! API layer - HTTP entry points.

pub mod auth;
pub mod http;


pub use auth::{Auth, AuthenticatedUser};
pub use http::{routes, ApiError};
