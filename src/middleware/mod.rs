// Middleware modules for PhishGuard Backend

pub mod cors;

pub use cors::{allowed_origin, cors_middleware};
