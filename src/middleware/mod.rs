//! Request middleware: cross-cutting concerns layered onto the router (§6).

mod rate_limit;

pub use rate_limit::rate_limit_middleware;
