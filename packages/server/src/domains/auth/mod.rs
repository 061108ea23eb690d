//! Auth domain - caller tokens for callable endpoints
//!
//! Tokens are HS256 JWTs whose `sub` is the caller's uid and whose `admin`
//! claim gates admin-only callables.

pub mod jwt;

pub use jwt::{Claims, JwtService};
