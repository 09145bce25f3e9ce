//! Row models and DTOs, one module per table.

pub mod like;
pub mod matches;
pub mod session;
pub mod user;
