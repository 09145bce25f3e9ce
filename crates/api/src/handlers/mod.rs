pub mod auth;
pub mod likes;
pub mod matches;
pub mod user_sessions;
pub mod users;
