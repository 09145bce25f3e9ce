//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod like_repo;
pub mod match_repo;
pub mod session_repo;
pub mod user_repo;

pub use like_repo::LikeRepo;
pub use match_repo::MatchRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
