// Database entities - SeaORM models
pub mod activity_log;
pub mod role;
pub mod user;
pub mod user_role;
