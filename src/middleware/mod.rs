pub mod auth;

pub use auth::RoleAuth;
