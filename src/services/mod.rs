pub mod admin_service;
pub mod auth_service;
pub mod booking_service;
pub mod influencer_service;
pub mod stats_service;
pub mod user_service;

pub use auth_service::{AuthKeys, Claims, Role};
