pub mod consultation;
pub mod influencer;
pub mod slots;
pub mod user;

pub use consultation::*;
pub use influencer::*;
pub use slots::*;
pub use user::*;
