pub mod auth;
pub mod payload;

pub use auth::CurrentUser;
pub use payload::Payload;
