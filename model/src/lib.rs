//! API model representations.

pub mod error;
pub mod item;
pub mod request;
pub mod response;
pub mod user;

pub use error::ApiError;
pub use item::{Item, ItemKind};
pub use user::User;
