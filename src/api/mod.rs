pub mod discover;
pub mod error;
pub mod favorites;
pub mod movies;
pub mod session;
pub mod types;

pub use discover::*;
pub use error::{ApiError, ApiResult};
pub use favorites::*;
pub use movies::*;
pub use session::{DiscoverSession, SessionStore};
pub use types::*;
