pub mod auth;
pub mod extract;
pub mod response;

pub use auth::require_principal;
pub use extract::{ApiJson, ApiQuery};
pub use response::{ApiResponse, ApiResult};
