pub mod auth;
pub mod tenant;

pub use auth::{auth_middleware, CurrentUser};
pub use tenant::tenant_middleware;
