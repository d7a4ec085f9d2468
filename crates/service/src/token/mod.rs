pub mod domain;
pub mod errors;
pub mod service;

pub use domain::SessionClaims;
pub use errors::AuthError;
pub use service::TokenService;
