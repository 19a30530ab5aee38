mod ai;
mod atelier;
mod auth;

pub use ai::AiError;
pub use atelier::{AtelierError, ErrorBody, ResultExt};
pub use auth::AuthError;

pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}
