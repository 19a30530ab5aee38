//! Session cookies, the capability policy and password hashing.

pub mod password;
pub mod policy;
pub mod session;

pub use password::{
    MIN_PASSWORD_CHARS, hash_password, hash_password_blocking, verify_password, verify_password_blocking,
};
pub use policy::{Action, Denied, authorize};
pub use session::{Role, SESSION_COOKIE, Session, SessionSettings, cookie_key};
