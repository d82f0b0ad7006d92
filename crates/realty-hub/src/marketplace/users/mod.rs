//! User directory: registration, lookup and actor resolution.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{User, UserRegistration};
pub use service::UserDirectory;
