//! Mock authentication: an explicitly constructed session service over a
//! swappable key-value store. Presence of the token key is the whole
//! authentication model; there is no hashing, expiry or CSRF protection.

pub mod service;
pub mod store;

pub use service::{
    registration_schema, AuthService, Credentials, Registration, Role, User, AUTH_TOKEN_KEY,
    USER_KEY,
};
pub use store::{KeyValueStore, MemoryStore};
