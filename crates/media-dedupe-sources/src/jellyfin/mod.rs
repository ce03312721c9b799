pub mod api;
pub mod auth;
pub mod client;

pub use auth::{AuthSession, ClientIdentity};
pub use client::JellyfinClient;
