//! Data Transfer Objects (DTOs) for the provider's admin and token APIs.
//!
//! Responses are decoded into these types at the boundary so the rest of the
//! crate works with real booleans instead of loosely-typed text.

pub mod client;
pub mod realm;
pub mod token;

pub use client::{ClientRepresentation, ClientSnapshot, DesiredClientSpec, ExpectedClientState};
pub use realm::{RealmDocument, RealmSettingsPatch, RealmSnapshot};
pub use token::TokenResponse;
