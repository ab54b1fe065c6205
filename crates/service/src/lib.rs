//! Service layer providing the clubhub business operations on top of models.
//! - Authenticator: registration, login, session tokens (`auth`).
//! - Ownership-scoped registries for club memberships and event bookings.
//! - Framework independent; the HTTP layer lives in the `server` crate.

pub mod errors;
pub mod auth;
pub mod club_registry;
pub mod event_registry;
#[cfg(test)]
pub mod test_support;
