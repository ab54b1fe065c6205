//! sea-orm entities for the clubhub schema plus row-level helpers.
//!
//! Validation of submitted fields lives next to each entity; store errors are
//! translated into [`errors::ModelError`] so unique violations surface as
//! conflicts.

pub mod errors;
pub mod db;
pub mod user;
pub mod club_membership;
pub mod event_booking;

#[cfg(test)]
mod tests;
