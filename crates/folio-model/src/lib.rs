//! Document models of a developer-community database.
//!
//! A community runs meetups; a meetup happens at a venue, is backed by
//! friends (sponsors) and consists of sessions, each presenting a talk
//! given by one or more speakers. Every model is a [`folio_types::Document`]
//! stored as JSON in its own collection.
//!
//! | type          | collection    |
//! |---------------|---------------|
//! | [`Community`] | `communities` |
//! | [`Meetup`]    | `meetups`     |
//! | [`Speaker`]   | `speakers`    |
//! | [`Talk`]      | `talks`       |
//! | [`Venue`]     | `venues`      |
//! | [`Friend`]    | `friends`     |
//!
//! [`registry`] builds the [`folio_store::ModelRegistry`] knowing all six.

pub mod community;
pub mod friend;
pub mod meetup;
pub mod registry;
pub mod speaker;
pub mod talk;
pub mod venue;

#[cfg(test)]
mod scenarios;

pub use community::Community;
pub use friend::Friend;
pub use meetup::{Meetup, MeetupSession};
pub use registry::registry;
pub use speaker::Speaker;
pub use talk::Talk;
pub use venue::Venue;
