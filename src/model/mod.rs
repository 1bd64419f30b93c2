//! Domain models and persisted document shapes.
//!
//! Records in this module are owned by the repositories in `data/` and are
//! serialized verbatim into the flat-file documents described there. Services
//! receive cloned records and never mutate them in place.

pub mod invite;
pub mod team;
