//! Repository layer for all domain entities.
//!
//! This module contains repository structs that handle storage operations for
//! the team and invitation documents. Each repository owns one flat-file JSON
//! document, loaded wholesale into memory at startup and rewritten wholesale
//! on each mutation. Mutating methods are all-or-nothing with respect to the
//! document they own: the change is applied to a copy, the copy is persisted,
//! and only a successful write replaces the in-memory state. All reads and
//! writes go through these repositories; no other component mutates the
//! records directly.

pub mod invite;
pub mod store;
pub mod team;

#[cfg(test)]
mod test;
