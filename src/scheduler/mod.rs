//! Scheduled background jobs.

pub mod janitor;
