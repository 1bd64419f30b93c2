//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits
//! between the command-dispatch layer and the data (repository) layer.
//! Services are responsible for:
//!
//! - **Business Logic**: Enforcing the membership and invitation domain rules
//! - **Orchestration**: Coordinating repository commits and collaborator calls
//! - **Serialization**: Acquiring the per-team and per-player locks around
//!   every read-modify-write

pub mod team;
