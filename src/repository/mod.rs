// src/repository/mod.rs

pub mod policy_store;
pub mod ticket_store;

pub use policy_store::{InMemoryPolicyStore, PolicyStore};
pub use ticket_store::{InMemoryTicketStore, TicketStore};
