// src/domain/model/mod.rs

pub mod breach_state;
pub mod sla_policy;
pub mod ticket;

pub use breach_state::BreachState;
pub use sla_policy::SlaPolicy;
pub use ticket::{Category, Priority, Ticket, TicketStatus};
