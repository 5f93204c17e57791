//! In-tree [`ContractRuntime`](crate::session::ContractRuntime) implementations.
pub mod local;
pub mod program;
pub mod state;

pub use local::LocalNetwork;
pub use program::{BallotLedger, CHOICE_COUNT};
