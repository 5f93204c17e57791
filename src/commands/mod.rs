//! Menu entries and subcommands generated from a [`ContractDescriptor`](crate::descriptor::ContractDescriptor).
pub mod coerce;
pub mod generator;

pub use coerce::{coerce, coerce_all, CoercionError};
pub use generator::{generate, resolve, ArgSource, Command, CommandOutcome, EXIT_ID};
