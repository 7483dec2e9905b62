
pub mod clock;
pub mod context;
pub mod errors;
pub mod saga;

pub mod periods;
pub mod dues;
pub mod ledger;
pub mod prices;
pub mod payments;
pub mod expenses;
pub mod roster;
pub mod reports;

#[cfg(test)]
mod testing;

pub use context::Context;
pub use errors::LedgerError;
