
pub mod connection;
pub use connection::Connection;

pub mod results;
pub mod schema;
mod money;

pub mod members;
pub mod accounts;
pub mod payments;
pub mod expenses;
pub mod transfers;
pub mod prices;
