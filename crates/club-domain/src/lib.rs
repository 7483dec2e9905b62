
// Operations
mod operations;
pub use operations::*;

mod results;
pub use results::*;

// Models
mod operators;
pub use operators::*;

mod members;
pub use members::*;

mod accounts;
pub use accounts::*;

mod payments;
pub use payments::*;

mod expenses;
pub use expenses::*;

mod transfers;
pub use transfers::*;

mod prices;
pub use prices::*;
