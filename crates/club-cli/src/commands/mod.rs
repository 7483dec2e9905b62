use anyhow::Result;
use inquire::Confirm;

pub mod accounts;
pub mod expenses;
pub mod members;
pub mod payments;
pub mod prices;

pub use accounts::Accounts;
pub use expenses::Expenses;
pub use members::Members;
pub use payments::Payments;
pub use prices::Prices;

/// Ask before writing, unless `--yes` was given.
fn confirm(message: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirm = Confirm::new(message).with_default(true);
    Ok(confirm.prompt()?)
}
