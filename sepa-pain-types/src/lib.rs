mod amount;
mod date;

pub use amount::Amount;
pub use date::Date;
