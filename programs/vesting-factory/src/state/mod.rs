pub mod factory;
pub mod schedule;
pub mod vesting_vault;

pub use factory::*;
pub use schedule::*;
pub use vesting_vault::*;
