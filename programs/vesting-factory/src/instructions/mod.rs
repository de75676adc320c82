pub mod deploy_vault;
pub mod initialize;
pub mod initialize_factory;
pub mod staking;
pub mod transfer_ownership;
pub mod withdraw;

pub use deploy_vault::*;
pub use initialize::*;
pub use initialize_factory::*;
pub use staking::*;
pub use transfer_ownership::*;
pub use withdraw::*;
