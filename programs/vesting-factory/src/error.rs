use anchor_lang::prelude::*;

#[error_code]
pub enum VestingError {
    #[msg("Already initialized")]
    AlreadyInitialized,
    #[msg("Vesting start must precede vesting end")]
    InvalidSchedule,
    #[msg("Beneficiary cannot be the zero address")]
    InvalidBeneficiary,
    #[msg("Only the vault owner can perform this action")]
    NotOwner,
    #[msg("New owner cannot be the zero address")]
    InvalidOwner,
    #[msg("Amount exceeds the withdrawable balance")]
    InsufficientReleased,
    #[msg("Math operation overflow")]
    MathOverflow,
}
