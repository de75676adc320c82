use anchor_lang::prelude::*;

use crate::error::VestingError;
use crate::state::VestingSchedule;

/// Recipient of a vault's principal. `Sentinel` marks an instance that
/// must never become spendable; it is the zero-state of a freshly
/// created account and no initialization path can ever write it back.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Beneficiary {
    #[default]
    Sentinel,
    Account(Pubkey),
}

impl Beneficiary {
    /// 1 byte tag + the largest payload
    pub const LEN: usize = 1 + 32;
}

#[account]
#[derive(Default)]
pub struct VestingVault {
    /// The factory this vault was deployed from
    pub factory: Pubkey,
    /// The mint of the token held in the vault's escrow
    pub token_mint: Pubkey,
    /// Current manager of the locked funds; `None` only before
    /// initialization and on the canonical implementation instance
    pub owner: Option<Pubkey>,
    /// Fixed for the vault's lifetime once initialized
    pub beneficiary: Beneficiary,
    pub schedule: VestingSchedule,
    /// Principal already released to the beneficiary
    pub withdrawn: u64,
    /// Position in the factory's deployment sequence; a vault PDA seed
    pub index: u64,
    pub initialized: bool,
    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl VestingVault {
    pub const LEN: usize = 8 + // discriminator
        32 + // factory
        32 + // token_mint
        (1 + 32) + // owner
        Beneficiary::LEN + // beneficiary
        VestingSchedule::LEN + // schedule
        8 + // withdrawn
        8 + // index
        1 + // initialized
        1; // bump

    /// The one-time state transition. Everything a vault ever learns
    /// about its owner, beneficiary, and schedule is written here, and
    /// only here, exactly once.
    pub fn try_initialize(
        &mut self,
        owner: Pubkey,
        beneficiary: Pubkey,
        schedule: VestingSchedule,
    ) -> Result<()> {
        require!(!self.initialized, VestingError::AlreadyInitialized);
        require!(schedule.is_valid(), VestingError::InvalidSchedule);
        require_keys_neq!(beneficiary, Pubkey::default(), VestingError::InvalidBeneficiary);

        self.owner = Some(owner);
        self.beneficiary = Beneficiary::Account(beneficiary);
        self.schedule = schedule;
        self.initialized = true;
        Ok(())
    }

    pub fn require_owner(&self, caller: &Pubkey) -> Result<()> {
        match self.owner {
            Some(owner) if owner == *caller => Ok(()),
            _ => err!(VestingError::NotOwner),
        }
    }

    pub fn transfer_ownership(&mut self, caller: &Pubkey, new_owner: Pubkey) -> Result<()> {
        self.require_owner(caller)?;
        require_keys_neq!(new_owner, Pubkey::default(), VestingError::InvalidOwner);
        self.owner = Some(new_owner);
        Ok(())
    }

    /// Released principal not yet paid out. Monotonic non-decreasing in
    /// `at_timestamp` for a fixed withdrawal history.
    pub fn withdrawable_amount(&self, at_timestamp: i64) -> u64 {
        self.schedule.released_amount(at_timestamp).saturating_sub(self.withdrawn)
    }
}
