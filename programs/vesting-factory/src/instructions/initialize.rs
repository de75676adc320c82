use anchor_lang::prelude::*;

use crate::state::{VestingSchedule, VestingVault};

/// Direct one-time initialization of a vault account. `deploy_vault`
/// runs the same transition in the instruction that creates the
/// account, so every vault this program creates is already initialized
/// by the time it is visible; a direct call is the bypass path the
/// guard in `VestingVault::try_initialize` exists for, and it fails
/// with AlreadyInitialized on the canonical implementation instance as
/// much as on any deployed vault.
#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub vault: Account<'info, VestingVault>,
}

pub fn handler(
    ctx: Context<Initialize>,
    owner: Pubkey,
    beneficiary: Pubkey,
    start_timestamp: i64,
    end_timestamp: i64,
    amount: u64,
) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.try_initialize(
        owner,
        beneficiary,
        VestingSchedule {
            start_timestamp,
            end_timestamp,
            amount,
        },
    )?;

    msg!("Vault {} initialized", vault.key());
    msg!("Owner: {}", owner);
    msg!("Beneficiary: {}", beneficiary);

    Ok(())
}
