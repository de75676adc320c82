use anchor_lang::prelude::*;

use crate::state::VestingVault;

#[derive(Accounts)]
pub struct TransferOwnership<'info> {
    #[account(mut)]
    pub vault: Account<'info, VestingVault>,

    /// Must match the vault's stored owner
    pub owner: Signer<'info>,
}

pub fn handler(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.transfer_ownership(ctx.accounts.owner.key, new_owner)?;

    msg!("Ownership transferred");
    msg!("Previous owner: {}", ctx.accounts.owner.key());
    msg!("New owner: {}", new_owner);

    Ok(())
}
