use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::constants::{VAULT_SEED, VAULT_TOKEN_SEED};
use crate::error::VestingError;
use crate::state::{Beneficiary, VestingVault};

#[derive(Accounts)]
pub struct Withdraw<'info> {
    #[account(mut)]
    pub vault: Account<'info, VestingVault>,

    /// The vault's escrow
    #[account(
        mut,
        seeds = [VAULT_TOKEN_SEED, vault.key().as_ref()],
        bump,
    )]
    pub vault_token_account: InterfaceAccount<'info, TokenAccount>,

    /// Where the principal goes; must belong to the vault's beneficiary
    #[account(
        mut,
        token::mint = token_mint,
    )]
    pub beneficiary_token_account: InterfaceAccount<'info, TokenAccount>,

    #[account(address = vault.token_mint)]
    pub token_mint: InterfaceAccount<'info, Mint>,

    pub owner: Signer<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
    let vault = &ctx.accounts.vault;
    vault.require_owner(ctx.accounts.owner.key)?;

    // Principal only ever moves to the beneficiary
    let beneficiary = match vault.beneficiary {
        Beneficiary::Account(key) => key,
        Beneficiary::Sentinel => return err!(VestingError::InvalidBeneficiary),
    };
    require_keys_eq!(
        ctx.accounts.beneficiary_token_account.owner,
        beneficiary,
        VestingError::InvalidBeneficiary
    );

    let now = Clock::get()?.unix_timestamp;
    let withdrawable = vault.withdrawable_amount(now);
    require!(amount <= withdrawable, VestingError::InsufficientReleased);

    let vault = &mut ctx.accounts.vault;
    vault.withdrawn = vault
        .withdrawn
        .checked_add(amount)
        .ok_or(VestingError::MathOverflow)?;

    let factory = vault.factory;
    let index_bytes = vault.index.to_le_bytes();
    let bump = [vault.bump];
    let vault_seeds = &[VAULT_SEED, factory.as_ref(), &index_bytes, &bump];
    let signer_seeds = &[&vault_seeds[..]];

    let transfer_accounts = TransferChecked {
        from: ctx.accounts.vault_token_account.to_account_info(),
        mint: ctx.accounts.token_mint.to_account_info(),
        to: ctx.accounts.beneficiary_token_account.to_account_info(),
        authority: ctx.accounts.vault.to_account_info(),
    };

    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        transfer_accounts,
        signer_seeds,
    );

    transfer_checked(cpi_ctx, amount, ctx.accounts.token_mint.decimals)?;

    msg!("Withdrawn {} to beneficiary {}", amount, beneficiary);
    msg!(
        "Total withdrawn: {} of {}",
        ctx.accounts.vault.withdrawn,
        ctx.accounts.vault.schedule.amount
    );

    Ok(())
}
