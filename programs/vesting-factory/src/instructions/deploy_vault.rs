use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::{FACTORY_SEED, VAULT_SEED, VAULT_TOKEN_SEED};
use crate::error::VestingError;
use crate::state::{Factory, VestingSchedule, VestingVault};

#[derive(Accounts)]
pub struct DeployVault<'info> {
    #[account(
        mut,
        seeds = [FACTORY_SEED, factory.token_mint.as_ref()],
        bump = factory.bump,
        has_one = token_mint,
    )]
    pub factory: Account<'info, Factory>,

    /// The next vault in the factory's deployment sequence
    #[account(
        init,
        payer = deployer,
        space = VestingVault::LEN,
        seeds = [VAULT_SEED, factory.key().as_ref(), &factory.vault_count.to_le_bytes()],
        bump
    )]
    pub vault: Account<'info, VestingVault>,

    /// The escrow that will hold the vault's allocation, owned by the
    /// vault PDA. Funding it is the deployer's business.
    #[account(
        init,
        payer = deployer,
        token::mint = token_mint,
        token::authority = vault,
        token::token_program = token_program,
        seeds = [VAULT_TOKEN_SEED, vault.key().as_ref()],
        bump
    )]
    pub vault_token_account: InterfaceAccount<'info, TokenAccount>,

    pub token_mint: InterfaceAccount<'info, Mint>,

    /// Becomes the new vault's owner
    #[account(mut)]
    pub deployer: Signer<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Interface<'info, TokenInterface>,
}

pub fn handler(
    ctx: Context<DeployVault>,
    beneficiary: Pubkey,
    start_timestamp: i64,
    end_timestamp: i64,
    amount: u64,
) -> Result<()> {
    let factory_key = ctx.accounts.factory.key();
    let vault_key = ctx.accounts.vault.key();
    let factory = &mut ctx.accounts.factory;

    let vault = &mut ctx.accounts.vault;
    vault.factory = factory_key;
    vault.token_mint = factory.token_mint;
    vault.index = factory.vault_count;
    vault.bump = ctx.bumps.vault;
    vault.try_initialize(
        ctx.accounts.deployer.key(),
        beneficiary,
        VestingSchedule {
            start_timestamp,
            end_timestamp,
            amount,
        },
    )?;

    factory.vault_count = factory
        .vault_count
        .checked_add(1)
        .ok_or(VestingError::MathOverflow)?;

    msg!("Vault {} deployed at {}", vault.index, vault_key);
    msg!("Owner: {}", ctx.accounts.deployer.key());
    msg!("Beneficiary: {}", beneficiary);
    msg!(
        "Schedule: {} tokens from {} to {}",
        amount,
        start_timestamp,
        end_timestamp
    );

    Ok(())
}
