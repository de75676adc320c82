use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::{AccountMeta, Instruction};
use anchor_lang::solana_program::program::invoke_signed;
use anchor_lang::solana_program::program_error::ProgramError;
use anchor_spl::token_interface::{TokenAccount, TokenInterface};

use crate::constants::{FACTORY_SEED, VAULT_SEED, VAULT_TOKEN_SEED};
use crate::state::{Factory, VestingVault};

/// The request wire format consumed by the staking collaborator. The
/// pool receives `[pool_state, vault_escrow, vault (signer), token
/// program]` and acts on the escrow under the vault's extended signer
/// privilege; its accounting is its own business.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug)]
pub enum PoolRequest {
    Stake { amount: u64 },
    Unstake { amount: u64 },
    Delegate { delegatee: Pubkey },
}

#[derive(Accounts)]
pub struct PoolOperation<'info> {
    #[account(has_one = factory)]
    pub vault: Account<'info, VestingVault>,

    #[account(
        seeds = [FACTORY_SEED, factory.token_mint.as_ref()],
        bump = factory.bump,
    )]
    pub factory: Account<'info, Factory>,

    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_TOKEN_SEED, vault.key().as_ref()],
        bump,
    )]
    pub vault_token_account: InterfaceAccount<'info, TokenAccount>,

    /// CHECK: The pool's own state account; opaque to this program
    #[account(mut)]
    pub pool_state: UncheckedAccount<'info>,

    /// CHECK: Pinned at factory construction; forwarding anywhere else
    /// is refused
    #[account(address = factory.staking_pool)]
    pub staking_program: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,
}

pub fn stake(ctx: Context<PoolOperation>, amount: u64) -> Result<()> {
    forward(&ctx, PoolRequest::Stake { amount })?;
    msg!("Staked {} into {}", amount, ctx.accounts.staking_program.key());
    Ok(())
}

pub fn unstake(ctx: Context<PoolOperation>, amount: u64) -> Result<()> {
    forward(&ctx, PoolRequest::Unstake { amount })?;
    msg!("Unstake of {} requested from {}", amount, ctx.accounts.staking_program.key());
    Ok(())
}

pub fn delegate(ctx: Context<PoolOperation>, delegatee: Pubkey) -> Result<()> {
    forward(&ctx, PoolRequest::Delegate { delegatee })?;
    msg!("Delegated pool position to {}", delegatee);
    Ok(())
}

fn forward(ctx: &Context<PoolOperation>, request: PoolRequest) -> Result<()> {
    let vault = &ctx.accounts.vault;
    vault.require_owner(ctx.accounts.owner.key)?;

    let mut data = Vec::with_capacity(1 + 32);
    request
        .serialize(&mut data)
        .map_err(|err| ProgramError::BorshIoError(err.to_string()))?;

    let ix = Instruction {
        program_id: ctx.accounts.staking_program.key(),
        accounts: vec![
            AccountMeta::new(ctx.accounts.pool_state.key(), false),
            AccountMeta::new(ctx.accounts.vault_token_account.key(), false),
            AccountMeta::new_readonly(vault.key(), true),
            AccountMeta::new_readonly(ctx.accounts.token_program.key(), false),
        ],
        data,
    };

    let factory = vault.factory;
    let index_bytes = vault.index.to_le_bytes();
    let bump = [vault.bump];
    let vault_seeds = &[VAULT_SEED, factory.as_ref(), &index_bytes, &bump];

    invoke_signed(
        &ix,
        &[
            ctx.accounts.pool_state.to_account_info(),
            ctx.accounts.vault_token_account.to_account_info(),
            ctx.accounts.vault.to_account_info(),
            ctx.accounts.token_program.to_account_info(),
            ctx.accounts.staking_program.to_account_info(),
        ],
        &[&vault_seeds[..]],
    )?;

    Ok(())
}
