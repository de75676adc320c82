use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

use crate::constants::{FACTORY_SEED, IMPLEMENTATION_SEED};
use crate::state::{Factory, VestingVault};

#[derive(Accounts)]
pub struct InitializeFactory<'info> {
    /// The factory for this token mint; one per mint
    #[account(
        init,
        payer = payer,
        space = Factory::LEN,
        seeds = [FACTORY_SEED, token_mint.key().as_ref()],
        bump
    )]
    pub factory: Account<'info, Factory>,

    /// The canonical vault instance, neutralized below so it can never
    /// hold real funds
    #[account(
        init,
        payer = payer,
        space = VestingVault::LEN,
        seeds = [IMPLEMENTATION_SEED, factory.key().as_ref()],
        bump
    )]
    pub implementation: Account<'info, VestingVault>,

    /// The mint of the token all vaults from this factory will hold
    pub token_mint: InterfaceAccount<'info, Mint>,

    /// CHECK: The staking collaborator program; opaque to this program,
    /// recorded so vaults only ever forward owner calls to it
    pub staking_pool: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeFactory>) -> Result<()> {
    let factory_key = ctx.accounts.factory.key();
    let implementation_key = ctx.accounts.implementation.key();

    let factory = &mut ctx.accounts.factory;
    factory.token_mint = ctx.accounts.token_mint.key();
    factory.implementation = implementation_key;
    factory.staking_pool = ctx.accounts.staking_pool.key();
    factory.vault_count = 0;
    factory.bump = ctx.bumps.factory;

    // Self-initialize the canonical instance into its inert terminal
    // state: no owner, sentinel beneficiary, zero schedule. The flag is
    // what matters; with it set, `initialize` on this account can only
    // ever fail with AlreadyInitialized.
    let implementation = &mut ctx.accounts.implementation;
    implementation.factory = factory_key;
    implementation.token_mint = ctx.accounts.token_mint.key();
    implementation.initialized = true;
    implementation.bump = ctx.bumps.implementation;

    msg!("Factory initialized for mint {}", ctx.accounts.token_mint.key());
    msg!("Implementation (inert): {}", implementation_key);
    msg!("Staking pool: {}", ctx.accounts.staking_pool.key());

    Ok(())
}
