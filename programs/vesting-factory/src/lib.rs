pub mod constants;
pub mod error;
pub mod instructions;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use instructions::*;
pub use state::*;

declare_id!("4oa8aqsUfEepY4AumYkcPkpvWNmaK1cZXWDpNtFwu9NQ");

#[program]
pub mod vesting_factory {
    use super::*;

    pub fn initialize_factory(ctx: Context<InitializeFactory>) -> Result<()> {
        initialize_factory::handler(ctx)
    }

    pub fn deploy_vault(
        ctx: Context<DeployVault>,
        beneficiary: Pubkey,
        start_timestamp: i64,
        end_timestamp: i64,
        amount: u64,
    ) -> Result<()> {
        deploy_vault::handler(ctx, beneficiary, start_timestamp, end_timestamp, amount)
    }

    pub fn initialize(
        ctx: Context<Initialize>,
        owner: Pubkey,
        beneficiary: Pubkey,
        start_timestamp: i64,
        end_timestamp: i64,
        amount: u64,
    ) -> Result<()> {
        initialize::handler(ctx, owner, beneficiary, start_timestamp, end_timestamp, amount)
    }

    pub fn transfer_ownership(ctx: Context<TransferOwnership>, new_owner: Pubkey) -> Result<()> {
        transfer_ownership::handler(ctx, new_owner)
    }

    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        withdraw::handler(ctx, amount)
    }

    pub fn stake(ctx: Context<PoolOperation>, amount: u64) -> Result<()> {
        staking::stake(ctx, amount)
    }

    pub fn unstake(ctx: Context<PoolOperation>, amount: u64) -> Result<()> {
        staking::unstake(ctx, amount)
    }

    pub fn delegate(ctx: Context<PoolOperation>, delegatee: Pubkey) -> Result<()> {
        staking::delegate(ctx, delegatee)
    }
}
