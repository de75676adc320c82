use anchor_lang::prelude::*;

#[account]
pub struct Factory {
    /// The mint of the token every vault deployed by this factory holds
    pub token_mint: Pubkey,
    /// The canonical vault instance, permanently inert (see `initialize_factory`)
    pub implementation: Pubkey,
    /// The staking collaborator program vaults may forward owner calls to
    pub staking_pool: Pubkey,
    /// Number of vaults deployed so far; also the index of the next vault
    pub vault_count: u64,
    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl Factory {
    pub const LEN: usize = 8 + // discriminator
        32 + // token_mint
        32 + // implementation
        32 + // staking_pool
        8 + // vault_count
        1; // bump
}
