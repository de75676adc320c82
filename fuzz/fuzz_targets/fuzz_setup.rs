use anchor_lang::AccountDeserialize;
use anchor_lang::InstructionData;
use anchor_lang::ToAccountMetas;
use solana_program_test::*;
use solana_sdk::{
    clock::Clock,
    instruction::{Instruction, InstructionError},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::{Transaction, TransactionError},
};
use spl_token::instruction as token_instruction;
use vesting_factory::constants::{FACTORY_SEED, IMPLEMENTATION_SEED, VAULT_SEED, VAULT_TOKEN_SEED};
use vesting_factory::error::VestingError;
use vesting_factory::state::{Factory, VestingVault};

// Re-export for convenience
pub use solana_program_test::ProgramTestContext;

// Custom error type for fuzzing and tests
pub type FuzzResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Outcome of a single transaction, kept separate from harness errors so
/// callers can assert on program rejections
pub type TxResult = std::result::Result<(), BanksClientError>;

// The schedule fixture the original deployment used:
// 2023-01-01T00:00:00Z .. 2027-01-01T00:00:00Z, 100k tokens
pub const START_TIMESTAMP: i64 = 1_672_531_200;
pub const END_TIMESTAMP: i64 = 1_798_761_600;
pub const TOTAL_AMOUNT: u64 = 100_000;

/// Test environment with the vesting factory program loaded
pub struct FuzzTestEnv {
    pub program_id: Pubkey,
    pub context: ProgramTestContext,
}

/// Factory-level accounts created at construction
#[derive(Debug)]
pub struct FactoryAccounts {
    pub factory: Pubkey,
    pub implementation: Pubkey,
    pub staking_pool: Pubkey,
    pub token_mint: Pubkey,
}

/// Token mint plus its authority
#[derive(Debug)]
pub struct MintAccounts {
    pub mint: Pubkey,
    pub mint_authority: Keypair,
    pub decimals: u8,
}

/// One deployed vault instance
#[derive(Debug, Clone)]
pub struct DeployedVault {
    pub vault: Pubkey,
    pub vault_token_account: Pubkey,
    pub index: u64,
}

// ============================================================================
// Core Setup Functions
// ============================================================================

/// Bridges Anchor's `entry` to solana-program-test's `processor!`.
///
/// Anchor 0.31 generates `entry<'info>(&Pubkey, &'info [AccountInfo<'info>],
/// &[u8])`, whose single unified lifetime is not a subtype of the
/// independent-lifetime `ProcessInstruction` fn pointer that
/// `invoke_builtin_function` now requires (`AccountInfo<'a>` is invariant in
/// `'a`, so the two signatures cannot coerce). Lifetimes are erased in the
/// fn-pointer ABI, so we transmute between the two otherwise-identical pointer
/// types. This only rewires the test harness; the program entrypoint it points
/// at is unchanged.
fn program_processor() -> anchor_lang::solana_program::entrypoint::ProcessInstruction {
    type AnchorEntry = for<'info> fn(
        &Pubkey,
        &'info [anchor_lang::solana_program::account_info::AccountInfo<'info>],
        &[u8],
    ) -> anchor_lang::solana_program::entrypoint::ProgramResult;
    let entry: AnchorEntry = vesting_factory::entry;
    unsafe {
        std::mem::transmute::<AnchorEntry, anchor_lang::solana_program::entrypoint::ProcessInstruction>(
            entry,
        )
    }
}

/// Creates the program test environment with the vesting factory loaded
pub async fn setup_program_test() -> FuzzTestEnv {
    let program_id = vesting_factory::id();
    let program_test = ProgramTest::new(
        "vesting_factory",
        program_id,
        processor!(program_processor()),
    );

    let context = program_test.start_with_context().await;

    FuzzTestEnv {
        program_id,
        context,
    }
}

/// Funds an account with lamports from the context payer
pub async fn fund_account(
    context: &mut ProgramTestContext,
    destination: &Pubkey,
    lamports: u64,
) -> FuzzResult<()> {
    let ix = solana_sdk::system_instruction::transfer(
        &context.payer.pubkey(),
        destination,
        lamports,
    );
    send_ix(context, ix, &[]).await??;
    Ok(())
}

/// Creates a new SPL token mint for the factory's token
pub async fn setup_token_mint(
    context: &mut ProgramTestContext,
    decimals: u8,
) -> FuzzResult<MintAccounts> {
    let mint_authority = Keypair::new();
    let mint_keypair = Keypair::new();
    let mint = mint_keypair.pubkey();

    let rent = context.banks_client.get_rent().await?;
    let mint_len = 82; // Size of Mint account in SPL Token program
    let mint_rent = rent.minimum_balance(mint_len);

    let create_account_ix = solana_sdk::system_instruction::create_account(
        &context.payer.pubkey(),
        &mint,
        mint_rent,
        mint_len as u64,
        &spl_token::id(),
    );

    let init_mint_ix = token_instruction::initialize_mint(
        &spl_token::id(),
        &mint,
        &mint_authority.pubkey(),
        None,
        decimals,
    )?;

    let blockhash = context.get_new_latest_blockhash().await?;
    let tx = Transaction::new_signed_with_payer(
        &[create_account_ix, init_mint_ix],
        Some(&context.payer.pubkey()),
        &[&context.payer, &mint_keypair],
        blockhash,
    );
    context.banks_client.process_transaction(tx).await?;

    Ok(MintAccounts {
        mint,
        mint_authority,
        decimals,
    })
}

/// Constructs the factory for a mint, which also deploys and neutralizes
/// the canonical implementation vault
pub async fn setup_factory(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    token_mint: &Pubkey,
) -> FuzzResult<FactoryAccounts> {
    let staking_pool = Pubkey::new_unique();
    let (factory, _) = derive_factory_pda(program_id, token_mint);
    let (implementation, _) = derive_implementation_pda(program_id, &factory);

    let payer = context.payer.pubkey();
    let ix = initialize_factory_ix(
        program_id,
        &factory,
        &implementation,
        token_mint,
        &staking_pool,
        &payer,
    );
    send_ix(context, ix, &[]).await??;

    Ok(FactoryAccounts {
        factory,
        implementation,
        staking_pool,
        token_mint: *token_mint,
    })
}

/// Full environment: program + mint + factory
pub async fn setup_complete_environment(decimals: u8) -> FuzzResult<(FuzzTestEnv, MintAccounts, FactoryAccounts)> {
    let mut env = setup_program_test().await;
    let mint = setup_token_mint(&mut env.context, decimals).await?;
    let factory = setup_factory(&mut env.context, &env.program_id, &mint.mint).await?;
    Ok((env, mint, factory))
}

/// Deploys a vault for `beneficiary` with `deployer` as owner. The
/// deployer pays rent for the new accounts and must be funded.
pub async fn deploy_vault(
    context: &mut ProgramTestContext,
    program_id: &Pubkey,
    factory: &FactoryAccounts,
    deployer: &Keypair,
    beneficiary: &Pubkey,
    start_timestamp: i64,
    end_timestamp: i64,
    amount: u64,
) -> FuzzResult<(DeployedVault, TxResult)> {
    let factory_state = get_factory_state(context, &factory.factory).await?;
    let index = factory_state.vault_count;
    let (vault, _) = derive_vault_pda(program_id, &factory.factory, index);
    let (vault_token_account, _) = derive_vault_token_pda(program_id, &vault);

    let ix = deploy_vault_ix(
        program_id,
        &factory.factory,
        &vault,
        &vault_token_account,
        &factory.token_mint,
        &deployer.pubkey(),
        beneficiary,
        start_timestamp,
        end_timestamp,
        amount,
    );
    let result = send_ix(context, ix, &[deployer]).await?;

    Ok((
        DeployedVault {
            vault,
            vault_token_account,
            index,
        },
        result,
    ))
}

/// Creates a token account for `owner` and returns its address
pub async fn create_token_account(
    context: &mut ProgramTestContext,
    mint: &Pubkey,
    owner: &Pubkey,
) -> FuzzResult<Pubkey> {
    let rent = context.banks_client.get_rent().await?;
    let account_len = 165; // Size of Token account in SPL Token program

    let token_account = Keypair::new();
    let create_ix = solana_sdk::system_instruction::create_account(
        &context.payer.pubkey(),
        &token_account.pubkey(),
        rent.minimum_balance(account_len),
        account_len as u64,
        &spl_token::id(),
    );
    let init_ix = token_instruction::initialize_account(
        &spl_token::id(),
        &token_account.pubkey(),
        mint,
        owner,
    )?;

    let blockhash = context.get_new_latest_blockhash().await?;
    let tx = Transaction::new_signed_with_payer(
        &[create_ix, init_ix],
        Some(&context.payer.pubkey()),
        &[&context.payer, &token_account],
        blockhash,
    );
    context.banks_client.process_transaction(tx).await?;

    Ok(token_account.pubkey())
}

/// Mints tokens into a token account
pub async fn mint_tokens_to(
    context: &mut ProgramTestContext,
    mint: &Pubkey,
    mint_authority: &Keypair,
    destination: &Pubkey,
    amount: u64,
) -> FuzzResult<()> {
    let mint_to_ix = token_instruction::mint_to(
        &spl_token::id(),
        mint,
        destination,
        &mint_authority.pubkey(),
        &[],
        amount,
    )?;
    send_ix(context, mint_to_ix, &[mint_authority]).await??;
    Ok(())
}

/// Rewrites the clock sysvar so vesting math can be pinned to a moment
pub async fn warp_to_timestamp(
    context: &mut ProgramTestContext,
    unix_timestamp: i64,
) -> FuzzResult<()> {
    let mut clock: Clock = context.banks_client.get_sysvar().await?;
    clock.unix_timestamp = unix_timestamp;
    context.set_sysvar(&clock);
    Ok(())
}

/// Signs and processes one instruction with a fresh blockhash. The
/// context payer covers the fee; `extra_signers` must not repeat it.
pub async fn send_ix(
    context: &mut ProgramTestContext,
    ix: Instruction,
    extra_signers: &[&Keypair],
) -> FuzzResult<TxResult> {
    let blockhash = context.get_new_latest_blockhash().await?;
    let payer = context.payer.pubkey();
    let mut signers: Vec<&Keypair> = vec![&context.payer];
    signers.extend_from_slice(extra_signers);
    let tx = Transaction::new_signed_with_payer(&[ix], Some(&payer), &signers, blockhash);
    Ok(context.banks_client.process_transaction(tx).await)
}

// ============================================================================
// Instruction Builders
// ============================================================================

pub fn initialize_factory_ix(
    program_id: &Pubkey,
    factory: &Pubkey,
    implementation: &Pubkey,
    token_mint: &Pubkey,
    staking_pool: &Pubkey,
    payer: &Pubkey,
) -> Instruction {
    let accounts = vesting_factory::accounts::InitializeFactory {
        factory: *factory,
        implementation: *implementation,
        token_mint: *token_mint,
        staking_pool: *staking_pool,
        payer: *payer,
        system_program: solana_sdk::system_program::ID,
    };
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: vesting_factory::instruction::InitializeFactory {}.data(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn deploy_vault_ix(
    program_id: &Pubkey,
    factory: &Pubkey,
    vault: &Pubkey,
    vault_token_account: &Pubkey,
    token_mint: &Pubkey,
    deployer: &Pubkey,
    beneficiary: &Pubkey,
    start_timestamp: i64,
    end_timestamp: i64,
    amount: u64,
) -> Instruction {
    let accounts = vesting_factory::accounts::DeployVault {
        factory: *factory,
        vault: *vault,
        vault_token_account: *vault_token_account,
        token_mint: *token_mint,
        deployer: *deployer,
        system_program: solana_sdk::system_program::ID,
        token_program: spl_token::id(),
    };
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: vesting_factory::instruction::DeployVault {
            beneficiary: *beneficiary,
            start_timestamp,
            end_timestamp,
            amount,
        }
        .data(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn initialize_ix(
    program_id: &Pubkey,
    vault: &Pubkey,
    owner: &Pubkey,
    beneficiary: &Pubkey,
    start_timestamp: i64,
    end_timestamp: i64,
    amount: u64,
) -> Instruction {
    let accounts = vesting_factory::accounts::Initialize { vault: *vault };
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: vesting_factory::instruction::Initialize {
            owner: *owner,
            beneficiary: *beneficiary,
            start_timestamp,
            end_timestamp,
            amount,
        }
        .data(),
    }
}

pub fn transfer_ownership_ix(
    program_id: &Pubkey,
    vault: &Pubkey,
    owner: &Pubkey,
    new_owner: &Pubkey,
) -> Instruction {
    let accounts = vesting_factory::accounts::TransferOwnership {
        vault: *vault,
        owner: *owner,
    };
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: vesting_factory::instruction::TransferOwnership {
            new_owner: *new_owner,
        }
        .data(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn withdraw_ix(
    program_id: &Pubkey,
    vault: &Pubkey,
    vault_token_account: &Pubkey,
    beneficiary_token_account: &Pubkey,
    token_mint: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Instruction {
    let accounts = vesting_factory::accounts::Withdraw {
        vault: *vault,
        vault_token_account: *vault_token_account,
        beneficiary_token_account: *beneficiary_token_account,
        token_mint: *token_mint,
        owner: *owner,
        token_program: spl_token::id(),
    };
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: vesting_factory::instruction::Withdraw { amount }.data(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn stake_ix(
    program_id: &Pubkey,
    vault: &Pubkey,
    factory: &Pubkey,
    owner: &Pubkey,
    vault_token_account: &Pubkey,
    pool_state: &Pubkey,
    staking_program: &Pubkey,
    amount: u64,
) -> Instruction {
    let accounts = vesting_factory::accounts::PoolOperation {
        vault: *vault,
        factory: *factory,
        owner: *owner,
        vault_token_account: *vault_token_account,
        pool_state: *pool_state,
        staking_program: *staking_program,
        token_program: spl_token::id(),
    };
    Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(None),
        data: vesting_factory::instruction::Stake { amount }.data(),
    }
}

// ============================================================================
// PDA Derivation Helpers
// ============================================================================

pub fn derive_factory_pda(program_id: &Pubkey, token_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FACTORY_SEED, token_mint.as_ref()], program_id)
}

pub fn derive_implementation_pda(program_id: &Pubkey, factory: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[IMPLEMENTATION_SEED, factory.as_ref()], program_id)
}

pub fn derive_vault_pda(program_id: &Pubkey, factory: &Pubkey, index: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[VAULT_SEED, factory.as_ref(), &index.to_le_bytes()],
        program_id,
    )
}

pub fn derive_vault_token_pda(program_id: &Pubkey, vault: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_TOKEN_SEED, vault.as_ref()], program_id)
}

// ============================================================================
// Account State Verification Helpers
// ============================================================================

/// Fetch and return vault state
pub async fn get_vault_state(
    context: &mut ProgramTestContext,
    vault: &Pubkey,
) -> FuzzResult<VestingVault> {
    let account = context
        .banks_client
        .get_account(*vault)
        .await?
        .ok_or("Vault account not found")?;

    let vault_data = VestingVault::try_deserialize(&mut account.data.as_ref())?;
    Ok(vault_data)
}

/// Fetch and return factory state
pub async fn get_factory_state(
    context: &mut ProgramTestContext,
    factory: &Pubkey,
) -> FuzzResult<Factory> {
    let account = context
        .banks_client
        .get_account(*factory)
        .await?
        .ok_or("Factory account not found")?;

    let state = Factory::try_deserialize(&mut account.data.as_ref())?;
    Ok(state)
}

/// Get token account balance
pub async fn get_token_balance(
    context: &mut ProgramTestContext,
    account: &Pubkey,
) -> FuzzResult<u64> {
    let account_data = context
        .banks_client
        .get_account(*account)
        .await?
        .ok_or("Token account not found")?;

    // Manually parse amount from token account data
    // Token account structure: amount is at offset 64 (u64)
    if account_data.data.len() < 72 {
        return Err("Invalid token account data".into());
    }

    let amount = u64::from_le_bytes(
        account_data.data[64..72]
            .try_into()
            .map_err(|_| "Failed to parse amount")?,
    );

    Ok(amount)
}

// ============================================================================
// Error Assertion Helpers
// ============================================================================

/// Pulls the custom program error code out of a failed transaction
pub fn custom_error_code(err: &BanksClientError) -> Option<u32> {
    match err {
        BanksClientError::TransactionError(TransactionError::InstructionError(
            _,
            InstructionError::Custom(code),
        )) => Some(*code),
        BanksClientError::SimulationError {
            err: TransactionError::InstructionError(_, InstructionError::Custom(code)),
            ..
        } => Some(*code),
        _ => None,
    }
}

/// Asserts that a transaction failed with the given program error
pub fn assert_vesting_error(result: TxResult, expected: VestingError) {
    let err = result.expect_err("transaction should have been rejected");
    let code = custom_error_code(&err)
        .unwrap_or_else(|| panic!("expected {:?}, got {:?}", expected, err));
    assert_eq!(code, u32::from(expected));
}
