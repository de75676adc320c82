use fuzz_helpers::*;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use vesting_factory::error::VestingError;
use vesting_factory::state::Beneficiary;

struct VaultFixture {
    env: FuzzTestEnv,
    mint: MintAccounts,
    factory: FactoryAccounts,
    owner: Keypair,
    beneficiary: Pubkey,
    deployed: DeployedVault,
}

async fn setup_vault_fixture() -> FuzzResult<VaultFixture> {
    let (mut env, mint, factory) = setup_complete_environment(6).await?;

    let owner = Keypair::new();
    fund_account(&mut env.context, &owner.pubkey(), 1_000_000_000).await?;
    let beneficiary = Pubkey::new_unique();

    let (deployed, result) = deploy_vault(
        &mut env.context,
        &env.program_id,
        &factory,
        &owner,
        &beneficiary,
        START_TIMESTAMP,
        END_TIMESTAMP,
        TOTAL_AMOUNT,
    )
    .await?;
    result.expect("fixture deploy should succeed");

    Ok(VaultFixture {
        env,
        mint,
        factory,
        owner,
        beneficiary,
        deployed,
    })
}

/// Funds the vault escrow with the full allocation
async fn fund_escrow(fixture: &mut VaultFixture) -> FuzzResult<()> {
    let mint = fixture.mint.mint;
    mint_tokens_to(
        &mut fixture.env.context,
        &mint,
        &fixture.mint.mint_authority,
        &fixture.deployed.vault_token_account,
        TOTAL_AMOUNT,
    )
    .await
}

#[tokio::test]
async fn ownership_moves_only_through_the_current_owner() -> FuzzResult<()> {
    let mut fixture = setup_vault_fixture().await?;
    let new_owner = Keypair::new();

    // A bystander with a valid signature of their own gets nowhere
    let bystander = Keypair::new();
    let ix = transfer_ownership_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &bystander.pubkey(),
        &bystander.pubkey(),
    );
    let attempt = send_ix(&mut fixture.env.context, ix, &[&bystander]).await?;
    assert_vesting_error(attempt, VestingError::NotOwner);

    // The owner hands the vault over
    let ix = transfer_ownership_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.owner.pubkey(),
        &new_owner.pubkey(),
    );
    send_ix(&mut fixture.env.context, ix, &[&fixture.owner])
        .await?
        .expect("owner-signed transfer should succeed");

    let vault = get_vault_state(&mut fixture.env.context, &fixture.deployed.vault).await?;
    assert_eq!(vault.owner, Some(new_owner.pubkey()));

    // The previous owner is now just another bystander
    let ix = transfer_ownership_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.owner.pubkey(),
        &fixture.owner.pubkey(),
    );
    let attempt = send_ix(&mut fixture.env.context, ix, &[&fixture.owner]).await?;
    assert_vesting_error(attempt, VestingError::NotOwner);

    Ok(())
}

#[tokio::test]
async fn ownership_cannot_move_to_the_zero_address() -> FuzzResult<()> {
    let mut fixture = setup_vault_fixture().await?;

    let ix = transfer_ownership_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.owner.pubkey(),
        &Pubkey::default(),
    );
    let attempt = send_ix(&mut fixture.env.context, ix, &[&fixture.owner]).await?;
    assert_vesting_error(attempt, VestingError::InvalidOwner);

    let vault = get_vault_state(&mut fixture.env.context, &fixture.deployed.vault).await?;
    assert_eq!(vault.owner, Some(fixture.owner.pubkey()));

    Ok(())
}

#[tokio::test]
async fn beneficiary_survives_ownership_changes() -> FuzzResult<()> {
    let mut fixture = setup_vault_fixture().await?;
    let new_owner = Keypair::new();

    let ix = transfer_ownership_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.owner.pubkey(),
        &new_owner.pubkey(),
    );
    send_ix(&mut fixture.env.context, ix, &[&fixture.owner])
        .await?
        .expect("transfer should succeed");

    let vault = get_vault_state(&mut fixture.env.context, &fixture.deployed.vault).await?;
    assert_eq!(vault.beneficiary, Beneficiary::Account(fixture.beneficiary));
    assert_eq!(vault.schedule.amount, TOTAL_AMOUNT);

    Ok(())
}

#[tokio::test]
async fn nothing_is_withdrawable_before_the_start() -> FuzzResult<()> {
    let mut fixture = setup_vault_fixture().await?;
    fund_escrow(&mut fixture).await?;
    let beneficiary_account = create_token_account(
        &mut fixture.env.context,
        &fixture.mint.mint,
        &fixture.beneficiary,
    )
    .await?;

    warp_to_timestamp(&mut fixture.env.context, START_TIMESTAMP - 86_400).await?;

    let ix = withdraw_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.deployed.vault_token_account,
        &beneficiary_account,
        &fixture.mint.mint,
        &fixture.owner.pubkey(),
        1,
    );
    let attempt = send_ix(&mut fixture.env.context, ix, &[&fixture.owner]).await?;
    assert_vesting_error(attempt, VestingError::InsufficientReleased);

    Ok(())
}

#[tokio::test]
async fn withdraw_releases_linearly_and_clamps_at_the_end() -> FuzzResult<()> {
    let mut fixture = setup_vault_fixture().await?;
    fund_escrow(&mut fixture).await?;
    let beneficiary_account = create_token_account(
        &mut fixture.env.context,
        &fixture.mint.mint,
        &fixture.beneficiary,
    )
    .await?;

    // Halfway through the schedule exactly half is released
    let midpoint = START_TIMESTAMP + (END_TIMESTAMP - START_TIMESTAMP) / 2;
    warp_to_timestamp(&mut fixture.env.context, midpoint).await?;

    let ix = withdraw_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.deployed.vault_token_account,
        &beneficiary_account,
        &fixture.mint.mint,
        &fixture.owner.pubkey(),
        TOTAL_AMOUNT / 2,
    );
    send_ix(&mut fixture.env.context, ix, &[&fixture.owner])
        .await?
        .expect("withdraw of the released half should succeed");

    assert_eq!(
        get_token_balance(&mut fixture.env.context, &beneficiary_account).await?,
        TOTAL_AMOUNT / 2
    );
    assert_eq!(
        get_token_balance(&mut fixture.env.context, &fixture.deployed.vault_token_account).await?,
        TOTAL_AMOUNT / 2
    );

    // One token more than released is refused
    let ix = withdraw_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.deployed.vault_token_account,
        &beneficiary_account,
        &fixture.mint.mint,
        &fixture.owner.pubkey(),
        1,
    );
    let attempt = send_ix(&mut fixture.env.context, ix, &[&fixture.owner]).await?;
    assert_vesting_error(attempt, VestingError::InsufficientReleased);

    // Far past the end everything is released, and no more than that
    warp_to_timestamp(&mut fixture.env.context, END_TIMESTAMP + 365 * 86_400).await?;

    let ix = withdraw_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.deployed.vault_token_account,
        &beneficiary_account,
        &fixture.mint.mint,
        &fixture.owner.pubkey(),
        TOTAL_AMOUNT / 2,
    );
    send_ix(&mut fixture.env.context, ix, &[&fixture.owner])
        .await?
        .expect("withdraw of the remainder should succeed");

    assert_eq!(
        get_token_balance(&mut fixture.env.context, &beneficiary_account).await?,
        TOTAL_AMOUNT
    );

    let vault = get_vault_state(&mut fixture.env.context, &fixture.deployed.vault).await?;
    assert_eq!(vault.withdrawn, TOTAL_AMOUNT);

    let ix = withdraw_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.deployed.vault_token_account,
        &beneficiary_account,
        &fixture.mint.mint,
        &fixture.owner.pubkey(),
        1,
    );
    let attempt = send_ix(&mut fixture.env.context, ix, &[&fixture.owner]).await?;
    assert_vesting_error(attempt, VestingError::InsufficientReleased);

    Ok(())
}

#[tokio::test]
async fn withdraw_only_pays_the_beneficiary() -> FuzzResult<()> {
    let mut fixture = setup_vault_fixture().await?;
    fund_escrow(&mut fixture).await?;

    // A token account the owner controls is not a valid destination
    let owner_account = create_token_account(
        &mut fixture.env.context,
        &fixture.mint.mint,
        &fixture.owner.pubkey(),
    )
    .await?;

    warp_to_timestamp(&mut fixture.env.context, END_TIMESTAMP + 1).await?;

    let ix = withdraw_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.deployed.vault_token_account,
        &owner_account,
        &fixture.mint.mint,
        &fixture.owner.pubkey(),
        TOTAL_AMOUNT,
    );
    let attempt = send_ix(&mut fixture.env.context, ix, &[&fixture.owner]).await?;
    assert_vesting_error(attempt, VestingError::InvalidBeneficiary);

    assert_eq!(
        get_token_balance(&mut fixture.env.context, &fixture.deployed.vault_token_account).await?,
        TOTAL_AMOUNT
    );

    Ok(())
}

#[tokio::test]
async fn withdraw_requires_the_owner() -> FuzzResult<()> {
    let mut fixture = setup_vault_fixture().await?;
    fund_escrow(&mut fixture).await?;
    let beneficiary_account = create_token_account(
        &mut fixture.env.context,
        &fixture.mint.mint,
        &fixture.beneficiary,
    )
    .await?;

    warp_to_timestamp(&mut fixture.env.context, END_TIMESTAMP + 1).await?;

    // Not even the beneficiary can pull funds without the owner
    let bystander = Keypair::new();
    let ix = withdraw_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.deployed.vault_token_account,
        &beneficiary_account,
        &fixture.mint.mint,
        &bystander.pubkey(),
        TOTAL_AMOUNT,
    );
    let attempt = send_ix(&mut fixture.env.context, ix, &[&bystander]).await?;
    assert_vesting_error(attempt, VestingError::NotOwner);

    Ok(())
}

#[tokio::test]
async fn staking_requires_the_owner() -> FuzzResult<()> {
    let mut fixture = setup_vault_fixture().await?;

    let bystander = Keypair::new();
    let pool_state = Pubkey::new_unique();
    let ix = stake_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.factory.factory,
        &bystander.pubkey(),
        &fixture.deployed.vault_token_account,
        &pool_state,
        &fixture.factory.staking_pool,
        TOTAL_AMOUNT,
    );
    let attempt = send_ix(&mut fixture.env.context, ix, &[&bystander]).await?;
    assert_vesting_error(attempt, VestingError::NotOwner);

    Ok(())
}

#[tokio::test]
async fn staking_only_targets_the_pinned_pool() -> FuzzResult<()> {
    let mut fixture = setup_vault_fixture().await?;

    // Forwarding to any program other than the factory's collaborator is
    // refused during account validation
    let rogue_program = Pubkey::new_unique();
    let pool_state = Pubkey::new_unique();
    let ix = stake_ix(
        &fixture.env.program_id,
        &fixture.deployed.vault,
        &fixture.factory.factory,
        &fixture.owner.pubkey(),
        &fixture.deployed.vault_token_account,
        &pool_state,
        &rogue_program,
        TOTAL_AMOUNT,
    );
    let attempt = send_ix(&mut fixture.env.context, ix, &[&fixture.owner]).await?;
    assert!(attempt.is_err(), "rogue staking program must be rejected");

    Ok(())
}
