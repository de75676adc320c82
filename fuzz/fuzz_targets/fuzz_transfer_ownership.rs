use arbitrary::Arbitrary;
use fuzz_helpers::*;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use vesting_factory::error::VestingError;
use vesting_factory::state::Beneficiary;

/// Fuzzable input for transfer_ownership
#[derive(Debug, Clone, Arbitrary)]
pub struct TransferOwnershipFuzzInput {
    /// Sign as the real owner, or as a bystander
    as_owner: bool,
    /// Hand the vault to the zero address
    zero_new_owner: bool,
}

async fn fuzz_transfer_ownership_once(input: TransferOwnershipFuzzInput) -> FuzzResult<()> {
    let (mut env, _mint, factory) = match setup_complete_environment(6).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Setup failed: {}", e);
            return Ok(());
        }
    };

    let deployer = Keypair::new();
    fund_account(&mut env.context, &deployer.pubkey(), 1_000_000_000).await?;
    let beneficiary = Pubkey::new_unique();

    let (deployed, result) = deploy_vault(
        &mut env.context,
        &env.program_id,
        &factory,
        &deployer,
        &beneficiary,
        START_TIMESTAMP,
        END_TIMESTAMP,
        TOTAL_AMOUNT,
    )
    .await?;
    result.expect("fixture deploy should succeed");

    let bystander = Keypair::new();
    let caller = if input.as_owner { &deployer } else { &bystander };
    let new_owner = if input.zero_new_owner {
        Pubkey::default()
    } else {
        Pubkey::new_unique()
    };

    let ix = transfer_ownership_ix(&env.program_id, &deployed.vault, &caller.pubkey(), &new_owner);
    let attempt = send_ix(&mut env.context, ix, &[caller]).await?;

    let vault = get_vault_state(&mut env.context, &deployed.vault).await?;
    match (input.as_owner, input.zero_new_owner) {
        (true, false) => {
            attempt.expect("owner-signed transfer should succeed");
            assert_eq!(vault.owner, Some(new_owner));
        }
        (true, true) => {
            assert_vesting_error(attempt, VestingError::InvalidOwner);
            assert_eq!(vault.owner, Some(deployer.pubkey()));
        }
        (false, _) => {
            assert_vesting_error(attempt, VestingError::NotOwner);
            assert_eq!(vault.owner, Some(deployer.pubkey()));
        }
    }

    // The beneficiary never moves, whoever holds the vault
    assert_eq!(vault.beneficiary, Beneficiary::Account(beneficiary));

    println!(
        "✓ PASS transfer_ownership: as_owner={} zero_new_owner={}",
        input.as_owner, input.zero_new_owner
    );

    Ok(())
}

#[cfg(feature = "honggfuzz_fuzz")]
fn main() {
    use honggfuzz::fuzz;
    loop {
        fuzz!(|input: TransferOwnershipFuzzInput| {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async {
                if let Err(e) = fuzz_transfer_ownership_once(input).await {
                    eprintln!("Fuzz iteration failed: {}", e);
                }
            });
        });
    }
}

#[cfg(not(feature = "honggfuzz_fuzz"))]
fn main() {
    eprintln!("Build with --features honggfuzz_fuzz and run under cargo hfuzz");
}
