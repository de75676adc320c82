use arbitrary::Arbitrary;
use fuzz_helpers::*;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use vesting_factory::error::VestingError;
use vesting_factory::state::Beneficiary;

/// Fuzzable input for direct initialize calls. Whatever the arguments,
/// no account this program has ever created can be initialized twice.
#[derive(Debug, Clone, Arbitrary)]
pub struct InitializeFuzzInput {
    start_timestamp: i64,
    end_timestamp: i64,
    amount: u64,
    /// Aim at the canonical implementation instead of a deployed vault
    target_implementation: bool,
}

async fn fuzz_initialize_once(input: InitializeFuzzInput) -> FuzzResult<()> {
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

    let target = if input.target_implementation {
        factory.implementation
    } else {
        deployed.vault
    };
    let before = get_vault_state(&mut env.context, &target).await?;

    let ix = initialize_ix(
        &env.program_id,
        &target,
        &Pubkey::new_unique(),
        &Pubkey::new_unique(),
        input.start_timestamp,
        input.end_timestamp,
        input.amount,
    );
    let attempt = send_ix(&mut env.context, ix, &[]).await?;
    assert_vesting_error(attempt, VestingError::AlreadyInitialized);

    // And nothing moved
    let after = get_vault_state(&mut env.context, &target).await?;
    assert_eq!(after.owner, before.owner);
    assert_eq!(after.beneficiary, before.beneficiary);
    assert_eq!(after.schedule, before.schedule);
    assert!(after.initialized);
    if input.target_implementation {
        assert_eq!(after.beneficiary, Beneficiary::Sentinel);
        assert_eq!(after.owner, None);
    }

    println!(
        "✓ PASS initialize refused on {}",
        if input.target_implementation {
            "implementation"
        } else {
            "deployed vault"
        }
    );

    Ok(())
}

#[cfg(feature = "honggfuzz_fuzz")]
fn main() {
    use honggfuzz::fuzz;
    loop {
        fuzz!(|input: InitializeFuzzInput| {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async {
                if let Err(e) = fuzz_initialize_once(input).await {
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
