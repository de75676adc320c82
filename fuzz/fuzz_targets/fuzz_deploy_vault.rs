use arbitrary::Arbitrary;
use fuzz_helpers::*;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use vesting_factory::error::VestingError;
use vesting_factory::state::Beneficiary;

/// Fuzzable input for the deploy_vault instruction
#[derive(Debug, Clone, Arbitrary)]
pub struct DeployVaultFuzzInput {
    start_timestamp: i64,
    end_timestamp: i64,
    amount: u64,
    /// Exercise the zero-address beneficiary rejection
    zero_beneficiary: bool,
}

async fn fuzz_deploy_vault_once(input: DeployVaultFuzzInput) -> FuzzResult<()> {
    let (mut env, _mint, factory) = match setup_complete_environment(6).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Setup failed: {}", e);
            return Ok(());
        }
    };

    let deployer = Keypair::new();
    fund_account(&mut env.context, &deployer.pubkey(), 1_000_000_000).await?;

    let beneficiary = if input.zero_beneficiary {
        Pubkey::default()
    } else {
        Pubkey::new_unique()
    };

    let (deployed, result) = deploy_vault(
        &mut env.context,
        &env.program_id,
        &factory,
        &deployer,
        &beneficiary,
        input.start_timestamp,
        input.end_timestamp,
        input.amount,
    )
    .await?;

    match result {
        Ok(()) => {
            // Only valid parameters may mint a live vault
            assert!(
                input.start_timestamp < input.end_timestamp,
                "degenerate schedule accepted: {:?}",
                input
            );
            assert_ne!(beneficiary, Pubkey::default(), "zero beneficiary accepted");

            let vault = get_vault_state(&mut env.context, &deployed.vault).await?;
            assert!(vault.initialized);
            assert_eq!(vault.owner, Some(deployer.pubkey()));
            assert_eq!(vault.beneficiary, Beneficiary::Account(beneficiary));
            assert_eq!(vault.schedule.start_timestamp, input.start_timestamp);
            assert_eq!(vault.schedule.end_timestamp, input.end_timestamp);
            assert_eq!(vault.schedule.amount, input.amount);
            assert_eq!(vault.withdrawn, 0);

            // The live clone can never be initialized again
            let retry = initialize_ix(
                &env.program_id,
                &deployed.vault,
                &deployer.pubkey(),
                &Pubkey::new_unique(),
                input.start_timestamp,
                input.end_timestamp,
                input.amount,
            );
            let retry_result = send_ix(&mut env.context, retry, &[]).await?;
            assert_vesting_error(retry_result, VestingError::AlreadyInitialized);

            println!(
                "✓ PASS deploy: start={} end={} amount={}",
                input.start_timestamp, input.end_timestamp, input.amount
            );
        }
        Err(e) => {
            // Rejections must be our validation errors, and the vault
            // must not exist afterwards (all-or-nothing)
            let code = custom_error_code(&e)
                .unwrap_or_else(|| panic!("unexpected error during deploy: {:?}\nInput: {:?}", e, input));
            let acceptable = [
                u32::from(VestingError::InvalidSchedule),
                u32::from(VestingError::InvalidBeneficiary),
            ];
            assert!(
                acceptable.contains(&code),
                "unexpected custom error {} during deploy\nInput: {:?}",
                code,
                input
            );

            let leftover = env.context.banks_client.get_account(deployed.vault).await?;
            assert!(leftover.is_none(), "rejected deploy left a vault behind");

            println!("✗ Deploy rejected as expected: code={}", code);
        }
    }

    Ok(())
}

#[cfg(feature = "honggfuzz_fuzz")]
fn main() {
    use honggfuzz::fuzz;
    loop {
        fuzz!(|input: DeployVaultFuzzInput| {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async {
                if let Err(e) = fuzz_deploy_vault_once(input).await {
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
