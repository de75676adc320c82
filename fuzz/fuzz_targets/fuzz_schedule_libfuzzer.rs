#![cfg_attr(feature = "libfuzzer_fuzz", no_main)]

use arbitrary::Arbitrary;
use vesting_factory::state::VestingSchedule;

/// Fuzzable input for the released-amount curve
#[derive(Debug, Clone, Arbitrary)]
pub struct ScheduleFuzzInput {
    start_timestamp: i64,
    end_timestamp: i64,
    amount: u64,
    probe_a: i64,
    probe_b: i64,
}

fn check_schedule_properties(input: ScheduleFuzzInput) {
    let schedule = VestingSchedule {
        start_timestamp: input.start_timestamp,
        end_timestamp: input.end_timestamp,
        amount: input.amount,
    };

    if !schedule.is_valid() {
        // Nothing to check; initialization would have refused it
        return;
    }

    let earlier = input.probe_a.min(input.probe_b);
    let later = input.probe_a.max(input.probe_b);

    let released_earlier = schedule.released_amount(earlier);
    let released_later = schedule.released_amount(later);

    // Monotonic, bounded, exact at the boundaries
    assert!(
        released_earlier <= released_later,
        "release curve regressed between {} and {}: {} > {}",
        earlier,
        later,
        released_earlier,
        released_later
    );
    assert!(released_later <= schedule.amount);
    assert_eq!(schedule.released_amount(schedule.start_timestamp), 0);
    assert_eq!(schedule.released_amount(schedule.end_timestamp), schedule.amount);
}

#[cfg(feature = "libfuzzer_fuzz")]
libfuzzer_sys::fuzz_target!(|input: ScheduleFuzzInput| {
    check_schedule_properties(input);
});

#[cfg(not(feature = "libfuzzer_fuzz"))]
fn main() {
    eprintln!("Build with --features libfuzzer_fuzz and run under cargo fuzz");
}
