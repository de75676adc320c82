use anchor_lang::prelude::*;

/// A linear unlock of `amount` tokens between two timestamps. Immutable
/// once written into a vault.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VestingSchedule {
    pub start_timestamp: i64,
    pub end_timestamp: i64,
    pub amount: u64,
}

impl VestingSchedule {
    pub const LEN: usize = 8 + // start_timestamp
        8 + // end_timestamp
        8; // amount

    pub fn is_valid(&self) -> bool {
        self.start_timestamp < self.end_timestamp
    }

    /// Portion of `amount` unlocked at `at_timestamp`: zero through the
    /// start, everything from the end, linear interpolation with floor
    /// division in between. Pure and monotonic non-decreasing.
    pub fn released_amount(&self, at_timestamp: i64) -> u64 {
        if at_timestamp <= self.start_timestamp {
            0
        } else if at_timestamp >= self.end_timestamp {
            self.amount
        } else {
            // widen through i128 so even a window spanning the whole i64
            // range cannot overflow; elapsed < duration keeps the
            // quotient within u64
            let elapsed = (at_timestamp as i128 - self.start_timestamp as i128) as u128;
            let duration = (self.end_timestamp as i128 - self.start_timestamp as i128) as u128;
            ((self.amount as u128) * elapsed / duration) as u64
        }
    }
}
