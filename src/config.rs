//! # Configuration Constants
//!
//! This module contains only the configuration values that are actually used
//! throughout the Gullak client.

/// Remote contract coordinates
pub mod contract {
    /// On-chain address the piggy-bank module is published under
    pub const CONTRACT_ADDRESS: &str =
        "0x8fdc05f62b24f7e21c7f3e64666f4012813edeafffce50757775d837e11b6d47";

    /// Module name within the contract address
    pub const MODULE_NAME: &str = "piggy_bank";

    /// Abort marker the ledger raises when no piggy bank exists for an
    /// account. Matched by substring against capability error text.
    pub const NOT_EXISTS_MARKER: &str = "E_PIGGY_BANK_NOT_EXISTS";
}

/// Fixed-point unit handling
pub mod units {
    /// Raw ledger units per display unit (8 decimal places)
    pub const UNIT_SCALE: u64 = 100_000_000;
}

/// Timing parameters for deferred refresh and transient status display
pub mod timing {
    use std::time::Duration;

    /// Delay between an optimistic transaction success and the follow-up
    /// dashboard refresh. The relay confirms submission, not finality, so
    /// the refresh waits for the ledger to catch up.
    pub const REFRESH_DELAY: Duration = Duration::from_secs(2);

    /// How long a transient status message stays visible before auto-clearing
    pub const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(5);

    /// Seconds per day, for lock countdowns and lock-duration arguments
    pub const SECONDS_PER_DAY: u64 = 86_400;
}

/// Address display formatting
pub mod display {
    /// Leading characters kept when shortening an address
    pub const ADDRESS_DISPLAY_PREFIX: usize = 6;

    /// Trailing characters kept when shortening an address
    pub const ADDRESS_DISPLAY_SUFFIX: usize = 4;
}
