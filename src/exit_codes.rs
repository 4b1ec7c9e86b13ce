//! Exit code constants for the cfgoverlay CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing input)
//! - 2: Storage failure (I/O, serialization, read-only violation)
//! - 3: Configuration failure (bad overlay config, malformed pattern, unknown filter)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid input.
pub const USER_ERROR: i32 = 1;

/// Storage failure: the backing store could not be read or written.
pub const STORAGE_FAILURE: i32 = 2;

/// Configuration failure: the overlay config or a filter's settings are invalid.
pub const CONFIG_FAILURE: i32 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [SUCCESS, USER_ERROR, STORAGE_FAILURE, CONFIG_FAILURE];
        for (i, &a) in codes.iter().enumerate() {
            for (j, &b) in codes.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "Exit codes must be distinct");
                }
            }
        }
    }

    #[test]
    fn success_is_zero() {
        assert_eq!(SUCCESS, 0);
    }
}
