//! Default value functions for the overlay config.

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_weight() -> i32 {
    0
}
