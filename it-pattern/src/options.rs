//! Load-time options

use crate::MIN_COMPATIBLE_VERSION;

/// What to do with a cell whose instrument number has no definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DanglingInstruments {
    /// Fail the load with [`PatternError::DanglingInstrument`](crate::PatternError)
    #[default]
    Reject,
    /// Replace the reference with 0 (no instrument) and log a warning
    Clear,
}

/// Options accepted by [`load`](crate::load) and [`parse`](crate::parse)
///
/// The defaults accept any module written by IT 2.00 or later and reject
/// dangling instrument references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Lowest accepted "compatible with" version (`Cmwt` header field)
    pub min_compatible_version: u16,
    /// Policy for instrument numbers past the end of the instrument table
    pub dangling_instruments: DanglingInstruments,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            min_compatible_version: MIN_COMPATIBLE_VERSION,
            dangling_instruments: DanglingInstruments::Reject,
        }
    }
}

impl LoadOptions {
    /// Accept modules with any compatibility version
    pub fn any_version(mut self) -> Self {
        self.min_compatible_version = 0;
        self
    }

    /// Set the dangling instrument policy
    pub fn with_dangling_instruments(mut self, policy: DanglingInstruments) -> Self {
        self.dangling_instruments = policy;
        self
    }
}
