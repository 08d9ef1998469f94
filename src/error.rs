//! Error handling primitives for the LIS3MDL driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus transfer primitive.
    Interface(E),
    /// The chip-select pin reported a failure while being driven.
    ChipSelect,
    /// A transaction is already in flight on the shared bus; retry later.
    Busy,
    /// The supplied register address has the READ or MD framing bit preset.
    ///
    /// The top two address bits belong to the codec; callers pass bare
    /// six-bit register addresses.
    InvalidAddress,
    /// The requested transfer size is outside the supported 1..=6 range.
    InvalidSize,
    /// The device collection is empty or the device index is out of range.
    InvalidDevice,
    /// The transfer state machine was asked to advance from a state with no
    /// defined successor. Indicates a protocol bug; not retryable.
    InvalidTransition,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
