//! Bus transfer abstraction for the LIS3MDL driver.

pub mod spi;

/// Abstraction over the asynchronous transfer primitives the scheduler drives.
///
/// Implementations start a transfer and return immediately; completion is
/// reported out of band through the completion flag handed to
/// [`Scheduler::step`](crate::scheduler::Scheduler::step), typically set from
/// a transfer-complete interrupt. Chip-select framing is not this trait's
/// concern; the scheduler drives the per-device pin around each transfer.
pub trait TransferBus {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Begins transmitting `bytes` on the bus.
    ///
    /// Implementations that cannot borrow `bytes` for the duration of the
    /// transfer (DMA engines) must latch them into their own buffer before
    /// returning.
    fn start_transmit(&mut self, bytes: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Begins receiving `len` bytes into the implementation's own buffer.
    fn start_receive(&mut self, len: usize) -> core::result::Result<(), Self::Error>;

    /// Copies the bytes captured by the last completed reception into `buf`.
    ///
    /// Called by the scheduler exactly once per completed receive, with `buf`
    /// no longer than the `len` passed to
    /// [`start_receive`](Self::start_receive).
    fn take_received(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;
}
