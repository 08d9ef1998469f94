//! Per-sensor device record.

use crate::config::{ConfigRegisters, InitParams};
use crate::state::{RetrievalState, TransferState};

/// Maximum number of consecutive registers accessed in one burst, and thus
/// the capacity of the per-device transfer buffers.
pub const TRANSFER_BUFFER_CAPACITY: usize = 6;

/// State record for one LIS3MDL sensor sharing the scheduler's bus.
///
/// The record owns its chip-select pin; the bus itself is owned by the
/// [`Scheduler`](crate::scheduler::Scheduler), which is the only component
/// allowed to drive transfers. Callers may inspect state between scheduler
/// steps but must not mutate it while a transaction is in flight.
pub struct Lis3mdl<CS> {
    pub(crate) transfer_state: TransferState,
    pub(crate) retrieval_state: RetrievalState,
    pub(crate) register_address: u8,
    pub(crate) tx_buffer: [u8; TRANSFER_BUFFER_CAPACITY],
    pub(crate) rx_buffer: [u8; TRANSFER_BUFFER_CAPACITY],
    pub(crate) transfer_size: u8,
    pub(crate) config_registers: ConfigRegisters,
    pub(crate) cs: CS,
}

impl<CS> Lis3mdl<CS> {
    /// Creates a device record from a chip-select pin and init parameters.
    ///
    /// The parameters are encoded into raw register bytes exactly once, here.
    /// The record starts in [`TransferState::ResettingRegisters`] so the
    /// scheduler replays the full initialization sequence (soft reset, offset,
    /// control, and interrupt registers) before the device first idles.
    pub fn new(cs: CS, params: &InitParams) -> Self {
        Self {
            transfer_state: TransferState::ResettingRegisters,
            retrieval_state: RetrievalState::StartingStatusCheck,
            register_address: 0,
            tx_buffer: [0; TRANSFER_BUFFER_CAPACITY],
            rx_buffer: [0; TRANSFER_BUFFER_CAPACITY],
            transfer_size: 0,
            config_registers: params.encode(),
            cs,
        }
    }

    /// Consumes the record and returns the owned chip-select pin.
    pub fn release(self) -> CS {
        self.cs
    }

    /// Current transfer phase.
    pub fn transfer_state(&self) -> TransferState {
        self.transfer_state
    }

    /// Current data-retrieval protocol state.
    pub fn retrieval_state(&self) -> RetrievalState {
        self.retrieval_state
    }

    /// Whether the device has no pending or in-flight transaction.
    pub fn is_idling(&self) -> bool {
        self.transfer_state.is_idle()
    }

    /// Bytes captured by the most recent completed read transaction.
    ///
    /// Valid once the device has returned to idle after a read; empty before
    /// any transaction has been armed.
    pub fn rx_data(&self) -> &[u8] {
        &self.rx_buffer[..self.transfer_size as usize]
    }

    /// Raw register bytes this device replays during initialization.
    pub fn config_registers(&self) -> &ConfigRegisters {
        &self.config_registers
    }

    /// Forces the transfer state back to idle and clears the transfer
    /// bookkeeping.
    ///
    /// Recovery entry point after a fatal transport error: the scheduler
    /// leaves the device state untouched on such failures, and the caller
    /// decides whether to abandon the command by calling this.
    pub fn reset_transfer(&mut self) {
        self.clear_transfer();
        self.transfer_state = TransferState::Idle;
        self.retrieval_state = RetrievalState::StartingStatusCheck;
    }

    /// Clears buffers, the framed address, and the transfer size ahead of
    /// arming a new transaction.
    pub(crate) fn clear_transfer(&mut self) {
        self.register_address = 0;
        self.tx_buffer = [0; TRANSFER_BUFFER_CAPACITY];
        self.rx_buffer = [0; TRANSFER_BUFFER_CAPACITY];
        self.transfer_size = 0;
    }
}
