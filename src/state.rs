//! The two per-device state machines: one for the transfer in flight on the
//! bus, one for the data-retrieval protocol layered on top of it.

/// Low-level transfer phase of a device.
///
/// Every non-[`Idle`](Self::Idle) state corresponds to exactly one bus
/// transfer; the scheduler launches it and
/// [`advance_on_completion`](Self::advance_on_completion) moves to the next
/// phase once the completion signal fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferState {
    /// Writing the soft-reset command to `CTRL_REG2`.
    ResettingRegisters,
    /// Burst-writing the six offset register bytes.
    InitializingOffsets,
    /// Burst-writing the five control register bytes.
    InitializingCtrl,
    /// Burst-writing the four interrupt register bytes.
    InitializingInt,
    /// No transfer pending or in flight.
    Idle,
    /// Transmitting the framed address byte of a read request.
    SendingReadAddress,
    /// Transmitting the framed address byte of a write request.
    SendingWriteAddress,
    /// Receiving `transfer_size` data bytes.
    ReadingData,
    /// Transmitting `transfer_size` data bytes.
    WritingData,
}

impl TransferState {
    /// Computes the state following a completed bus transfer.
    ///
    /// Pure transition function with no side effects. Returns `None` when the
    /// current state has no defined successor (notably [`Idle`](Self::Idle),
    /// where no transfer can have completed); the caller must surface that as
    /// an error rather than continue.
    pub fn advance_on_completion(self) -> Option<Self> {
        match self {
            Self::ResettingRegisters => Some(Self::InitializingOffsets),
            Self::InitializingOffsets => Some(Self::InitializingCtrl),
            Self::InitializingCtrl => Some(Self::InitializingInt),
            Self::InitializingInt => Some(Self::Idle),
            Self::SendingReadAddress => Some(Self::ReadingData),
            Self::SendingWriteAddress => Some(Self::WritingData),
            Self::WritingData => Some(Self::Idle),
            Self::ReadingData => Some(Self::Idle),
            Self::Idle => None,
        }
    }

    /// Whether the device has no pending or in-flight transfer.
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

/// Data-retrieval protocol state, independent of [`TransferState`].
///
/// Only advances while the underlying transfer state is idle; the protocol in
/// [`poll_magnetic_data`](crate::retrieval::poll_magnetic_data) enforces that
/// precondition explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetrievalState {
    /// Arming a one-byte read of the status register.
    StartingStatusCheck,
    /// Status read armed; waiting for the transaction to finish.
    StatusCheckInProgress,
    /// Arming a six-byte read of the output registers.
    StartingDataRetrieval,
    /// Data read armed; waiting for the transaction to finish.
    DataRetrievalInProgress,
    /// A decoded reading was produced on the previous call.
    DataAvailable,
    /// Arming failed for a non-busy reason; latched until the caller resets.
    Error,
}
