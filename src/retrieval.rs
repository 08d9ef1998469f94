//! Data-retrieval protocol: status polling followed by a burst read of the
//! six output-data registers, layered on top of the transaction scheduler.

use crate::device::{Lis3mdl, TRANSFER_BUFFER_CAPACITY};
use crate::error::{Error, Result};
use crate::interface::TransferBus;
use crate::log::debug;
use crate::registers::{Status, REG_OUT_X_L, REG_STATUS};
use crate::scheduler::{all_idling, Scheduler};
use crate::state::RetrievalState;

/// One decoded three-axis magnetic sample.
///
/// Raw counts at the configured full scale; immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagneticReading {
    /// X-axis raw count.
    pub x: i16,
    /// Y-axis raw count.
    pub y: i16,
    /// Z-axis raw count.
    pub z: i16,
}

impl MagneticReading {
    /// Reconstructs a reading from the six output-register bytes
    /// (`OUT_X_L` through `OUT_Z_H`, little-endian per axis).
    pub fn from_output_bytes(bytes: &[u8; 6]) -> Self {
        Self {
            x: i16::from_le_bytes([bytes[0], bytes[1]]),
            y: i16::from_le_bytes([bytes[2], bytes[3]]),
            z: i16::from_le_bytes([bytes[4], bytes[5]]),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MagneticReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "MagneticReading {{ x: {}, y: {}, z: {} }}",
            self.x,
            self.y,
            self.z
        );
    }
}

/// Advances the retrieval protocol for one device by at most one action.
///
/// Call once per scheduler tick, alongside [`Scheduler::step`]. The protocol
/// arms a one-byte status read, waits for the transaction to finish, and when
/// the all-axes data-ready bit is set arms the six-byte output read; the
/// decoded reading is returned exactly once, on the call that observes the
/// completed data transaction. All other calls return `Ok(None)`.
///
/// A busy rejection while arming is not an error; the same arming is retried
/// on the next call. The retrieval state only ever advances once the
/// underlying transfer state has returned to idle.
pub fn poll_magnetic_data<BUS, CS>(
    scheduler: &mut Scheduler<BUS>,
    devices: &mut [Lis3mdl<CS>],
    index: usize,
) -> Result<Option<MagneticReading>, BUS::Error>
where
    BUS: TransferBus,
{
    if devices.is_empty() || index >= devices.len() {
        return Err(Error::InvalidDevice);
    }

    match devices[index].retrieval_state {
        // DataAvailable was reported on the previous call; resume polling.
        RetrievalState::StartingStatusCheck | RetrievalState::DataAvailable => {
            arm(scheduler, devices, index, REG_STATUS, 1, RetrievalState::StatusCheckInProgress)?;
            Ok(None)
        }
        RetrievalState::StatusCheckInProgress => {
            if all_idling(devices) {
                let status = Status::from(devices[index].rx_buffer[0]);
                devices[index].retrieval_state = if status.xyz_data_available() {
                    RetrievalState::StartingDataRetrieval
                } else {
                    // Deliberate busy-poll: no new sample yet, ask again.
                    RetrievalState::StartingStatusCheck
                };
            }
            Ok(None)
        }
        RetrievalState::StartingDataRetrieval => {
            arm(
                scheduler,
                devices,
                index,
                REG_OUT_X_L,
                TRANSFER_BUFFER_CAPACITY,
                RetrievalState::DataRetrievalInProgress,
            )?;
            Ok(None)
        }
        RetrievalState::DataRetrievalInProgress => {
            if all_idling(devices) {
                let reading = MagneticReading::from_output_bytes(&devices[index].rx_buffer);
                devices[index].retrieval_state = RetrievalState::DataAvailable;
                debug!("device {} produced a reading", index);
                return Ok(Some(reading));
            }
            Ok(None)
        }
        // Latched arming failure; the caller resets via reset_transfer().
        RetrievalState::Error => Err(Error::InvalidTransition),
    }
}

/// Arms a read for the protocol; `Busy` means retry on the next call, any
/// other rejection latches the error state.
fn arm<BUS, CS>(
    scheduler: &mut Scheduler<BUS>,
    devices: &mut [Lis3mdl<CS>],
    index: usize,
    register: u8,
    size: usize,
    next: RetrievalState,
) -> Result<(), BUS::Error>
where
    BUS: TransferBus,
{
    match scheduler.request_read(devices, index, register, size) {
        Ok(()) => {
            devices[index].retrieval_state = next;
            Ok(())
        }
        Err(Error::Busy) => Ok(()),
        Err(err) => {
            devices[index].retrieval_state = RetrievalState::Error;
            Err(err)
        }
    }
}
