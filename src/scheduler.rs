//! Cooperative transaction scheduler for one shared bus.
//!
//! The scheduler is re-entered from the caller's control loop and never
//! blocks: each [`step`](Scheduler::step) performs at most one
//! hardware-triggering action and returns immediately. Exactly one device
//! transacts on the bus at any time; arming a second device while another is
//! mid-transaction is refused with [`Error::Busy`].

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::OutputPin;

use crate::config::{CTRL_REG_COUNT, INT_REG_COUNT, OFFSET_REG_COUNT};
use crate::device::{Lis3mdl, TRANSFER_BUFFER_CAPACITY};
use crate::error::{Error, Result};
use crate::interface::TransferBus;
use crate::log::trace;
use crate::registers::{
    MD_BIT, READ_BIT, REG_CTRL1, REG_CTRL2, REG_INT_CFG, REG_OFFSET_X_L, SOFT_RESET_COMMAND,
};
use crate::state::TransferState;

/// Outcome of one scheduler step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepStatus {
    /// A transfer was launched or a completion was consumed.
    Progressed,
    /// Every device is idle; nothing to do until a new request arms one.
    AllIdling,
    /// A transfer is in flight and its completion signal has not fired yet.
    WaitingForCompletion,
}

/// Transaction scheduler owning the shared bus.
///
/// The in-flight bookkeeping is explicit instance state, so independent
/// bus/device-collection pairs can each run their own scheduler without
/// interfering.
pub struct Scheduler<BUS> {
    bus: BUS,
    in_flight: bool,
    active: Option<usize>,
}

/// Returns the index of the first device with a pending or in-flight
/// transaction, scanning in collection order.
pub fn first_non_idling<CS>(devices: &[Lis3mdl<CS>]) -> Option<usize> {
    devices.iter().position(|device| !device.is_idling())
}

/// Whether no device in the collection has a pending or in-flight transaction.
pub fn all_idling<CS>(devices: &[Lis3mdl<CS>]) -> bool {
    first_non_idling(devices).is_none()
}

impl<BUS> Scheduler<BUS> {
    /// Creates a scheduler owning the given transfer bus.
    pub const fn new(bus: BUS) -> Self {
        Self {
            bus,
            in_flight: false,
            active: None,
        }
    }

    /// Shared access to the owned bus.
    pub fn bus(&self) -> &BUS {
        &self.bus
    }

    /// Consumes the scheduler and returns the owned bus.
    pub fn release(self) -> BUS {
        self.bus
    }
}

impl<BUS> Scheduler<BUS>
where
    BUS: TransferBus,
{
    /// Drives the device collection forward by at most one transfer action.
    ///
    /// Call once per control-loop tick. `completion` is the flag the
    /// transfer-complete interrupt sets; the scheduler clears it exactly once
    /// per observed completion and never writes it otherwise.
    ///
    /// A transport failure surfaces as [`Error::Interface`] and leaves the
    /// failing device's transfer state unchanged; the caller decides whether
    /// to retry the step or abandon the command via
    /// [`Lis3mdl::reset_transfer`].
    pub fn step<CS>(
        &mut self,
        devices: &mut [Lis3mdl<CS>],
        completion: &AtomicBool,
    ) -> Result<StepStatus, BUS::Error>
    where
        CS: OutputPin,
    {
        if devices.is_empty() {
            return Err(Error::InvalidDevice);
        }

        if self.in_flight {
            if !completion.load(Ordering::Acquire) {
                return Ok(StepStatus::WaitingForCompletion);
            }
            completion.store(false, Ordering::Release);
            self.finish_transfer(devices)?;
            return Ok(StepStatus::Progressed);
        }

        match first_non_idling(devices) {
            None => Ok(StepStatus::AllIdling),
            Some(index) => {
                self.launch_transfer(devices, index)?;
                Ok(StepStatus::Progressed)
            }
        }
    }

    /// Arms a read of `size` consecutive registers starting at `register`.
    ///
    /// Arming only: the address is framed and the device moves to the
    /// sending-address phase, but nothing touches the bus until the next
    /// [`step`](Self::step). The received bytes are available through
    /// [`Lis3mdl::rx_data`] once the device returns to idle.
    pub fn request_read<CS>(
        &mut self,
        devices: &mut [Lis3mdl<CS>],
        index: usize,
        register: u8,
        size: usize,
    ) -> Result<(), BUS::Error> {
        self.validate_request(devices, index, register, size)?;

        let device = &mut devices[index];
        device.clear_transfer();
        device.register_address = register | READ_BIT | if size > 1 { MD_BIT } else { 0 };
        device.transfer_size = size as u8;
        device.transfer_state = TransferState::SendingReadAddress;
        Ok(())
    }

    /// Arms a write of `data` to consecutive registers starting at `register`.
    pub fn request_write<CS>(
        &mut self,
        devices: &mut [Lis3mdl<CS>],
        index: usize,
        register: u8,
        data: &[u8],
    ) -> Result<(), BUS::Error> {
        self.validate_request(devices, index, register, data.len())?;

        let device = &mut devices[index];
        device.clear_transfer();
        device.register_address = register | if data.len() > 1 { MD_BIT } else { 0 };
        device.transfer_size = data.len() as u8;
        device.tx_buffer[..data.len()].copy_from_slice(data);
        device.transfer_state = TransferState::SendingWriteAddress;
        Ok(())
    }

    /// Rejections happen here, before any device field or hardware state is
    /// touched.
    fn validate_request<CS>(
        &self,
        devices: &[Lis3mdl<CS>],
        index: usize,
        register: u8,
        size: usize,
    ) -> Result<(), BUS::Error> {
        if devices.is_empty() || index >= devices.len() {
            return Err(Error::InvalidDevice);
        }
        if register & (READ_BIT | MD_BIT) != 0 {
            return Err(Error::InvalidAddress);
        }
        if size == 0 || size > TRANSFER_BUFFER_CAPACITY {
            return Err(Error::InvalidSize);
        }
        if self.in_flight || !all_idling(devices) {
            return Err(Error::Busy);
        }
        Ok(())
    }

    fn finish_transfer<CS>(&mut self, devices: &mut [Lis3mdl<CS>]) -> Result<(), BUS::Error>
    where
        CS: OutputPin,
    {
        let index = self.active.ok_or(Error::InvalidDevice)?;
        let device = devices.get_mut(index).ok_or(Error::InvalidDevice)?;

        if device.transfer_state == TransferState::ReadingData {
            let size = usize::from(device.transfer_size);
            self.bus.take_received(&mut device.rx_buffer[..size])?;
        }

        let next = device
            .transfer_state
            .advance_on_completion()
            .ok_or(Error::InvalidTransition)?;
        device.transfer_state = next;
        trace!("device {} transfer complete", index);

        // The address phases keep the frame open for the data phase that
        // follows; every other completion closes it.
        if !matches!(
            next,
            TransferState::WritingData | TransferState::ReadingData
        ) {
            device.cs.set_high().map_err(|_| Error::ChipSelect)?;
            self.active = None;
        }
        self.in_flight = false;
        Ok(())
    }

    fn launch_transfer<CS>(
        &mut self,
        devices: &mut [Lis3mdl<CS>],
        index: usize,
    ) -> Result<(), BUS::Error>
    where
        CS: OutputPin,
    {
        let device = &mut devices[index];
        device.cs.set_low().map_err(|_| Error::ChipSelect)?;

        match device.transfer_state {
            TransferState::ResettingRegisters => {
                let frame = [REG_CTRL2, SOFT_RESET_COMMAND];
                self.bus.start_transmit(&frame)?;
            }
            TransferState::InitializingOffsets => {
                let mut frame = [0u8; OFFSET_REG_COUNT + 1];
                frame[0] = REG_OFFSET_X_L | MD_BIT;
                frame[1..].copy_from_slice(&device.config_registers.offsets);
                self.bus.start_transmit(&frame)?;
            }
            TransferState::InitializingCtrl => {
                let mut frame = [0u8; CTRL_REG_COUNT + 1];
                frame[0] = REG_CTRL1 | MD_BIT;
                frame[1..].copy_from_slice(&device.config_registers.ctrl);
                self.bus.start_transmit(&frame)?;
            }
            TransferState::InitializingInt => {
                let mut frame = [0u8; INT_REG_COUNT + 1];
                frame[0] = REG_INT_CFG | MD_BIT;
                frame[1..].copy_from_slice(&device.config_registers.int);
                self.bus.start_transmit(&frame)?;
            }
            TransferState::SendingReadAddress | TransferState::SendingWriteAddress => {
                self.bus
                    .start_transmit(core::slice::from_ref(&device.register_address))?;
            }
            TransferState::WritingData => {
                let size = usize::from(device.transfer_size);
                self.bus.start_transmit(&device.tx_buffer[..size])?;
            }
            TransferState::ReadingData => {
                self.bus.start_receive(usize::from(device.transfer_size))?;
            }
            // Selection only ever picks non-idle devices.
            TransferState::Idle => return Err(Error::InvalidTransition),
        }

        trace!("device {} transfer launched", index);
        self.active = Some(index);
        self.in_flight = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InitParams;
    use crate::registers::REG_STATUS;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct FakePin {
        // Level history, false = low.
        history: Vec<bool>,
    }

    impl FakePin {
        fn is_low(&self) -> bool {
            self.history.last() == Some(&false)
        }
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
            self.history.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
            self.history.push(true);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeBus {
        transmitted: Vec<Vec<u8>>,
        receive_requests: Vec<usize>,
        rx_script: Vec<Vec<u8>>,
        pending_rx: Vec<u8>,
        fail_next_transmit: bool,
    }

    impl TransferBus for FakeBus {
        type Error = ();

        fn start_transmit(&mut self, bytes: &[u8]) -> core::result::Result<(), Self::Error> {
            if self.fail_next_transmit {
                self.fail_next_transmit = false;
                return Err(());
            }
            self.transmitted.push(bytes.to_vec());
            Ok(())
        }

        fn start_receive(&mut self, len: usize) -> core::result::Result<(), Self::Error> {
            self.receive_requests.push(len);
            assert!(!self.rx_script.is_empty(), "unscripted receive");
            self.pending_rx = self.rx_script.remove(0);
            assert_eq!(self.pending_rx.len(), len, "scripted length mismatch");
            Ok(())
        }

        fn take_received(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
            buf.copy_from_slice(&self.pending_rx[..buf.len()]);
            Ok(())
        }
    }

    fn idle_device() -> Lis3mdl<FakePin> {
        let mut device = Lis3mdl::new(FakePin::default(), &InitParams::default());
        device.transfer_state = TransferState::Idle;
        device
    }

    /// Steps until everything idles, raising the completion flag after each
    /// call the way a synchronous bus's interrupt would.
    fn pump(
        scheduler: &mut Scheduler<FakeBus>,
        devices: &mut [Lis3mdl<FakePin>],
        completion: &AtomicBool,
    ) {
        loop {
            match scheduler.step(devices, completion).unwrap() {
                StepStatus::AllIdling => break,
                _ => completion.store(true, Ordering::Release),
            }
        }
    }

    fn snapshot(device: &Lis3mdl<FakePin>) -> (TransferState, u8, u8, [u8; 6], [u8; 6]) {
        (
            device.transfer_state,
            device.register_address,
            device.transfer_size,
            device.tx_buffer,
            device.rx_buffer,
        )
    }

    #[test]
    fn single_status_read_walks_the_full_transaction() {
        let completion = AtomicBool::new(false);
        let mut scheduler = Scheduler::new(FakeBus {
            rx_script: vec![vec![0x08]],
            ..FakeBus::default()
        });
        let mut devices = [idle_device()];

        scheduler
            .request_read(&mut devices, 0, REG_STATUS, 1)
            .unwrap();
        assert_eq!(devices[0].register_address, 0xA7);
        assert_eq!(
            devices[0].transfer_state,
            TransferState::SendingReadAddress
        );

        // Launch of the framed address byte: select asserted, one byte out.
        assert_eq!(
            scheduler.step(&mut devices, &completion).unwrap(),
            StepStatus::Progressed
        );
        assert!(devices[0].cs.is_low());
        assert_eq!(scheduler.bus.transmitted, vec![vec![0xA7]]);

        // No completion yet: no state change, no new hardware access.
        assert_eq!(
            scheduler.step(&mut devices, &completion).unwrap(),
            StepStatus::WaitingForCompletion
        );
        assert_eq!(
            devices[0].transfer_state,
            TransferState::SendingReadAddress
        );

        // Address byte completes; select stays asserted for the data phase.
        completion.store(true, Ordering::Release);
        assert_eq!(
            scheduler.step(&mut devices, &completion).unwrap(),
            StepStatus::Progressed
        );
        assert!(!completion.load(Ordering::Acquire));
        assert_eq!(devices[0].transfer_state, TransferState::ReadingData);
        assert!(devices[0].cs.is_low());

        // Data phase launches a one-byte receive.
        assert_eq!(
            scheduler.step(&mut devices, &completion).unwrap(),
            StepStatus::Progressed
        );
        assert_eq!(scheduler.bus.receive_requests, vec![1]);

        // Data completes: bytes land in the device, select deasserted.
        completion.store(true, Ordering::Release);
        assert_eq!(
            scheduler.step(&mut devices, &completion).unwrap(),
            StepStatus::Progressed
        );
        assert!(devices[0].is_idling());
        assert_eq!(devices[0].rx_data(), &[0x08]);
        assert!(!devices[0].cs.is_low());

        assert_eq!(
            scheduler.step(&mut devices, &completion).unwrap(),
            StepStatus::AllIdling
        );
    }

    #[test]
    fn initialization_replays_all_register_groups() {
        let completion = AtomicBool::new(false);
        let mut scheduler = Scheduler::new(FakeBus::default());
        let params = InitParams::default();
        let mut devices = [Lis3mdl::new(FakePin::default(), &params)];

        pump(&mut scheduler, &mut devices, &completion);

        let regs = params.encode();
        let bus = &scheduler.bus;
        assert_eq!(bus.transmitted.len(), 4);
        assert_eq!(bus.transmitted[0], vec![REG_CTRL2, SOFT_RESET_COMMAND]);

        let mut offsets = vec![REG_OFFSET_X_L | MD_BIT];
        offsets.extend_from_slice(&regs.offsets);
        assert_eq!(bus.transmitted[1], offsets);

        let mut ctrl = vec![REG_CTRL1 | MD_BIT];
        ctrl.extend_from_slice(&regs.ctrl);
        assert_eq!(bus.transmitted[2], ctrl);

        let mut int = vec![REG_INT_CFG | MD_BIT];
        int.extend_from_slice(&regs.int);
        assert_eq!(bus.transmitted[3], int);

        // Each phase is its own chip-select frame.
        assert_eq!(
            devices[0].cs.history,
            vec![false, true, false, true, false, true, false, true]
        );
    }

    #[test]
    fn write_request_frames_and_transmits_payload() {
        let completion = AtomicBool::new(false);
        let mut scheduler = Scheduler::new(FakeBus::default());
        let mut devices = [idle_device()];

        scheduler
            .request_write(&mut devices, 0, 0x20, &[0x30, 0x60])
            .unwrap();
        assert_eq!(devices[0].register_address, 0x20 | MD_BIT);

        pump(&mut scheduler, &mut devices, &completion);

        let bus = &scheduler.bus;
        assert_eq!(bus.transmitted, vec![vec![0x20 | MD_BIT], vec![0x30, 0x60]]);
        assert!(devices[0].is_idling());
    }

    #[test]
    fn preframed_address_is_rejected_without_mutation() {
        let mut scheduler = Scheduler::new(FakeBus::default());
        let mut devices = [idle_device()];
        let before = snapshot(&devices[0]);

        let err = scheduler
            .request_read(&mut devices, 0, REG_STATUS | READ_BIT, 1)
            .unwrap_err();
        assert_eq!(err, Error::InvalidAddress);
        assert_eq!(snapshot(&devices[0]), before);

        let err = scheduler
            .request_write(&mut devices, 0, 0x20 | MD_BIT, &[0])
            .unwrap_err();
        assert_eq!(err, Error::InvalidAddress);
        assert_eq!(snapshot(&devices[0]), before);
    }

    #[test]
    fn out_of_range_size_is_rejected_without_mutation() {
        let mut scheduler = Scheduler::new(FakeBus::default());
        let mut devices = [idle_device()];
        let before = snapshot(&devices[0]);

        for size in [0usize, 7, 255] {
            let err = scheduler
                .request_read(&mut devices, 0, REG_STATUS, size)
                .unwrap_err();
            assert_eq!(err, Error::InvalidSize);
            assert_eq!(snapshot(&devices[0]), before);
        }
    }

    #[test]
    fn second_device_arming_is_busy_while_first_transacts() {
        let completion = AtomicBool::new(false);
        let mut scheduler = Scheduler::new(FakeBus::default());
        let mut devices = [idle_device(), idle_device()];

        scheduler
            .request_read(&mut devices, 0, REG_STATUS, 1)
            .unwrap();
        let before = snapshot(&devices[1]);

        // Rejected both while armed and while mid-transaction.
        let err = scheduler
            .request_read(&mut devices, 1, REG_STATUS, 1)
            .unwrap_err();
        assert_eq!(err, Error::Busy);
        assert_eq!(snapshot(&devices[1]), before);

        scheduler.step(&mut devices, &completion).unwrap();
        let err = scheduler
            .request_write(&mut devices, 1, 0x20, &[0])
            .unwrap_err();
        assert_eq!(err, Error::Busy);
        assert_eq!(snapshot(&devices[1]), before);
    }

    #[test]
    fn transport_failure_surfaces_and_leaves_state() {
        let completion = AtomicBool::new(false);
        let mut scheduler = Scheduler::new(FakeBus {
            fail_next_transmit: true,
            ..FakeBus::default()
        });
        let mut devices = [idle_device()];

        scheduler
            .request_read(&mut devices, 0, REG_STATUS, 1)
            .unwrap();
        let err = scheduler.step(&mut devices, &completion).unwrap_err();
        assert_eq!(err, Error::Interface(()));
        assert_eq!(
            devices[0].transfer_state,
            TransferState::SendingReadAddress
        );

        // The next step retries the launch.
        assert_eq!(
            scheduler.step(&mut devices, &completion).unwrap(),
            StepStatus::Progressed
        );
    }

    #[test]
    fn completion_with_idle_device_is_an_invalid_transition() {
        let completion = AtomicBool::new(true);
        let mut scheduler = Scheduler::new(FakeBus::default());
        let mut devices = [idle_device()];
        scheduler.in_flight = true;
        scheduler.active = Some(0);

        let err = scheduler.step(&mut devices, &completion).unwrap_err();
        assert_eq!(err, Error::InvalidTransition);
    }

    #[test]
    fn empty_collection_is_rejected() {
        let completion = AtomicBool::new(false);
        let mut scheduler = Scheduler::new(FakeBus::default());
        let mut devices: [Lis3mdl<FakePin>; 0] = [];

        let err = scheduler.step(&mut devices, &completion).unwrap_err();
        assert_eq!(err, Error::InvalidDevice);
    }
}
