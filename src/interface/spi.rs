//! Polling fallback implementation of [`TransferBus`] on top of a blocking
//! `embedded-hal` [`SpiBus`].
//!
//! Intended for targets without a DMA/interrupt transfer engine and for host
//! tests: each `start_*` call performs the whole transfer synchronously and
//! raises the completion flag itself, so the scheduler observes completion on
//! its next step.

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::spi::SpiBus;

use super::TransferBus;
use crate::device::TRANSFER_BUFFER_CAPACITY;

/// Synchronous [`TransferBus`] adapter over an `embedded-hal` SPI bus.
pub struct PollingSpiBus<'a, SPI> {
    spi: SPI,
    completion: &'a AtomicBool,
    rx: [u8; TRANSFER_BUFFER_CAPACITY],
    rx_len: usize,
}

impl<'a, SPI> PollingSpiBus<'a, SPI> {
    /// Wraps the SPI bus; `completion` must be the same flag handed to
    /// [`Scheduler::step`](crate::scheduler::Scheduler::step).
    pub const fn new(spi: SPI, completion: &'a AtomicBool) -> Self {
        Self {
            spi,
            completion,
            rx: [0; TRANSFER_BUFFER_CAPACITY],
            rx_len: 0,
        }
    }

    /// Consumes the adapter and returns the owned SPI bus.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> TransferBus for PollingSpiBus<'_, SPI>
where
    SPI: SpiBus,
{
    type Error = SPI::Error;

    fn start_transmit(&mut self, bytes: &[u8]) -> core::result::Result<(), Self::Error> {
        self.spi.write(bytes)?;
        self.spi.flush()?;
        self.completion.store(true, Ordering::Release);
        Ok(())
    }

    fn start_receive(&mut self, len: usize) -> core::result::Result<(), Self::Error> {
        // The scheduler never asks for more than the device buffer capacity.
        debug_assert!(len <= TRANSFER_BUFFER_CAPACITY);
        let len = len.min(TRANSFER_BUFFER_CAPACITY);

        self.spi.read(&mut self.rx[..len])?;
        self.rx_len = len;
        self.completion.store(true, Ordering::Release);
        Ok(())
    }

    fn take_received(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        let len = buf.len().min(self.rx_len);
        buf[..len].copy_from_slice(&self.rx[..len]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    #[test]
    fn transmit_writes_bytes_and_raises_completion() {
        let expectations = [
            SpiTransaction::write_vec(vec![0xA7]),
            SpiTransaction::flush(),
        ];
        let completion = AtomicBool::new(false);
        let mut bus = PollingSpiBus::new(SpiMock::new(&expectations), &completion);

        bus.start_transmit(&[0xA7]).unwrap();
        assert!(completion.load(Ordering::Acquire));

        bus.release().done();
    }

    #[test]
    fn receive_captures_bytes_until_taken() {
        let expectations = [SpiTransaction::read_vec(vec![0x11, 0x22, 0x33])];
        let completion = AtomicBool::new(false);
        let mut bus = PollingSpiBus::new(SpiMock::new(&expectations), &completion);

        bus.start_receive(3).unwrap();
        assert!(completion.load(Ordering::Acquire));

        let mut out = [0u8; 3];
        bus.take_received(&mut out).unwrap();
        assert_eq!(out, [0x11, 0x22, 0x33]);

        bus.release().done();
    }
}
