//! Blocking register access over an `embedded-hal` SPI bus.
//!
//! Synchronous counterpart to the scheduler path, for bring-up, probing, and
//! configuration code that can afford to wait on the bus. Each call frames one
//! complete chip-select transaction. On a transport failure the transaction is
//! abandoned as-is; chip select is left asserted so the caller can decide how
//! to recover the bus.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::device::TRANSFER_BUFFER_CAPACITY;
use crate::error::{Error, Result};
use crate::registers::{MD_BIT, READ_BIT, REG_WHO_AM_I};

/// Reads the identification register.
///
/// A responsive LIS3MDL answers [`WHO_AM_I_VALUE`](crate::registers::WHO_AM_I_VALUE).
pub fn who_am_i<SPI, CS>(spi: &mut SPI, cs: &mut CS) -> Result<u8, SPI::Error>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    read_register(spi, cs, REG_WHO_AM_I)
}

/// Reads a single register.
pub fn read_register<SPI, CS>(spi: &mut SPI, cs: &mut CS, register: u8) -> Result<u8, SPI::Error>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    let mut value = [0u8; 1];
    read_registers(spi, cs, register, &mut value)?;
    Ok(value[0])
}

/// Reads `buf.len()` consecutive registers starting at `register`, relying on
/// the device's address auto-increment.
///
/// `register` must be a bare address with the top two bits clear; the read and
/// auto-increment bits are applied here. `buf` must hold between one and
/// [`TRANSFER_BUFFER_CAPACITY`] bytes. Validation happens before chip select
/// is touched.
pub fn read_registers<SPI, CS>(
    spi: &mut SPI,
    cs: &mut CS,
    register: u8,
    buf: &mut [u8],
) -> Result<(), SPI::Error>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    validate(register, buf.len())?;

    let framed = register | READ_BIT | if buf.len() > 1 { MD_BIT } else { 0 };
    cs.set_low().map_err(|_| Error::ChipSelect)?;
    spi.write(&[framed])?;
    for byte in buf.iter_mut() {
        spi.read(core::slice::from_mut(byte))?;
    }
    spi.flush()?;
    cs.set_high().map_err(|_| Error::ChipSelect)?;
    Ok(())
}

/// Writes a single register.
pub fn write_register<SPI, CS>(
    spi: &mut SPI,
    cs: &mut CS,
    register: u8,
    value: u8,
) -> Result<(), SPI::Error>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    validate(register, 1)?;

    cs.set_low().map_err(|_| Error::ChipSelect)?;
    spi.write(&[register, value])?;
    spi.flush()?;
    cs.set_high().map_err(|_| Error::ChipSelect)?;
    Ok(())
}

fn validate<E>(register: u8, size: usize) -> Result<(), E> {
    if register & (READ_BIT | MD_BIT) != 0 {
        return Err(Error::InvalidAddress);
    }
    if size == 0 || size > TRANSFER_BUFFER_CAPACITY {
        return Err(Error::InvalidSize);
    }
    Ok(())
}
