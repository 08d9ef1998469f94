//! Strongly typed parameter enumerations for the LIS3MDL driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`InitParams`](crate::config::InitParams) and the register bitfield types.
//! Prefer these types over raw integers to keep configuration values valid
//! and explicit.
//!
//! # Examples
//!
//! ```rust
//! use lis3mdl_nb::params::{FullScale, OperatingMode, OutputDataRate};
//!
//! let odr = OutputDataRate::Odr10Hz;
//! let fs = FullScale::Fs16Gauss;
//! let mode = OperatingMode::MediumPerformance;
//! let _ = (odr, fs, mode);
//! ```

use modular_bitfield::prelude::Specifier;

/// Axis operating-mode selections (`CTRL_REG1.OM` / `CTRL_REG4.OMZ`).
///
/// Higher-performance modes trade conversion time for lower noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum OperatingMode {
    /// Low-power mode.
    LowPower = 0b00,
    /// Medium-performance mode.
    MediumPerformance = 0b01,
    /// High-performance mode.
    HighPerformance = 0b10,
    /// Ultra-high-performance mode.
    UltraHighPerformance = 0b11,
}

/// Available output data rate (ODR) selections (`CTRL_REG1.DO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum OutputDataRate {
    /// 0.625 Hz output data rate.
    Odr0p625Hz = 0b000,
    /// 1.25 Hz output data rate.
    Odr1p25Hz = 0b001,
    /// 2.5 Hz output data rate.
    Odr2p5Hz = 0b010,
    /// 5 Hz output data rate.
    Odr5Hz = 0b011,
    /// 10 Hz output data rate.
    Odr10Hz = 0b100,
    /// 20 Hz output data rate.
    Odr20Hz = 0b101,
    /// 40 Hz output data rate.
    Odr40Hz = 0b110,
    /// 80 Hz output data rate.
    Odr80Hz = 0b111,
}

impl OutputDataRate {
    /// Returns the ODR in millihertz as an integer value.
    pub const fn millihertz(self) -> u32 {
        match self {
            Self::Odr0p625Hz => 625,
            Self::Odr1p25Hz => 1_250,
            Self::Odr2p5Hz => 2_500,
            Self::Odr5Hz => 5_000,
            Self::Odr10Hz => 10_000,
            Self::Odr20Hz => 20_000,
            Self::Odr40Hz => 40_000,
            Self::Odr80Hz => 80_000,
        }
    }
}

/// Full-scale range selections (`CTRL_REG2.FS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum FullScale {
    /// ±4 gauss full scale.
    Fs4Gauss = 0b00,
    /// ±8 gauss full scale.
    Fs8Gauss = 0b01,
    /// ±12 gauss full scale.
    Fs12Gauss = 0b10,
    /// ±16 gauss full scale.
    Fs16Gauss = 0b11,
}

impl FullScale {
    /// Returns the full-scale range in gauss.
    pub const fn gauss(self) -> u8 {
        match self {
            Self::Fs4Gauss => 4,
            Self::Fs8Gauss => 8,
            Self::Fs12Gauss => 12,
            Self::Fs16Gauss => 16,
        }
    }

    /// Returns the datasheet sensitivity in LSB per gauss.
    pub const fn lsb_per_gauss(self) -> u16 {
        match self {
            Self::Fs4Gauss => 6_842,
            Self::Fs8Gauss => 3_421,
            Self::Fs12Gauss => 2_281,
            Self::Fs16Gauss => 1_711,
        }
    }
}

/// System conversion modes (`CTRL_REG3.MD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum ConversionMode {
    /// Continuous-conversion mode.
    Continuous = 0b00,
    /// Single-conversion mode.
    Single = 0b01,
    /// Power-down mode.
    PowerDown = 0b10,
}
