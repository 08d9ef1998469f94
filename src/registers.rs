//! Register map definitions for the LIS3MDL magnetometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{ConversionMode, FullScale, OperatingMode, OutputDataRate};

/// Address framing bit selecting a read transfer.
pub const READ_BIT: u8 = 0x80;
/// Address framing bit ("multiple data") selecting a multi-register burst.
pub const MD_BIT: u8 = 0x40;

/// Register address of `OFFSET_X_REG_L_M`.
pub const REG_OFFSET_X_L: u8 = 0x05;
/// Register address of `OFFSET_X_REG_H_M`.
pub const REG_OFFSET_X_H: u8 = 0x06;
/// Register address of `OFFSET_Y_REG_L_M`.
pub const REG_OFFSET_Y_L: u8 = 0x07;
/// Register address of `OFFSET_Y_REG_H_M`.
pub const REG_OFFSET_Y_H: u8 = 0x08;
/// Register address of `OFFSET_Z_REG_L_M`.
pub const REG_OFFSET_Z_L: u8 = 0x09;
/// Register address of `OFFSET_Z_REG_H_M`.
pub const REG_OFFSET_Z_H: u8 = 0x0A;
/// Register address of `WHO_AM_I`.
pub const REG_WHO_AM_I: u8 = 0x0F;
/// Register address of `CTRL_REG1`.
pub const REG_CTRL1: u8 = 0x20;
/// Register address of `CTRL_REG2`.
pub const REG_CTRL2: u8 = 0x21;
/// Register address of `CTRL_REG3`.
pub const REG_CTRL3: u8 = 0x22;
/// Register address of `CTRL_REG4`.
pub const REG_CTRL4: u8 = 0x23;
/// Register address of `CTRL_REG5`.
pub const REG_CTRL5: u8 = 0x24;
/// Register address of `STATUS_REG`.
pub const REG_STATUS: u8 = 0x27;
/// Register address of `OUT_X_L`.
pub const REG_OUT_X_L: u8 = 0x28;
/// Register address of `OUT_X_H`.
pub const REG_OUT_X_H: u8 = 0x29;
/// Register address of `OUT_Y_L`.
pub const REG_OUT_Y_L: u8 = 0x2A;
/// Register address of `OUT_Y_H`.
pub const REG_OUT_Y_H: u8 = 0x2B;
/// Register address of `OUT_Z_L`.
pub const REG_OUT_Z_L: u8 = 0x2C;
/// Register address of `OUT_Z_H`.
pub const REG_OUT_Z_H: u8 = 0x2D;
/// Register address of `TEMP_OUT_L`.
pub const REG_TEMP_OUT_L: u8 = 0x2E;
/// Register address of `TEMP_OUT_H`.
pub const REG_TEMP_OUT_H: u8 = 0x2F;
/// Register address of `INT_CFG`.
pub const REG_INT_CFG: u8 = 0x30;
/// Register address of `INT_SRC`.
pub const REG_INT_SRC: u8 = 0x31;
/// Register address of `INT_THS_L`.
pub const REG_INT_THS_L: u8 = 0x32;
/// Register address of `INT_THS_H`.
pub const REG_INT_THS_H: u8 = 0x33;

/// Expected `WHO_AM_I` identification value.
pub const WHO_AM_I_VALUE: u8 = 0x3D;

/// Soft-reset command value written to `CTRL_REG2` (the `SOFT_RST` bit).
pub const SOFT_RESET_COMMAND: u8 = 0x04;

/// `INT_CFG` bit 3 reads as one and must be written back as one.
pub const INT_CFG_RESERVED: u8 = 0x08;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

/// Bitfield representation of the `CTRL_REG1` register (address `0x20`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg1 {
    // Self-test enable (bit 0).
    pub self_test: bool,
    // Fast ODR enable, rates above 80 Hz (bit 1).
    pub fast_odr: bool,
    // Output data rate selection (bits 4:2).
    pub output_data_rate: OutputDataRate,
    // X/Y axis operating mode (bits 6:5).
    pub xy_operating_mode: OperatingMode,
    // Temperature sensor enable (bit 7).
    pub temp_enable: bool,
}

impl From<u8> for CtrlReg1 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg1> for u8 {
    fn from(value: CtrlReg1) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CTRL_REG2` register (address `0x21`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg2 {
    #[skip]
    __: B2,
    // Configuration and user register reset (bit 2).
    pub soft_reset: bool,
    // Memory content reboot (bit 3).
    pub reboot: bool,
    #[skip]
    __: B1,
    // Full-scale selection (bits 6:5).
    pub full_scale: FullScale,
    #[skip]
    __: B1,
}

impl From<u8> for CtrlReg2 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg2> for u8 {
    fn from(value: CtrlReg2) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CTRL_REG3` register (address `0x22`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg3 {
    // System conversion mode (bits 1:0).
    pub conversion_mode: ConversionMode,
    // 3-wire SPI interface mode (bit 2).
    pub spi_3wire: bool,
    #[skip]
    __: B2,
    // Low-power mode (bit 5).
    pub low_power: bool,
    #[skip]
    __: B2,
}

impl From<u8> for CtrlReg3 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg3> for u8 {
    fn from(value: CtrlReg3) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CTRL_REG4` register (address `0x23`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg4 {
    #[skip]
    __: B1,
    // Big/little endian output data selection (bit 1).
    pub big_endian: bool,
    // Z axis operating mode (bits 3:2).
    pub z_operating_mode: OperatingMode,
    #[skip]
    __: B4,
}

impl From<u8> for CtrlReg4 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg4> for u8 {
    fn from(value: CtrlReg4) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CTRL_REG5` register (address `0x24`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CtrlReg5 {
    #[skip]
    __: B6,
    // Block data update: output registers frozen until both halves read (bit 6).
    pub block_data_update: bool,
    // Fast read: only the high half of each output register is read (bit 7).
    pub fast_read: bool,
}

impl From<u8> for CtrlReg5 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CtrlReg5> for u8 {
    fn from(value: CtrlReg5) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `STATUS_REG` register (address `0x27`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    // New X-axis data available (bit 0).
    pub x_data_available: bool,
    // New Y-axis data available (bit 1).
    pub y_data_available: bool,
    // New Z-axis data available (bit 2).
    pub z_data_available: bool,
    // New data available on all three axes (bit 3).
    pub xyz_data_available: bool,
    // X-axis data overrun (bit 4).
    pub x_overrun: bool,
    // Y-axis data overrun (bit 5).
    pub y_overrun: bool,
    // Z-axis data overrun (bit 6).
    pub z_overrun: bool,
    // Data overrun on all three axes (bit 7).
    pub xyz_overrun: bool,
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `INT_CFG` register (address `0x30`).
///
/// Bit 3 is reserved and must read/write as one; the config encoder ORs in
/// [`INT_CFG_RESERVED`] when producing the raw byte.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntCfg {
    // Interrupt enable on the INT pin (bit 0).
    pub int_enable: bool,
    // Latch interrupt request (bit 1).
    pub latch_interrupt: bool,
    // Interrupt active-high configuration (bit 2).
    pub active_high: bool,
    #[skip]
    __: B2,
    // Z-axis interrupt generation enable (bit 5).
    pub z_interrupt_enable: bool,
    // Y-axis interrupt generation enable (bit 6).
    pub y_interrupt_enable: bool,
    // X-axis interrupt generation enable (bit 7).
    pub x_interrupt_enable: bool,
}

impl From<u8> for IntCfg {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<IntCfg> for u8 {
    fn from(value: IntCfg) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `INT_SRC` register (address `0x31`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntSrc {
    // An interrupt event occurred (bit 0).
    pub int_triggered: bool,
    // Internal measurement range overflow (bit 1).
    pub measurement_overflow: bool,
    // Z-axis value exceeded the threshold on the negative side (bit 2).
    pub neg_threshold_z: bool,
    // Y-axis value exceeded the threshold on the negative side (bit 3).
    pub neg_threshold_y: bool,
    // X-axis value exceeded the threshold on the negative side (bit 4).
    pub neg_threshold_x: bool,
    // Z-axis value exceeded the threshold on the positive side (bit 5).
    pub pos_threshold_z: bool,
    // Y-axis value exceeded the threshold on the positive side (bit 6).
    pub pos_threshold_y: bool,
    // X-axis value exceeded the threshold on the positive side (bit 7).
    pub pos_threshold_x: bool,
}

impl From<u8> for IntSrc {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<IntSrc> for u8 {
    fn from(value: IntSrc) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for CtrlReg1 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CTRL1;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x10);
}

impl Register for CtrlReg2 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CTRL2;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for CtrlReg3 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CTRL3;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x03);
}

impl Register for CtrlReg4 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CTRL4;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for CtrlReg5 {
    type Raw = u8;
    const ADDRESS: u8 = REG_CTRL5;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x00);
}

impl Register for Status {
    type Raw = u8;
    const ADDRESS: u8 = REG_STATUS;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;
    const RESET_VALUE: Option<Self::Raw> = None;
}

impl Register for IntCfg {
    type Raw = u8;
    const ADDRESS: u8 = REG_INT_CFG;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x08);
}

impl Register for IntSrc {
    type Raw = u8;
    const ADDRESS: u8 = REG_INT_SRC;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;
    const RESET_VALUE: Option<Self::Raw> = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates that Status bitfields match the datasheet layout.
    #[test]
    fn status_layout_matches_datasheet() {
        let status = Status::from(0b0000_1000);
        assert!(!status.x_data_available());
        assert!(!status.y_data_available());
        assert!(!status.z_data_available());
        assert!(status.xyz_data_available());
        assert!(!status.xyz_overrun());

        let status = Status::from(0b1001_0001);
        assert!(status.x_data_available());
        assert!(!status.xyz_data_available());
        assert!(status.x_overrun());
        assert!(status.xyz_overrun());
    }

    /// Ensures CTRL_REG1 encodes and decodes as expected across all fields.
    #[test]
    fn ctrl_reg1_roundtrip() {
        use crate::params::{OperatingMode, OutputDataRate};

        let ctrl = CtrlReg1::new()
            .with_temp_enable(true)
            .with_xy_operating_mode(OperatingMode::UltraHighPerformance)
            .with_output_data_rate(OutputDataRate::Odr80Hz)
            .with_fast_odr(false)
            .with_self_test(false);

        assert_eq!(u8::from(ctrl), 0b1_11_111_0_0);
        let decoded = CtrlReg1::from(u8::from(ctrl));
        assert_eq!(decoded.output_data_rate(), OutputDataRate::Odr80Hz);
        assert_eq!(
            decoded.xy_operating_mode(),
            OperatingMode::UltraHighPerformance
        );
        assert!(decoded.temp_enable());
    }

    /// CTRL_REG2 soft-reset bit must line up with the command constant.
    #[test]
    fn ctrl_reg2_soft_reset_matches_command() {
        let ctrl = CtrlReg2::new().with_soft_reset(true);
        assert_eq!(u8::from(ctrl), SOFT_RESET_COMMAND);
    }

    /// CTRL_REG5 BDU and FAST_READ occupy the top two bits.
    #[test]
    fn ctrl_reg5_layout() {
        assert_eq!(u8::from(CtrlReg5::new().with_block_data_update(true)), 0x40);
        assert_eq!(u8::from(CtrlReg5::new().with_fast_read(true)), 0x80);
    }
}
