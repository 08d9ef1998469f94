//! Initialization parameters and their raw register encoding.
//!
//! [`InitParams`] is the human-readable configuration surface. It is encoded
//! exactly once into [`ConfigRegisters`] when a device record is created; the
//! raw bytes are then replayed verbatim by the scheduler's initialization
//! phases and never re-derived.

use crate::params::{ConversionMode, FullScale, OperatingMode, OutputDataRate};
use crate::registers::{CtrlReg1, CtrlReg2, CtrlReg3, CtrlReg4, CtrlReg5, IntCfg, IntSrc};
use crate::registers::INT_CFG_RESERVED;

/// Number of consecutive offset registers (`OFFSET_X_REG_L_M..OFFSET_Z_REG_H_M`).
pub const OFFSET_REG_COUNT: usize = 6;
/// Number of consecutive control registers (`CTRL_REG1..CTRL_REG5`).
pub const CTRL_REG_COUNT: usize = 5;
/// Number of consecutive interrupt registers (`INT_CFG..INT_THS_H`).
pub const INT_REG_COUNT: usize = 4;

/// User-facing configuration for the LIS3MDL sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitParams {
    /// X-axis environmental offset, subtracted by the sensor.
    pub offset_x: i16,
    /// Y-axis environmental offset.
    pub offset_y: i16,
    /// Z-axis environmental offset.
    pub offset_z: i16,
    /// Temperature sensor enable.
    pub temp_enable: bool,
    /// X/Y axis operating mode.
    pub xy_operating_mode: OperatingMode,
    /// Output data rate selection.
    pub output_data_rate: OutputDataRate,
    /// Fast-ODR enable for rates above 80 Hz.
    pub fast_odr: bool,
    /// Self-test enable.
    pub self_test: bool,
    /// Full-scale range selection.
    pub full_scale: FullScale,
    /// Low-power mode.
    pub low_power: bool,
    /// 3-wire SPI interface mode.
    pub spi_3wire: bool,
    /// System conversion mode.
    pub conversion_mode: ConversionMode,
    /// Z axis operating mode.
    pub z_operating_mode: OperatingMode,
    /// Fast read: skip the low half of each output register.
    pub fast_read: bool,
    /// Block data update: freeze output registers between full reads.
    pub block_data_update: bool,
    /// X-axis interrupt generation enable.
    pub x_interrupt_enable: bool,
    /// Y-axis interrupt generation enable.
    pub y_interrupt_enable: bool,
    /// Z-axis interrupt generation enable.
    pub z_interrupt_enable: bool,
    /// Interrupt active-high configuration.
    pub interrupt_active_high: bool,
    /// Latch interrupt requests until `INT_SRC` is read.
    pub latch_interrupt: bool,
    /// Interrupt enable on the INT pin.
    pub interrupt_pin_enable: bool,
    /// X-axis positive-side threshold crossing enable.
    pub pos_threshold_x_enable: bool,
    /// Y-axis positive-side threshold crossing enable.
    pub pos_threshold_y_enable: bool,
    /// Z-axis positive-side threshold crossing enable.
    pub pos_threshold_z_enable: bool,
    /// X-axis negative-side threshold crossing enable.
    pub neg_threshold_x_enable: bool,
    /// Y-axis negative-side threshold crossing enable.
    pub neg_threshold_y_enable: bool,
    /// Z-axis negative-side threshold crossing enable.
    pub neg_threshold_z_enable: bool,
    /// Interrupt threshold magnitude, applied on both sides.
    pub interrupt_threshold: u16,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            offset_z: 0,
            temp_enable: false,
            xy_operating_mode: OperatingMode::MediumPerformance,
            output_data_rate: OutputDataRate::Odr10Hz,
            fast_odr: false,
            self_test: false,
            full_scale: FullScale::Fs16Gauss,
            low_power: false,
            spi_3wire: false,
            conversion_mode: ConversionMode::Continuous,
            z_operating_mode: OperatingMode::MediumPerformance,
            fast_read: false,
            block_data_update: true,
            x_interrupt_enable: false,
            y_interrupt_enable: false,
            z_interrupt_enable: false,
            interrupt_active_high: false,
            latch_interrupt: false,
            interrupt_pin_enable: false,
            pos_threshold_x_enable: false,
            pos_threshold_y_enable: false,
            pos_threshold_z_enable: false,
            neg_threshold_x_enable: false,
            neg_threshold_y_enable: false,
            neg_threshold_z_enable: false,
            interrupt_threshold: 0,
        }
    }
}

impl InitParams {
    /// Translates the parameters into the raw register byte groups.
    ///
    /// Pure and stateless; no hardware access.
    pub fn encode(&self) -> ConfigRegisters {
        let mut offsets = [0u8; OFFSET_REG_COUNT];
        offsets[0..2].copy_from_slice(&self.offset_x.to_le_bytes());
        offsets[2..4].copy_from_slice(&self.offset_y.to_le_bytes());
        offsets[4..6].copy_from_slice(&self.offset_z.to_le_bytes());

        let ctrl1 = CtrlReg1::new()
            .with_temp_enable(self.temp_enable)
            .with_xy_operating_mode(self.xy_operating_mode)
            .with_output_data_rate(self.output_data_rate)
            .with_fast_odr(self.fast_odr)
            .with_self_test(self.self_test);
        let ctrl2 = CtrlReg2::new().with_full_scale(self.full_scale);
        let ctrl3 = CtrlReg3::new()
            .with_low_power(self.low_power)
            .with_spi_3wire(self.spi_3wire)
            .with_conversion_mode(self.conversion_mode);
        let ctrl4 = CtrlReg4::new().with_z_operating_mode(self.z_operating_mode);
        let ctrl5 = CtrlReg5::new()
            .with_fast_read(self.fast_read)
            .with_block_data_update(self.block_data_update);

        let int_cfg = IntCfg::new()
            .with_x_interrupt_enable(self.x_interrupt_enable)
            .with_y_interrupt_enable(self.y_interrupt_enable)
            .with_z_interrupt_enable(self.z_interrupt_enable)
            .with_active_high(self.interrupt_active_high)
            .with_latch_interrupt(self.latch_interrupt)
            .with_int_enable(self.interrupt_pin_enable);
        let int_src = IntSrc::new()
            .with_pos_threshold_x(self.pos_threshold_x_enable)
            .with_pos_threshold_y(self.pos_threshold_y_enable)
            .with_pos_threshold_z(self.pos_threshold_z_enable)
            .with_neg_threshold_x(self.neg_threshold_x_enable)
            .with_neg_threshold_y(self.neg_threshold_y_enable)
            .with_neg_threshold_z(self.neg_threshold_z_enable);
        let threshold = self.interrupt_threshold.to_le_bytes();

        ConfigRegisters {
            offsets,
            ctrl: [
                u8::from(ctrl1),
                u8::from(ctrl2),
                u8::from(ctrl3),
                u8::from(ctrl4),
                u8::from(ctrl5),
            ],
            int: [
                u8::from(int_cfg) | INT_CFG_RESERVED,
                u8::from(int_src),
                threshold[0],
                threshold[1],
            ],
        }
    }
}

/// Raw register byte groups replayed verbatim during initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigRegisters {
    /// `OFFSET_X_REG_L_M` through `OFFSET_Z_REG_H_M`.
    pub offsets: [u8; OFFSET_REG_COUNT],
    /// `CTRL_REG1` through `CTRL_REG5`.
    pub ctrl: [u8; CTRL_REG_COUNT],
    /// `INT_CFG` through `INT_THS_H`.
    pub int: [u8; INT_REG_COUNT],
}
