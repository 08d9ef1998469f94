//! Dominant-axis direction decision for a decoded reading.
//!
//! Downstream consumer logic: picks which of four directional outputs an
//! application should assert. Driving the actual pins or LEDs stays with the
//! caller.

use crate::retrieval::MagneticReading;

/// In-plane direction of the dominant field component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
}

impl Direction {
    /// Selects the axis with the larger field magnitude, then the polarity
    /// from that axis's sign. A magnitude tie resolves to the Y axis.
    pub fn from_reading(reading: &MagneticReading) -> Self {
        if reading.x.unsigned_abs() > reading.y.unsigned_abs() {
            if reading.x >= 0 {
                Direction::PositiveX
            } else {
                Direction::NegativeX
            }
        } else if reading.y >= 0 {
            Direction::PositiveY
        } else {
            Direction::NegativeY
        }
    }
}
