#![cfg_attr(not(test), no_std)]

mod error;
mod log;

pub mod blocking;
pub mod config;
pub mod device;
pub mod indicator;
pub mod interface;
pub mod params;
pub mod registers;
pub mod retrieval;
pub mod scheduler;
pub mod state;

pub use crate::device::Lis3mdl;
pub use crate::indicator::Direction;
pub use crate::error::{Error, Result};
pub use crate::retrieval::{poll_magnetic_data, MagneticReading};
pub use crate::scheduler::{Scheduler, StepStatus};
pub use crate::state::{RetrievalState, TransferState};
