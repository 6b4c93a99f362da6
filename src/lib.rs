#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod chip;
pub mod choice;
mod error;
pub mod pin;
pub mod pindb;
pub mod registers;

pub use chip::{Chip, Package};
pub use choice::{Choice, ChoiceKind, Mode, OutputType, Pull, Speed};
pub use error::Error;
pub use pin::{Pin, PinRef};
pub use pindb::PinDatabase;
pub use registers::Port;
