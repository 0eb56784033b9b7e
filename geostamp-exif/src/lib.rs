#![doc = include_str!("../README.md")]

mod entry;
pub mod error;
mod high_level;
pub mod internal;
mod write;

pub use entry::{EncodedEntry, Entry};
pub use high_level::Exif;
pub use write::*;
