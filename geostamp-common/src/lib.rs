#![doc = include_str!("../README.md")]

pub mod error;
pub mod exif;
pub mod field;
pub mod geography;
pub mod isobmff;
pub mod math;
pub mod metadata;
pub mod read;
pub mod utils;
