#![doc = include_str!("../README.md")]

mod chunk;
mod chunk_type;
pub mod crc;
mod error;
mod png;
pub mod text;
mod write;

pub use chunk::*;
pub use chunk_type::*;
pub use error::*;
pub use png::*;
pub use text::read_metadata;
pub use write::*;
