use std::io::{Cursor, Read};

use crate::math::*;

pub trait ReadExt: Read {
    fn read_array<const T: usize>(&mut self) -> Result<[u8; T], ReadError> {
        let buf = &mut [0; T];
        self.read_exact(buf)?;
        Ok(*buf)
    }

    fn read_byte(&mut self) -> Result<u8, ReadError> {
        let [byte] = self.read_array()?;
        Ok(byte)
    }

    fn read_be_u16(&mut self) -> Result<u16, ReadError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    fn read_be_u32(&mut self) -> Result<u32, ReadError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    fn read_be_u64(&mut self) -> Result<u64, ReadError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Big endian unsigned integer with `n` bytes, where `n` is 0, 4 or 8
    fn read_be_uint(&mut self, n: u8) -> Result<u64, ReadError> {
        match n {
            0 => Ok(0),
            4 => Ok(self.read_be_u32()?.into()),
            8 => self.read_be_u64(),
            n => Err(ReadError::UnsupportedIntegerSize(n)),
        }
    }
}

impl<T: Read> ReadExt for T {}

pub trait SliceExt<'a> {
    fn slice_until(&mut self, byte: u8) -> Result<&'a [u8], ReadError>;
    fn slice_to_end(&mut self) -> Result<&'a [u8], ReadError>;
}

impl<'a> SliceExt<'a> for Cursor<&'a [u8]> {
    /// Read until `byte` and return as slice
    ///
    /// The cursor is moved behind `byte`. If `byte` does not appear, an error
    /// is returned and the cursor is not moved.
    ///
    /// ```
    /// # use std::io::Cursor;
    /// # use geostamp_common::read::*;
    /// let mut s = Cursor::new(b"abc\0defgh\0end".as_slice());
    /// assert_eq!(s.slice_until(b'\0').unwrap(), b"abc");
    /// assert_eq!(s.slice_until(b'\0').unwrap(), b"defgh");
    /// assert!(s.slice_until(b'\0').is_err());
    /// assert_eq!(s.slice_to_end().unwrap(), b"end");
    /// ```
    fn slice_until(&mut self, byte: u8) -> Result<&'a [u8], ReadError> {
        let data: &'a [u8] = *self.get_ref();
        let start = self.position().usize()?;
        let rest = data.get(start..).ok_or(ReadError::UnexpectedEof)?;

        let len = rest
            .iter()
            .position(|x| *x == byte)
            .ok_or(ReadError::TerminatorMissing(byte))?;

        self.set_position(start.safe_add(len)?.safe_add(1)?.u64()?);

        rest.get(..len).ok_or(ReadError::UnexpectedEof)
    }

    /// Read until end and return as slice
    fn slice_to_end(&mut self) -> Result<&'a [u8], ReadError> {
        let data: &'a [u8] = *self.get_ref();
        let start = self.position().usize()?;
        let rest = data.get(start..).ok_or(ReadError::UnexpectedEof)?;

        self.set_position(data.len().u64()?);

        Ok(rest)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("Math: {0}")]
    Math(#[from] MathError),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unexpected end of data")]
    UnexpectedEof,
    #[error("Terminator byte {0:#x} missing")]
    TerminatorMissing(u8),
    #[error("Unsupported integer size {0}")]
    UnsupportedIntegerSize(u8),
}
