//! Bitcoin wire-format primitives: little-endian integers and compact-size
//! (a.k.a. varint) length prefixes, written directly to a `std::io::Write`.
//!
//! These are deliberately low-level: the sign engine streams its inputs one
//! message at a time and never buffers a whole transaction, so every field is
//! written straight into an incremental hasher rather than collected into a
//! byte vector first.

use std::io::{self, Write};
use thiserror::Error;

/// Errors arising from writing a value to the wire.
#[derive(Debug, Error)]
pub enum SerError {
    /// The underlying writer (in practice, always an in-memory hasher) failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result type alias for fallible serialization.
pub type SerResult<T> = Result<T, SerError>;

/// Computes the length, in bytes, of the compact-size encoding of `number`.
pub fn compact_size_len(number: u64) -> usize {
    match number {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Writes `number` as a Bitcoin compact-size ("varint").
pub fn write_compact_size<W: Write>(writer: &mut W, number: u64) -> SerResult<()> {
    match number {
        0..=0xfc => {
            writer.write_all(&[number as u8])?;
        }
        0xfd..=0xffff => {
            writer.write_all(&[0xfd])?;
            writer.write_all(&(number as u16).to_le_bytes())?;
        }
        0x1_0000..=0xffff_ffff => {
            writer.write_all(&[0xfe])?;
            writer.write_all(&(number as u32).to_le_bytes())?;
        }
        _ => {
            writer.write_all(&[0xff])?;
            writer.write_all(&number.to_le_bytes())?;
        }
    }
    Ok(())
}

/// Writes a `u32` in little-endian order.
pub fn write_u32_le<W: Write>(writer: &mut W, number: u32) -> SerResult<()> {
    Ok(writer.write_all(&number.to_le_bytes())?)
}

/// Writes a `u64` in little-endian order.
pub fn write_u64_le<W: Write>(writer: &mut W, number: u64) -> SerResult<()> {
    Ok(writer.write_all(&number.to_le_bytes())?)
}

/// Writes a length-prefixed byte buffer: `compact_size(len) || bytes`.
pub fn write_varbuff<W: Write>(writer: &mut W, bytes: &[u8]) -> SerResult<()> {
    write_compact_size(writer, bytes.len() as u64)?;
    writer.write_all(bytes)?;
    Ok(())
}
