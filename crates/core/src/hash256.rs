//! An incremental double-SHA256 accumulator.
//!
//! Bitcoin hashes almost everything — TXIDs, sighash digests, the BIP-143
//! `hashPrevouts`/`hashSequence`/`hashOutputs` accumulators — with the same
//! construction: SHA256 applied twice. [`Hash256Writer`] exposes that as a
//! `std::io::Write` sink so callers can feed it field-by-field as messages
//! stream in, without ever materializing the full preimage.

use sha2::{Digest, Sha256};
use std::io::{self, Write};

/// A 32-byte double-SHA256 digest.
pub type Digest32 = [u8; 32];

/// An incremental double-SHA256 hasher.
///
/// ```
/// use btcsign_core::hash256::Hash256Writer;
/// use std::io::Write;
///
/// let mut w = Hash256Writer::default();
/// w.write_all(b"hello").unwrap();
/// let digest = w.finish();
/// assert_eq!(digest.len(), 32);
/// ```
#[derive(Default)]
pub struct Hash256Writer {
    inner: Sha256,
}

impl Write for Hash256Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Hash256Writer {
    /// Consumes the writer and produces the double-SHA256 digest of
    /// everything written to it.
    pub fn finish(self) -> Digest32 {
        let first = self.inner.finalize();
        let second = Sha256::digest(first);
        second.into()
    }
}

/// Computes the double-SHA256 of `data` in one call. Used to re-hash an
/// already-finished single digest (the "second pass" of a BIP-143
/// accumulator, or of the previous-transaction hasher).
pub fn double_sha256(data: &[u8]) -> Digest32 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    second.into()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_matches_a_known_double_sha256_vector() {
        let mut w = Hash256Writer::default();
        w.write_all(&[0]).unwrap();
        w.flush().unwrap();
        assert_eq!(
            hex::encode(w.finish()),
            "1406e05881e299367766d313e26c05564ec91bf721d31726bd6e46e60689539a"
        );
    }

    #[test]
    fn it_agrees_with_double_sha256_of_empty_input() {
        let w = Hash256Writer::default();
        assert_eq!(w.finish(), double_sha256(&[]));
    }

    #[test]
    fn it_accumulates_across_multiple_writes() {
        let mut whole = Hash256Writer::default();
        whole.write_all(b"hello world").unwrap();

        let mut split = Hash256Writer::default();
        split.write_all(b"hello ").unwrap();
        split.write_all(b"world").unwrap();

        assert_eq!(whole.finish(), split.finish());
    }
}
