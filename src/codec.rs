//! Byte-oriented reading and writing, in the style used for TLS wire
//! structures.

use crate::error::InvalidMessage;

/// Wrapper over a slice of bytes that allows reading chunks from
/// with the current position state held using a cursor.
pub struct Reader<'a> {
    /// The underlying buffer storing the readers content
    buffer: &'a [u8],
    /// Stores the current reading position for the buffer
    cursor: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new Reader of the provided `bytes` slice with
    /// the initial cursor position of zero.
    pub fn init(bytes: &'a [u8]) -> Self {
        Reader {
            buffer: bytes,
            cursor: 0,
        }
    }

    /// Borrows a slice of all the remaining bytes
    /// that appear after the cursor position.
    ///
    /// Moves the cursor to the end of the buffer length.
    pub fn rest(&mut self) -> &'a [u8] {
        let rest = &self.buffer[self.cursor..];
        self.cursor = self.buffer.len();
        rest
    }

    /// Attempts to borrow a slice of bytes from the current
    /// cursor position of `length`; if there are not enough
    /// bytes remaining after the cursor then None is returned
    /// instead.
    pub fn take(&mut self, length: usize) -> Option<&'a [u8]> {
        if self.left() < length {
            return None;
        }
        let current = self.cursor;
        self.cursor += length;
        Some(&self.buffer[current..current + length])
    }

    /// Used to check whether the reader has any content left
    /// after the cursor (cursor has not reached end of buffer)
    pub fn any_left(&self) -> bool {
        self.cursor < self.buffer.len()
    }

    /// Returns an error unless the reader is exhausted.
    pub fn expect_empty(&self, name: &'static str) -> Result<(), InvalidMessage> {
        match self.any_left() {
            true => Err(InvalidMessage::TrailingData(name)),
            false => Ok(()),
        }
    }

    /// Returns the cursor position which is also the number
    /// of bytes that have been read from the buffer.
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Returns the number of bytes that are still able to be
    /// read (the number of remaining takes)
    pub fn left(&self) -> usize {
        self.buffer.len() - self.cursor
    }
}

/// Trait for implementing encoding and decoding functionality
/// on something.
pub trait Codec: Sized {
    /// Function for encoding itself by appending itself to
    /// the provided vec of bytes.
    fn encode(&self, bytes: &mut Vec<u8>);

    /// Function for decoding itself from the provided reader.
    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage>;

    /// Convenience function for encoding the implementation
    /// into a vec and returning it.
    fn get_encoding(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        self.encode(&mut bytes);
        bytes
    }

    /// Function for wrapping a call to the read function in
    /// a Reader for the slice of bytes provided.
    fn read_bytes(bytes: &[u8]) -> Result<Self, InvalidMessage> {
        let mut reader = Reader::init(bytes);
        Self::read(&mut reader)
    }
}

impl Codec for u8 {
    fn encode(&self, bytes: &mut Vec<u8>) {
        bytes.push(*self);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        match r.take(1) {
            Some(&[byte]) => Ok(byte),
            _ => Err(InvalidMessage::MissingData("u8")),
        }
    }
}

impl Codec for u16 {
    fn encode(&self, bytes: &mut Vec<u8>) {
        bytes.extend_from_slice(&self.to_be_bytes());
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, InvalidMessage> {
        match r.take(2) {
            Some(&[b1, b2]) => Ok(Self::from_be_bytes([b1, b2])),
            _ => Err(InvalidMessage::MissingData("u16")),
        }
    }
}

/// Appends `body` to `bytes` behind a big-endian `u16` length prefix.
pub(crate) fn put_u16_prefixed(bytes: &mut Vec<u8>, body: &[u8]) {
    (body.len() as u16).encode(bytes);
    bytes.extend_from_slice(body);
}

/// Reads a big-endian `u16` length prefix, then borrows that many bytes.
pub(crate) fn read_u16_prefixed<'a>(r: &mut Reader<'a>) -> Result<&'a [u8], InvalidMessage> {
    let len = u16::read(r)? as usize;
    r.take(len)
        .ok_or(InvalidMessage::MessageTooShort)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_take_and_left() {
        let bytes = [0x01, 0x02, 0x03];
        let mut r = Reader::init(&bytes);
        assert_eq!(r.take(2), Some(&bytes[..2]));
        assert_eq!(r.left(), 1);
        assert_eq!(r.take(2), None);
        assert!(r.any_left());
        assert_eq!(r.rest(), &bytes[2..]);
        assert!(r.expect_empty("test").is_ok());
    }

    #[test]
    fn u16_round_trip() {
        let mut bytes = Vec::new();
        0xfeedu16.encode(&mut bytes);
        assert_eq!(bytes, vec![0xfe, 0xed]);
        assert_eq!(u16::read_bytes(&bytes), Ok(0xfeed));
        assert!(u16::read_bytes(&[0x01]).is_err());
    }

    #[test]
    fn u16_prefixed_round_trip() {
        let mut bytes = Vec::new();
        put_u16_prefixed(&mut bytes, &[0xaa, 0xbb]);
        assert_eq!(bytes, vec![0x00, 0x02, 0xaa, 0xbb]);

        let mut r = Reader::init(&bytes);
        assert_eq!(read_u16_prefixed(&mut r), Ok(&[0xaa, 0xbb][..]));
        assert!(!r.any_left());

        let mut r = Reader::init(&[0x00, 0x03, 0xaa]);
        assert_eq!(
            read_u16_prefixed(&mut r),
            Err(InvalidMessage::MessageTooShort)
        );
    }
}
