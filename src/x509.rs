// Additional x509/asn1 functions to those provided by the crypto
// collaborators.

use crate::codec::Reader;
use crate::error::InvalidMessage;

/// Prepend stuff to `bytes` to put it in a DER SEQUENCE.
pub(crate) fn wrap_in_sequence(bytes: &[u8]) -> Vec<u8> {
    asn1_wrap(DER_SEQUENCE_TAG, bytes, &[])
}

/// Prepend stuff to `bytes` to put it in a DER BIT STRING.
pub(crate) fn wrap_in_bit_string(bytes: &[u8]) -> Vec<u8> {
    asn1_wrap(DER_BIT_STRING_TAG, &[0u8], bytes)
}

/// Prepend stuff to `bytes` to put it in a DER OCTET STRING.
pub(crate) fn wrap_in_octet_string(bytes: &[u8]) -> Vec<u8> {
    asn1_wrap(DER_OCTET_STRING_TAG, bytes, &[])
}

/// Prepend stuff to `bytes` to put it in the given DER tag.
pub(crate) fn wrap_in_tag(tag: u8, bytes: &[u8]) -> Vec<u8> {
    asn1_wrap(tag, bytes, &[])
}

fn asn1_wrap(tag: u8, bytes_a: &[u8], bytes_b: &[u8]) -> Vec<u8> {
    let len = bytes_a.len() + bytes_b.len();

    if len <= 0x7f {
        // Short form
        let mut ret = Vec::with_capacity(2 + len);
        ret.push(tag);
        ret.push(len as u8);
        ret.extend_from_slice(bytes_a);
        ret.extend_from_slice(bytes_b);
        ret
    } else {
        // Long form
        let size = len.to_be_bytes();
        let leading_zero_bytes = size
            .iter()
            .position(|&x| x != 0)
            .unwrap_or(size.len());
        assert!(leading_zero_bytes < size.len());
        let encoded_bytes = size.len() - leading_zero_bytes;

        let mut ret = Vec::with_capacity(2 + encoded_bytes + len);
        ret.push(tag);

        ret.push(0x80 + encoded_bytes as u8);
        ret.extend_from_slice(&size[leading_zero_bytes..]);

        ret.extend_from_slice(bytes_a);
        ret.extend_from_slice(bytes_b);
        ret
    }
}

/// Append a DER OCTET STRING containing `bytes` to `out`.
pub(crate) fn put_octet_string(out: &mut Vec<u8>, bytes: &[u8]) {
    out.push(DER_OCTET_STRING_TAG);
    put_der_length(out, bytes.len());
    out.extend_from_slice(bytes);
}

/// Append a DER INTEGER holding the unsigned value `v` to `out`.
pub(crate) fn put_asn1_uint64(out: &mut Vec<u8>, v: u64) {
    let bytes = v.to_be_bytes();
    let leading_zero_bytes = bytes
        .iter()
        .position(|&x| x != 0)
        .unwrap_or(bytes.len() - 1);
    let body = &bytes[leading_zero_bytes..];

    out.push(DER_INTEGER_TAG);
    // An extra leading zero keeps the content unsigned.
    if body[0] & 0x80 != 0 {
        out.push(body.len() as u8 + 1);
        out.push(0x00);
    } else {
        out.push(body.len() as u8);
    }
    out.extend_from_slice(body);
}

fn put_der_length(out: &mut Vec<u8>, len: usize) {
    if len <= 0x7f {
        out.push(len as u8);
    } else {
        let size = len.to_be_bytes();
        let leading_zero_bytes = size
            .iter()
            .position(|&x| x != 0)
            .unwrap_or(size.len());
        out.push(0x80 + (size.len() - leading_zero_bytes) as u8);
        out.extend_from_slice(&size[leading_zero_bytes..]);
    }
}

/// Read one DER element with the given tag, returning its contents.
pub(crate) fn read_asn1<'a>(r: &mut Reader<'a>, tag: u8) -> Result<&'a [u8], InvalidMessage> {
    let (seen, contents) = read_any_asn1(r)?;
    if seen != tag {
        return Err(InvalidMessage::InvalidDer("unexpected tag"));
    }
    Ok(contents)
}

/// Read one DER element of any tag, returning the tag and contents.
pub(crate) fn read_any_asn1<'a>(r: &mut Reader<'a>) -> Result<(u8, &'a [u8]), InvalidMessage> {
    let tag = match r.take(1) {
        Some(&[tag]) => tag,
        _ => return Err(InvalidMessage::InvalidDer("missing tag")),
    };

    let first = match r.take(1) {
        Some(&[len]) => len,
        _ => return Err(InvalidMessage::InvalidDer("missing length")),
    };

    let len = if first < 0x80 {
        first as usize
    } else {
        // Long form; DER forbids the indefinite form (0x80).
        let count = (first & 0x7f) as usize;
        if count == 0 || count > core::mem::size_of::<usize>() {
            return Err(InvalidMessage::InvalidDer("bad length form"));
        }
        let mut len = 0usize;
        for &byte in r
            .take(count)
            .ok_or(InvalidMessage::MessageTooShort)?
        {
            len = (len << 8) | usize::from(byte);
        }
        len
    };

    let contents = r
        .take(len)
        .ok_or(InvalidMessage::MessageTooShort)?;
    Ok((tag, contents))
}

/// Read a DER OCTET STRING, returning its contents.
pub(crate) fn read_octet_string<'a>(r: &mut Reader<'a>) -> Result<&'a [u8], InvalidMessage> {
    read_asn1(r, DER_OCTET_STRING_TAG)
}

/// Read a DER INTEGER as an unsigned 64-bit value.
pub(crate) fn read_asn1_uint64(r: &mut Reader<'_>) -> Result<u64, InvalidMessage> {
    let mut body = read_asn1(r, DER_INTEGER_TAG)?;
    if body.is_empty() || body[0] & 0x80 != 0 {
        return Err(InvalidMessage::InvalidDer("negative or empty integer"));
    }
    if body[0] == 0x00 && body.len() > 1 {
        body = &body[1..];
    }
    if body.len() > 8 {
        return Err(InvalidMessage::InvalidDer("integer too large"));
    }

    let mut value = 0u64;
    for &byte in body {
        value = (value << 8) | u64::from(byte);
    }
    Ok(value)
}

pub(crate) const DER_SEQUENCE_TAG: u8 = 0x30;
pub(crate) const DER_BIT_STRING_TAG: u8 = 0x03;
pub(crate) const DER_OCTET_STRING_TAG: u8 = 0x04;
pub(crate) const DER_INTEGER_TAG: u8 = 0x02;
pub(crate) const DER_OBJECT_IDENTIFIER_TAG: u8 = 0x06;
pub(crate) const DER_NULL_TAG: u8 = 0x05;
