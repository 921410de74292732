//! Self-describing length headers.
//!
//! Byte layout: `[width][length: width bytes, little-endian][payload]`,
//! where `width` is the smallest of 1, 2, 4 or 8 able to hold the length.
//!
//! The bit codec cannot carry a width byte, so it uses a fixed field whose
//! size both sides derive from the edge count (see [`bit_header_width`]).

use crate::error::{Result, StegoError};

/// Byte widths a length field may use, smallest first.
pub const HEADER_WIDTHS: [u8; 4] = [1, 2, 4, 8];

/// Returns the smallest width able to hold `len`.
pub fn header_width(len: u64) -> u8 {
    match len {
        0..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFFFF_FFFF => 4,
        _ => 8,
    }
}

/// Encodes the length prefix for a payload of `payload_len` bytes.
///
/// Every `u64` fits in the widest field, so this cannot fail.
pub fn encode_header(payload_len: u64) -> Vec<u8> {
    let width = header_width(payload_len);

    let mut header = Vec::with_capacity(1 + width as usize);
    header.push(width);
    header.extend_from_slice(&payload_len.to_le_bytes()[..width as usize]);
    header
}

/// Parses a length prefix.
///
/// Returns `(payload_len, bytes_consumed)`.
pub fn decode_header(stream: &[u8]) -> Result<(u64, usize)> {
    let Some(&width) = stream.first() else {
        return Err(StegoError::MalformedHeader("empty stream".to_string()));
    };
    if !HEADER_WIDTHS.contains(&width) {
        return Err(StegoError::MalformedHeader(format!(
            "invalid width tag {width}"
        )));
    }

    let width = width as usize;
    let field = stream.get(1..1 + width).ok_or_else(|| {
        StegoError::MalformedHeader(format!(
            "length field needs {width} bytes, {} available",
            stream.len() - 1
        ))
    })?;

    let mut bytes = [0u8; 8];
    bytes[..width].copy_from_slice(field);
    Ok((u64::from_le_bytes(bytes), 1 + width))
}

/// Prepends the length prefix to `payload`.
pub fn frame_payload(payload: &[u8]) -> Vec<u8> {
    let mut framed = encode_header(payload.len() as u64);
    framed.extend_from_slice(payload);
    framed
}

/// Parses the prefix and returns exactly the payload it declares.
///
/// Bytes past the declared payload are ignored.
pub fn split_payload(stream: &[u8]) -> Result<&[u8]> {
    let (len, consumed) = decode_header(stream)?;
    let remaining = stream.len() - consumed;
    let end = usize::try_from(len)
        .ok()
        .filter(|&len| len <= remaining)
        .ok_or_else(|| {
            StegoError::MalformedHeader(format!(
                "declared length {len} exceeds the {remaining} bytes remaining"
            ))
        })?;
    Ok(&stream[consumed..consumed + end])
}

/// Width in bits of the bit codec's length field for `edge_count` edges.
///
/// `2^ceil(log2(log2(2 * edge_count)))`, at least 2 so the field is a whole
/// number of 2-bit symbols. Returns 0 for an empty edge list.
pub fn bit_header_width(edge_count: usize) -> u32 {
    if edge_count == 0 {
        return 0;
    }
    let log_edges = (2.0 * edge_count as f64).log2();
    let exponent = log_edges.log2().ceil().max(0.0) as u32;
    (1u32 << exponent).max(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_width_escalates_at_boundaries() {
        let cases: [(u64, u8); 8] = [
            (0, 1),
            (1, 1),
            (255, 1),
            (256, 2),
            (65_535, 2),
            (65_536, 4),
            (u32::MAX as u64, 4),
            (u32::MAX as u64 + 1, 8),
        ];
        for (len, width) in cases {
            assert_eq!(header_width(len), width, "len {len}");
        }
    }

    #[test]
    fn test_header_roundtrip_boundaries() {
        for len in [0u64, 1, 255, 256, 65_535, 65_536, 0xFFFF_FFFF, 0x1_0000_0000] {
            let header = encode_header(len);
            let (decoded, consumed) = decode_header(&header).unwrap();
            assert_eq!(decoded, len);
            assert_eq!(consumed, header.len());
            assert_eq!(header[0] as usize + 1, consumed);
        }
    }

    #[test]
    fn test_header_is_little_endian() {
        assert_eq!(encode_header(0x0102), vec![2, 0x02, 0x01]);
        assert_eq!(encode_header(9), vec![1, 9]);
        assert_eq!(encode_header(u64::MAX).len(), 9);
    }

    #[test]
    fn test_invalid_width_tag() {
        let err = decode_header(&[3, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, StegoError::MalformedHeader(_)));
        assert!(matches!(decode_header(&[]), Err(StegoError::MalformedHeader(_))));
    }

    #[test]
    fn test_truncated_length_field() {
        let err = decode_header(&[4, 1, 2]).unwrap_err();
        assert!(matches!(err, StegoError::MalformedHeader(_)));
    }

    #[test]
    fn test_split_payload() {
        let framed = frame_payload(b"hello");
        assert_eq!(split_payload(&framed).unwrap(), b"hello");

        let mut padded = framed.clone();
        padded.extend_from_slice(b"trailing");
        assert_eq!(split_payload(&padded).unwrap(), b"hello");

        let truncated = &framed[..framed.len() - 1];
        assert!(matches!(
            split_payload(truncated),
            Err(StegoError::MalformedHeader(_))
        ));
    }

    #[test]
    fn test_bit_header_width() {
        assert_eq!(bit_header_width(0), 0);
        assert_eq!(bit_header_width(1), 2);
        assert_eq!(bit_header_width(2), 2);
        assert_eq!(bit_header_width(4), 4);
        assert_eq!(bit_header_width(8), 4);
        assert_eq!(bit_header_width(9), 8);
        assert_eq!(bit_header_width(128), 8);
        assert_eq!(bit_header_width(129), 16);
        assert_eq!(bit_header_width(1000), 16);
        assert_eq!(bit_header_width(32_768), 16);
        assert_eq!(bit_header_width(32_769), 32);
    }

    proptest! {
        #[test]
        fn prop_header_roundtrip(len in any::<u64>()) {
            let header = encode_header(len);
            let (decoded, consumed) = decode_header(&header).unwrap();
            prop_assert_eq!(decoded, len);
            prop_assert_eq!(consumed, header.len());
        }
    }
}
