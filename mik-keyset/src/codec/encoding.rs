//! Base64url encoding/decoding for cursor segments.

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const DECODE: [i8; 128] = {
    let mut table = [-1i8; 128];
    let mut i = 0u8;
    while i < 64 {
        table[ALPHABET[i as usize] as usize] = i as i8;
        i += 1;
    }
    table
};

/// Base64 encoding (URL-safe alphabet, no padding).
///
/// The output never contains `|`, so segments can be joined with it.
pub(crate) fn base64_encode(bytes: &[u8]) -> String {
    let mut result = String::with_capacity(bytes.len().div_ceil(3) * 4);

    for chunk in bytes.chunks(3) {
        let b0 = u32::from(chunk[0]);
        let b1 = u32::from(chunk.get(1).copied().unwrap_or(0));
        let b2 = u32::from(chunk.get(2).copied().unwrap_or(0));

        let n = (b0 << 16) | (b1 << 8) | b2;

        result.push(ALPHABET[((n >> 18) & 0x3F) as usize] as char);
        result.push(ALPHABET[((n >> 12) & 0x3F) as usize] as char);

        if chunk.len() > 1 {
            result.push(ALPHABET[((n >> 6) & 0x3F) as usize] as char);
        }
        if chunk.len() > 2 {
            result.push(ALPHABET[(n & 0x3F) as usize] as char);
        }
    }

    result
}

/// Length of [`base64_encode`] output for `bytes` input bytes.
pub(crate) const fn encoded_len(bytes: usize) -> usize {
    (bytes * 4).div_ceil(3)
}

/// Strict base64url decoding (no padding).
///
/// Rejects anything [`base64_encode`] cannot produce: characters outside the
/// URL-safe alphabet, a dangling single character, and non-zero trailing bits.
/// The standard `+/` alphabet is not accepted, so every cursor has exactly
/// one spelling.
pub(crate) fn base64_decode(input: &str) -> Option<Vec<u8>> {
    let bytes = input.as_bytes();
    if bytes.len() % 4 == 1 {
        return None;
    }

    let mut result = Vec::with_capacity(bytes.len() / 4 * 3 + 2);

    for chunk in bytes.chunks(4) {
        let mut n = 0u32;

        for (i, &b) in chunk.iter().enumerate() {
            let val = *DECODE.get(b as usize)?;
            if val < 0 {
                return None;
            }
            n |= (val as u32) << (18 - i * 6);
        }

        match chunk.len() {
            2 if n & 0xFFFF != 0 => return None,
            3 if n & 0xFF != 0 => return None,
            _ => {},
        }

        result.push((n >> 16) as u8);
        if chunk.len() > 2 {
            result.push((n >> 8) as u8);
        }
        if chunk.len() > 3 {
            result.push(n as u8);
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_roundtrip() {
        for len in 0..16 {
            let original: Vec<u8> = (0..len).map(|i| (i * 37 + 11) as u8).collect();
            let encoded = base64_encode(&original);
            assert_eq!(base64_decode(&encoded).as_deref(), Some(original.as_slice()));
        }
    }

    #[test]
    fn test_known_vectors() {
        assert_eq!(base64_encode(b""), "");
        assert_eq!(base64_encode(b"f"), "Zg");
        assert_eq!(base64_encode(b"fo"), "Zm8");
        assert_eq!(base64_encode(b"foo"), "Zm9v");
        assert_eq!(base64_encode(&[0xFB, 0xFF]), "-_8");
        assert_eq!(base64_encode(&2i32.to_le_bytes()), "AgAAAA");
    }

    #[test]
    fn test_encoded_len_matches_output() {
        for len in 0..40 {
            assert_eq!(base64_encode(&vec![0xA5; len]).len(), encoded_len(len), "{len}");
        }
    }

    #[test]
    fn test_rejects_standard_alphabet_and_padding() {
        assert!(base64_decode("+/8").is_none());
        assert!(base64_decode("Zg==").is_none());
        assert!(base64_decode("Zm9v!").is_none());
    }

    #[test]
    fn test_rejects_dangling_character() {
        assert!(base64_decode("Z").is_none());
        assert!(base64_decode("Zm9vZ").is_none());
    }

    #[test]
    fn test_rejects_non_canonical_trailing_bits() {
        // "Zh" would decode to 'f' too, but only "Zg" is canonical.
        assert!(base64_decode("Zh").is_none());
        assert!(base64_decode("Zm9").is_none());
        assert_eq!(base64_decode("Zm8").as_deref(), Some(b"fo".as_slice()));
    }

    #[test]
    fn test_rejects_non_ascii() {
        assert!(base64_decode("Zé").is_none());
    }
}
