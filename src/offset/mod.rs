//! Conversions between UTF-16 code units (what editing surfaces report) and byte
//! indices into Rust strings.

/// Byte index of the UTF-16 position `pos_utf16`, snapped down to a char boundary
/// and clamped to `s.len()`.
pub fn utf16_to_byte_idx(s: &str, pos_utf16: usize) -> usize {
    if pos_utf16 == 0 {
        return 0;
    }
    let mut acc = 0usize;
    for (i, ch) in s.char_indices() {
        let w = ch.len_utf16();
        if acc + w > pos_utf16 {
            return i;
        }
        acc += w;
        if acc == pos_utf16 {
            return i + ch.len_utf8();
        }
    }
    s.len()
}

pub fn byte_idx_to_utf16(s: &str, byte_idx: usize) -> usize {
    s[..floor_char_boundary(s, byte_idx)].encode_utf16().count()
}

/// Largest char boundary `<= idx`, clamped to `s.len()`.
pub fn floor_char_boundary(s: &str, idx: usize) -> usize {
    let mut i = idx.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_positions_match() {
        assert_eq!(utf16_to_byte_idx("hello", 0), 0);
        assert_eq!(utf16_to_byte_idx("hello", 3), 3);
        assert_eq!(utf16_to_byte_idx("hello", 99), 5);
        assert_eq!(byte_idx_to_utf16("hello", 4), 4);
    }

    #[test]
    fn test_multibyte_and_surrogates() {
        let s = "é😀x";
        // é = 1 unit / 2 bytes, 😀 = 2 units / 4 bytes.
        assert_eq!(utf16_to_byte_idx(s, 1), 2);
        assert_eq!(utf16_to_byte_idx(s, 3), 6);
        assert_eq!(utf16_to_byte_idx(s, 4), 7);
        // Inside a surrogate pair snaps to the start of the char.
        assert_eq!(utf16_to_byte_idx(s, 2), 2);
        assert_eq!(byte_idx_to_utf16(s, 6), 3);
    }

    #[test]
    fn test_floor_char_boundary() {
        let s = "aé";
        assert_eq!(floor_char_boundary(s, 2), 1);
        assert_eq!(floor_char_boundary(s, 3), 3);
        assert_eq!(floor_char_boundary(s, 10), 3);
    }
}
