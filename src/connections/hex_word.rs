use crate::error::{FormatError, WrapFormat};

/// Decodes a hex encoded word and returns its bytes in reverse order.
///
/// Every pair of digits is one byte. The bytes are reversed, not the digits,
/// so `"0DF0FECA"` becomes `[0xCA, 0xFE, 0xF0, 0x0D]`. This turns a word the
/// kernel printed in host (little endian) order into network order.
pub fn reverse_bytes_in_hex_word<T: AsRef<[u8]>>(word: T) -> Result<Vec<u8>, FormatError> {
    let word = word.as_ref();

    if word.len() % 2 != 0 {
        return Err(FormatError::new(format!(
            "hex string {:?} has odd number of nibbles",
            String::from_utf8_lossy(word)
        )));
    }

    let mut bytes = hex::decode(word).wrap_format(|| {
        format!(
            "unable to parse hex string {:?} as bytes",
            String::from_utf8_lossy(word)
        )
    })?;
    bytes.reverse();

    Ok(bytes)
}

/// Inverse of [`reverse_bytes_in_hex_word`]: upper-case hex of `bytes` in reverse order.
pub fn reversed_hex_word(bytes: &[u8]) -> String {
    let reversed: Vec<u8> = bytes.iter().rev().copied().collect();

    hex::encode_upper(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_reverse_word() {
        let output = reverse_bytes_in_hex_word("0DF0FECA").unwrap();
        assert_eq!(output, vec![0xCA, 0xFE, 0xF0, 0x0D]);
    }

    #[test]
    fn test_reverse_is_case_insensitive() {
        let output = reverse_bytes_in_hex_word("0df0feca").unwrap();
        assert_eq!(output, vec![0xCA, 0xFE, 0xF0, 0x0D]);
    }

    #[test]
    fn test_reverse_empty_word() {
        assert!(reverse_bytes_in_hex_word("").unwrap().is_empty());
    }

    #[test]
    fn test_reverse_odd_nibbles() {
        let err = reverse_bytes_in_hex_word("DF0FECA").unwrap_err();
        assert!(err.message().contains("odd number of nibbles"));
    }

    #[test]
    fn test_reverse_non_hex_nibble() {
        assert!(reverse_bytes_in_hex_word("GDF0FECA").is_err());
        assert!(reverse_bytes_in_hex_word("0DF0FEC-").is_err());
        assert!(reverse_bytes_in_hex_word("+1").is_err());
    }

    #[test]
    fn test_reverse_non_ascii() {
        // Two bytes of UTF-8, even length but not hex.
        assert!(reverse_bytes_in_hex_word("é").is_err());
    }

    #[test]
    fn test_reverse_random_words() {
        let mut rng = rand::thread_rng();

        for _ in 0..1000 {
            let len = rng.gen_range(0..32);
            let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let word = hex::encode(&bytes);

            let mut expected = bytes.clone();
            expected.reverse();

            assert_eq!(reverse_bytes_in_hex_word(&word).unwrap(), expected);
        }
    }

    #[test]
    fn test_reversed_hex_word_is_inverse() {
        assert_eq!(reversed_hex_word(&[0xCA, 0xFE, 0xF0, 0x0D]), "0DF0FECA");
    }
}
