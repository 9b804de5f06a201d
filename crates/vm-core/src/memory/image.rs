//! Raw image decoding.
//!
//! Images are the verbatim byte dump of a little-endian word array, the layout
//! produced by writing the host's in-memory words straight to disk.

use crate::word::Word;

/// Bytes per stored word.
pub const WORD_BYTES: usize = 4;

/// Decodes `bytes` into words. A trailing partial word is zero-padded.
pub fn decode_words(bytes: &[u8]) -> impl Iterator<Item = Word> + '_ {
    bytes.chunks(WORD_BYTES).map(|chunk| {
        let mut raw = [0_u8; WORD_BYTES];
        raw[..chunk.len()].copy_from_slice(chunk);
        Word::from_le_bytes(raw)
    })
}

/// Encodes words into the image byte layout.
#[must_use]
pub fn encode_words(words: &[Word]) -> Vec<u8> {
    words.iter().flat_map(|word| word.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::{decode_words, encode_words};

    #[test]
    fn words_are_little_endian() {
        let words: Vec<_> = decode_words(&[0x78, 0x56, 0x34, 0x12, 0xFF]).collect();
        assert_eq!(words, vec![0x1234_5678, 0x0000_00FF]);
    }

    #[test]
    fn encoding_matches_decoding_layout() {
        assert_eq!(
            encode_words(&[0x400D_0000, 7]),
            vec![0x00, 0x00, 0x0D, 0x40, 0x07, 0x00, 0x00, 0x00]
        );
    }
}
