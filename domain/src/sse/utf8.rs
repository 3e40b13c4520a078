//! Incremental UTF-8 decoding for chunked response bodies.

/// Decodes a byte stream into text without splitting multi-byte characters.
///
/// Network reads can end in the middle of a character. The incomplete tail
/// is held back until the next chunk arrives. Invalid sequences decode to
/// U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, appending the text to `out`.
    pub fn decode_into(&mut self, chunk: &[u8], out: &mut String) {
        self.pending.extend_from_slice(chunk);

        let mut consumed = 0;
        loop {
            match std::str::from_utf8(&self.pending[consumed..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    consumed = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid_up_to = consumed + e.valid_up_to();
                    // Sound: from_utf8 validated this range.
                    out.push_str(
                        std::str::from_utf8(&self.pending[consumed..valid_up_to])
                            .unwrap_or_default(),
                    );
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            consumed = valid_up_to + len;
                        }
                        None => {
                            // Incomplete sequence at the end: wait for more bytes
                            consumed = valid_up_to;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..consumed);
    }

    /// Flush at end of stream. A dangling partial character becomes U+FFFD.
    pub fn finish(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            out.push(char::REPLACEMENT_CHARACTER);
            self.pending.clear();
        }
    }

    /// Number of bytes held back waiting for the rest of a character.
    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(chunks: &[&[u8]]) -> String {
        let mut decoder = Utf8StreamDecoder::new();
        let mut out = String::new();
        for chunk in chunks {
            decoder.decode_into(chunk, &mut out);
        }
        decoder.finish(&mut out);
        out
    }

    #[test]
    fn ascii_passthrough() {
        assert_eq!(decode_all(&[b"hello ", b"world"]), "hello world");
    }

    #[test]
    fn multibyte_split_across_chunks() {
        // 'é' = 0xC3 0xA9, '🐱' = 0xF0 0x9F 0x90 0xB1
        let bytes = "café 🐱".as_bytes();
        let (a, rest) = bytes.split_at(4); // splits inside 'é'
        let (b, c) = rest.split_at(4); // splits inside the emoji
        assert_eq!(decode_all(&[a, b, c]), "café 🐱");
    }

    #[test]
    fn byte_at_a_time() {
        let text = "あのね 🐱 ok";
        let chunks: Vec<&[u8]> = text.as_bytes().chunks(1).collect();
        assert_eq!(decode_all(&chunks), text);
    }

    #[test]
    fn invalid_bytes_replaced() {
        assert_eq!(decode_all(&[b"a\xFFb"]), "a\u{FFFD}b");
    }

    #[test]
    fn dangling_tail_flushed_as_replacement() {
        let mut decoder = Utf8StreamDecoder::new();
        let mut out = String::new();
        decoder.decode_into(&[b'x', 0xE3, 0x81], &mut out);
        assert_eq!(out, "x");
        assert_eq!(decoder.pending_len(), 2);
        decoder.finish(&mut out);
        assert_eq!(out, "x\u{FFFD}");
    }
}
