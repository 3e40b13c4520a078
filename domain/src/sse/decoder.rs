//! Incremental Server-Sent-Events frame decoder.
//!
//! Bytes are pushed in whatever chunks the transport delivers; complete
//! frames are pulled out one at a time with [`FrameDecoder::next_frame`].
//! A frame is only released once its blank-line separator has been seen in
//! full, so the result never depends on where the chunk boundaries fell.

use super::utf8::Utf8StreamDecoder;

/// Prefix of the lines that carry event payloads.
pub const DATA_PREFIX: &str = "data:";

/// Splits decoded text into frames delimited by `\r?\n\r?\n`.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    utf8: Utf8StreamDecoder,
    buffer: String,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of raw body bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        self.utf8.decode_into(chunk, &mut self.buffer);
    }

    /// Take the next complete frame, without its separator.
    ///
    /// Returns `None` when the buffer holds no complete separator yet.
    pub fn next_frame(&mut self) -> Option<String> {
        let (start, end) = find_separator(&self.buffer)?;
        let frame = self.buffer[..start].to_string();
        self.buffer.drain(..end);
        Some(frame)
    }

    /// End of stream: return whatever never formed a complete frame.
    ///
    /// The caller decides what to do with it; the stream consumer drops it.
    pub fn finish(&mut self) -> Option<String> {
        self.utf8.finish(&mut self.buffer);
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }

    /// Bytes of text buffered but not yet released as a frame.
    #[cfg(test)]
    fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

/// Locate the leftmost `\r?\n\r?\n` in `buf`.
///
/// Returns the byte range `(start, end)` of the separator.
fn find_separator(buf: &str) -> Option<(usize, usize)> {
    let bytes = buf.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' {
            let end = match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(b'\n'), _) => Some(i + 2),
                (Some(b'\r'), Some(b'\n')) => Some(i + 3),
                _ => None,
            };
            if let Some(end) = end {
                let start = if i > 0 && bytes[i - 1] == b'\r' { i - 1 } else { i };
                return Some((start, end));
            }
        }
        i += 1;
    }
    None
}

/// Extract the payloads of the `data:` lines of one frame.
///
/// Each line is trimmed before the prefix check; the remainder after the
/// prefix is trimmed again and dropped when empty. Other SSE fields
/// (`event:`, `id:`, comments) are ignored.
pub fn data_payloads(frame: &str) -> Vec<String> {
    frame
        .split('\n')
        .map(str::trim)
        .filter_map(|line| line.strip_prefix(DATA_PREFIX))
        .map(str::trim)
        .filter(|payload| !payload.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames_of(chunks: &[&[u8]]) -> Vec<String> {
        let mut decoder = FrameDecoder::new();
        let mut frames = Vec::new();
        for chunk in chunks {
            decoder.push(chunk);
            while let Some(frame) = decoder.next_frame() {
                frames.push(frame);
            }
        }
        frames
    }

    #[test]
    fn single_frame() {
        assert_eq!(
            frames_of(&[b"data: {\"token\":\"hi\"}\n\n"]),
            vec!["data: {\"token\":\"hi\"}"]
        );
    }

    #[test]
    fn no_frame_without_separator() {
        let mut decoder = FrameDecoder::new();
        decoder.push(b"data: {\"token\":\"hi\"}\n");
        assert!(decoder.next_frame().is_none());
        assert!(decoder.buffered_len() > 0);
    }

    #[test]
    fn crlf_separator() {
        assert_eq!(
            frames_of(&[b"data: a\r\n\r\ndata: b\r\n\r\n"]),
            vec!["data: a", "data: b"]
        );
    }

    #[test]
    fn mixed_separators() {
        assert_eq!(
            frames_of(&[b"data: a\n\r\ndata: b\r\n\ndata: c\n\n"]),
            vec!["data: a", "data: b", "data: c"]
        );
    }

    #[test]
    fn separator_split_across_chunks() {
        assert_eq!(
            frames_of(&[b"data: a\r\n", b"\r", b"\ndata: b\n", b"\n"]),
            vec!["data: a", "data: b"]
        );
    }

    #[test]
    fn chunking_never_changes_frames() {
        let body = "data: {\"token\":\"Hel\"}\r\n\r\nevent: x\ndata: {\"token\":\"lo\"}\n\ndata: {\"done\":true}\n\n";
        let whole = frames_of(&[body.as_bytes()]);
        for size in 1..body.len() {
            let chunks: Vec<&[u8]> = body.as_bytes().chunks(size).collect();
            assert_eq!(frames_of(&chunks), whole, "chunk size {size}");
        }
        for split in 0..=body.len() {
            let (a, b) = body.as_bytes().split_at(split);
            assert_eq!(frames_of(&[a, b]), whole, "split at {split}");
        }
    }

    #[test]
    fn finish_returns_trailing_partial() {
        let mut decoder = FrameDecoder::new();
        decoder.push(b"data: a\n\ndata: {\"tok");
        assert_eq!(decoder.next_frame().as_deref(), Some("data: a"));
        assert!(decoder.next_frame().is_none());
        assert_eq!(decoder.finish().as_deref(), Some("data: {\"tok"));
        assert!(decoder.finish().is_none());
    }

    #[test]
    fn payloads_keep_only_data_lines() {
        let frame = "event: message\r\nid: 7\r\n: comment\r\ndata: {\"token\":\"a\"}\r\n  data:{\"done\":true}  ";
        assert_eq!(
            data_payloads(frame),
            vec!["{\"token\":\"a\"}", "{\"done\":true}"]
        );
    }

    #[test]
    fn empty_data_lines_dropped() {
        assert!(data_payloads("data:\ndata:    ").is_empty());
    }
}
