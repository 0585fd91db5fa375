//! Byte chunk to frame assembly

/// Frame delimiter. Never appears inside a multi-byte UTF-8 sequence, so the
/// buffer can be split before decoding.
const DELIMITER: u8 = b'\n';

/// Turns an arbitrary sequence of byte chunks into complete frames.
///
/// Holds a single pending fragment: everything after the last delimiter seen
/// so far. The fragment never contains a delimiter, so each push only scans
/// the bytes it appended. A chunk may contain zero, one or many delimiters, and a boundary
/// may fall anywhere, including inside a UTF-8 character.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    pending: Vec<u8>,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every frame it completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        if chunk.is_empty() {
            return Vec::new();
        }
        let Some(in_chunk) = chunk.iter().rposition(|b| *b == DELIMITER) else {
            self.pending.extend_from_slice(chunk);
            return Vec::new();
        };
        let last = self.pending.len() + in_chunk;
        self.pending.extend_from_slice(chunk);

        // Everything up to and including the last delimiter is complete.
        let rest = self.pending.split_off(last + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete[..last]
            .split(|b| *b == DELIMITER)
            .map(decode_frame)
            .collect()
    }

    /// Bytes held back waiting for a delimiter.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// End of stream. The unterminated trailing fragment is not a frame and is
    /// dropped; returns how many bytes were discarded.
    pub fn finish(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}

fn decode_frame(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(e) => {
            tracing::warn!(
                len = bytes.len(),
                valid_up_to = e.valid_up_to(),
                "Frame is not valid UTF-8, decoding lossily"
            );
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}
