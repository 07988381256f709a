use bytes::Bytes;

use crate::error::DownloadError;

/// Collects body chunks in arrival order and concatenates them once the
/// stream has terminated. Concatenation order is load-bearing: the saved
/// file is exactly the chunks back to back.
#[derive(Debug, Default)]
pub struct ByteAccumulator {
    chunks: Vec<Bytes>,
    total_len: usize,
    finished: bool,
    payload: Option<Vec<u8>>,
}

impl ByteAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, chunk: Bytes) {
        debug_assert!(!self.finished, "append after stream terminated");
        self.total_len += chunk.len();
        self.chunks.push(chunk);
    }

    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// Marks the producing stream as terminated. Only after this is
    /// `finalize` legal.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    /// Concatenated payload. Computed once and cached, so repeated calls
    /// return the identical bytes.
    pub fn finalize(&mut self) -> Result<&[u8], DownloadError> {
        if !self.finished {
            return Err(DownloadError::PrematureFinalize);
        }
        if self.payload.is_none() {
            let chunks = std::mem::take(&mut self.chunks);
            let mut payload = Vec::with_capacity(self.total_len);
            for chunk in &chunks {
                payload.extend_from_slice(chunk);
            }
            self.payload = Some(payload);
        }
        Ok(self.payload.as_deref().unwrap_or(&[]))
    }
}
