//! Packing of encoded messages into size-bounded frames.

/// Concatenates encoded messages into frames no longer than a fixed ceiling.
///
/// A frame is flushed when the next message would push it over the ceiling, so frames
/// are filled greedily in message order. A message that alone exceeds the ceiling can
/// never be sent and is rejected without disturbing the frame being built.
#[derive(Debug)]
pub(crate) struct FrameBatcher {
    buffer: Vec<u8>,
    max_len: usize,
}

impl FrameBatcher {
    pub(crate) fn new(max_len: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(max_len),
            max_len,
        }
    }

    /// Appends `message` to the current frame, first handing the current frame to
    /// `flush` if the message would not fit.
    ///
    /// Returns `false` if the message is longer than the ceiling and was dropped.
    #[must_use]
    pub(crate) fn push(&mut self, message: &[u8], flush: impl FnOnce(&[u8])) -> bool {
        if message.len() > self.max_len {
            return false;
        }

        if self.buffer.len().saturating_add(message.len()) > self.max_len {
            flush(&self.buffer);
            self.buffer.clear();
        }

        self.buffer.extend_from_slice(message);
        true
    }

    /// Hands the last partial frame to `flush`, unless it is empty.
    pub(crate) fn finish(&mut self, flush: impl FnOnce(&[u8])) {
        if self.buffer.is_empty() {
            return;
        }

        flush(&self.buffer);
        self.buffer.clear();
    }
}
