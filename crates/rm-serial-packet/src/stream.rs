//! Header-synchronised splitting of a raw serial byte stream.
//!
//! The link carries no framing beyond each packet's leading header byte, so a
//! reader scans for a known header, then waits for the fixed size of that
//! packet kind:
//!
//! ```text
//! ... garbage ... | header | body (size - 3 bytes) | checksum_lo | checksum_hi |
//! ```
//!
//! A header byte value can also appear inside a float, so a frame found this
//! way is only a candidate. Callers verify the checksum and call
//! [`PacketStream::resync`] to reject it; scanning then resumes one byte after
//! the rejected header.

use bytes::{Buf, Bytes, BytesMut};

use crate::{decode_any, AnyPacket, PacketError, PacketKind, MAX_PACKET_SIZE};

/// Maximum number of bytes held while waiting for a complete packet.
pub const MAX_BUFFERED: usize = 4096;

/// Splits received bytes into fixed-size packet frames.
#[derive(Debug)]
pub struct PacketStream {
    /// Buffer for accumulating incoming data.
    buffer: BytesMut,
    /// Kinds whose header starts a frame.
    accept: Vec<PacketKind>,
    /// Last frame handed out, kept until the next one so it can be rejected.
    last: Option<Bytes>,
    /// Bytes skipped while searching for a header.
    discarded: u64,
}

impl Default for PacketStream {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketStream {
    /// Create a stream that accepts every packet kind.
    pub fn new() -> Self {
        Self::for_kinds(&PacketKind::ALL)
    }

    /// Create a stream for the host side of the link (board telemetry only).
    pub fn receiving() -> Self {
        Self::for_kinds(&[PacketKind::Receive])
    }

    /// Create a stream that only starts frames on the given kinds' headers.
    pub fn for_kinds(kinds: &[PacketKind]) -> Self {
        PacketStream {
            buffer: BytesMut::with_capacity(MAX_PACKET_SIZE * 4),
            accept: kinds.to_vec(),
            last: None,
            discarded: 0,
        }
    }

    /// Add received data to the buffer.
    ///
    /// If the buffer grows past [`MAX_BUFFERED`], bytes that the scan in
    /// [`next_frame`](Self::next_frame) would skip anyway are dropped first,
    /// so waiting frames survive. Only if candidate frames alone still exceed
    /// the limit are the oldest of them dropped, whole.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);

        if self.buffer.len() > MAX_BUFFERED {
            self.compact();
        }
    }

    /// Drop skippable bytes, then whole frames from the front, until the
    /// buffer fits in [`MAX_BUFFERED`].
    fn compact(&mut self) {
        let before = self.buffer.len();
        let mut kept = BytesMut::with_capacity(before);
        // Start offsets (in `kept`) of the candidate frames, oldest first.
        let mut starts = Vec::new();

        let mut pos = 0;
        while pos < before {
            match self.accepted_kind(self.buffer[pos]) {
                Some(kind) => {
                    let end = (pos + kind.size()).min(before);
                    starts.push(kept.len());
                    kept.extend_from_slice(&self.buffer[pos..end]);
                    pos = end;
                }
                None => pos += 1,
            }
        }

        if kept.len() > MAX_BUFFERED {
            let excess = kept.len() - MAX_BUFFERED;
            let cut = starts
                .iter()
                .copied()
                .find(|&start| start >= excess)
                .unwrap_or(kept.len());
            kept.advance(cut);
        }

        let dropped = before - kept.len();
        log::debug!("packet stream overflow, dropping {} buffered bytes", dropped);
        self.buffer = kept;
        self.discarded += dropped as u64;
    }

    /// Try to split the next complete frame off the buffer.
    ///
    /// Returns `Some((kind, frame))` where `frame.len() == kind.size()`, or
    /// `None` if more data is needed.
    pub fn next_frame(&mut self) -> Option<(PacketKind, Bytes)> {
        // Scan for a header byte, discarding any preceding garbage
        let skip = self
            .buffer
            .iter()
            .position(|&b| self.accepted_kind(b).is_some())
            .unwrap_or(self.buffer.len());
        if skip > 0 {
            log::trace!("skipped {} bytes before packet header", skip);
            self.buffer.advance(skip);
            self.discarded += skip as u64;
        }

        let kind = self.accepted_kind(*self.buffer.first()?)?;
        if self.buffer.len() < kind.size() {
            return None;
        }

        let frame = self.buffer.split_to(kind.size()).freeze();
        self.last = Some(frame.clone());
        Some((kind, frame))
    }

    /// Split and decode the next complete packet.
    pub fn next_packet(&mut self) -> Option<Result<AnyPacket, PacketError>> {
        self.next_frame().map(|(_, frame)| decode_any(&frame))
    }

    /// Reject the frame most recently returned.
    ///
    /// Its header byte is dropped and the rest is put back in front of the
    /// buffer, so the next scan can find a header inside it. Returns `false`
    /// if there was no frame to reject.
    pub fn resync(&mut self) -> bool {
        let Some(frame) = self.last.take() else {
            return false;
        };

        let mut rebuilt = BytesMut::with_capacity(frame.len() - 1 + self.buffer.len());
        rebuilt.extend_from_slice(&frame[1..]);
        rebuilt.extend_from_slice(&self.buffer);
        self.buffer = rebuilt;
        self.discarded += 1;

        log::debug!("resynchronising after rejected {} bytes frame", frame.len());
        true
    }

    /// Number of bytes dropped so far while searching for headers.
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Get the number of buffered bytes.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last = None;
    }

    fn accepted_kind(&self, header: u8) -> Option<PacketKind> {
        PacketKind::from_header(header).filter(|kind| self.accept.contains(kind))
    }
}
