use log::warn;

use tidal_serde::{
    read_var_uint, read_var_usize, write_var_uint, write_var_usize, ByteReader, ByteWrite,
    SerdeErr,
};

/// Operation log of a replicated collection.
///
/// Every recorded op gets a sequence number, `base` is the sequence of the
/// oldest op still held. Delta payloads carry `base` and full payloads carry
/// the sequence of the next op to be recorded, so a receiver can drop ops its
/// state already contains.
pub(crate) struct ChangeLog<Op> {
    ops: Vec<Op>,
    base: u64,
    // receiving side: sequence of the next op that isn't applied yet
    received: u64,
}

/// Header of a received delta payload
pub(crate) struct DeltaHeader {
    pub base: u64,
    pub count: usize,
}

impl<Op> ChangeLog<Op> {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            base: 0,
            received: 0,
        }
    }

    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Sequence number the next recorded op will get
    pub fn end(&self) -> u64 {
        self.base + self.ops.len() as u64
    }

    pub fn clear(&mut self) {
        self.base = self.end();
        self.ops.clear();
    }

    /// Drops the ops recorded before `mark`, later ones are kept
    pub fn confirm(&mut self, mark: u64) {
        let count = usize::try_from(mark.saturating_sub(self.base))
            .unwrap_or(usize::MAX)
            .min(self.ops.len());
        self.ops.drain(..count);
        self.base += count as u64;
    }

    pub fn write_full_header(&self, writer: &mut dyn ByteWrite) {
        write_var_uint(writer, self.end());
    }

    pub fn write_delta(
        &self,
        writer: &mut dyn ByteWrite,
        mut write_op: impl FnMut(&Op, &mut dyn ByteWrite),
    ) {
        write_var_uint(writer, self.base);
        write_var_usize(writer, self.ops.len());
        for op in &self.ops {
            write_op(op, writer);
        }
    }

    /// Every op before the returned sequence is part of the received state
    pub fn read_full_header(&self, reader: &mut ByteReader) -> Result<u64, SerdeErr> {
        read_var_uint(reader)
    }

    pub fn read_delta_header(&self, reader: &mut ByteReader) -> Result<DeltaHeader, SerdeErr> {
        let base = read_var_uint(reader)?;
        let count = read_var_usize(reader)?;
        if base > self.received {
            warn!(
                "Change log skipped from op {} to op {}, {} op(s) were never received",
                self.received,
                base,
                base - self.received
            );
        }
        Ok(DeltaHeader { base, count })
    }

    /// Whether the op with this sequence number is already in the received state
    pub fn is_received(&self, sequence: u64) -> bool {
        sequence < self.received
    }

    pub fn set_received(&mut self, end: u64) {
        self.received = end;
    }
}
