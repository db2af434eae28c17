//! Object numbering and byte offset bookkeeping for the cross-reference table.

use crate::error::{PdfError, Result};
use crate::objects::ObjectId;
use crate::writer::ByteSink;

/// Byte offset of an object, or a marker that it has not been written yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Fixed(u64),
    Pending(ObjectId),
}

/// Hands out object numbers starting at 1 and records where each object
/// begins in the output.
#[derive(Debug, Default)]
pub struct ObjectAllocator {
    offsets: Vec<Offset>,
}

impl ObjectAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last assigned object number, 0 when nothing was allocated.
    pub fn object_number(&self) -> u32 {
        self.offsets.len() as u32
    }

    /// Allocates an id whose object is written later through `begin_at`.
    pub fn allocate_deferred(&mut self) -> ObjectId {
        let id = ObjectId::from(self.object_number() + 1);
        self.offsets.push(Offset::Pending(id));
        id
    }

    /// Allocates an id and begins its object at the current sink position.
    pub fn allocate(&mut self, sink: &mut ByteSink) -> ObjectId {
        let id = self.allocate_deferred();
        self.record(id, sink.len() as u64);
        sink.out(&format!("{} 0 obj", id.number()));
        id
    }

    /// Fixes the offset of `id` to the current sink position and optionally
    /// writes its `n 0 obj` header.
    pub fn begin_at(&mut self, id: ObjectId, sink: &mut ByteSink, emit_header: bool) -> Result<()> {
        if sink.is_redirected() {
            return Err(PdfError::RenderTarget(format!(
                "object {} cannot begin inside a redirected buffer",
                id.number()
            )));
        }
        self.record(id, sink.len() as u64);
        if emit_header {
            sink.out(&format!("{} 0 obj", id.number()));
        }
        Ok(())
    }

    pub fn offset(&self, id: ObjectId) -> Option<Offset> {
        let index = (id.number() as usize).checked_sub(1)?;
        self.offsets.get(index).copied()
    }

    /// Resolved offsets for ids `1..=object_number`, failing on the first
    /// object that was allocated but never written.
    pub fn finalize(&self) -> Result<Vec<u64>> {
        self.offsets
            .iter()
            .map(|offset| match offset {
                Offset::Fixed(position) => Ok(*position),
                Offset::Pending(id) => Err(PdfError::UnresolvedOffset(id.number())),
            })
            .collect()
    }

    fn record(&mut self, id: ObjectId, position: u64) {
        if let Some(slot) = (id.number() as usize)
            .checked_sub(1)
            .and_then(|index| self.offsets.get_mut(index))
        {
            *slot = Offset::Fixed(position);
        }
    }
}
