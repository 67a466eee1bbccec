use crate::buffer::{GeometryBuffer, IndexRatio, RenderableGeometry, Topology};
use crate::config::MaterialHandle;
use crate::error::DebugDrawError;
use crate::vertex::{Color, Position};

/// Line-list batch: every segment is two vertices and two indices.
#[derive(Debug)]
pub struct LineBatch {
    buffer: GeometryBuffer,
    material: MaterialHandle,
}

impl LineBatch {
    /// Create a line batch holding `initial_capacity` vertices before growing.
    pub fn new(initial_capacity: usize, material: MaterialHandle) -> Result<Self, DebugDrawError> {
        Ok(Self {
            buffer: GeometryBuffer::new(
                Topology::Lines,
                IndexRatio::LINE,
                initial_capacity,
                false,
            )?,
            material,
        })
    }

    /// Append one segment with independent endpoint colors.
    pub fn push_line(
        &mut self,
        start: Position,
        end: Position,
        start_color: Color,
        end_color: Color,
    ) -> Result<(), DebugDrawError> {
        self.buffer.reserve_slots(2, 2)?;
        let a = self.buffer.append_vertex(start, start_color, None);
        let b = self.buffer.append_vertex(end, end_color, None);
        self.buffer.append_index(a);
        self.buffer.append_index(b);
        Ok(())
    }

    /// Make room for `lines` more segments in one reallocation at most.
    pub fn reserve_lines(&mut self, lines: usize) -> Result<bool, DebugDrawError> {
        let slots = lines
            .checked_mul(2)
            .ok_or(DebugDrawError::CapacityExhausted {
                requested_vertices: usize::MAX,
                requested_indices: usize::MAX,
            })?;
        self.buffer.reserve_slots(slots, slots)
    }

    /// Number of segments pushed since the last clear.
    pub fn line_count(&self) -> usize {
        self.buffer.index_count() / 2
    }

    pub fn material(&self) -> MaterialHandle {
        self.material
    }

    pub fn buffer(&self) -> &GeometryBuffer {
        &self.buffer
    }

    pub fn build(&self) -> RenderableGeometry<'_> {
        self.buffer.build()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub(crate) fn extend_from(&mut self, other: &LineBatch) -> Result<bool, DebugDrawError> {
        self.buffer.extend_from(&other.buffer)
    }
}
