//! Visualization seam.
//!
//! Collision shapes can be mirrored by viewport objects owned by an
//! external host. The data model never creates or destroys those objects
//! itself; it holds a non-owning [`VisualId`] per shape and talks to the
//! host only through the injected [`VisualSink`] capability. A stale or
//! missing handle is a no-op on the sink side, never a fault here.

use crate::param::StructKind;

/// Non-owning handle to an externally-owned viewport object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualId(pub u64);

/// Injected factory/release capability for shape visualization objects.
///
/// Implementations live in the host (viewport, editor); the data model
/// only calls `release` when a shape is removed and leaves `create` to
/// whoever wires new shapes into the scene.
pub trait VisualSink {
    /// Create a viewport object for a shape. Returns `None` when the
    /// host declines (headless operation).
    fn create(&mut self, kind: StructKind, name: &str) -> Option<VisualId>;

    /// Release the viewport object behind `id`. Unknown or already
    /// released ids must be tolerated silently.
    fn release(&mut self, id: VisualId);
}

/// Sink for headless operation: creates nothing, releases nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl VisualSink for NullSink {
    fn create(&mut self, _kind: StructKind, _name: &str) -> Option<VisualId> {
        None
    }

    fn release(&mut self, _id: VisualId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_sink_is_inert() {
        let mut sink = NullSink;
        assert_eq!(sink.create(StructKind::Sphere, "headcol"), None);
        sink.release(VisualId(42));
    }
}
