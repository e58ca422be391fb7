//! The scene: a flat store of segment entities with stable ids.
//!
//! Entities are addressed by the `u32` id assigned at insertion. Ids are
//! never reused; entities live for the lifetime of the scene.

/// Segment entity with feature-point markers and highlight state.
pub mod segment;

pub use segment::{FeaturePoint, Marker, MarkerPalette, SegmentEntity};

/// Flat entity store assigning stable ids to segments.
#[derive(Debug, Default)]
pub struct Scene {
    segments: Vec<SegmentEntity>,
    next_id: u32,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment to the scene, returning its assigned id.
    pub fn add_segment(
        &mut self,
        start: glam::Vec3,
        end: glam::Vec3,
        palette: MarkerPalette,
    ) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.segments.push(SegmentEntity::new(id, start, end, palette));
        id
    }

    /// Look up a segment by id.
    #[must_use]
    pub fn segment(&self, id: u32) -> Option<&SegmentEntity> {
        self.segments.iter().find(|s| s.id() == id)
    }

    /// Look up a segment by id for mutation.
    pub fn segment_mut(&mut self, id: u32) -> Option<&mut SegmentEntity> {
        self.segments.iter_mut().find(|s| s.id() == id)
    }

    /// All segments in insertion order.
    #[must_use]
    pub fn segments(&self) -> &[SegmentEntity] {
        &self.segments
    }

    /// Mutable iterator over all segments.
    pub fn segments_mut(&mut self) -> impl Iterator<Item = &mut SegmentEntity> {
        self.segments.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn ids_are_stable_and_unique() {
        let mut scene = Scene::new();
        let a = scene.add_segment(
            Vec3::ZERO,
            Vec3::X,
            MarkerPalette::default(),
        );
        let b = scene.add_segment(
            Vec3::ZERO,
            Vec3::Y,
            MarkerPalette::default(),
        );
        assert_ne!(a, b);
        assert_eq!(scene.segment(a).map(SegmentEntity::id), Some(a));
        assert_eq!(scene.segment(b).map(SegmentEntity::id), Some(b));
        assert!(scene.segment(999).is_none());
    }
}
