//! A line segment entity with three highlightable feature-point markers.
//!
//! The segment owns two endpoint positions and one marker per feature
//! point (start, end, center). Markers carry an explicit visibility flag
//! and their current color; at most one marker is highlighted at a time.

use glam::Vec3;

/// One of the three positions of interest on a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeaturePoint {
    /// The segment's start endpoint.
    Start,
    /// The segment's end endpoint.
    End,
    /// The derived midpoint.
    Center,
}

impl FeaturePoint {
    /// All feature points in enumeration order.
    pub const ALL: [Self; 3] = [Self::Start, Self::End, Self::Center];

    /// Marker array slot for this feature point.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Start => 0,
            Self::End => 1,
            Self::Center => 2,
        }
    }
}

/// A visual indicator sphere bound to one feature point of a segment.
#[derive(Debug, Clone, Copy)]
pub struct Marker {
    /// World-space position.
    pub position: Vec3,
    /// Whether the marker is currently drawn.
    pub visible: bool,
    /// Current display color (neutral or a highlight color).
    pub color: Vec3,
}

/// Colors used for marker display states.
#[derive(Debug, Clone, Copy)]
pub struct MarkerPalette {
    /// Color of a marker that is not highlighted.
    pub neutral: Vec3,
    /// Highlight color for the start/end markers.
    pub endpoint_highlight: Vec3,
    /// Highlight color for the center marker.
    pub center_highlight: Vec3,
}

impl Default for MarkerPalette {
    fn default() -> Self {
        Self {
            neutral: Vec3::ONE,
            endpoint_highlight: Vec3::new(1.0, 0.0, 0.0),
            center_highlight: Vec3::new(1.0, 1.0, 0.0),
        }
    }
}

/// The renderable line entity with two endpoints and a derived midpoint.
///
/// Highlight state machine: `None` (cleared) or `Some(feature)`.
/// Transitions happen through [`highlight`](Self::highlight),
/// [`clear_highlight`](Self::clear_highlight), and
/// [`toggle_markers`](Self::toggle_markers).
#[derive(Debug, Clone)]
pub struct SegmentEntity {
    id: u32,
    start: Vec3,
    end: Vec3,
    markers: [Marker; 3],
    highlighted: Option<FeaturePoint>,
    palette: MarkerPalette,
}

impl SegmentEntity {
    /// Create a segment with all markers hidden and neutral.
    #[must_use]
    pub fn new(id: u32, start: Vec3, end: Vec3, palette: MarkerPalette) -> Self {
        let marker = |position| Marker {
            position,
            visible: false,
            color: palette.neutral,
        };
        Self {
            id,
            start,
            end,
            markers: [
                marker(start),
                marker(end),
                marker((start + end) * 0.5),
            ],
            highlighted: None,
            palette,
        }
    }

    /// Scene-assigned entity id.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Start endpoint in world space.
    #[must_use]
    pub fn start(&self) -> Vec3 {
        self.start
    }

    /// End endpoint in world space.
    #[must_use]
    pub fn end(&self) -> Vec3 {
        self.end
    }

    /// Derived midpoint of the segment.
    #[must_use]
    pub fn midpoint(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// World position of the given feature point.
    #[must_use]
    pub fn feature_position(&self, feature: FeaturePoint) -> Vec3 {
        match feature {
            FeaturePoint::Start => self.start,
            FeaturePoint::End => self.end,
            FeaturePoint::Center => self.midpoint(),
        }
    }

    /// The marker bound to the given feature point.
    #[must_use]
    pub fn marker(&self, feature: FeaturePoint) -> &Marker {
        &self.markers[feature.index()]
    }

    /// All three markers, indexed by [`FeaturePoint::index`].
    #[must_use]
    pub fn markers(&self) -> &[Marker; 3] {
        &self.markers
    }

    /// Currently highlighted feature point, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<FeaturePoint> {
        self.highlighted
    }

    /// Highlight the marker at `feature`.
    ///
    /// Clears any existing highlight first, then shows the chosen marker
    /// with its highlight color (the center marker uses a distinct color
    /// from the endpoints).
    pub fn highlight(&mut self, feature: FeaturePoint) {
        self.clear_highlight();

        let color = match feature {
            FeaturePoint::Center => self.palette.center_highlight,
            FeaturePoint::Start | FeaturePoint::End => {
                self.palette.endpoint_highlight
            }
        };

        let marker = &mut self.markers[feature.index()];
        marker.visible = true;
        marker.color = color;
        self.highlighted = Some(feature);
    }

    /// Hide all markers, reset their colors to neutral, and clear the
    /// highlight state. Safe to call when already cleared.
    pub fn clear_highlight(&mut self) {
        for marker in &mut self.markers {
            marker.visible = false;
            marker.color = self.palette.neutral;
        }
        self.highlighted = None;
    }

    /// Flip the visibility of all three markers as a group.
    ///
    /// An active highlight is cleared first, so the flags always move
    /// together: all shown or all hidden.
    pub fn toggle_markers(&mut self) {
        if self.highlighted.is_some() {
            self.clear_highlight();
        }
        for marker in &mut self.markers {
            marker.visible = !marker.visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment() -> SegmentEntity {
        SegmentEntity::new(
            0,
            Vec3::ZERO,
            Vec3::new(10.0, 10.0, 0.0),
            MarkerPalette::default(),
        )
    }

    #[test]
    fn midpoint_is_average_of_endpoints() {
        let seg = segment();
        assert_eq!(seg.midpoint(), Vec3::new(5.0, 5.0, 0.0));
        assert_eq!(
            seg.feature_position(FeaturePoint::Center),
            Vec3::new(5.0, 5.0, 0.0)
        );
    }

    #[test]
    fn markers_start_hidden_and_neutral() {
        let seg = segment();
        for marker in seg.markers() {
            assert!(!marker.visible);
            assert_eq!(marker.color, Vec3::ONE);
        }
        assert_eq!(seg.highlighted(), None);
    }

    #[test]
    fn highlight_is_idempotent() {
        let mut seg = segment();
        seg.highlight(FeaturePoint::Start);
        seg.highlight(FeaturePoint::Start);

        let visible: Vec<_> =
            seg.markers().iter().filter(|m| m.visible).collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(seg.highlighted(), Some(FeaturePoint::Start));
        assert_eq!(
            seg.marker(FeaturePoint::Start).color,
            Vec3::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn new_highlight_replaces_old() {
        let mut seg = segment();
        seg.highlight(FeaturePoint::Start);
        seg.highlight(FeaturePoint::Center);

        assert_eq!(seg.highlighted(), Some(FeaturePoint::Center));
        assert!(!seg.marker(FeaturePoint::Start).visible);
        assert_eq!(seg.marker(FeaturePoint::Start).color, Vec3::ONE);
        assert!(seg.marker(FeaturePoint::Center).visible);
        assert_eq!(
            seg.marker(FeaturePoint::Center).color,
            Vec3::new(1.0, 1.0, 0.0)
        );
    }

    #[test]
    fn clear_restores_hidden_neutral_state() {
        let mut seg = segment();
        seg.highlight(FeaturePoint::End);
        seg.clear_highlight();

        for marker in seg.markers() {
            assert!(!marker.visible);
            assert_eq!(marker.color, Vec3::ONE);
        }
        assert_eq!(seg.highlighted(), None);

        // Already cleared: calling again changes nothing
        seg.clear_highlight();
        assert_eq!(seg.highlighted(), None);
    }

    #[test]
    fn toggle_twice_is_identity_without_highlight() {
        let mut seg = segment();
        seg.toggle_markers();
        assert!(seg.markers().iter().all(|m| m.visible));
        seg.toggle_markers();
        assert!(seg.markers().iter().all(|m| !m.visible));
    }

    #[test]
    fn toggle_clears_highlight_first() {
        let mut seg = segment();
        seg.highlight(FeaturePoint::Center);
        seg.toggle_markers();

        // Highlight cleared (all hidden), then the group flipped to shown
        assert_eq!(seg.highlighted(), None);
        assert!(seg.markers().iter().all(|m| m.visible));
        assert!(seg.markers().iter().all(|m| m.color == Vec3::ONE));
    }
}
