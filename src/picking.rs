//! Screen-space picking of segments and their feature points.
//!
//! A click is resolved in two steps: first a ray cast against the scene
//! (segment sticks within a small pixel window, plus any visible marker
//! spheres) produces a world-space hit point and the owning segment id;
//! then the hit point is compared against the segment's three feature
//! points in normalized device coordinates to decide which, if any, to
//! highlight.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::scene::{FeaturePoint, Scene, SegmentEntity};

/// Half-width of the screen-space pick window around the click, in pixels.
pub const PICK_WINDOW_PX: f32 = 8.0;

/// World-space radius of marker spheres used for ray tests. Matches the
/// rendered marker size.
pub const MARKER_PICK_RADIUS: f32 = 0.1;

/// NDC-space tolerance for matching the start/end feature points.
const ENDPOINT_TOLERANCE: f32 = 0.1;

/// NDC-space tolerance for the center feature point. Larger than the
/// endpoint tolerance to compensate for the rendered sphere's perceptual
/// size.
const CENTER_TOLERANCE: f32 = 0.12;

/// A resolved scene intersection: the owning segment and the world-space
/// hit point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Id of the segment that was hit.
    pub segment: u32,
    /// Intersection point in world space.
    pub world_point: Vec3,
}

/// Convert screen coordinates to a world-space ray (origin and direction).
#[must_use]
pub fn screen_to_ray(
    screen_x: f32,
    screen_y: f32,
    screen_width: f32,
    screen_height: f32,
    view_proj: Mat4,
) -> (Vec3, Vec3) {
    // Convert to NDC (-1 to 1), y flipped for screen coordinates
    let ndc_x = (screen_x / screen_width) * 2.0 - 1.0;
    let ndc_y = 1.0 - (screen_y / screen_height) * 2.0;

    let inv_view_proj = view_proj.inverse();

    // Unproject near and far points (wgpu uses 0-1 depth range)
    let ndc_near = Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
    let ndc_far = Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

    let world_near = inv_view_proj * ndc_near;
    let world_far = inv_view_proj * ndc_far;

    // Perspective divide
    let ray_origin = world_near.truncate() / world_near.w;
    let world_far = world_far.truncate() / world_far.w;

    let ray_dir = (world_far - ray_origin).normalize();

    (ray_origin, ray_dir)
}

/// Project a world point to normalized device coordinates.
///
/// Returns `None` for points at or behind the eye plane.
#[must_use]
pub fn project_ndc(view_proj: Mat4, point: Vec3) -> Option<Vec3> {
    let clip = view_proj * point.extend(1.0);
    if clip.w <= 1e-6 {
        return None;
    }
    Some(clip.truncate() / clip.w)
}

/// Project a world point to physical pixel coordinates.
fn project_to_pixels(
    view_proj: Mat4,
    point: Vec3,
    viewport: (f32, f32),
) -> Option<Vec2> {
    let ndc = project_ndc(view_proj, point)?;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.0,
        (1.0 - ndc.y) * 0.5 * viewport.1,
    ))
}

/// Ray-sphere intersection test.
///
/// Returns the distance along the ray to the first intersection, or `None`
/// if the ray misses.
fn ray_sphere_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let oc = ray_origin - center;
    let a = ray_dir.dot(ray_dir);
    let b = 2.0 * oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if t > 0.0 {
        Some(t)
    } else {
        // Inside the sphere: try the far intersection
        let t2 = (-b + discriminant.sqrt()) / (2.0 * a);
        (t2 > 0.0).then_some(t2)
    }
}

/// Closest approach between a ray and a segment `a..b`.
///
/// Returns `(t, s)` where `t` is the ray parameter (clamped to be
/// non-negative) and `s` the segment parameter clamped to `[0, 1]`.
fn closest_points_ray_segment(
    ray_origin: Vec3,
    ray_dir: Vec3,
    a: Vec3,
    b: Vec3,
) -> (f32, f32) {
    let u = b - a;
    let w0 = a - ray_origin;

    let uu = u.dot(u);
    let uv = u.dot(ray_dir);
    let vv = ray_dir.dot(ray_dir);
    let uw = u.dot(w0);
    let vw = ray_dir.dot(w0);

    let denom = uu * vv - uv * uv;
    let s = if denom.abs() < 1e-8 {
        // Degenerate or parallel: fall back to the segment start
        0.0
    } else {
        ((uv * vw - vv * uw) / denom).clamp(0.0, 1.0)
    };
    let t = ((vw + s * uv) / vv).max(0.0);
    (t, s)
}

/// Cast a pick ray and return the nearest scene intersection, if any.
///
/// Candidates are each segment's stick (accepted when its closest point
/// projects within [`PICK_WINDOW_PX`] of the click) and every visible
/// marker sphere hit by the ray. The candidate nearest along the ray wins.
/// A miss is a silent no-op, not an error.
#[must_use]
pub fn pick(
    scene: &Scene,
    view_proj: Mat4,
    x: f32,
    y: f32,
    viewport: (f32, f32),
) -> Option<PickHit> {
    let (ray_origin, ray_dir) =
        screen_to_ray(x, y, viewport.0, viewport.1, view_proj);
    let click = Vec2::new(x, y);

    let mut best: Option<(f32, PickHit)> = None;

    for seg in scene.segments() {
        let mut candidates: Vec<(f32, Vec3)> = Vec::new();

        // The stick itself, gated by the pixel window around the click
        let (t, s) =
            closest_points_ray_segment(ray_origin, ray_dir, seg.start(), seg.end());
        if t > 0.0 {
            let point = seg.start() + (seg.end() - seg.start()) * s;
            let in_window = project_to_pixels(view_proj, point, viewport)
                .is_some_and(|px| px.distance(click) <= PICK_WINDOW_PX);
            if in_window {
                candidates.push((t, point));
            }
        }

        // Visible marker spheres
        for marker in seg.markers() {
            if !marker.visible {
                continue;
            }
            if let Some(t) = ray_sphere_intersect(
                ray_origin,
                ray_dir,
                marker.position,
                MARKER_PICK_RADIUS,
            ) {
                candidates.push((t, ray_origin + ray_dir * t));
            }
        }

        for (t, point) in candidates {
            let closer = best.as_ref().is_none_or(|(best_t, _)| t < *best_t);
            if closer {
                best = Some((
                    t,
                    PickHit {
                        segment: seg.id(),
                        world_point: point,
                    },
                ));
            }
        }
    }

    best.map(|(_, hit)| hit)
}

/// Decide which feature point, if any, a world-space hit selects.
///
/// Both the feature point and the hit point are projected to normalized
/// device coordinates and compared by Euclidean distance against the
/// per-feature tolerance. The first feature point under tolerance in
/// enumeration order (start, end, center) wins; the scan does not look
/// for a global nearest.
#[must_use]
pub fn resolve_feature(
    segment: &SegmentEntity,
    world_hit: Vec3,
    view_proj: Mat4,
) -> Option<FeaturePoint> {
    let hit_ndc = project_ndc(view_proj, world_hit)?;

    for feature in FeaturePoint::ALL {
        let tolerance = match feature {
            FeaturePoint::Center => CENTER_TOLERANCE,
            FeaturePoint::Start | FeaturePoint::End => ENDPOINT_TOLERANCE,
        };
        let Some(feature_ndc) =
            project_ndc(view_proj, segment.feature_position(feature))
        else {
            continue;
        };

        let distance = feature_ndc.distance(hit_ndc);
        if distance < tolerance {
            log::debug!(
                "feature {feature:?} matched at NDC distance {distance:.4}"
            );
            return Some(feature);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::camera::Camera;
    use crate::scene::MarkerPalette;

    const VIEWPORT: (f32, f32) = (800.0, 800.0);

    fn camera_at(eye: Vec3) -> Camera {
        Camera {
            eye,
            target: Vec3::new(5.0, 5.0, 0.0),
            up: Vec3::Y,
            aspect: 1.0,
            fovy: 45.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    fn demo_scene() -> Scene {
        let mut scene = Scene::new();
        let _ = scene.add_segment(
            Vec3::ZERO,
            Vec3::new(10.0, 10.0, 0.0),
            MarkerPalette::default(),
        );
        scene
    }

    /// Pixel coordinates a world point projects to, for driving clicks.
    fn pixels_of(view_proj: Mat4, point: Vec3) -> Vec2 {
        project_to_pixels(view_proj, point, VIEWPORT).unwrap()
    }

    #[test]
    fn click_on_segment_returns_world_point() {
        let scene = demo_scene();
        let view_proj = camera_at(Vec3::new(5.0, 5.0, 20.0)).build_matrix();

        let px = pixels_of(view_proj, Vec3::ZERO);
        let hit = pick(&scene, view_proj, px.x, px.y, VIEWPORT).unwrap();

        assert_eq!(hit.segment, 0);
        assert!(hit.world_point.distance(Vec3::ZERO) < 1e-2);
    }

    #[test]
    fn click_within_pixel_window_still_hits() {
        let scene = demo_scene();
        let view_proj = camera_at(Vec3::new(5.0, 5.0, 20.0)).build_matrix();

        let px = pixels_of(view_proj, Vec3::ZERO);
        let hit =
            pick(&scene, view_proj, px.x + 4.0, px.y, VIEWPORT).unwrap();

        assert_eq!(hit.segment, 0);
        assert!(hit.world_point.distance(Vec3::ZERO) < 0.5);
    }

    #[test]
    fn click_far_from_scene_is_a_miss() {
        let scene = demo_scene();
        let view_proj = camera_at(Vec3::new(5.0, 5.0, 20.0)).build_matrix();

        assert_eq!(pick(&scene, view_proj, 60.0, 60.0, VIEWPORT), None);
    }

    #[test]
    fn visible_marker_sphere_is_pickable() {
        let mut scene = demo_scene();
        scene.segment_mut(0).unwrap().toggle_markers();
        let view_proj = camera_at(Vec3::new(5.0, 5.0, 20.0)).build_matrix();

        let end = Vec3::new(10.0, 10.0, 0.0);
        let px = pixels_of(view_proj, end);
        let hit = pick(&scene, view_proj, px.x, px.y, VIEWPORT).unwrap();

        // The ray enters the marker sphere before reaching the stick
        assert!(hit.world_point.distance(end) <= MARKER_PICK_RADIUS + 1e-3);
    }

    #[test]
    fn first_match_wins_over_center() {
        let scene = demo_scene();
        let seg = scene.segment(0).unwrap();
        // Far camera: the whole segment spans a small NDC range, so a hit
        // at the start point is also within the center tolerance. The
        // enumeration-order scan must still pick the start.
        let view_proj = camera_at(Vec3::new(5.0, 5.0, 200.0)).build_matrix();

        let start_ndc = project_ndc(view_proj, seg.start()).unwrap();
        let center_ndc = project_ndc(view_proj, seg.midpoint()).unwrap();
        assert!(start_ndc.distance(center_ndc) < CENTER_TOLERANCE);

        assert_eq!(
            resolve_feature(seg, Vec3::ZERO, view_proj),
            Some(FeaturePoint::Start)
        );
    }

    #[test]
    fn center_tolerance_is_wider_than_endpoint_tolerance() {
        let scene = demo_scene();
        let seg = scene.segment(0).unwrap();
        let view_proj = camera_at(Vec3::new(5.0, 5.0, 20.0)).build_matrix();

        // A hit offset from the midpoint so its NDC distance lands between
        // the endpoint and center tolerances.
        let hit = Vec3::new(5.9, 5.0, 0.0);
        let hit_ndc = project_ndc(view_proj, hit).unwrap();
        let center_ndc = project_ndc(view_proj, seg.midpoint()).unwrap();
        let d = hit_ndc.distance(center_ndc);
        assert!(d > ENDPOINT_TOLERANCE && d < CENTER_TOLERANCE);

        assert_eq!(
            resolve_feature(seg, hit, view_proj),
            Some(FeaturePoint::Center)
        );
    }

    #[test]
    fn out_of_tolerance_hit_selects_nothing() {
        let scene = demo_scene();
        let seg = scene.segment(0).unwrap();
        let view_proj = camera_at(Vec3::new(5.0, 5.0, 20.0)).build_matrix();

        // On the segment but far from every feature point
        assert_eq!(
            resolve_feature(seg, Vec3::new(2.5, 2.5, 0.0), view_proj),
            None
        );
    }

    #[test]
    fn ray_through_sphere_reports_entry_distance() {
        let origin = Vec3::new(0.0, 0.0, 10.0);
        let dir = Vec3::new(0.0, 0.0, -1.0);
        let t = ray_sphere_intersect(origin, dir, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-4);

        assert_eq!(
            ray_sphere_intersect(origin, dir, Vec3::new(5.0, 0.0, 0.0), 1.0),
            None
        );
    }

    #[test]
    fn closest_approach_clamps_to_segment_ends() {
        let origin = Vec3::new(5.0, 5.0, 20.0);
        let dir = (Vec3::ZERO - origin).normalize();
        let (t, s) = closest_points_ray_segment(
            origin,
            dir,
            Vec3::ZERO,
            Vec3::new(10.0, 10.0, 0.0),
        );
        assert!(s.abs() < 1e-4);
        assert!((t - origin.length()).abs() < 1e-3);
    }
}
