//! Nearest-hit selection over marker hit volumes.

use glam::Vec3;

use crate::ray::{Capsule, Ray, intersect_capsule, intersect_sphere};

/// Find the closest capsule hit along `ray`.
///
/// `occluder` is an opaque sphere `(center, radius)`; hits farther than its
/// front surface are hidden behind it. Ties keep the first candidate.
pub fn pick_nearest<K, I>(ray: &Ray, candidates: I, occluder: Option<(Vec3, f32)>) -> Option<(K, f32)>
where
    I: IntoIterator<Item = (K, Capsule)>,
{
    let limit = occluder
        .and_then(|(center, radius)| intersect_sphere(ray, center, radius))
        .unwrap_or(f32::INFINITY);

    let mut best: Option<(K, f32)> = None;
    for (key, capsule) in candidates {
        let Some(t) = intersect_capsule(ray, &capsule) else {
            continue;
        };
        if t > limit {
            continue;
        }
        if best.as_ref().is_none_or(|(_, b)| t < *b) {
            best = Some((key, t));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam(base: Vec3, height: f32) -> Capsule {
        Capsule {
            start: base,
            end: base + base.normalize() * height,
            radius: 0.04,
        }
    }

    #[test]
    fn test_nearest_of_two_wins() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let far = Capsule {
            start: Vec3::new(-1.0, 0.0, 0.0),
            end: Vec3::new(1.0, 0.0, 0.0),
            radius: 0.1,
        };
        let near = Capsule {
            start: Vec3::new(-1.0, 0.0, 3.0),
            end: Vec3::new(1.0, 0.0, 3.0),
            radius: 0.1,
        };
        let (key, t) = pick_nearest(&ray, [("far", far), ("near", near)], None).unwrap();
        assert_eq!(key, "near");
        assert!((t - 6.9).abs() < 1e-4);
    }

    #[test]
    fn test_marker_behind_globe_is_occluded() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.5), Vec3::NEG_Z);
        let back = beam(Vec3::new(0.0, 0.0, -2.005), 0.3);
        let front = beam(Vec3::new(0.0, 0.0, 2.005), 0.3);
        let globe = Some((Vec3::ZERO, 2.0));

        assert!(pick_nearest(&ray, [(1u32, back)], globe).is_none());
        assert_eq!(pick_nearest(&ray, [(1u32, back), (2, front)], globe).map(|h| h.0), Some(2));
        // Without the occluder the back marker is reachable.
        assert_eq!(pick_nearest(&ray, [(1u32, back)], None).map(|h| h.0), Some(1));
    }

    #[test]
    fn test_beam_sticking_past_limb_is_pickable() {
        // A marker on the limb with the beam poking out sideways.
        let base = Vec3::new(2.005, 0.0, 0.0);
        let capsule = beam(base, 0.3);
        let ray = Ray::new(Vec3::new(2.2, 0.0, 5.5), Vec3::NEG_Z);
        let hit = pick_nearest(&ray, [(7u8, capsule)], Some((Vec3::ZERO, 2.0)));
        assert_eq!(hit.map(|h| h.0), Some(7));
    }

    #[test]
    fn test_empty_and_missing() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.5), Vec3::NEG_Z);
        assert!(pick_nearest::<u32, _>(&ray, [], None).is_none());
        let off = beam(Vec3::new(0.0, 2.005, 0.0), 0.3);
        assert!(pick_nearest(&ray, [(0u32, off)], Some((Vec3::ZERO, 2.0))).is_none());
    }
}
