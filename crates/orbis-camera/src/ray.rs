//! Ray intersection against spheres and capsules.

use glam::Vec3;

const PARALLEL_EPS: f32 = 1e-8;

/// A half-line with a unit direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// `direction` is normalized; a zero direction yields `-Z`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or(Vec3::NEG_Z),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// A segment swept by a sphere. Used as the marker hit volume.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capsule {
    pub start: Vec3,
    pub end: Vec3,
    pub radius: f32,
}

/// Distance along `ray` to the first surface crossing of a sphere.
///
/// Returns the exit distance when the origin is inside, and `None` when the
/// sphere is missed or entirely behind the origin.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let h = b * b - c;
    if h < 0.0 {
        return None;
    }
    let h = h.sqrt();
    let near = -b - h;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + h;
    (far >= 0.0).then_some(far)
}

/// Distance along `ray` to the first hit on `capsule`, if any.
pub fn intersect_capsule(ray: &Ray, capsule: &Capsule) -> Option<f32> {
    let ba = capsule.end - capsule.start;
    let oa = ray.origin - capsule.start;
    let rd = ray.direction;
    let r = capsule.radius;

    let baba = ba.dot(ba);
    let bard = ba.dot(rd);
    let baoa = ba.dot(oa);
    let rdoa = rd.dot(oa);
    let oaoa = oa.dot(oa);

    let mut best: Option<f32> = None;
    let mut keep = |t: f32| {
        if t >= 0.0 && best.is_none_or(|b| t < b) {
            best = Some(t);
        }
    };

    // Cylindrical body.
    let a = baba - bard * bard;
    if a > PARALLEL_EPS {
        let b = baba * rdoa - baoa * bard;
        let c = baba * oaoa - baoa * baoa - r * r * baba;
        let h = b * b - a * c;
        if h >= 0.0 {
            let t = (-b - h.sqrt()) / a;
            let y = baoa + t * bard;
            if y > 0.0 && y < baba {
                keep(t);
            }
        }
    }

    // Hemispherical caps.
    for end in [capsule.start, capsule.end] {
        if let Some(t) = intersect_sphere(ray, end, r) {
            keep(t);
        }
    }

    best
}
