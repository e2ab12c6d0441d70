//! Background starfield: deterministic star placement in spherical shells
//! around the globe, plus the sprite size and fade used by `stars.wgsl`.

use glam::Vec3;
use orbis_config::StarLayerConfig;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Grey stars, screen-space sprites.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarLayer {
    pub radius: f32,
    pub depth: f32,
    pub count: u32,
    pub factor: f32,
    pub twinkle_speed: f32,
}

impl From<&StarLayerConfig> for StarLayer {
    fn from(c: &StarLayerConfig) -> Self {
        Self {
            radius: c.radius,
            depth: c.depth,
            count: c.count,
            factor: c.factor,
            twinkle_speed: c.twinkle_speed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarPoint {
    pub position: Vec3,
    /// Base sprite size before perspective and twinkle.
    pub size: f32,
    pub twinkle_speed: f32,
}

/// Places every layer's stars from one seed.
pub struct StarfieldGenerator {
    seed: u64,
    layers: Vec<StarLayer>,
}

impl StarfieldGenerator {
    pub fn new(seed: u64, layers: Vec<StarLayer>) -> Self {
        Self { seed, layers }
    }

    pub fn star_count(&self) -> usize {
        self.layers.iter().map(|l| l.count as usize).sum()
    }

    /// Deterministic for a given seed and layer list.
    ///
    /// Within a layer the shell radius starts at `radius + depth` and creeps
    /// inward by a random step per star, so no star falls inside `radius`.
    pub fn generate(&self) -> Vec<StarPoint> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut stars = Vec::with_capacity(self.star_count());

        for layer in &self.layers {
            let mut r = layer.radius + layer.depth;
            let step = if layer.count > 0 {
                layer.depth / layer.count as f32
            } else {
                0.0
            };
            for _ in 0..layer.count {
                r -= step * rng.random::<f32>();
                let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
                let theta = rng.random::<f32>() * std::f32::consts::TAU;
                let direction = Vec3::new(phi.sin() * theta.sin(), phi.cos(), phi.sin() * theta.cos());
                stars.push(StarPoint {
                    position: direction * r,
                    size: (0.5 + 0.5 * rng.random::<f32>()) * layer.factor,
                    twinkle_speed: layer.twinkle_speed,
                });
            }
        }

        stars
    }
}

/// Sprite diameter in pixels for a star `view_depth` units in front of the
/// camera.
pub fn point_size_px(size: f32, view_depth: f32, time: f32, twinkle_speed: f32) -> f32 {
    size * (30.0 / view_depth.max(1e-3)) * (3.0 + (time * twinkle_speed + 100.0).sin())
}

/// Sprite alpha at distance `d` from its centre, in sprite-size units.
pub fn sprite_fade(d: f32) -> f32 {
    1.0 / (1.0 + (16.0 * (d - 0.25)).exp())
}

#[cfg(test)]
mod tests {
    use orbis_config::EffectsConfig;

    use super::*;

    fn default_layers() -> Vec<StarLayer> {
        EffectsConfig::default().star_layers.iter().map(StarLayer::from).collect()
    }

    #[test]
    fn test_same_seed_same_sky() {
        let a = StarfieldGenerator::new(42, default_layers()).generate();
        let b = StarfieldGenerator::new(42, default_layers()).generate();
        assert_eq!(a, b);
        let c = StarfieldGenerator::new(43, default_layers()).generate();
        assert_ne!(a, c);
    }

    #[test]
    fn test_counts_per_layer() {
        let generator = StarfieldGenerator::new(7, default_layers());
        assert_eq!(generator.star_count(), 2000);
        assert_eq!(generator.generate().len(), 2000);
    }

    #[test]
    fn test_stars_stay_inside_their_shell() {
        let layers = default_layers();
        let stars = StarfieldGenerator::new(1, layers.clone()).generate();
        let (near, far) = stars.split_at(layers[0].count as usize);
        for (layer, stars) in [(layers[0], near), (layers[1], far)] {
            for star in stars {
                let r = star.position.length();
                assert!(r >= layer.radius - 1e-2 && r <= layer.radius + layer.depth + 1e-2, "r = {r}");
                assert!(star.size >= 0.5 * layer.factor && star.size <= layer.factor);
                assert_eq!(star.twinkle_speed, layer.twinkle_speed);
            }
        }
    }

    #[test]
    fn test_directions_cover_both_hemispheres() {
        let stars = StarfieldGenerator::new(3, default_layers()).generate();
        let up = stars.iter().filter(|s| s.position.y > 0.0).count();
        let ratio = up as f32 / stars.len() as f32;
        assert!((0.4..0.6).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn test_empty_layer() {
        let layer = StarLayer {
            radius: 10.0,
            depth: 5.0,
            count: 0,
            factor: 1.0,
            twinkle_speed: 0.1,
        };
        assert!(StarfieldGenerator::new(0, vec![layer]).generate().is_empty());
    }

    #[test]
    fn test_point_size_shrinks_with_depth() {
        let near = point_size_px(3.0, 100.0, 0.0, 0.1);
        let far = point_size_px(3.0, 200.0, 0.0, 0.1);
        assert!((near - 2.0 * far).abs() < 1e-4);
        let twinkle = 3.0 + 100.0f32.sin();
        assert!((near - 3.0 * 0.3 * twinkle).abs() < 1e-4);
    }

    #[test]
    fn test_sprite_fade_soft_edge() {
        assert!(sprite_fade(0.0) > 0.98);
        assert!((sprite_fade(0.25) - 0.5).abs() < 1e-6);
        assert!(sprite_fade(0.5) < 0.02);
    }
}
