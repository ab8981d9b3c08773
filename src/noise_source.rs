//! Noise field consumed by vertex perturbation.
//!
//! Geometry only ever asks for a 4-channel sample in `[0, 1]` at a world
//! position, so the source sits behind [`NoiseSampler`] and is handed to the
//! grid at construction.

use std::f64::consts::TAU;

use bevy::prelude::{Reflect, Vec3, Vec4};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::math;
use crate::metrics::NOISE_SCALE;

/// Source of the 4-channel perturbation field.
pub trait NoiseSampler: Send + Sync {
    /// Bilinear sample at the planar position `(x, z)`; every channel is in `[0, 1]`.
    fn sample(&self, position: Vec3) -> Vec4;
}

/// Settings for baking a [`NoiseTexture`].
#[derive(Clone, Debug, Reflect)]
pub struct NoiseSettings {
    /// Base seed; channel `i` uses `seed + i`.
    pub seed: u32,
    /// Number of fBm octaves per channel.
    pub octaves: usize,
    /// Edge length of the square texture in texels.
    pub texture_size: usize,
    /// Radius of the 4D torus the texture is wrapped around. Larger values
    /// produce finer detail per tile.
    pub torus_radius: f64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            seed: 1337,
            octaves: 4,
            texture_size: 256,
            torus_radius: 1.5,
        }
    }
}

/// Baked, seamlessly tiling 4-channel noise texture.
pub struct NoiseTexture {
    size: usize,
    texels: Vec<Vec4>,
}

impl NoiseTexture {
    /// Bakes the texture from four independent `Fbm<Perlin>` channels.
    ///
    /// Each texel `(u, v)` is mapped onto two circles in 4D space, which makes
    /// the texture wrap on both axes without visible seams.
    pub fn from_settings(s: &NoiseSettings) -> Self {
        let size = s.texture_size.max(1);
        let channels: [Fbm<Perlin>; 4] = std::array::from_fn(|i| {
            Fbm::<Perlin>::new(s.seed.wrapping_add(i as u32)).set_octaves(s.octaves)
        });

        let mut texels = Vec::with_capacity(size * size);
        for row in 0..size {
            let v = row as f64 / size as f64 * TAU;
            for col in 0..size {
                let u = col as f64 / size as f64 * TAU;
                let point = [
                    u.cos() * s.torus_radius,
                    u.sin() * s.torus_radius,
                    v.cos() * s.torus_radius,
                    v.sin() * s.torus_radius,
                ];
                let [r, g, b, a] = channels
                    .each_ref()
                    .map(|fbm| math::map_noise_to_range(fbm.get(point), 0.0, 1.0).clamp(0.0, 1.0));
                texels.push(Vec4::new(r, g, b, a));
            }
        }

        Self { size, texels }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn texel(&self, col: i64, row: i64) -> Vec4 {
        let n = self.size as i64;
        let col = col.rem_euclid(n) as usize;
        let row = row.rem_euclid(n) as usize;
        self.texels[row * self.size + col]
    }

    /// Bilinear lookup at texture coordinates, repeating outside `[0, 1)`.
    pub fn sample_uv(&self, u: f32, v: f32) -> Vec4 {
        let x = u * self.size as f32 - 0.5;
        let y = v * self.size as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let bottom = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), tx);
        let top = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), tx);
        bottom.lerp(top, ty)
    }
}

impl NoiseSampler for NoiseTexture {
    fn sample(&self, position: Vec3) -> Vec4 {
        self.sample_uv(position.x * NOISE_SCALE, position.z * NOISE_SCALE)
    }
}

/// Constant noise field.
#[derive(Clone, Copy, Debug)]
pub struct UniformNoise(pub Vec4);

impl UniformNoise {
    /// All channels at 0.5, which maps to zero displacement.
    pub fn neutral() -> Self {
        Self(Vec4::splat(0.5))
    }
}

impl NoiseSampler for UniformNoise {
    fn sample(&self, _position: Vec3) -> Vec4 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_texture() -> NoiseTexture {
        NoiseTexture::from_settings(&NoiseSettings {
            texture_size: 16,
            ..NoiseSettings::default()
        })
    }

    #[test]
    fn texture_has_size_squared_texels() {
        let t = small_texture();
        assert_eq!(t.size(), 16);
        assert_eq!(t.texels.len(), 256);
    }

    #[test]
    fn channels_stay_in_unit_range() {
        let t = small_texture();
        for texel in &t.texels {
            for c in texel.to_array() {
                assert!((0.0..=1.0).contains(&c), "channel out of range: {c}");
            }
        }
    }

    #[test]
    fn channels_are_not_constant() {
        let t = small_texture();
        let first = t.texels[0];
        assert!(t.texels.iter().any(|texel| (*texel - first).abs().max_element() > 1e-3));
    }

    #[test]
    fn sampling_wraps_on_both_axes() {
        let t = small_texture();
        for (u, v) in [(0.1, 0.2), (0.73, 0.05), (0.5, 0.99)] {
            let a = t.sample_uv(u, v);
            let b = t.sample_uv(u + 1.0, v - 2.0);
            assert!((a - b).abs().max_element() < 1e-4, "wrap mismatch at ({u}, {v})");
        }
    }

    #[test]
    fn texel_centers_sample_exactly() {
        let t = small_texture();
        let u = (3.0 + 0.5) / 16.0;
        let v = (7.0 + 0.5) / 16.0;
        let s = t.sample_uv(u, v);
        assert!((s - t.texel(3, 7)).abs().max_element() < 1e-5);
    }

    #[test]
    fn same_seed_bakes_same_texture() {
        let a = small_texture();
        let b = small_texture();
        assert_eq!(a.texels, b.texels);
    }

    #[test]
    fn uniform_noise_ignores_position() {
        let n = UniformNoise::neutral();
        assert_eq!(n.sample(Vec3::new(100.0, 5.0, -3.0)), Vec4::splat(0.5));
    }
}
