use glam::{Vec2, Vec3, Vec4};

/// Strength of the uniform white ambient term.
pub const AMBIENT_STRENGTH: f32 = 0.02;

pub fn ambient_color() -> Vec3 {
    Vec3::ONE * AMBIENT_STRENGTH
}

/// Source of a surface's base color, keyed by interpolated texture coordinate.
///
/// Texture storage and filtering live outside this crate; implementors
/// only hand back the already-filtered sample.
pub trait BaseColorSampler {
    fn sample(&self, uv: Vec2) -> Vec4;
}

impl<F> BaseColorSampler for F
where
    F: Fn(Vec2) -> Vec4,
{
    fn sample(&self, uv: Vec2) -> Vec4 {
        self(uv)
    }
}

/// Sampler returning the same color everywhere, used for untextured passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor(pub Vec4);

impl BaseColorSampler for SolidColor {
    fn sample(&self, _uv: Vec2) -> Vec4 {
        self.0
    }
}

pub struct SurfaceColorResolver;

impl SurfaceColorResolver {
    /// Combines ambient and accumulated light with the base color. The
    /// result is always opaque.
    pub fn resolve(light_energy: Vec3, base_color: Vec3) -> Vec4 {
        ((ambient_color() + light_energy) * base_color).extend(1.0)
    }

    pub fn resolve_sampled<S>(light_energy: Vec3, sampler: &S, uv: Vec2) -> Vec4
    where
        S: BaseColorSampler + ?Sized,
    {
        Self::resolve(light_energy, sampler.sample(uv).truncate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlit_surface_only_receives_ambient() {
        let base = Vec3::new(1.0, 0.5, 0.25);
        let color = SurfaceColorResolver::resolve(Vec3::ZERO, base);
        assert_eq!(color, Vec4::new(0.02, 0.01, 0.005, 1.0));
    }

    #[test]
    fn sampled_alpha_is_discarded() {
        let sampler = SolidColor(Vec4::new(1.0, 1.0, 1.0, 0.25));
        let color = SurfaceColorResolver::resolve_sampled(Vec3::splat(0.98), &sampler, Vec2::ZERO);
        assert!(color.abs_diff_eq(Vec4::ONE, 1e-6));
    }

    #[test]
    fn closures_act_as_samplers() {
        let checker = |uv: Vec2| {
            if (uv.x * 2.0).floor() as i32 % 2 == 0 {
                Vec4::ONE
            } else {
                Vec4::ZERO
            }
        };
        let lit = SurfaceColorResolver::resolve_sampled(Vec3::ONE, &checker, Vec2::new(0.1, 0.0));
        let dark = SurfaceColorResolver::resolve_sampled(Vec3::ONE, &checker, Vec2::new(0.6, 0.0));
        assert!(lit.x > 1.0);
        assert_eq!(dark, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }
}
