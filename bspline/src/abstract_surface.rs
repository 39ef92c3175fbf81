use crate::error::Result;
use nalgebra_glm::{DVec2, DVec3};

/// A tensor-product patch in 3-space parameterized over `[0, 1]^2`,
/// rational or not.
pub trait AbstractSurface {
    /// Euclidean point at `(uv.x, uv.y)`.
    fn point(&self, uv: DVec2) -> Result<DVec3>;

    /// Row-major grid of Euclidean points, one row per entry of `us` and
    /// one column per entry of `vs`.
    fn grid(&self, us: &[f64], vs: &[f64]) -> Result<Vec<Vec<DVec3>>>;
}
