use crate::error::Result;
use nalgebra_glm::DVec3;

/// A curve in 3-space parameterized over `[0, 1]`, rational or not.
pub trait AbstractCurve {
    /// Euclidean point at `u`.
    fn point(&self, u: f64) -> Result<DVec3>;

    /// Euclidean derivatives through order `E` at `u`; entry 0 is the
    /// point itself.
    fn derivatives<const E: usize>(&self, u: f64) -> Result<Vec<DVec3>>;
}
