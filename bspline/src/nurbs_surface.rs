use crate::abstract_surface::AbstractSurface;
use crate::error::{Error, Result};
use crate::nd_surface::{Axis, NdBsplineSurface};
use crate::nurbs_curve::{lift, project};
use nalgebra_glm::{DVec2, DVec3};

/// A rational patch: a tensor-product B-spline over homogeneous
/// 4-vectors, projected back to 3-space after evaluation.
pub type NurbsSurface = NdBsplineSurface<4>;

impl NurbsSurface {
    /// Builds a rational patch from a Euclidean control grid and a weight
    /// grid of the same shape.
    pub fn from_points_weights(
        points: &[Vec<DVec3>],
        weights: &[Vec<f64>],
        u_axis: Axis,
        v_axis: Axis,
    ) -> Result<Self> {
        if weights.len() != points.len() {
            return Err(Error::WeightCountMismatch {
                expected: points.len(),
                got: weights.len(),
            });
        }
        let lifted = points
            .iter()
            .zip(weights)
            .map(|(row, wrow)| lift(row, wrow))
            .collect::<Result<Vec<_>>>()?;
        NdBsplineSurface::new(lifted, u_axis, v_axis)
    }

    /// Projected uniform sampling, for handing straight to a mesh
    /// builder.
    pub fn sample_projected(&self, u_segments: usize, v_segments: usize) -> Vec<Vec<DVec3>> {
        self.sample(u_segments, v_segments)
            .into_iter()
            .map(|row| row.into_iter().map(project).collect())
            .collect()
    }
}

impl AbstractSurface for NurbsSurface {
    fn point(&self, uv: DVec2) -> Result<DVec3> {
        Ok(project(self.point_at(uv.x, uv.y)?))
    }

    fn grid(&self, us: &[f64], vs: &[f64]) -> Result<Vec<Vec<DVec3>>> {
        Ok(self
            .grid_at(us, vs)?
            .into_iter()
            .map(|row| row.into_iter().map(project).collect())
            .collect())
    }
}
