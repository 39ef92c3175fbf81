use crate::{abstract_surface::AbstractSurface, error::Result, nd_surface::NdBsplineSurface};
use nalgebra_glm::{DVec2, DVec3};

pub type BsplineSurface = NdBsplineSurface<3>;

impl AbstractSurface for BsplineSurface {
    fn point(&self, uv: DVec2) -> Result<DVec3> {
        self.point_at(uv.x, uv.y)
    }

    fn grid(&self, us: &[f64], vs: &[f64]) -> Result<Vec<Vec<DVec3>>> {
        self.grid_at(us, vs)
    }
}
