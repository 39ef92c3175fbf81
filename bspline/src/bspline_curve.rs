use crate::{abstract_curve::AbstractCurve, error::Result, nd_curve::NdBsplineCurve};
use nalgebra_glm::DVec3;

pub type BsplineCurve = NdBsplineCurve<3>;

impl AbstractCurve for BsplineCurve {
    fn point(&self, u: f64) -> Result<DVec3> {
        self.point_at(u)
    }

    fn derivatives<const E: usize>(&self, u: f64) -> Result<Vec<DVec3>> {
        self.curve_derivatives::<E>(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra_glm::vec3;

    #[test]
    fn trait_point_matches_inherent_evaluation() {
        let c = BsplineCurve::clamped(
            vec![
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 2.0, 1.0),
                vec3(2.0, 2.0, 0.0),
                vec3(3.0, 0.0, 2.0),
            ],
            3,
        )
        .unwrap();
        assert_relative_eq!(
            c.point(0.4).unwrap(),
            c.point_at(0.4).unwrap(),
            epsilon = 1e-15
        );
        let d = c.derivatives::<2>(0.4).unwrap();
        assert_relative_eq!(d[0], c.point_at(0.4).unwrap(), epsilon = 1e-15);
    }
}
