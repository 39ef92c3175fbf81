use crate::error::{Error, Result};
use crate::knot_vector::{EndCondition, Knots};
use crate::{abstract_curve::AbstractCurve, nd_curve::NdBsplineCurve};
use nalgebra_glm::{DVec2, DVec3, DVec4};

/// A rational curve: a B-spline over homogeneous 4-vectors
/// `[x*w, y*w, z*w, w]`, projected back to 3-space after evaluation.
pub type NurbsCurve = NdBsplineCurve<4>;

/// Lifts 3-D control points into homogeneous space by their weights.
/// Weights must pair 1:1 with the points and be strictly positive; a zero
/// weight has no projective image.
pub fn lift(points: &[DVec3], weights: &[f64]) -> Result<Vec<DVec4>> {
    check_weights(points.len(), weights)?;
    Ok(points
        .iter()
        .zip(weights)
        .map(|(p, &w)| DVec4::new(p.x * w, p.y * w, p.z * w, w))
        .collect())
}

/// 2-D counterpart of [`lift`], for curves evaluated as
/// [`NdBsplineCurve<3>`] with projection via [`project_2d`].
pub fn lift_2d(points: &[DVec2], weights: &[f64]) -> Result<Vec<DVec3>> {
    check_weights(points.len(), weights)?;
    Ok(points
        .iter()
        .zip(weights)
        .map(|(p, &w)| DVec3::new(p.x * w, p.y * w, w))
        .collect())
}

/// Projects a homogeneous point back to Euclidean 3-space.
pub fn project(p: DVec4) -> DVec3 {
    p.xyz() / p.w
}

/// Projects a homogeneous point back to Euclidean 2-space.
pub fn project_2d(p: DVec3) -> DVec2 {
    p.xy() / p.z
}

pub(crate) fn check_weights(n: usize, weights: &[f64]) -> Result<()> {
    if weights.len() != n {
        return Err(Error::WeightCountMismatch {
            expected: n,
            got: weights.len(),
        });
    }
    for (index, &value) in weights.iter().enumerate() {
        if value <= 0.0 {
            return Err(Error::BadWeight { index, value });
        }
    }
    Ok(())
}

impl NurbsCurve {
    /// Builds a rational curve from Euclidean control points and matching
    /// weights.  With every weight equal the geometry reduces to the
    /// plain B-spline over the same points.
    pub fn from_points_weights(
        points: &[DVec3],
        weights: &[f64],
        degree: usize,
        end: EndCondition,
        knots: &Knots,
    ) -> Result<Self> {
        NdBsplineCurve::new(lift(points, weights)?, degree, end, knots)
    }
}

impl AbstractCurve for NurbsCurve {
    fn point(&self, u: f64) -> Result<DVec3> {
        Ok(project(self.point_at(u)?))
    }

    /// Derivatives of the projected curve (The NURBS Book, A4.2): the
    /// homogeneous derivatives are corrected by the weight derivatives
    /// through the binomial recurrence.
    fn derivatives<const E: usize>(&self, u: f64) -> Result<Vec<DVec3>> {
        let ders = self.curve_derivatives::<E>(u)?;
        let mut CK = vec![DVec3::zeros(); E + 1];
        for k in 0..=E {
            let mut v = ders[k].xyz();
            for i in 1..=k {
                let b = num_integer::binomial(k, i);
                v -= b as f64 * ders[i].w * CK[k - i];
            }
            CK[k] = v / ders[0].w;
        }
        Ok(CK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra_glm::vec3;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn hill() -> Vec<DVec3> {
        vec![
            vec3(0.0, 0.0, 0.0),
            vec3(1.0, 2.0, 0.0),
            vec3(2.0, 2.0, 0.0),
            vec3(3.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn uniform_weights_reduce_to_the_bspline() {
        let pts = hill();
        let plain = NdBsplineCurve::clamped(pts.clone(), 2).unwrap();
        let rational = NurbsCurve::from_points_weights(
            &pts,
            &[2.5; 4],
            2,
            EndCondition::Clamped,
            &Knots::Uniform,
        )
        .unwrap();
        for &u in &[0.0, 0.2, 0.5, 0.7, 1.0] {
            assert_relative_eq!(
                rational.point(u).unwrap(),
                plain.point_at(u).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn quarter_circle_is_exact() {
        // quadratic rational Bezier arc from (1,0) to (0,1)
        let pts = vec![vec3(1.0, 0.0, 0.0), vec3(1.0, 1.0, 0.0), vec3(0.0, 1.0, 0.0)];
        let weights = [1.0, FRAC_1_SQRT_2, 1.0];
        let arc = NurbsCurve::from_points_weights(
            &pts,
            &weights,
            2,
            EndCondition::Clamped,
            &Knots::Uniform,
        )
        .unwrap();
        for i in 0..=16 {
            let p = arc.point(i as f64 / 16.0).unwrap();
            assert_relative_eq!(p.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn heavier_weight_pulls_the_curve() {
        let pts = vec![vec3(0.0, 0.0, 0.0), vec3(1.0, 2.0, 0.0), vec3(2.0, 0.0, 0.0)];
        let flat = NurbsCurve::from_points_weights(
            &pts,
            &[1.0, 1.0, 1.0],
            2,
            EndCondition::Clamped,
            &Knots::Uniform,
        )
        .unwrap();
        let pulled = NurbsCurve::from_points_weights(
            &pts,
            &[1.0, 5.0, 1.0],
            2,
            EndCondition::Clamped,
            &Knots::Uniform,
        )
        .unwrap();
        assert!(pulled.point(0.5).unwrap().y > flat.point(0.5).unwrap().y);
    }

    #[test]
    fn rational_tangent_matches_finite_differences() {
        let pts = vec![vec3(1.0, 0.0, 0.0), vec3(1.0, 1.0, 0.0), vec3(0.0, 1.0, 0.0)];
        let weights = [1.0, FRAC_1_SQRT_2, 1.0];
        let arc = NurbsCurve::from_points_weights(
            &pts,
            &weights,
            2,
            EndCondition::Clamped,
            &Knots::Uniform,
        )
        .unwrap();
        let u = 0.3;
        let h = 1e-6;
        let numeric = (arc.point(u + h).unwrap() - arc.point(u - h).unwrap()) / (2.0 * h);
        let analytic = arc.derivatives::<1>(u).unwrap()[1];
        assert_relative_eq!(analytic, numeric, epsilon = 1e-5);
    }

    #[test]
    fn non_positive_weights_are_fatal() {
        let pts = hill();
        let err =
            NurbsCurve::from_points_weights(&pts, &[1.0, 0.0, 1.0, 1.0], 2, EndCondition::Clamped, &Knots::Uniform)
                .unwrap_err();
        assert_eq!(
            err,
            Error::BadWeight {
                index: 1,
                value: 0.0
            }
        );
        let err =
            NurbsCurve::from_points_weights(&pts, &[1.0, -2.0, 1.0, 1.0], 2, EndCondition::Clamped, &Knots::Uniform)
                .unwrap_err();
        assert_eq!(
            err,
            Error::BadWeight {
                index: 1,
                value: -2.0
            }
        );
    }

    #[test]
    fn weight_count_must_match() {
        let err = NurbsCurve::from_points_weights(
            &hill(),
            &[1.0, 1.0],
            2,
            EndCondition::Clamped,
            &Knots::Uniform,
        )
        .unwrap_err();
        assert_eq!(err, Error::WeightCountMismatch { expected: 4, got: 2 });
    }

    #[test]
    fn lift_2d_round_trips_through_projection() {
        let pts = vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 2.0), DVec2::new(3.0, 1.0)];
        let lifted = lift_2d(&pts, &[1.0, 4.0, 0.5]).unwrap();
        for (p, l) in pts.iter().zip(&lifted) {
            assert_relative_eq!(project_2d(*l), *p, epsilon = 1e-12);
        }
    }
}
