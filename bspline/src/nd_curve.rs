use crate::error::{Error, Result};
use crate::knot_vector::{segment_schedule, EndCondition, KnotVector, Knots};
use log::trace;
use nalgebra_glm::TVec;
use smallvec::SmallVec;

/// A B-spline curve with control points in `R^N`.
///
/// `N` is the coordinate dimension; the rational variants store
/// homogeneous coordinates here and project afterwards (see
/// [`crate::NurbsCurve`]).  Construction resolves and validates the knot
/// vector eagerly; the evaluators cannot fail except on a parameter
/// outside `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NdBsplineCurve<const N: usize> {
    control_points: Vec<TVec<f64, N>>,
    degree: usize,
    end: EndCondition,
    knots: KnotVector,
}

impl<const N: usize> NdBsplineCurve<N> {
    /// Builds a curve, materializing the knot vector and (for closed
    /// curves) duplicating the first `degree` control points onto the
    /// tail to realize periodicity.
    pub fn new(
        control_points: Vec<TVec<f64, N>>,
        degree: usize,
        end: EndCondition,
        knots: &Knots,
    ) -> Result<Self> {
        let knots = KnotVector::resolve(control_points.len(), degree, end, knots)?;
        let mut control_points = control_points;
        if end == EndCondition::Closed {
            let head: Vec<_> = control_points[..degree].to_vec();
            control_points.extend(head);
        }
        Ok(Self {
            control_points,
            degree,
            end,
            knots,
        })
    }

    /// Convenience constructor for the common clamped default-knot case.
    pub fn clamped(control_points: Vec<TVec<f64, N>>, degree: usize) -> Result<Self> {
        Self::new(control_points, degree, EndCondition::Clamped, &Knots::Uniform)
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn end_condition(&self) -> EndCondition {
        self.end
    }

    pub fn is_closed(&self) -> bool {
        self.end == EndCondition::Closed
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    /// Internal control points, including any closure duplicates.
    pub fn control_points(&self) -> &[TVec<f64, N>] {
        &self.control_points
    }

    fn domain(&self) -> (f64, f64) {
        self.knots.domain(self.control_points.len(), self.degree)
    }

    /// Maps a normalized parameter in `[0, 1]` onto the internal knot
    /// scale.  Out-of-range parameters (including NaN) are fatal; there is
    /// no silent clamping.
    fn map_param(&self, u: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&u) {
            return Err(Error::ParameterOutOfDomain(u));
        }
        let (lo, hi) = self.domain();
        Ok(lo + u * (hi - lo))
    }

    /// Point at an already-mapped knot-scale parameter.
    pub(crate) fn curve_point(&self, t: f64) -> TVec<f64, N> {
        let span = self
            .knots
            .find_span(self.control_points.len(), self.degree, t);
        de_boor(&self.knots, self.degree, span, &self.control_points, t)
    }

    /// Point at a normalized parameter in `[0, 1]`.
    pub fn point_at(&self, u: f64) -> Result<TVec<f64, N>> {
        let t = self.map_param(u)?;
        Ok(self.curve_point(t))
    }

    /// One point per requested parameter.  Every parameter is validated
    /// before any evaluation happens, so there is no partial result.
    pub fn points_at(&self, us: &[f64]) -> Result<Vec<TVec<f64, N>>> {
        let ts = us
            .iter()
            .map(|&u| self.map_param(u))
            .collect::<Result<Vec<f64>>>()?;
        Ok(ts.iter().map(|&t| self.curve_point(t)).collect())
    }

    /// Uniform sampling with `segments` subdivisions between adjacent
    /// distinct knots.  A sample lands exactly on every knot, so corners
    /// introduced by degree-multiplicity knots are never blurred over.
    pub fn sample(&self, segments: usize) -> Vec<TVec<f64, N>> {
        let breaks = self.knots.breaks(self.control_points.len(), self.degree);
        let schedule = segment_schedule(&breaks, segments);
        trace!(
            "sampling {:?} curve at {} parameters across {} spans",
            self.end,
            schedule.len(),
            breaks.len() - 1,
        );
        schedule.iter().map(|&t| self.curve_point(t)).collect()
    }

    /// Derivatives through order `E` with respect to the normalized
    /// parameter, chain-rule scaled from the knot scale.  Entry 0 is the
    /// point itself; orders above the degree are zero.
    pub fn curve_derivatives<const E: usize>(&self, u: f64) -> Result<Vec<TVec<f64, N>>> {
        let t = self.map_param(u)?;
        let (lo, hi) = self.domain();
        let p = self.degree;
        let du = E.min(p);
        let span = self.knots.find_span(self.control_points.len(), p, t);
        let ders = self.knots.derivative_basis_functions(span, t, p, du);
        let mut CK = vec![TVec::<f64, N>::zeros(); E + 1];
        let mut scale = 1.0;
        for k in 0..=E {
            if k <= du {
                for j in 0..=p {
                    CK[k] += self.control_points[span - p + j] * (ders[k][j] * scale);
                }
            }
            scale *= hi - lo;
        }
        Ok(CK)
    }
}

/// The Cox-de Boor triangular recursion, unrolled into an in-place loop
/// over a working window of `degree + 1` points (one blend level per
/// `r`).  Requires `t` to lie in the non-empty span `span`, which
/// [`KnotVector::find_span`] guarantees; that containment is what keeps
/// every blend denominator non-zero.
pub(crate) fn de_boor<const N: usize>(
    knots: &KnotVector,
    degree: usize,
    span: usize,
    control: &[TVec<f64, N>],
    t: f64,
) -> TVec<f64, N> {
    let mut d: SmallVec<[TVec<f64, N>; 8]> =
        control[span - degree..=span].iter().copied().collect();
    for r in 1..=degree {
        for j in (r..=degree).rev() {
            let i = span - degree + j;
            let denom = knots[i + degree - r + 1] - knots[i];
            debug_assert!(denom > 0.0, "empty span presented to de_boor");
            let alpha = (t - knots[i]) / denom;
            d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
        }
    }
    d[degree]
}
