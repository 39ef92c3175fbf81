use crate::error::{Error, Result};
use crate::knot_vector::{segment_schedule, EndCondition, KnotVector, Knots};
use crate::nd_curve::de_boor;
use log::trace;
use nalgebra_glm::TVec;

/// Per-direction curve shape of a tensor-product patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axis {
    pub degree: usize,
    pub end: EndCondition,
    pub knots: Knots,
}

impl Axis {
    pub fn clamped(degree: usize) -> Self {
        Self {
            degree,
            end: EndCondition::Clamped,
            knots: Knots::Uniform,
        }
    }

    pub fn open(degree: usize) -> Self {
        Self {
            degree,
            end: EndCondition::Open,
            knots: Knots::Uniform,
        }
    }

    pub fn closed(degree: usize) -> Self {
        Self {
            degree,
            end: EndCondition::Closed,
            knots: Knots::Uniform,
        }
    }

    pub fn with_knots(mut self, knots: Knots) -> Self {
        self.knots = knots;
        self
    }
}

/// A tensor-product B-spline patch over a rows x columns control grid.
///
/// `control_points[i][j]` varies along u with `i` and along v with `j`;
/// each direction carries its own degree, end condition and knot vector.
/// Evaluation is separable: the u direction collapses every column to a
/// derived control polygon, which the v direction then evaluates.
#[derive(Debug, Clone, PartialEq)]
pub struct NdBsplineSurface<const N: usize> {
    control_points: Vec<Vec<TVec<f64, N>>>,
    u_axis: Axis,
    v_axis: Axis,
    u_knots: KnotVector,
    v_knots: KnotVector,
}

impl<const N: usize> NdBsplineSurface<N> {
    /// Builds a patch, validating the grid shape and both knot vectors and
    /// duplicating leading rows/columns for closed directions.
    pub fn new(control_points: Vec<Vec<TVec<f64, N>>>, u_axis: Axis, v_axis: Axis) -> Result<Self> {
        let rows = control_points.len();
        let cols = control_points.first().map_or(0, Vec::len);
        for (row, r) in control_points.iter().enumerate() {
            if r.len() != cols {
                return Err(Error::RaggedGrid {
                    row,
                    got: r.len(),
                    expected: cols,
                });
            }
        }
        let u_knots = KnotVector::resolve(rows, u_axis.degree, u_axis.end, &u_axis.knots)?;
        let v_knots = KnotVector::resolve(cols, v_axis.degree, v_axis.end, &v_axis.knots)?;

        let mut control_points = control_points;
        if u_axis.end == EndCondition::Closed {
            let head: Vec<_> = control_points[..u_axis.degree].to_vec();
            control_points.extend(head);
        }
        if v_axis.end == EndCondition::Closed {
            for row in &mut control_points {
                let head: Vec<_> = row[..v_axis.degree].to_vec();
                row.extend(head);
            }
        }
        Ok(Self {
            control_points,
            u_axis,
            v_axis,
            u_knots,
            v_knots,
        })
    }

    pub fn u_axis(&self) -> &Axis {
        &self.u_axis
    }

    pub fn v_axis(&self) -> &Axis {
        &self.v_axis
    }

    pub fn is_closed_u(&self) -> bool {
        self.u_axis.end == EndCondition::Closed
    }

    pub fn is_closed_v(&self) -> bool {
        self.v_axis.end == EndCondition::Closed
    }

    /// Internal control grid, including any closure duplicates.
    pub fn control_points(&self) -> &[Vec<TVec<f64, N>>] {
        &self.control_points
    }

    fn u_count(&self) -> usize {
        self.control_points.len()
    }

    fn v_count(&self) -> usize {
        self.control_points[0].len()
    }

    fn map_u(&self, u: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&u) {
            return Err(Error::ParameterOutOfDomain(u));
        }
        let (lo, hi) = self.u_knots.domain(self.u_count(), self.u_axis.degree);
        Ok(lo + u * (hi - lo))
    }

    fn map_v(&self, v: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&v) {
            return Err(Error::ParameterOutOfDomain(v));
        }
        let (lo, hi) = self.v_knots.domain(self.v_count(), self.v_axis.degree);
        Ok(lo + v * (hi - lo))
    }

    /// Two-pass separable evaluation on knot-scale parameters.  Pass 1
    /// collapses every column at every requested u; pass 2 runs across
    /// the derived polygons at every requested v.  Pass 2 only starts
    /// once pass 1 is complete; there is no other ordering constraint.
    fn grid_internal(&self, tus: &[f64], tvs: &[f64]) -> Vec<Vec<TVec<f64, N>>> {
        let nu = self.u_count();
        let nv = self.v_count();
        let pu = self.u_axis.degree;
        let pv = self.v_axis.degree;
        trace!(
            "evaluating {}x{} patch grid from a {}x{} control grid",
            tus.len(),
            tvs.len(),
            nu,
            nv,
        );

        let mut column = Vec::with_capacity(nu);
        let mut derived: Vec<Vec<TVec<f64, N>>> = Vec::with_capacity(tus.len());
        for &tu in tus {
            let uspan = self.u_knots.find_span(nu, pu, tu);
            let mut row = Vec::with_capacity(nv);
            for j in 0..nv {
                column.clear();
                column.extend((0..nu).map(|i| self.control_points[i][j]));
                row.push(de_boor(&self.u_knots, pu, uspan, &column, tu));
            }
            derived.push(row);
        }

        derived
            .iter()
            .map(|polygon| {
                tvs.iter()
                    .map(|&tv| {
                        let vspan = self.v_knots.find_span(nv, pv, tv);
                        de_boor(&self.v_knots, pv, vspan, polygon, tv)
                    })
                    .collect()
            })
            .collect()
    }

    /// Surface point at normalized parameters `(u, v)` in `[0, 1]^2`.
    pub fn point_at(&self, u: f64, v: f64) -> Result<TVec<f64, N>> {
        let tu = self.map_u(u)?;
        let tv = self.map_v(v)?;
        Ok(self.grid_internal(&[tu], &[tv])[0][0])
    }

    /// Row-major grid of surface points, one row per requested u and one
    /// column per requested v.  All parameters are validated before any
    /// evaluation happens.
    pub fn grid_at(&self, us: &[f64], vs: &[f64]) -> Result<Vec<Vec<TVec<f64, N>>>> {
        let tus = us
            .iter()
            .map(|&u| self.map_u(u))
            .collect::<Result<Vec<f64>>>()?;
        let tvs = vs
            .iter()
            .map(|&v| self.map_v(v))
            .collect::<Result<Vec<f64>>>()?;
        Ok(self.grid_internal(&tus, &tvs))
    }

    /// Uniform sampling with per-direction subdivision counts, one sample
    /// exactly at every distinct knot in each direction.
    pub fn sample(&self, u_segments: usize, v_segments: usize) -> Vec<Vec<TVec<f64, N>>> {
        let u_breaks = self.u_knots.breaks(self.u_count(), self.u_axis.degree);
        let v_breaks = self.v_knots.breaks(self.v_count(), self.v_axis.degree);
        let tus = segment_schedule(&u_breaks, u_segments);
        let tvs = segment_schedule(&v_breaks, v_segments);
        self.grid_internal(&tus, &tvs)
    }
}
