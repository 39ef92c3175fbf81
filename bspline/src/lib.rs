#![allow(clippy::needless_range_loop)]
// The spline literature uses short single-letter names (p, N, CK, ...)
// everywhere, and the code is much easier to check against the standard
// algorithms when it keeps them.
#![allow(non_snake_case)]

//! Evaluation of B-spline and NURBS curves and tensor-product patches.
//!
//! Curves are built from a control polygon, a degree, an [`EndCondition`]
//! (clamped, open, or closed/periodic), and a knot description given as
//! either an explicit knot list, per-knot multiplicities over a uniform
//! grid, or pure defaults.  Rational (NURBS) variants carry per-point
//! weights in homogeneous coordinates and project back to Euclidean space
//! after evaluation.
//!
//! All validation happens eagerly at construction; evaluation itself only
//! fails on a parameter outside `[0, 1]`.

mod abstract_curve;
mod abstract_surface;
mod bspline_curve;
mod bspline_surface;
mod error;
mod knot_vector;
mod nd_curve;
mod nd_surface;
mod nurbs_curve;
mod nurbs_surface;

use smallvec::SmallVec;
type VecF = SmallVec<[f64; 8]>;

pub use crate::abstract_curve::AbstractCurve;
pub use crate::abstract_surface::AbstractSurface;
pub use crate::bspline_curve::BsplineCurve;
pub use crate::bspline_surface::BsplineSurface;
pub use crate::error::{Error, Result};
pub use crate::knot_vector::{EndCondition, KnotVector, Knots};
pub use crate::nd_curve::NdBsplineCurve;
pub use crate::nd_surface::{Axis, NdBsplineSurface};
pub use crate::nurbs_curve::{lift, lift_2d, project, project_2d, NurbsCurve};
pub use crate::nurbs_surface::NurbsSurface;
