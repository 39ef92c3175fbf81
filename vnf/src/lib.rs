//! Thin adapter from sampled point grids to triangle meshes.
//!
//! The spline evaluators only ever produce point grids; this crate turns
//! those grids into a vertex-and-face list the way a downstream renderer
//! or CAD kernel expects them, optionally wrapping rows or columns for
//! closed parametric directions.  Nothing here inspects the geometry.

use bspline::{project, BsplineSurface, NurbsSurface};
use log::debug;
use nalgebra_glm::DVec3;

/// A triangle mesh as parallel vertex and face lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vnf {
    pub vertices: Vec<DVec3>,
    pub faces: Vec<[u32; 3]>,
}

impl Vnf {
    /// Triangulates a row-major point grid: each grid quad becomes two
    /// triangles.  `wrap_rows` joins the last row back to the first
    /// (likewise `wrap_cols` for columns), mirroring a closed parametric
    /// direction.  Grids with fewer than two rows or columns produce
    /// vertices but no faces.
    pub fn from_grid(grid: &[Vec<DVec3>], wrap_rows: bool, wrap_cols: bool) -> Self {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        let vertices: Vec<DVec3> = grid.iter().flatten().copied().collect();

        let mut faces = Vec::new();
        if rows >= 2 && cols >= 2 {
            let row_bands = if wrap_rows { rows } else { rows - 1 };
            let col_bands = if wrap_cols { cols } else { cols - 1 };
            let idx = |i: usize, j: usize| ((i % rows) * cols + (j % cols)) as u32;
            for i in 0..row_bands {
                for j in 0..col_bands {
                    let a = idx(i, j);
                    let b = idx(i + 1, j);
                    let c = idx(i + 1, j + 1);
                    let d = idx(i, j + 1);
                    faces.push([a, b, c]);
                    faces.push([a, c, d]);
                }
            }
        }
        debug!(
            "built vnf from {}x{} grid: {} vertices, {} faces",
            rows,
            cols,
            vertices.len(),
            faces.len()
        );
        Vnf { vertices, faces }
    }

    /// Samples a B-spline patch and triangulates it, wrapping closed
    /// directions.  The duplicate seam row/column that sampling a closed
    /// direction produces is dropped before wrapping so the seam band is
    /// not degenerate.
    pub fn from_bspline_surface(
        surface: &BsplineSurface,
        u_segments: usize,
        v_segments: usize,
    ) -> Self {
        let grid = surface.sample(u_segments, v_segments);
        Self::from_sampled(grid, surface.is_closed_u(), surface.is_closed_v())
    }

    /// Rational counterpart of [`Vnf::from_bspline_surface`]; projects
    /// the homogeneous samples before triangulating.
    pub fn from_nurbs_surface(
        surface: &NurbsSurface,
        u_segments: usize,
        v_segments: usize,
    ) -> Self {
        let grid = surface
            .sample(u_segments, v_segments)
            .into_iter()
            .map(|row| row.into_iter().map(project).collect())
            .collect();
        Self::from_sampled(grid, surface.is_closed_u(), surface.is_closed_v())
    }

    fn from_sampled(mut grid: Vec<Vec<DVec3>>, closed_u: bool, closed_v: bool) -> Self {
        if closed_u {
            grid.pop();
        }
        if closed_v {
            for row in &mut grid {
                row.pop();
            }
        }
        Self::from_grid(&grid, closed_u, closed_v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bspline::{Axis, EndCondition, Knots, NdBsplineSurface};
    use nalgebra_glm::vec3;

    fn flat_grid(rows: usize, cols: usize) -> Vec<Vec<DVec3>> {
        (0..rows)
            .map(|i| {
                (0..cols)
                    .map(|j| vec3(j as f64, i as f64, 0.0))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn grid_quads_become_two_triangles_each() {
        let vnf = Vnf::from_grid(&flat_grid(3, 4), false, false);
        assert_eq!(vnf.vertices.len(), 12);
        assert_eq!(vnf.faces.len(), 2 * 2 * 3);
        for f in &vnf.faces {
            for &v in f {
                assert!((v as usize) < vnf.vertices.len());
            }
        }
    }

    #[test]
    fn wrapping_adds_a_band_per_direction() {
        let open = Vnf::from_grid(&flat_grid(3, 3), false, false);
        let wrapped_rows = Vnf::from_grid(&flat_grid(3, 3), true, false);
        let wrapped_both = Vnf::from_grid(&flat_grid(3, 3), true, true);
        assert_eq!(open.faces.len(), 8);
        assert_eq!(wrapped_rows.faces.len(), 12);
        assert_eq!(wrapped_both.faces.len(), 18);
    }

    #[test]
    fn degenerate_grids_have_no_faces() {
        let vnf = Vnf::from_grid(&flat_grid(1, 5), false, false);
        assert_eq!(vnf.vertices.len(), 5);
        assert!(vnf.faces.is_empty());
    }

    #[test]
    fn closed_surface_meshes_without_a_seam_band() {
        let ring = vec![
            vec![vec3(1.0, 0.0, 0.0), vec3(1.0, 0.0, 1.0)],
            vec![vec3(0.0, 1.0, 0.0), vec3(0.0, 1.0, 1.0)],
            vec![vec3(-1.0, 0.0, 0.0), vec3(-1.0, 0.0, 1.0)],
            vec![vec3(0.0, -1.0, 0.0), vec3(0.0, -1.0, 1.0)],
        ];
        let s = NdBsplineSurface::new(ring, Axis::closed(2), Axis::clamped(1)).unwrap();
        let vnf = Vnf::from_bspline_surface(&s, 2, 1);
        // u: 4 spans * 2 segments (seam sample dropped), v: 1 span
        assert_eq!(vnf.vertices.len(), 8 * 2);
        assert_eq!(vnf.faces.len(), 8 * 1 * 2);
        // every vertex sits between the two rings
        for v in &vnf.vertices {
            assert!(v.z >= 0.0 && v.z <= 1.0);
        }
    }

    #[test]
    fn nurbs_surface_vertices_are_projected() {
        let arc = [vec3(1.0, 0.0, 0.0), vec3(1.0, 1.0, 0.0), vec3(0.0, 1.0, 0.0)];
        let points: Vec<Vec<DVec3>> = (0..2)
            .map(|i| arc.iter().map(|p| p + vec3(0.0, 0.0, i as f64)).collect())
            .collect();
        let w = std::f64::consts::FRAC_1_SQRT_2;
        let weights = vec![vec![1.0, w, 1.0]; 2];
        let s = bspline::NurbsSurface::from_points_weights(
            &points,
            &weights,
            Axis::clamped(1),
            Axis {
                degree: 2,
                end: EndCondition::Clamped,
                knots: Knots::Uniform,
            },
        )
        .unwrap();
        let vnf = Vnf::from_nurbs_surface(&s, 1, 8);
        for v in &vnf.vertices {
            assert_relative_eq!(v.xy().norm(), 1.0, epsilon = 1e-12);
        }
    }
}
