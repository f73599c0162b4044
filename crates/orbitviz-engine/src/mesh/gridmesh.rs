use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::{Grid, MeshData};
use crate::error::VizError;

/// Smooth-surface vertex: position plus normalized texture coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GridVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Triangulates a grid of positions into a shared-vertex surface.
///
/// One vertex per sample with `uv = (row / (rows - 1), col / (cols - 1))`.
/// Each quad `me, right, down, corner` becomes `{me, right, corner}` and
/// `{me, corner, down}`.
pub fn tessellate_grid(grid: &Grid<Vec3>) -> Result<MeshData<GridVertex>, VizError> {
    grid.require_tessellatable()?;

    let rows = grid.rows();
    let cols = grid.cols();
    let u_den = (rows - 1) as f32;
    let v_den = (cols - 1) as f32;

    let mut vertices = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let p = grid[(r, c)];
            vertices.push(GridVertex {
                position: p.to_array(),
                uv: [r as f32 / u_den, c as f32 / v_den],
            });
        }
    }

    let mut indices = Vec::with_capacity((rows - 1) * (cols - 1) * 6);
    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            let me = (r * cols + c) as u32;
            let right = me + 1;
            let down = ((r + 1) * cols + c) as u32;
            let corner = down + 1;

            indices.extend_from_slice(&[me, right, corner]);
            indices.extend_from_slice(&[me, corner, down]);
        }
    }

    Ok(MeshData { vertices, indices })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(rows: usize, cols: usize) -> Grid<Vec3> {
        Grid::from_fn(rows, cols, |r, c| Vec3::new(r as f32, c as f32, 0.0))
    }

    #[test]
    fn three_by_three_counts() {
        let mesh = tessellate_grid(&flat(3, 3)).unwrap();
        assert_eq!(mesh.vertices.len(), 9);
        assert_eq!(mesh.indices.len(), 24);
        assert_eq!(mesh.triangle_count(), 8);
        assert!(mesh.indices.iter().all(|&i| i < 9));
    }

    #[test]
    fn first_quad_winding() {
        let mesh = tessellate_grid(&flat(2, 3)).unwrap();
        // me=0, right=1, down=3, corner=4
        assert_eq!(&mesh.indices[..6], &[0, 1, 4, 0, 4, 3]);
    }

    #[test]
    fn texture_coordinates_span_unit_square() {
        let mesh = tessellate_grid(&flat(3, 5)).unwrap();
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[4].uv, [0.0, 1.0]);
        assert_eq!(mesh.vertices[7].uv, [0.5, 0.5]);
        assert_eq!(mesh.vertices[14].uv, [1.0, 1.0]);
        assert_eq!(mesh.vertices[7].position, [1.0, 2.0, 0.0]);
    }

    #[test]
    fn non_square_grid_counts() {
        let mesh = tessellate_grid(&flat(4, 2)).unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.triangle_count(), 3 * 1 * 2);
    }

    #[test]
    fn degenerate_grid_is_rejected() {
        assert_eq!(
            tessellate_grid(&flat(1, 3)),
            Err(VizError::GridTooSmall { rows: 1, cols: 3 })
        );
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<GridVertex>(), 5 * 4);
    }
}
