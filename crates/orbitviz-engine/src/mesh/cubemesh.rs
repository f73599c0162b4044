use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::{Grid, MeshData};
use crate::error::VizError;

/// Faceted-surface vertex: position plus flat RGB color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// One column of a cube mesh: top height and face color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CubeSample {
    pub height: f32,
    pub color: Vec3,
}

impl CubeSample {
    pub fn new(height: f32, color: Vec3) -> Self {
        Self { height, color }
    }
}

/// World-space rectangle the grid's cell centers are spread over.
///
/// Grid rows step along X from `min_x` to `max_x`, columns along Y.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridExtent {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl GridExtent {
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self { min_x, max_x, min_y, max_y }
    }
}

/// Vertices emitted per cell.
pub const VERTICES_PER_CELL: usize = 4;

/// Triangulates a height/color grid into independent flat cell tops joined by
/// side walls.
///
/// Each cell owns four vertices, in order
/// `(x+dx, y-dy)`, `(x+dx, y+dy)`, `(x-dx, y+dy)`, `(x-dx, y-dy)`
/// where `dx, dy` are half the cell spacing:
///
/// ```text
///        1u  2u          ^ x
///      ---------         |
///      | 1   2 | 2r      |   y
///      |       |         ---->
///      | 4   3 | 3r
///      ---------
/// ```
///
/// Every cell gets a top face, the last row and column included; they are not
/// skipped the way the walls are. A wall closes the height step towards the
/// next cell along Y (`2 3 | 2r 3r`) and towards the next cell along X
/// (`1 2 | 1u 2u`) wherever that neighbor exists.
pub fn tessellate_cubes(
    grid: &Grid<CubeSample>,
    extent: GridExtent,
) -> Result<MeshData<CubeVertex>, VizError> {
    grid.require_tessellatable()?;

    let nx = grid.rows();
    let ny = grid.cols();
    let span_x = extent.max_x - extent.min_x;
    let span_y = extent.max_y - extent.min_y;
    let dx = 0.5 * span_x / (nx - 1) as f32;
    let dy = 0.5 * span_y / (ny - 1) as f32;

    let mut vertices = Vec::with_capacity(VERTICES_PER_CELL * nx * ny);
    for kx in 0..nx {
        let x = extent.min_x + span_x * kx as f32 / (nx - 1) as f32;
        for ky in 0..ny {
            let y = extent.min_y + span_y * ky as f32 / (ny - 1) as f32;
            let CubeSample { height: z, color } = grid[(kx, ky)];
            let color = color.to_array();

            for (ox, oy) in [(dx, -dy), (dx, dy), (-dx, dy), (-dx, -dy)] {
                vertices.push(CubeVertex { position: [x + ox, y + oy, z], color });
            }
        }
    }

    let mut indices = Vec::with_capacity(cube_index_count(nx, ny));
    for kx in 0..nx {
        for ky in 0..ny {
            let i1 = (VERTICES_PER_CELL * (kx * ny + ky)) as u32;
            let i2 = i1 + 1;
            let i3 = i1 + 2;
            let i4 = i1 + 3;

            indices.extend_from_slice(&[i3, i2, i1]);
            indices.extend_from_slice(&[i1, i4, i3]);

            if ky + 1 < ny {
                let i2r = i1 + 4;
                let i3r = i1 + 7;
                indices.extend_from_slice(&[i3r, i2r, i2]);
                indices.extend_from_slice(&[i2, i3, i3r]);
            }

            if kx + 1 < nx {
                let i2u = (VERTICES_PER_CELL * ((kx + 1) * ny + ky)) as u32 + 2;
                let i1u = i2u + 1;
                indices.extend_from_slice(&[i2, i2u, i1u]);
                indices.extend_from_slice(&[i1u, i1, i2]);
            }
        }
    }

    debug_assert_eq!(indices.len(), cube_index_count(nx, ny));
    Ok(MeshData { vertices, indices })
}

/// Index count produced by [`tessellate_cubes`] for an `nx × ny` grid.
///
/// `nx * ny` tops; walls only between neighbors.
pub fn cube_index_count(nx: usize, ny: usize) -> usize {
    let tops = nx * ny;
    let y_walls = nx * ny.saturating_sub(1);
    let x_walls = nx.saturating_sub(1) * ny;
    6 * (tops + y_walls + x_walls)
}
