//! Grid-to-triangle tessellation.
//!
//! Pure functions: every call builds fresh vertex and index arrays from the
//! whole grid. Uploading them is the job of [`crate::render::sync`].

mod cubemesh;
mod grid;
mod gridmesh;

pub use cubemesh::{
    cube_index_count, tessellate_cubes, CubeSample, CubeVertex, GridExtent, VERTICES_PER_CELL,
};
pub use grid::{Grid, MeshData};
pub use gridmesh::{tessellate_grid, GridVertex};
