use crate::camera::ViewProjection;
use crate::error::VizError;
use crate::mesh::{tessellate_cubes, CubeSample, CubeVertex, Grid, GridExtent};
use crate::render::sync::MeshBuffers;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    begin_scene_pass, create_scene_pipeline, load_shader, CameraBinding, ScenePipeline,
};

/// Flat-shaded column surface: one colored top per cell plus side walls.
pub struct Cubemesh {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    camera: Option<CameraBinding>,

    mesh: MeshBuffers,
}

impl Default for Cubemesh {
    fn default() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            camera: None,
            mesh: MeshBuffers::new("orbitviz cubemesh vbo", "orbitviz cubemesh ibo"),
        }
    }
}

impl Cubemesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-tessellates `grid` over `extent` and uploads it.
    ///
    /// Updating with the same grid dimensions reuses both GPU buffers.
    pub fn update(
        &mut self,
        ctx: &RenderCtx<'_>,
        grid: &Grid<CubeSample>,
        extent: GridExtent,
    ) -> Result<(), VizError> {
        let mesh = tessellate_cubes(grid, extent)?;
        let mut backend = ctx.buffers();
        self.mesh.update(&mut backend, bytemuck::cast_slice(&mesh.vertices), &mesh.indices);
        Ok(())
    }

    pub fn index_count(&self) -> u32 {
        self.mesh.index_count()
    }

    /// Draws the last uploaded mesh.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: &ViewProjection,
    ) {
        if self.mesh.index_count() == 0 {
            return;
        }

        self.ensure_pipeline(ctx);

        let Some(camera) = self.camera.as_ref() else { return };
        camera.write(ctx, view_proj);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some((vbo, ibo)) = self.mesh.buffers() else { return };

        let mut rpass = begin_scene_pass(target, "orbitviz cubemesh pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &camera.bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.mesh.index_count(), 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let camera = self
            .camera
            .get_or_insert_with(|| CameraBinding::new(ctx, "orbitviz cubemesh"));

        let shader = load_shader(
            ctx,
            "orbitviz cubemesh shader",
            include_str!("shaders/cubemesh.wgsl"),
        );
        let pipeline = create_scene_pipeline(
            ctx,
            ScenePipeline {
                label: "orbitviz cubemesh",
                shader: &shader,
                bind_group_layouts: &[&camera.layout],
                buffers: &[cube_vertex_layout()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: None,
                depth_test: true,
            },
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
    }
}

const CUBE_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3  // color
];

fn cube_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<CubeVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &CUBE_ATTRS,
    }
}
