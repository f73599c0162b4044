use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

use crate::camera::ViewProjection;
use crate::render::sync::{SegmentedVertices, SyncOutcome};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    alpha_blend, begin_scene_pass, create_scene_pipeline, load_shader, CameraBinding, LineMode,
    ScenePipeline,
};

/// Line vertex with its own straight-alpha RGBA color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColoredVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl ColoredVertex {
    pub fn new(position: Vec3, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }

    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ColoredVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Line segments with per-vertex colors.
#[derive(Default)]
pub struct ColorLines {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: [Option<wgpu::RenderPipeline>; 3],
    camera: Option<CameraBinding>,

    vertices: Option<SegmentedVertices>,
}

impl ColorLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the segment set. Each inner slice is drawn as its own segment.
    pub fn update<S: AsRef<[ColoredVertex]>>(
        &mut self,
        ctx: &RenderCtx<'_>,
        segments: &[S],
    ) -> SyncOutcome {
        let mut backend = ctx.buffers();
        self.vertices
            .get_or_insert_with(|| SegmentedVertices::new("orbitviz color lines vbo"))
            .update::<_, ColoredVertex, S>(&mut backend, segments)
    }

    /// Draws the last uploaded segments.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: &ViewProjection,
        mode: LineMode,
    ) {
        let Some(vertices) = self.vertices.as_ref() else { return };
        if vertices.vertex_count() == 0 {
            return;
        }

        self.ensure_pipeline(ctx, mode);

        let Some(camera) = self.camera.as_ref() else { return };
        camera.write(ctx, view_proj);

        let Some(pipeline) = self.pipelines[mode.index()].as_ref() else { return };
        let Some(vertices) = self.vertices.as_ref() else { return };
        let Some(vbo) = vertices.buffer() else { return };

        let mut rpass = begin_scene_pass(target, "orbitviz color lines pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &camera.bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));

        for range in vertices.ranges() {
            if !range.is_empty() {
                rpass.draw(range, 0..1);
            }
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, mode: LineMode) {
        if self.pipeline_format != Some(ctx.surface_format) {
            self.pipelines = Default::default();
            self.pipeline_format = Some(ctx.surface_format);
        }
        if self.pipelines[mode.index()].is_some() {
            return;
        }

        let camera = self
            .camera
            .get_or_insert_with(|| CameraBinding::new(ctx, "orbitviz color lines"));

        let shader = load_shader(
            ctx,
            "orbitviz color lines shader",
            include_str!("shaders/color_lines.wgsl"),
        );
        let pipeline = create_scene_pipeline(
            ctx,
            ScenePipeline {
                label: "orbitviz color lines",
                shader: &shader,
                bind_group_layouts: &[&camera.layout],
                buffers: &[ColoredVertex::layout()],
                topology: mode.topology(),
                blend: Some(alpha_blend()),
                depth_test: true,
            },
        );

        self.pipelines[mode.index()] = Some(pipeline);
    }
}

/// Orientation axes at `origin`: red +X, green +Y, blue +Z, each `length` long.
pub fn axes_segments(origin: Vec3, length: f32) -> [[ColoredVertex; 2]; 3] {
    let axis = |dir: Vec3, color: Vec4| {
        [
            ColoredVertex::new(origin, color),
            ColoredVertex::new(origin + dir * length, color),
        ]
    };
    [
        axis(Vec3::X, Vec4::new(1.0, 0.0, 0.0, 1.0)),
        axis(Vec3::Y, Vec4::new(0.0, 1.0, 0.0, 1.0)),
        axis(Vec3::Z, Vec4::new(0.0, 0.0, 1.0, 1.0)),
    ]
}
