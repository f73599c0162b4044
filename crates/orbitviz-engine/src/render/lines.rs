use glam::{Vec3, Vec4};

use crate::camera::ViewProjection;
use crate::render::sync::{SegmentedVertices, SyncOutcome};
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    alpha_blend, begin_scene_pass, create_scene_pipeline, create_uniform_buffer, load_shader,
    uniform_entry, CameraBinding, ColorUniform, LineMode, ScenePipeline,
};

/// Position-only line segments drawn in one uniform color.
///
/// `update` uploads the segments through the buffer sync policy; `draw`
/// binds whatever the last update left and issues one draw call per segment.
#[derive(Default)]
pub struct Lines {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipelines: [Option<wgpu::RenderPipeline>; 3],

    camera: Option<CameraBinding>,
    style_bgl: Option<wgpu::BindGroupLayout>,
    style_bind_group: Option<wgpu::BindGroup>,
    style_ubo: Option<wgpu::Buffer>,

    vertices: Option<SegmentedVertices>,
}

impl Lines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the segment set. Each inner slice is drawn as its own segment.
    pub fn update<S: AsRef<[Vec3]>>(&mut self, ctx: &RenderCtx<'_>, segments: &[S]) -> SyncOutcome {
        let mut backend = ctx.buffers();
        self.vertices
            .get_or_insert_with(|| SegmentedVertices::new("orbitviz lines vbo"))
            .update::<_, Vec3, S>(&mut backend, segments)
    }

    /// Draws the last uploaded segments.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: &ViewProjection,
        color: Vec4,
        mode: LineMode,
    ) {
        let Some(vertices) = self.vertices.as_ref() else { return };
        if vertices.vertex_count() == 0 {
            return;
        }

        self.ensure_pipeline(ctx, mode);
        self.ensure_bindings(ctx);

        let Some(camera) = self.camera.as_ref() else { return };
        camera.write(ctx, view_proj);
        if let Some(ubo) = self.style_ubo.as_ref() {
            let u = ColorUniform { color: color.to_array() };
            ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
        }

        let Some(pipeline) = self.pipelines[mode.index()].as_ref() else { return };
        let Some(style) = self.style_bind_group.as_ref() else { return };
        let Some(vertices) = self.vertices.as_ref() else { return };
        let Some(vbo) = vertices.buffer() else { return };

        let mut rpass = begin_scene_pass(target, "orbitviz lines pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &camera.bind_group, &[]);
        rpass.set_bind_group(1, style, &[]);
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

        if self.camera.is_none() {
            self.camera = Some(CameraBinding::new(ctx, "orbitviz lines"));
        }
        if self.style_bgl.is_none() {
            self.style_bgl =
                Some(ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("orbitviz lines style bgl"),
                    entries: &[uniform_entry::<ColorUniform>(0, wgpu::ShaderStages::FRAGMENT)],
                }));
        }
        let Some(camera) = self.camera.as_ref() else { return };
        let Some(style_bgl) = self.style_bgl.as_ref() else { return };

        let shader = load_shader(ctx, "orbitviz lines shader", include_str!("shaders/lines.wgsl"));
        let pipeline = create_scene_pipeline(
            ctx,
            ScenePipeline {
                label: "orbitviz lines",
                shader: &shader,
                bind_group_layouts: &[&camera.layout, style_bgl],
                buffers: &[position_layout()],
                topology: mode.topology(),
                blend: Some(alpha_blend()),
                depth_test: true,
            },
        );

        self.pipelines[mode.index()] = Some(pipeline);
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.style_bind_group.is_some() && self.style_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.style_bgl.as_ref() else { return };

        let style_ubo = create_uniform_buffer::<ColorUniform>(ctx, "orbitviz lines style ubo");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orbitviz lines style bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: style_ubo.as_entire_binding(),
            }],
        });

        self.style_ubo = Some(style_ubo);
        self.style_bind_group = Some(bind_group);
    }
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vec3>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRS,
    }
}
