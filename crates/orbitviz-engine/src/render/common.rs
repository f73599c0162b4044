//! Shared GPU types and utilities used by all primitive renderers.

use bytemuck::{Pod, Zeroable};

use crate::camera::{CameraUniform, ViewProjection};

use super::{RenderCtx, RenderTarget};

// ── blend ─────────────────────────────────────────────────────────────────

/// Straight-alpha blending (`src * a + dst * (1 - a)`).
pub(super) fn alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── bind group layout entries ─────────────────────────────────────────────

/// Uniform buffer binding sized for `T`.
pub(super) fn uniform_entry<T: Pod>(
    binding: u32,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
        },
        count: None,
    }
}

/// Filterable 2D float texture, fragment stage.
pub(super) fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub(super) fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Linear filtering, clamped at the edges, single mip level.
pub(super) fn clamp_linear_sampler(ctx: &RenderCtx<'_>, label: &str) -> wgpu::Sampler {
    ctx.device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}

/// Allocates a zeroed uniform buffer for `T`.
pub(super) fn create_uniform_buffer<T: Pod>(ctx: &RenderCtx<'_>, label: &str) -> wgpu::Buffer {
    ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<T>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

// ── camera uniform ────────────────────────────────────────────────────────

/// Uniform buffer + bind group holding the view/projection pair at group 0.
pub(super) struct CameraBinding {
    pub layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    ubo: wgpu::Buffer,
}

impl CameraBinding {
    pub(super) fn new(ctx: &RenderCtx<'_>, label: &str) -> Self {
        let layout = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{label} camera bgl")),
            entries: &[uniform_entry::<CameraUniform>(0, wgpu::ShaderStages::VERTEX)],
        });

        let ubo = create_uniform_buffer::<CameraUniform>(ctx, &format!("{label} camera ubo"));

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} camera bind group")),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        Self { layout, bind_group, ubo }
    }

    pub(super) fn write(&self, ctx: &RenderCtx<'_>, view_proj: &ViewProjection) {
        ctx.queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&view_proj.uniform()));
    }
}

// ── color uniform ─────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct ColorUniform {
    pub color: [f32; 4],
}

// ── pipelines ─────────────────────────────────────────────────────────────

/// Everything that varies between the primitive pipelines.
pub(super) struct ScenePipeline<'a> {
    pub label: &'a str,
    pub shader: &'a wgpu::ShaderModule,
    pub bind_group_layouts: &'a [&'a wgpu::BindGroupLayout],
    pub buffers: &'a [wgpu::VertexBufferLayout<'a>],
    pub topology: wgpu::PrimitiveTopology,
    pub blend: Option<wgpu::BlendState>,
    /// Scene primitives test and write depth; screen overlays do neither and
    /// must be drawn in a pass without a depth attachment.
    pub depth_test: bool,
}

/// Builds a pipeline drawing into the surface format.
///
/// Faces are not culled: the orbit camera looks at surfaces from both sides.
pub(super) fn create_scene_pipeline(
    ctx: &RenderCtx<'_>,
    desc: ScenePipeline<'_>,
) -> wgpu::RenderPipeline {
    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} pipeline layout", desc.label)),
        bind_group_layouts: desc.bind_group_layouts,
        immediate_size: 0,
    });

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} pipeline", desc.label)),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: desc.buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: desc.depth_test.then(|| wgpu::DepthStencilState {
            format: ctx.depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),

        multiview_mask: None,
        cache: None,
    })
}

pub(super) fn load_shader(ctx: &RenderCtx<'_>, label: &str, src: &str) -> wgpu::ShaderModule {
    ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(src.into()),
    })
}

// ── passes ────────────────────────────────────────────────────────────────

/// Opens a pass that keeps the current color and depth contents.
pub(super) fn begin_scene_pass<'t>(
    target: &'t mut RenderTarget<'_>,
    label: &str,
) -> wgpu::RenderPass<'t> {
    target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: target.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

/// Opens a color-only pass for screen-space overlays.
pub(super) fn begin_overlay_pass<'t>(
    target: &'t mut RenderTarget<'_>,
    label: &str,
) -> wgpu::RenderPass<'t> {
    target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load,
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    })
}

// ── line topology ─────────────────────────────────────────────────────────

/// How the vertices of each line segment are connected.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum LineMode {
    /// Consecutive pairs form independent lines.
    Lines,
    /// Each segment is one connected polyline.
    #[default]
    LineStrip,
    /// Every vertex is a single pixel-sized point.
    Points,
}

impl LineMode {
    pub const ALL: [LineMode; 3] = [LineMode::Lines, LineMode::LineStrip, LineMode::Points];

    pub(super) fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            LineMode::Lines => wgpu::PrimitiveTopology::LineList,
            LineMode::LineStrip => wgpu::PrimitiveTopology::LineStrip,
            LineMode::Points => wgpu::PrimitiveTopology::PointList,
        }
    }

    pub(super) fn index(self) -> usize {
        match self {
            LineMode::Lines => 0,
            LineMode::LineStrip => 1,
            LineMode::Points => 2,
        }
    }

    /// Next mode in `ALL`, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_modes_cycle() {
        assert_eq!(LineMode::Lines.next(), LineMode::LineStrip);
        assert_eq!(LineMode::LineStrip.next(), LineMode::Points);
        assert_eq!(LineMode::Points.next(), LineMode::Lines);
    }

    #[test]
    fn mode_indices_match_all() {
        for (i, mode) in LineMode::ALL.into_iter().enumerate() {
            assert_eq!(mode.index(), i);
        }
    }
}
