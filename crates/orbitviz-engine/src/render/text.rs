use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle};
use glam::{Vec2, Vec4};

use crate::render::sync::{BufferKind, SyncedBuffer};
use crate::render::{RenderCtx, RenderTarget};
use crate::text::atlas::ShelfPacker;
use crate::text::{FontId, FontSystem};

use super::common::{
    alpha_blend, begin_overlay_pass, clamp_linear_sampler, create_scene_pipeline,
    create_uniform_buffer, load_shader, sampler_entry, texture_entry, uniform_entry,
    ScenePipeline,
};

const ATLAS_SIZE: u32 = 1024;
const GLYPH_PADDING: u32 = 1;

/// Two triangles per glyph, corners generated in the vertex shader.
const VERTICES_PER_GLYPH: u32 = 6;

#[derive(Debug, Clone)]
struct QueuedText {
    text: String,
    origin: Vec2,
    color: [f32; 4],
}

/// Screen-space text in one font and size.
///
/// Strings are queued with [`Text::queue`] and drawn together by
/// [`Text::flush`], once per frame. Positions are logical pixels from the
/// top-left corner of the window. Glyphs are rasterized on first use with
/// fontdue into a shelf-packed R8 atlas; glyph instances go through the buffer
/// sync policy, so a steady overlay (an fps counter, say) overwrites the same
/// allocation every frame.
pub struct Text {
    font: FontId,
    size: f32,
    queued: Vec<QueuedText>,
    layout: Layout<()>,

    gpu: Option<TextGpu>,
    instances: SyncedBuffer,
}

impl Text {
    pub fn new(font: FontId, size: f32) -> Self {
        Self {
            font,
            size,
            queued: Vec::new(),
            layout: Layout::new(CoordinateSystem::PositiveYDown),
            gpu: None,
            instances: SyncedBuffer::new(BufferKind::Vertex, "orbitviz text instance vbo"),
        }
    }

    pub fn font_size(&self) -> f32 {
        self.size
    }

    /// Queues `text` with its top-left corner at `origin` (logical px).
    pub fn queue(&mut self, text: impl Into<String>, origin: Vec2, color: Vec4) {
        self.queued.push(QueuedText {
            text: text.into(),
            origin,
            color: color.to_array(),
        });
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }

    /// Uploads and draws everything queued since the last flush.
    pub fn flush(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, fonts: &FontSystem) {
        let queued = std::mem::take(&mut self.queued);
        if queued.is_empty() {
            return;
        }
        let Some(font) = fonts.get(self.font) else {
            log::warn!("unknown font {:?}, dropping {} text items", self.font, queued.len());
            return;
        };

        if self.gpu.as_ref().is_none_or(|g| g.format != ctx.surface_format) {
            self.gpu = Some(TextGpu::new(ctx));
        }
        let Some(gpu) = self.gpu.as_mut() else { return };

        let mut instances = Vec::new();
        for item in &queued {
            self.layout.reset(&LayoutSettings {
                x: item.origin.x,
                y: item.origin.y,
                ..LayoutSettings::default()
            });
            self.layout.append(&[font], &TextStyle::new(&item.text, self.size, 0));

            for g in self.layout.glyphs() {
                if !g.char_data.rasterize() || g.width == 0 || g.height == 0 {
                    continue;
                }
                let Some(rect) = gpu.atlas.lookup(ctx, font, g.key) else { continue };

                let min = [g.x, g.y];
                let max = [g.x + g.width as f32, g.y + g.height as f32];
                let (uv_min, uv_max) = rect.uv(ATLAS_SIZE);
                instances.push(GlyphInstance { min, max, uv_min, uv_max, color: item.color });
            }
        }

        if instances.is_empty() {
            return;
        }

        gpu.write_screen(ctx);
        let mut backend = ctx.buffers();
        self.instances.update(&mut backend, bytemuck::cast_slice(&instances));
        let Some(instance_vbo) = self.instances.buffer() else { return };

        let mut rpass = begin_overlay_pass(target, "orbitviz text pass");
        rpass.set_pipeline(&gpu.pipeline);
        rpass.set_bind_group(0, &gpu.bind_group, &[]);
        rpass.set_vertex_buffer(0, instance_vbo.slice(..));
        rpass.draw(0..VERTICES_PER_GLYPH, 0..instances.len() as u32);
    }
}

// ── GPU state ─────────────────────────────────────────────────────────────

/// Pipeline, bindings and atlas, all built together for one surface format.
struct TextGpu {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    screen_ubo: wgpu::Buffer,
    atlas: GlyphAtlas,
}

impl TextGpu {
    fn new(ctx: &RenderCtx<'_>) -> Self {
        let bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orbitviz text bgl"),
            entries: &[
                uniform_entry::<ScreenUniform>(0, wgpu::ShaderStages::VERTEX),
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let shader = load_shader(ctx, "orbitviz text shader", include_str!("shaders/text.wgsl"));
        let pipeline = create_scene_pipeline(
            ctx,
            ScenePipeline {
                label: "orbitviz text",
                shader: &shader,
                bind_group_layouts: &[&bgl],
                buffers: &[GlyphInstance::layout()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: Some(alpha_blend()),
                depth_test: false,
            },
        );

        let atlas = GlyphAtlas::new(ctx);
        let view = atlas.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = clamp_linear_sampler(ctx, "orbitviz text sampler");
        let screen_ubo = create_uniform_buffer::<ScreenUniform>(ctx, "orbitviz text screen ubo");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orbitviz text bind group"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: screen_ubo.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            format: ctx.surface_format,
            pipeline,
            bind_group,
            screen_ubo,
            atlas,
        }
    }

    fn write_screen(&self, ctx: &RenderCtx<'_>) {
        let u = ScreenUniform {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            _pad: [0.0; 2],
        };
        ctx.queue.write_buffer(&self.screen_ubo, 0, bytemuck::bytes_of(&u));
    }
}

// ── glyph atlas ───────────────────────────────────────────────────────────

/// Texel rectangle of one rasterized glyph.
#[derive(Debug, Copy, Clone, PartialEq)]
struct AtlasRect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl AtlasRect {
    fn uv(self, atlas_size: u32) -> ([f32; 2], [f32; 2]) {
        let s = atlas_size as f32;
        (
            [self.x as f32 / s, self.y as f32 / s],
            [(self.x + self.w) as f32 / s, (self.y + self.h) as f32 / s],
        )
    }
}

struct GlyphAtlas {
    texture: wgpu::Texture,
    packer: ShelfPacker,
    rects: HashMap<GlyphRasterConfig, AtlasRect>,
}

impl GlyphAtlas {
    fn new(ctx: &RenderCtx<'_>) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("orbitviz text atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        Self {
            texture,
            packer: ShelfPacker::new(ATLAS_SIZE, GLYPH_PADDING),
            rects: HashMap::new(),
        }
    }

    /// Returns where `key` lives in the atlas, rasterizing it on first use.
    /// `None` once the atlas has no room left.
    fn lookup(
        &mut self,
        ctx: &RenderCtx<'_>,
        font: &fontdue::Font,
        key: GlyphRasterConfig,
    ) -> Option<AtlasRect> {
        if let Some(rect) = self.rects.get(&key) {
            return Some(*rect);
        }
        if self.packer.is_full() {
            return None;
        }

        let (metrics, bitmap) = font.rasterize_config(key);
        let (w, h) = (metrics.width as u32, metrics.height as u32);
        if w == 0 || h == 0 {
            return None;
        }
        let (x, y) = self.packer.place(w, h)?;

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            &bitmap,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(w),
                rows_per_image: Some(h),
            },
            wgpu::Extent3d { width: w, height: h, depth_or_array_layers: 1 },
        );

        let rect = AtlasRect { x, y, w, h };
        self.rects.insert(key, rect);
        Some(rect)
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ScreenUniform {
    viewport: [f32; 2],
    _pad: [f32; 2],
}

/// One glyph quad (48 bytes): destination rect in logical px, atlas uv rect,
/// straight-alpha color.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphInstance {
    min: [f32; 2],
    max: [f32; 2],
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    color: [f32; 4],
}

impl GlyphInstance {
    const ATTRS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x2,
        1 => Float32x2,
        2 => Float32x2,
        3 => Float32x2,
        4 => Float32x4
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GlyphInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_accumulates_until_flush() {
        let mut text = Text::new(FontId(0), 18.0);
        text.queue("12.0 fps", Vec2::new(25.0, 25.0), Vec4::ONE);
        text.queue(String::from("hello"), Vec2::ZERO, Vec4::ONE);
        assert_eq!(text.queued_len(), 2);
        assert_eq!(text.font_size(), 18.0);
    }

    #[test]
    fn glyph_instance_layout_is_48_bytes() {
        assert_eq!(std::mem::size_of::<GlyphInstance>(), 48);
        assert_eq!(GlyphInstance::layout().step_mode, wgpu::VertexStepMode::Instance);
    }

    #[test]
    fn atlas_rect_maps_to_normalized_uv() {
        let rect = AtlasRect { x: 256, y: 512, w: 128, h: 64 };
        let (min, max) = rect.uv(1024);
        assert_eq!(min, [0.25, 0.5]);
        assert_eq!(max, [0.375, 0.5625]);
    }
}
