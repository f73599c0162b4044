use std::path::Path;

use glam::Vec3;

use crate::camera::ViewProjection;
use crate::error::VizError;
use crate::mesh::{tessellate_grid, Grid, GridVertex};
use crate::render::sync::MeshBuffers;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{
    begin_scene_pass, clamp_linear_sampler, create_scene_pipeline, load_shader, sampler_entry,
    texture_entry, CameraBinding, ScenePipeline,
};

// ── texture image ─────────────────────────────────────────────────────────

/// Decoded RGBA8 pixels waiting to be uploaded as the surface texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureImage {
    /// Reads and decodes an image file (PNG, JPEG or BMP).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, VizError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| VizError::ImageLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("loaded texture {} ({width}x{height})", path.display());
        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Wraps raw row-major RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, VizError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(VizError::TextureSize { width, height, len: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

// ── renderer ──────────────────────────────────────────────────────────────

/// Textured smooth surface built from a grid of positions.
///
/// The texture is uploaded on first draw and never changes. Geometry is
/// re-tessellated on every `update` and uploaded through the buffer sync
/// policy.
pub struct Gridmesh {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    camera: Option<CameraBinding>,
    texture_bgl: Option<wgpu::BindGroupLayout>,
    texture_bind_group: Option<wgpu::BindGroup>,

    image: TextureImage,
    texture: Option<wgpu::Texture>,

    mesh: MeshBuffers,
}

impl Gridmesh {
    pub fn new(image: TextureImage) -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            camera: None,
            texture_bgl: None,
            texture_bind_group: None,
            image,
            texture: None,
            mesh: MeshBuffers::new("orbitviz gridmesh vbo", "orbitviz gridmesh ibo"),
        }
    }

    /// Convenience for `Gridmesh::new(TextureImage::from_path(path)?)`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, VizError> {
        Ok(Self::new(TextureImage::from_path(path)?))
    }

    /// Re-tessellates `grid` and uploads it.
    pub fn update(&mut self, ctx: &RenderCtx<'_>, grid: &Grid<Vec3>) -> Result<(), VizError> {
        let mesh = tessellate_grid(grid)?;
        let mut backend = ctx.buffers();
        self.mesh.update(&mut backend, bytemuck::cast_slice(&mesh.vertices), &mesh.indices);
        Ok(())
    }

    pub fn index_count(&self) -> u32 {
        self.mesh.index_count()
    }

    /// Draws the last uploaded surface.
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
        self.ensure_texture(ctx);

        let Some(camera) = self.camera.as_ref() else { return };
        camera.write(ctx, view_proj);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(texture_bg) = self.texture_bind_group.as_ref() else { return };
        let Some((vbo, ibo)) = self.mesh.buffers() else { return };

        let mut rpass = begin_scene_pass(target, "orbitviz gridmesh pass");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &camera.bind_group, &[]);
        rpass.set_bind_group(1, texture_bg, &[]);
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
            .get_or_insert_with(|| CameraBinding::new(ctx, "orbitviz gridmesh"));

        let texture_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("orbitviz gridmesh texture bgl"),
            entries: &[texture_entry(0), sampler_entry(1)],
        });

        let shader = load_shader(
            ctx,
            "orbitviz gridmesh shader",
            include_str!("shaders/gridmesh.wgsl"),
        );
        let pipeline = create_scene_pipeline(
            ctx,
            ScenePipeline {
                label: "orbitviz gridmesh",
                shader: &shader,
                bind_group_layouts: &[&camera.layout, &texture_bgl],
                buffers: &[grid_vertex_layout()],
                topology: wgpu::PrimitiveTopology::TriangleList,
                blend: None,
                depth_test: true,
            },
        );

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.texture_bgl = Some(texture_bgl);
        self.texture_bind_group = None;
    }

    fn ensure_texture(&mut self, ctx: &RenderCtx<'_>) {
        if self.texture_bind_group.is_some() {
            return;
        }
        let Some(bgl) = self.texture_bgl.as_ref() else { return };

        let texture = match self.texture.take() {
            Some(texture) => texture,
            None => upload_texture(ctx, &self.image),
        };
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = clamp_linear_sampler(ctx, "orbitviz gridmesh sampler");

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("orbitviz gridmesh texture bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        self.texture = Some(texture);
        self.texture_bind_group = Some(bind_group);
    }
}

fn upload_texture(ctx: &RenderCtx<'_>, image: &TextureImage) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width: image.width,
        height: image.height,
        depth_or_array_layers: 1,
    };

    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("orbitviz gridmesh texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &image.pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width),
            rows_per_image: Some(image.height),
        },
        size,
    );

    texture
}

const GRID_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x2  // uv
];

fn grid_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GridVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &GRID_ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_length_must_match_dimensions() {
        assert!(TextureImage::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            TextureImage::from_rgba(2, 2, vec![0; 15]),
            Err(VizError::TextureSize { width: 2, height: 2, len: 15 })
        );
        assert!(TextureImage::from_rgba(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn missing_image_reports_path() {
        let err = TextureImage::from_path("/definitely/not/here.png").unwrap_err();
        match err {
            VizError::ImageLoad { path, .. } => {
                assert_eq!(path, Path::new("/definitely/not/here.png"))
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
