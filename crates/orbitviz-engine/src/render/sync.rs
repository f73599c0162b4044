//! GPU buffer reuse policy.
//!
//! Every primitive that owns vertex/index storage goes through
//! [`SyncedBuffer::update`]: the allocation is kept and overwritten in place
//! while the payload byte size is unchanged, and replaced only when it changes.
//! Drawing never uploads.

use std::ops::Range;

use wgpu::util::DeviceExt;

/// What a buffer is bound as.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferKind {
    Vertex,
    Index,
}

impl BufferKind {
    fn usage(self) -> wgpu::BufferUsages {
        match self {
            BufferKind::Vertex => wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            BufferKind::Index => wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        }
    }
}

/// Which path an update took.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SyncOutcome {
    /// A new allocation replaced the previous one.
    Reallocated,
    /// The existing allocation was overwritten from offset 0.
    Overwritten,
}

/// Allocate/overwrite primitives the policy is expressed against.
pub trait BufferBackend {
    type Buffer;

    /// Creates a buffer initialised with `contents`.
    fn allocate(&mut self, kind: BufferKind, label: &str, contents: &[u8]) -> Self::Buffer;

    /// Writes `contents` over `buffer` starting at offset 0.
    fn overwrite(&mut self, buffer: &Self::Buffer, contents: &[u8]);
}

/// wgpu implementation used by the renderers.
pub struct WgpuBackend<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
}

impl BufferBackend for WgpuBackend<'_> {
    type Buffer = wgpu::Buffer;

    fn allocate(&mut self, kind: BufferKind, label: &str, contents: &[u8]) -> wgpu::Buffer {
        log::trace!("allocating {label} ({} bytes)", contents.len());
        self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents,
            usage: kind.usage(),
        })
    }

    fn overwrite(&mut self, buffer: &wgpu::Buffer, contents: &[u8]) {
        if !contents.is_empty() {
            self.queue.write_buffer(buffer, 0, contents);
        }
    }
}

/// One GPU buffer plus the byte size of its last upload.
pub struct SyncedBuffer<T = wgpu::Buffer> {
    kind: BufferKind,
    label: &'static str,
    buffer: Option<T>,
    byte_size: u64,
}

impl<T> SyncedBuffer<T> {
    pub fn new(kind: BufferKind, label: &'static str) -> Self {
        Self { kind, label, buffer: None, byte_size: 0 }
    }

    /// Uploads `contents`, reusing the allocation when the size matches.
    pub fn update<B>(&mut self, backend: &mut B, contents: &[u8]) -> SyncOutcome
    where
        B: BufferBackend<Buffer = T>,
    {
        let new_size = contents.len() as u64;
        match &self.buffer {
            Some(buffer) if new_size == self.byte_size => {
                backend.overwrite(buffer, contents);
                SyncOutcome::Overwritten
            }
            _ => {
                self.buffer = Some(backend.allocate(self.kind, self.label, contents));
                self.byte_size = new_size;
                SyncOutcome::Reallocated
            }
        }
    }

    /// Byte size recorded by the most recent update.
    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn buffer(&self) -> Option<&T> {
        self.buffer.as_ref()
    }
}

/// Vertex + index pair for an indexed triangle mesh.
pub struct MeshBuffers<T = wgpu::Buffer> {
    vertices: SyncedBuffer<T>,
    indices: SyncedBuffer<T>,
    index_count: u32,
}

impl<T> MeshBuffers<T> {
    pub fn new(vertex_label: &'static str, index_label: &'static str) -> Self {
        Self {
            vertices: SyncedBuffer::new(BufferKind::Vertex, vertex_label),
            indices: SyncedBuffer::new(BufferKind::Index, index_label),
            index_count: 0,
        }
    }

    /// Uploads both arrays and records the index count for drawing.
    pub fn update<B>(&mut self, backend: &mut B, vertices: &[u8], indices: &[u32])
    where
        B: BufferBackend<Buffer = T>,
    {
        self.indices.update(backend, bytemuck::cast_slice(indices));
        self.vertices.update(backend, vertices);
        self.index_count = indices.len() as u32;
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn vertex_byte_size(&self) -> u64 {
        self.vertices.byte_size()
    }

    pub fn index_byte_size(&self) -> u64 {
        self.indices.byte_size()
    }

    /// Both buffers, once something has been uploaded.
    pub fn buffers(&self) -> Option<(&T, &T)> {
        Some((self.vertices.buffer()?, self.indices.buffer()?))
    }
}

/// Vertex buffer holding several line segments back to back.
///
/// Segment order is draw order; each segment is one draw call.
pub struct SegmentedVertices<T = wgpu::Buffer> {
    vertices: SyncedBuffer<T>,
    segment_sizes: Vec<u32>,
}

impl<T> SegmentedVertices<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            vertices: SyncedBuffer::new(BufferKind::Vertex, label),
            segment_sizes: Vec::new(),
        }
    }

    /// Flattens `segments` into one upload and records their sizes.
    pub fn update<B, V, S>(&mut self, backend: &mut B, segments: &[S]) -> SyncOutcome
    where
        B: BufferBackend<Buffer = T>,
        V: bytemuck::Pod,
        S: AsRef<[V]>,
    {
        self.segment_sizes.clear();
        let total = segments.iter().map(|s| s.as_ref().len()).sum();
        let mut flat: Vec<V> = Vec::with_capacity(total);
        for segment in segments {
            let segment = segment.as_ref();
            self.segment_sizes.push(segment.len() as u32);
            flat.extend_from_slice(segment);
        }
        self.vertices.update(backend, bytemuck::cast_slice(&flat))
    }

    pub fn segment_sizes(&self) -> &[u32] {
        &self.segment_sizes
    }

    /// Per-segment vertex ranges with a running offset.
    pub fn ranges(&self) -> Vec<Range<u32>> {
        segment_ranges(&self.segment_sizes)
    }

    pub fn vertex_count(&self) -> u32 {
        self.segment_sizes.iter().sum()
    }

    pub fn byte_size(&self) -> u64 {
        self.vertices.byte_size()
    }

    pub fn buffer(&self) -> Option<&T> {
        self.vertices.buffer()
    }
}

/// Vertex ranges of consecutive segments, in draw order.
pub fn segment_ranges(counts: &[u32]) -> Vec<Range<u32>> {
    let mut offset = 0u32;
    counts
        .iter()
        .map(|&n| {
            let range = offset..offset + n;
            offset += n;
            range
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::mesh::{tessellate_cubes, CubeSample, Grid, GridExtent};
    use glam::Vec3;

    /// Records every backend call; buffers are just ids.
    #[derive(Default)]
    pub(crate) struct RecordingBackend {
        pub allocations: usize,
        pub overwrites: usize,
        pub last_write: Vec<u8>,
    }

    impl BufferBackend for RecordingBackend {
        type Buffer = usize;

        fn allocate(&mut self, _kind: BufferKind, _label: &str, contents: &[u8]) -> usize {
            self.allocations += 1;
            self.last_write = contents.to_vec();
            self.allocations
        }

        fn overwrite(&mut self, _buffer: &usize, contents: &[u8]) {
            self.overwrites += 1;
            self.last_write = contents.to_vec();
        }
    }

    #[test]
    fn equal_sizes_overwrite_in_place() {
        let mut backend = RecordingBackend::default();
        let mut buf = SyncedBuffer::<usize>::new(BufferKind::Vertex, "test vbo");

        assert_eq!(buf.update(&mut backend, &[1, 2, 3, 4]), SyncOutcome::Reallocated);
        assert_eq!(buf.update(&mut backend, &[5, 6, 7, 8]), SyncOutcome::Overwritten);

        assert_eq!(backend.allocations, 1);
        assert_eq!(backend.overwrites, 1);
        assert_eq!(backend.last_write, vec![5, 6, 7, 8]);
        assert_eq!(buf.buffer(), Some(&1));
    }

    #[test]
    fn size_change_reallocates_exactly_once() {
        let mut backend = RecordingBackend::default();
        let mut buf = SyncedBuffer::<usize>::new(BufferKind::Index, "test ibo");

        buf.update(&mut backend, &[0; 8]);
        buf.update(&mut backend, &[0; 8]);
        assert_eq!(buf.update(&mut backend, &[0; 12]), SyncOutcome::Reallocated);

        assert_eq!(backend.allocations, 2);
        assert_eq!(backend.overwrites, 1);
        assert_eq!(buf.byte_size(), 12);
        assert_eq!(buf.buffer(), Some(&2));
    }

    #[test]
    fn first_empty_update_still_allocates() {
        let mut backend = RecordingBackend::default();
        let mut buf = SyncedBuffer::<usize>::new(BufferKind::Vertex, "empty");
        assert_eq!(buf.update(&mut backend, &[]), SyncOutcome::Reallocated);
        assert_eq!(buf.update(&mut backend, &[]), SyncOutcome::Overwritten);
        assert_eq!(backend.allocations, 1);
    }

    #[test]
    fn cube_mesh_reupload_keeps_byte_sizes() {
        let mut backend = RecordingBackend::default();
        let mut mesh = MeshBuffers::<usize>::new("cube vbo", "cube ibo");
        let extent = GridExtent::new(-1.0, 1.0, -1.0, 1.0);

        let a = Grid::from_fn(5, 4, |x, y| CubeSample::new(x as f32, Vec3::splat(y as f32)));
        let m = tessellate_cubes(&a, extent).unwrap();
        mesh.update(&mut backend, bytemuck::cast_slice(&m.vertices), &m.indices);
        let sizes = (mesh.vertex_byte_size(), mesh.index_byte_size());

        let b = Grid::from_fn(5, 4, |x, y| CubeSample::new(-(y as f32), Vec3::splat(x as f32)));
        let m = tessellate_cubes(&b, extent).unwrap();
        mesh.update(&mut backend, bytemuck::cast_slice(&m.vertices), &m.indices);

        assert_eq!((mesh.vertex_byte_size(), mesh.index_byte_size()), sizes);
        assert_eq!(backend.allocations, 2);
        assert_eq!(backend.overwrites, 2);
        assert_eq!(mesh.index_count(), m.indices.len() as u32);
    }

    #[test]
    fn mesh_buffers_unavailable_before_update() {
        let mesh = MeshBuffers::<usize>::new("v", "i");
        assert!(mesh.buffers().is_none());
        assert_eq!(mesh.index_count(), 0);
    }

    #[test]
    fn segmented_update_records_sizes_in_order() {
        let mut backend = RecordingBackend::default();
        let mut lines = SegmentedVertices::<usize>::new("lines vbo");

        let segments: Vec<Vec<[f32; 3]>> = vec![
            vec![[0.0; 3], [1.0; 3]],
            vec![[2.0; 3], [3.0; 3], [4.0; 3]],
        ];
        assert_eq!(lines.update::<_, [f32; 3], _>(&mut backend, &segments[..]), SyncOutcome::Reallocated);
        assert_eq!(lines.segment_sizes(), &[2, 3]);
        assert_eq!(lines.ranges(), vec![0..2, 2..5]);
        assert_eq!(lines.vertex_count(), 5);
        assert_eq!(lines.byte_size(), 5 * 12);

        // Same total size, different split: still an in-place overwrite.
        let resplit: Vec<Vec<[f32; 3]>> = vec![vec![[9.0; 3]; 4], vec![[8.0; 3]]];
        assert_eq!(lines.update::<_, [f32; 3], _>(&mut backend, &resplit[..]), SyncOutcome::Overwritten);
        assert_eq!(lines.ranges(), vec![0..4, 4..5]);
        assert_eq!(backend.allocations, 1);
    }

    #[test]
    fn segments_run_back_to_back() {
        assert_eq!(segment_ranges(&[3, 0, 2, 5]), vec![0..3, 3..3, 3..5, 5..10]);
        assert!(segment_ranges(&[]).is_empty());
    }
}
