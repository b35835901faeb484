//! WebGPU sprite pipeline
//!
//! Draw calls are collected as NDC vertices grouped into per-texture batches
//! and submitted in one render pass when the frame is presented.

use std::ops::Range;
use std::rc::Rc;

use glam::Vec2;
use wgpu::util::DeviceExt;

use super::shapes;
use super::vertex::Vertex;
use crate::platform::{Color, Rect, TextureSize};

/// Segments used for debug circles
const CIRCLE_SEGMENTS: u32 = 16;

/// A texture uploaded to the GPU, released on drop
pub struct GpuTexture {
    bind_group: Rc<wgpu::BindGroup>,
    width: u32,
    height: u32,
    _texture: wgpu::Texture,
}

impl TextureSize for GpuTexture {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// Consecutive vertices sharing one texture
struct Batch {
    bind_group: Rc<wgpu::BindGroup>,
    vertices: Range<u32>,
}

/// Map a pixel-space vertex (y down) onto normalized device coordinates
pub fn pixel_to_ndc(v: Vertex, logical_size: Vec2) -> Vertex {
    let x = v.position[0] / logical_size.x * 2.0 - 1.0;
    let y = 1.0 - v.position[1] / logical_size.y * 2.0;
    Vertex {
        position: [x, y],
        ..v
    }
}

/// Sprite render state
pub struct SpriteRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    /// 1x1 white texel for untextured shapes
    white: GpuTexture,
    vertices: Vec<Vertex>,
    batches: Vec<Batch>,
    clear: wgpu::Color,
    /// Viewport size in pixels
    pub size: (u32, u32),
    /// Game coordinate space mapped onto the viewport
    logical_size: Vec2,
}

impl SpriteRenderer {
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        logical_size: Vec2,
    ) -> Result<Self, wgpu::RequestDeviceError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("flappy-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sprite.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Pixel art: no smoothing
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let white = upload_texture(
            &device,
            &queue,
            &bind_group_layout,
            &sampler,
            "white_texel",
            1,
            1,
            &[255; 4],
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            bind_group_layout,
            sampler,
            white,
            vertices: Vec::new(),
            batches: Vec::new(),
            clear: wgpu::Color::BLACK,
            size: (width, height),
            logical_size,
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload decoded RGBA pixels
    pub fn create_texture(&self, label: &str, image: &image::RgbaImage) -> GpuTexture {
        upload_texture(
            &self.device,
            &self.queue,
            &self.bind_group_layout,
            &self.sampler,
            label,
            image.width(),
            image.height(),
            image.as_raw(),
        )
    }

    /// Start collecting a new frame
    pub fn begin(&mut self, clear: Color) {
        self.vertices.clear();
        self.batches.clear();
        let [r, g, b, a] = clear.to_array();
        self.clear = wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        };
    }

    pub fn draw_texture(
        &mut self,
        texture: &GpuTexture,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        let uv = shapes::source_uv(source, texture.width, texture.height);
        let quad = shapes::textured_quad(dest, origin, rotation, uv, tint.to_array());
        self.push(&texture.bind_group, &quad);
    }

    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let vertices = shapes::circle(center, radius, color.to_array(), CIRCLE_SEGMENTS);
        let white = Rc::clone(&self.white.bind_group);
        self.push(&white, &vertices);
    }

    pub fn draw_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        let quad = shapes::rect(pos, size, color.to_array());
        let white = Rc::clone(&self.white.bind_group);
        self.push(&white, &quad);
    }

    fn push(&mut self, bind_group: &Rc<wgpu::BindGroup>, vertices: &[Vertex]) {
        let logical = self.logical_size;
        let start = self.vertices.len() as u32;
        self.vertices
            .extend(vertices.iter().map(|v| pixel_to_ndc(*v, logical)));
        let end = self.vertices.len() as u32;

        match self.batches.last_mut() {
            Some(batch) if Rc::ptr_eq(&batch.bind_group, bind_group) => batch.vertices.end = end,
            _ => self.batches.push(Batch {
                bind_group: Rc::clone(bind_group),
                vertices: start..end,
            }),
        }
    }

    /// Submit the collected batches and present
    pub fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Recreated per frame
        let vertex_buffer = (!self.vertices.is_empty()).then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("sprite_vertex_buffer"),
                    contents: bytemuck::cast_slice(&self.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                })
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprite_encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let Some(buffer) = &vertex_buffer {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_vertex_buffer(0, buffer.slice(..));
                for batch in &self.batches {
                    render_pass.set_bind_group(0, batch.bind_group.as_ref(), &[]);
                    render_pass.draw(batch.vertices.clone(), 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    GpuTexture {
        bind_group: Rc::new(bind_group),
        width,
        height,
        _texture: texture,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_ndc_corners() {
        let logical = Vec2::new(1300.0, 768.0);
        let top_left = pixel_to_ndc(Vertex::new(0.0, 0.0, 0.0, 0.0, [1.0; 4]), logical);
        assert_eq!(top_left.position, [-1.0, 1.0]);

        let bottom_right = pixel_to_ndc(Vertex::new(1300.0, 768.0, 1.0, 1.0, [1.0; 4]), logical);
        assert_eq!(bottom_right.position, [1.0, -1.0]);
        assert_eq!(bottom_right.uv, [1.0, 1.0]);

        let center = pixel_to_ndc(Vertex::new(650.0, 384.0, 0.0, 0.0, [1.0; 4]), logical);
        assert_eq!(center.position, [0.0, 0.0]);
    }
}
