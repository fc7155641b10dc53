//! wgpu renderer for the native host.
//!
//! [`SphereRenderer`] implements [`Renderer`] by keeping one
//! [`SphereInstance`] per live handle and drawing them all as instanced
//! impostor quads. Handles are slot indices; removed slots are reused.

mod shader;

use std::sync::Arc;

use glam::{Quat, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

pub use shader::{SceneUniforms, SphereInstance, SPHERE_SHADER};

use crate::camera::Camera;
use crate::error::GpuError;
use crate::renderer::{Appearance, Renderer};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_CAPACITY: usize = 64;
const LIGHT_DIR: Vec3 = Vec3::new(0.4, 0.8, 0.6);
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

/// Handle to one sphere in a [`SphereRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SphereHandle(u32);

/// Handle slots with a free list.
#[derive(Debug, Default)]
struct Slots {
    slots: Vec<Option<SphereInstance>>,
    free: Vec<u32>,
}

impl Slots {
    fn insert(&mut self, instance: SphereInstance) -> SphereHandle {
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(instance);
                SphereHandle(index)
            }
            None => {
                self.slots.push(Some(instance));
                SphereHandle((self.slots.len() - 1) as u32)
            }
        }
    }

    fn get_mut(&mut self, handle: SphereHandle) -> Option<&mut SphereInstance> {
        self.slots.get_mut(handle.0 as usize).and_then(Option::as_mut)
    }

    fn remove(&mut self, handle: SphereHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.0 as usize) else {
            return false;
        };
        if slot.take().is_none() {
            return false;
        }
        self.free.push(handle.0);
        true
    }

    fn live(&self) -> impl Iterator<Item = &SphereInstance> {
        self.slots.iter().flatten()
    }

    fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

/// Draws spheres into a window surface.
pub struct SphereRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    render_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    depth_texture: wgpu::TextureView,
    camera: Camera,
    slots: Slots,
    staging: Vec<SphereInstance>,
}

impl SphereRenderer {
    pub async fn new(window: Arc<Window>, camera: Camera) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let uniforms = scene_uniforms(&camera, &config);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sphere Shader"),
            source: wgpu::ShaderSource::Wgsl(SPHERE_SHADER.into()),
        });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Sphere Pipeline Layout"),
                bind_group_layouts: &[&uniform_bind_group_layout],
                push_constant_ranges: &[],
            });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sphere Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[SphereInstance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let instance_buffer = create_instance_buffer(&device, INITIAL_CAPACITY);

        log::info!(
            "sphere renderer ready: {} ({:?}), surface {}x{} {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.width,
            config.height,
            config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            render_pipeline,
            uniform_buffer,
            uniform_bind_group,
            instance_buffer,
            instance_capacity: INITIAL_CAPACITY,
            depth_texture,
            camera,
            slots: Slots::default(),
            staging: Vec::new(),
        })
    }

    /// Number of live spheres.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        self.depth_texture = create_depth_texture(&self.device, &self.config);
    }

    fn upload(&mut self) {
        self.staging.clear();
        self.staging.extend(self.slots.live().copied());

        if self.staging.len() > self.instance_capacity {
            self.instance_capacity = self.staging.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
            log::debug!("instance buffer grown to {} spheres", self.instance_capacity);
        }
        if !self.staging.is_empty() {
            self.queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&self.staging),
            );
        }

        let uniforms = scene_uniforms(&self.camera, &self.config);
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.upload();

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Sphere Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sphere Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if !self.staging.is_empty() {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
                render_pass.draw(0..6, 0..self.staging.len() as u32);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl Renderer for SphereRenderer {
    type Handle = SphereHandle;

    fn create_body(&mut self, radius: f32, appearance: &Appearance) -> SphereHandle {
        self.slots
            .insert(SphereInstance::new(radius, appearance.color, appearance.emissive))
    }

    fn set_transform(&mut self, handle: SphereHandle, position: Vec3, orientation: Quat) {
        if let Some(instance) = self.slots.get_mut(handle) {
            instance.position = position.to_array();
            instance.rotation = orientation.to_array();
        }
    }

    fn set_appearance(&mut self, handle: SphereHandle, appearance: &Appearance) {
        if let Some(instance) = self.slots.get_mut(handle) {
            instance.color = appearance.color.to_array();
            instance.emissive = appearance.emissive;
        }
    }

    fn remove_body(&mut self, handle: SphereHandle) {
        if !self.slots.remove(handle) {
            log::warn!("remove of unknown sphere handle {:?}", handle);
        }
    }

    fn set_camera(&mut self, camera: &Camera) {
        self.camera = camera.clone();
    }

    fn draw(&mut self) {
        match self.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory while presenting");
            }
            Err(e) => log::warn!("frame skipped: {}", e),
        }
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.reconfigure();
        }
    }
}

fn scene_uniforms(camera: &Camera, config: &wgpu::SurfaceConfiguration) -> SceneUniforms {
    let aspect = config.width as f32 / config.height.max(1) as f32;
    let (right, up) = camera.basis();
    SceneUniforms::new(camera.view_proj(aspect), right, up, LIGHT_DIR)
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sphere Instance Buffer"),
        size: (capacity * std::mem::size_of::<SphereInstance>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_reuse_freed_handles() {
        let mut slots = Slots::default();
        let a = slots.insert(SphereInstance::default());
        let b = slots.insert(SphereInstance::default());
        assert_ne!(a, b);
        assert_eq!(slots.len(), 2);

        assert!(slots.remove(a));
        assert!(!slots.remove(a));
        assert_eq!(slots.len(), 1);

        let c = slots.insert(SphereInstance::default());
        assert_eq!(c, a);
        assert_eq!(slots.live().count(), 2);
    }

    #[test]
    fn test_slots_ignore_unknown_handle() {
        let mut slots = Slots::default();
        assert!(slots.get_mut(SphereHandle(7)).is_none());
        assert!(!slots.remove(SphereHandle(7)));
    }
}
