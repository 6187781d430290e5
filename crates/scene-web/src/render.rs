use fnv::FnvHashMap;
use scene_core::{EntityId, Geometry, Scene, TickDelta, BADGE_PULSE_AMPLITUDE};
use web_sys as web;
use wgpu::util::DeviceExt;

const UNIFORM_STRIDE: u64 = 256;
const MAX_SLOTS: u32 = 160;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct EntityUniforms {
    mvp: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SparkInstance {
    pos: [f32; 3],
    size: f32,
}

enum EntityGpu {
    Line {
        vb: wgpu::Buffer,
        vertex_count: u32,
        slot: u32,
    },
    Sparks {
        vb: wgpu::Buffer,
        count: u32,
        slot: u32,
    },
    Badge {
        vb: wgpu::Buffer,
        texture: wgpu::Texture,
        bind_group: wgpu::BindGroup,
        slot: u32,
    },
}

// ===================== WebGPU state =====================

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    line_pipeline: wgpu::RenderPipeline,
    spark_pipeline: wgpu::RenderPipeline,
    badge_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    badge_bgl: wgpu::BindGroupLayout,
    badge_sampler: wgpu::Sampler,
    quad_vb: wgpu::Buffer,
    entities: FnvHashMap<EntityId, EntityGpu>,
    free_slots: Vec<u32>,
    next_slot: u32,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    disposed: bool,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(scene_core::SCENE_WGSL.into()),
        });

        // One uniform buffer of per-entity slots, bound with dynamic offsets.
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("entity_uniforms"),
            size: UNIFORM_STRIDE * MAX_SLOTS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("entity_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<EntityUniforms>() as u64
                    ),
                },
                count: None,
            }],
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("entity_bg"),
            layout: &uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<EntityUniforms>() as u64),
                }),
            }],
        });

        let badge_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("badge_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
        let badge_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("badge_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Shared quad for sparks and badges (two triangles)
        let quad_vertices: [f32; 12] = [
            -0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, -0.5, 0.5, 0.5, -0.5, 0.5,
        ];
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&quad_vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let line_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line_pl"),
            bind_group_layouts: &[&uniform_bgl],
            push_constant_ranges: &[],
        });
        let badge_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("badge_pl"),
            bind_group_layouts: &[&uniform_bgl, &badge_bgl],
            push_constant_ranges: &[],
        });

        let line_buffers = [wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 3) as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            }],
        }];
        let quad_buffers = [
            // slot 0: quad corners
            wgpu::VertexBufferLayout {
                array_stride: (std::mem::size_of::<f32>() * 2) as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                }],
            },
            // slot 1: instance center + size
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<SparkInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 1,
                    },
                    wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32,
                        offset: 12,
                        shader_location: 2,
                    },
                ],
            },
        ];

        let target = [Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let make_pipeline = |label: &str,
                             layout: &wgpu::PipelineLayout,
                             vs: &str,
                             fs: &str,
                             buffers: &[wgpu::VertexBufferLayout],
                             topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(vs),
                    buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology,
                    ..wgpu::PrimitiveState::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fs),
                    targets: &target,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };

        let line_pipeline = make_pipeline(
            "line_pipeline",
            &line_pl,
            "vs_line",
            "fs_line",
            &line_buffers,
            wgpu::PrimitiveTopology::LineStrip,
        );
        let spark_pipeline = make_pipeline(
            "spark_pipeline",
            &line_pl,
            "vs_spark",
            "fs_spark",
            &quad_buffers,
            wgpu::PrimitiveTopology::TriangleList,
        );
        let badge_pipeline = make_pipeline(
            "badge_pipeline",
            &badge_pl,
            "vs_badge",
            "fs_badge",
            &quad_buffers,
            wgpu::PrimitiveTopology::TriangleList,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            line_pipeline,
            spark_pipeline,
            badge_pipeline,
            uniform_buffer,
            uniform_bind_group,
            badge_bgl,
            badge_sampler,
            quad_vb,
            entities: FnvHashMap::default(),
            free_slots: Vec::new(),
            next_slot: 0,
            width,
            height,
            clear_color: wgpu::Color {
                r: 0.03,
                g: 0.04,
                b: 0.08,
                a: 1.0,
            },
            disposed: false,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if self.disposed || width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload every current scene entity. Used once right after mount.
    pub fn sync_all(&mut self, scene: &Scene) {
        for id in &scene.order {
            if let Some(entity) = scene.entities.get(id) {
                self.create_entity(*id, &entity.geometry);
            }
        }
    }

    /// Apply one tick's entity churn: evicted buffers are destroyed in the
    /// same frame, never deferred.
    pub fn sync(&mut self, scene: &Scene, delta: &TickDelta) {
        if self.disposed {
            return;
        }
        for id in &delta.evicted {
            self.destroy_entity(*id);
        }
        for id in &delta.spawned {
            if let Some(entity) = scene.entities.get(id) {
                self.create_entity(*id, &entity.geometry);
            }
        }
    }

    fn alloc_slot(&mut self) -> Option<u32> {
        if let Some(slot) = self.free_slots.pop() {
            return Some(slot);
        }
        if self.next_slot < MAX_SLOTS {
            let slot = self.next_slot;
            self.next_slot += 1;
            return Some(slot);
        }
        log::warn!("entity uniform slots exhausted; skipping entity");
        None
    }

    fn create_entity(&mut self, id: EntityId, geometry: &Geometry) {
        if self.disposed || self.entities.contains_key(&id) {
            return;
        }
        let Some(slot) = self.alloc_slot() else {
            return;
        };
        let gpu = match geometry {
            Geometry::Polyline { points } => {
                let data: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();
                let vb = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("line_vb"),
                        contents: bytemuck::cast_slice(&data),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                EntityGpu::Line {
                    vb,
                    vertex_count: data.len() as u32,
                    slot,
                }
            }
            Geometry::Sparks { points, size } => {
                let data: Vec<SparkInstance> = points
                    .iter()
                    .map(|p| SparkInstance {
                        pos: p.to_array(),
                        size: *size,
                    })
                    .collect();
                let vb = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("spark_vb"),
                        contents: bytemuck::cast_slice(&data),
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    });
                EntityGpu::Sparks {
                    vb,
                    count: data.len() as u32,
                    slot,
                }
            }
            Geometry::Badge {
                center,
                diameter,
                bitmap,
            } => {
                let texture = self.device.create_texture(&wgpu::TextureDescriptor {
                    label: Some("badge_tex"),
                    size: wgpu::Extent3d {
                        width: bitmap.size,
                        height: bitmap.size,
                        depth_or_array_layers: 1,
                    },
                    mip_level_count: 1,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: wgpu::TextureFormat::Rgba8UnormSrgb,
                    usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                    view_formats: &[],
                });
                self.queue.write_texture(
                    wgpu::TexelCopyTextureInfo {
                        texture: &texture,
                        mip_level: 0,
                        origin: wgpu::Origin3d::ZERO,
                        aspect: wgpu::TextureAspect::All,
                    },
                    &bitmap.rgba,
                    wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(4 * bitmap.size),
                        rows_per_image: Some(bitmap.size),
                    },
                    wgpu::Extent3d {
                        width: bitmap.size,
                        height: bitmap.size,
                        depth_or_array_layers: 1,
                    },
                );
                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
                let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("badge_bg"),
                    layout: &self.badge_bgl,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(&view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&self.badge_sampler),
                        },
                    ],
                });
                let instance = SparkInstance {
                    pos: center.to_array(),
                    size: *diameter,
                };
                let vb = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("badge_vb"),
                        contents: bytemuck::bytes_of(&instance),
                        usage: wgpu::BufferUsages::VERTEX,
                    });
                EntityGpu::Badge {
                    vb,
                    texture,
                    bind_group,
                    slot,
                }
            }
        };
        self.entities.insert(id, gpu);
    }

    /// Destroy one entity's GPU resources. Unknown ids are a no-op so the
    /// call is safe to repeat.
    fn destroy_entity(&mut self, id: EntityId) {
        let Some(gpu) = self.entities.remove(&id) else {
            return;
        };
        match gpu {
            EntityGpu::Line { vb, slot, .. } | EntityGpu::Sparks { vb, slot, .. } => {
                vb.destroy();
                self.free_slots.push(slot);
            }
            EntityGpu::Badge {
                vb, texture, slot, ..
            } => {
                vb.destroy();
                texture.destroy();
                self.free_slots.push(slot);
            }
        }
    }

    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        if self.disposed {
            return Ok(());
        }
        let proj = scene.camera.projection_matrix();
        let view_proj = proj * scene.camera.view_matrix();
        let (p00, p11) = (proj.x_axis.x, proj.y_axis.y);
        let ambient = scene.lighting.ambient;

        // Per-entity uniforms and dynamic geometry are written before the
        // encoder is submitted, so every draw sees this tick's state.
        for id in &scene.order {
            let (Some(entity), Some(gpu)) = (scene.entities.get(id), self.entities.get(id)) else {
                continue;
            };
            let group = scene
                .groups
                .get(entity.group)
                .copied()
                .unwrap_or(scene_core::SpinGroup {
                    drift: glam::Vec2::ZERO,
                    pitch: 0.0,
                    yaw: 0.0,
                });
            let model = group.model(scene.user_yaw, scene.user_pitch);
            let pulse = entity
                .pulse_phase
                .map(|ph| 1.0 + BADGE_PULSE_AMPLITUDE * ph.sin())
                .unwrap_or(1.0);
            let uniforms = EntityUniforms {
                mvp: (view_proj * model).to_cols_array_2d(),
                color: entity.appearance.color,
                params: [p00, p11, pulse, ambient],
            };
            let slot = match gpu {
                EntityGpu::Line { slot, .. }
                | EntityGpu::Sparks { slot, .. }
                | EntityGpu::Badge { slot, .. } => *slot,
            };
            self.queue.write_buffer(
                &self.uniform_buffer,
                slot as u64 * UNIFORM_STRIDE,
                bytemuck::bytes_of(&uniforms),
            );
            if entity.dynamic {
                if let (EntityGpu::Sparks { vb, count, .. }, Geometry::Sparks { points, size }) =
                    (gpu, &entity.geometry)
                {
                    let data: Vec<SparkInstance> = points
                        .iter()
                        .take(*count as usize)
                        .map(|p| SparkInstance {
                            pos: p.to_array(),
                            size: *size,
                        })
                        .collect();
                    self.queue.write_buffer(vb, 0, bytemuck::cast_slice(&data));
                }
            }
        }

        let frame = self.surface.get_current_texture()?;
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_pipeline(&self.line_pipeline);
            for id in &scene.order {
                if let Some(EntityGpu::Line {
                    vb,
                    vertex_count,
                    slot,
                }) = self.entities.get(id)
                {
                    rpass.set_bind_group(
                        0,
                        &self.uniform_bind_group,
                        &[*slot * UNIFORM_STRIDE as u32],
                    );
                    rpass.set_vertex_buffer(0, vb.slice(..));
                    rpass.draw(0..*vertex_count, 0..1);
                }
            }

            rpass.set_pipeline(&self.spark_pipeline);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            for id in &scene.order {
                if let Some(EntityGpu::Sparks {
                    vb, count, slot, ..
                }) = self.entities.get(id)
                {
                    rpass.set_bind_group(
                        0,
                        &self.uniform_bind_group,
                        &[*slot * UNIFORM_STRIDE as u32],
                    );
                    rpass.set_vertex_buffer(1, vb.slice(..));
                    rpass.draw(0..6, 0..*count);
                }
            }

            rpass.set_pipeline(&self.badge_pipeline);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            for id in &scene.order {
                if let Some(EntityGpu::Badge {
                    vb,
                    bind_group,
                    slot,
                    ..
                }) = self.entities.get(id)
                {
                    rpass.set_bind_group(
                        0,
                        &self.uniform_bind_group,
                        &[*slot * UNIFORM_STRIDE as u32],
                    );
                    rpass.set_bind_group(1, bind_group, &[]);
                    rpass.set_vertex_buffer(1, vb.slice(..));
                    rpass.draw(0..6, 0..1);
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Release every GPU resource this mount created. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            self.destroy_entity(id);
        }
        self.uniform_buffer.destroy();
        self.quad_vb.destroy();
        self.disposed = true;
    }
}

impl Drop for GpuState {
    fn drop(&mut self) {
        self.dispose();
    }
}
