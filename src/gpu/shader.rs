//! GPU-side data layout and WGSL for sphere impostors.
//!
//! Each sphere is one instance: a camera-facing quad whose fragments are
//! shaded as if they lay on a sphere. A darker band around the body's local
//! equator makes its orientation visible.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};

/// Per-sphere instance data, 48 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SphereInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub emissive: f32,
    /// Orientation quaternion as `[x, y, z, w]`.
    pub rotation: [f32; 4],
}

impl SphereInstance {
    pub fn new(radius: f32, color: Vec3, emissive: f32) -> Self {
        Self {
            position: [0.0; 3],
            radius,
            color: color.to_array(),
            emissive,
            rotation: Quat::IDENTITY.to_array(),
        }
    }

    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32,   // radius
        2 => Float32x3, // color
        3 => Float32,   // emissive
        4 => Float32x4, // rotation
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Camera uniforms (16-byte aligned).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_right: [f32; 4],
    pub camera_up: [f32; 4],
    /// Unit vector from the scene toward the camera.
    pub camera_back: [f32; 4],
    pub light_dir: [f32; 4],
}

impl SceneUniforms {
    pub fn new(view_proj: Mat4, right: Vec3, up: Vec3, light_dir: Vec3) -> Self {
        let back = right.cross(up).normalize_or(Vec3::Z);
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_right: right.extend(0.0).to_array(),
            camera_up: up.extend(0.0).to_array(),
            camera_back: back.extend(0.0).to_array(),
            light_dir: light_dir.normalize_or(Vec3::Z).extend(0.0).to_array(),
        }
    }
}

pub const SPHERE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_right: vec4<f32>,
    camera_up: vec4<f32>,
    camera_back: vec4<f32>,
    light_dir: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) emissive: f32,
    @location(3) rotation: vec4<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec3<f32>,
    @location(1) radius: f32,
    @location(2) color: vec3<f32>,
    @location(3) emissive: f32,
    @location(4) rotation: vec4<f32>,
) -> VertexOutput {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vertex_index];

    // Quad sits on the sphere's near side so depth sorts by the closest point.
    let offset = (uniforms.camera_right.xyz * corner.x + uniforms.camera_up.xyz * corner.y) * radius;
    let world = center + offset + uniforms.camera_back.xyz * radius;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world, 1.0);
    out.uv = corner;
    out.color = color;
    out.emissive = emissive;
    out.rotation = rotation;
    return out;
}

fn rotate(q: vec4<f32>, v: vec3<f32>) -> vec3<f32> {
    let t = 2.0 * cross(q.xyz, v);
    return v + q.w * t + cross(q.xyz, t);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let r2 = dot(in.uv, in.uv);
    if (r2 > 1.0) {
        discard;
    }

    let z = sqrt(1.0 - r2);
    let normal = normalize(
        uniforms.camera_right.xyz * in.uv.x
        + uniforms.camera_up.xyz * in.uv.y
        + uniforms.camera_back.xyz * z
    );

    // Body-local normal: rotate by the inverse orientation.
    let local = rotate(vec4<f32>(-in.rotation.xyz, in.rotation.w), normal);
    let band = select(1.0, 0.55, abs(local.y) < 0.18);

    let diffuse = max(dot(normal, uniforms.light_dir.xyz), 0.0);
    let rim = pow(1.0 - z, 3.0) * 0.25;
    let lit = in.color * band * (0.25 + 0.75 * diffuse) + vec3<f32>(rim);
    let glow = in.color * in.emissive;

    return vec4<f32>(lit + glow, 1.0);
}
"#;
