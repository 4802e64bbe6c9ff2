/// WGSL shader for instanced maze blocks lit by an ambient term and one
/// directional light.
pub const BLOCK_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    // xyz: direction towards the light
    light_dir: vec4<f32>,
    // x: ambient, y: directional intensity
    light: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_block(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    // Blocks are axis-aligned, so scaling never turns a face normal.
    let n = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * model * vec4<f32>(vertex.position, 1.0);
    out.world_normal = select(vertex.normal, normalize(n), length(n) > 1e-6);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_block(in: VertexOutput) -> @location(0) vec4<f32> {
    let to_light = normalize(uniforms.light_dir.xyz);
    let diffuse = max(dot(in.world_normal, to_light), 0.0);
    let lighting = min(uniforms.light.x + diffuse * uniforms.light.y, 1.0);
    return vec4<f32>(in.color.rgb * lighting, in.color.a);
}
"#;
