//! Mesh, texture and material references for the render phase.

/// What a rendering backend should draw for an entity.
///
/// Paths are opaque to the core; the backend resolves them.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    pub mesh_path: String,
    pub texture_path: String,
    pub material_id: u32,
    pub visible: bool,
    pub casts_shadow: bool,
    pub receives_shadow: bool,
    /// Camera distance beyond which the entity is culled.
    pub lod_distance: f32,
    /// 0 is the highest quality level.
    pub current_lod: u32,
    pub render_layer: u32,
}

crate::define_component!(Renderable);

impl Renderable {
    pub fn new(mesh_path: impl Into<String>) -> Self {
        Self {
            mesh_path: mesh_path.into(),
            ..Self::default()
        }
    }

    pub fn with_texture(mut self, texture_path: impl Into<String>) -> Self {
        self.texture_path = texture_path.into();
        self
    }

    pub fn with_material(mut self, material_id: u32) -> Self {
        self.material_id = material_id;
        self
    }

    pub fn should_render(&self, distance_to_camera: f32) -> bool {
        self.visible && distance_to_camera <= self.lod_distance
    }
}

impl Default for Renderable {
    fn default() -> Self {
        Self {
            mesh_path: String::new(),
            texture_path: String::new(),
            material_id: 0,
            visible: true,
            casts_shadow: true,
            receives_shadow: true,
            lod_distance: 500.0,
            current_lod: 0,
            render_layer: 0,
        }
    }
}
