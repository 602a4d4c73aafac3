use bitflags::bitflags;

bitflags! {
    /// Vertex streams a mesh provides.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct MeshAttributes: u32 {
        const POSITIONS    = 1 << 0;
        const NORMALS      = 1 << 1;
        const TANGENTS     = 1 << 2;
        const TEX_COORDS   = 1 << 3;
        /// Per-vertex bone ids and weights for hardware skinning.
        const VERT_WEIGHTS = 1 << 4;
    }
}

/// Mesh resource as seen by the model loader: a name and the vertex
/// streams it carries. Vertex data itself lives with the GPU layer.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub vertex_count: u32,
    pub attributes: MeshAttributes,
}

impl Mesh {
    #[must_use]
    pub fn new(name: impl Into<String>, vertex_count: u32, attributes: MeshAttributes) -> Self {
        Self {
            name: name.into(),
            vertex_count,
            attributes,
        }
    }

    #[inline]
    #[must_use]
    pub fn has_tex_coords(&self) -> bool {
        self.attributes.contains(MeshAttributes::TEX_COORDS)
    }

    #[inline]
    #[must_use]
    pub fn has_vert_weights(&self) -> bool {
        self.attributes.contains(MeshAttributes::VERT_WEIGHTS)
    }
}
