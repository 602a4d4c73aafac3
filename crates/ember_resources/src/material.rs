use bitflags::bitflags;

bitflags! {
    /// Vertex inputs a material's shader consumes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct MaterialFeatures: u32 {
        const TEX_COORDS  = 1 << 0;
        /// Reads bone ids/weights and the joint palette in the vertex stage.
        const HW_SKINNING = 1 << 1;
    }
}

#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub features: MaterialFeatures,
}

impl Material {
    #[must_use]
    pub fn new(name: impl Into<String>, features: MaterialFeatures) -> Self {
        Self {
            name: name.into(),
            features,
        }
    }

    #[inline]
    #[must_use]
    pub fn has_tex_coords(&self) -> bool {
        self.features.contains(MaterialFeatures::TEX_COORDS)
    }

    #[inline]
    #[must_use]
    pub fn has_hw_skinning(&self) -> bool {
        self.features.contains(MaterialFeatures::HW_SKINNING)
    }
}
