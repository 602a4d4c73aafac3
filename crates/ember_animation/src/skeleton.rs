use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use ember_core::{ResourceError, RigidTransform};

/// Child list of a bone. Most bones have few children.
pub type BoneChildren = SmallVec<[usize; 4]>;

/// Already-parsed bone data handed over by the resource layer.
#[derive(Debug, Clone)]
pub struct BoneDesc {
    pub name: String,
    /// Index of the parent bone, `None` for roots.
    pub parent: Option<usize>,
    /// Head point in armature space (debug drawing).
    pub head: Vec3,
    /// Tail point in armature space (debug drawing).
    pub tail: Vec3,
    /// Bind-space rotation of the bone.
    pub bind_rotation: Quat,
    /// Bind-space translation of the bone.
    pub bind_translation: Vec3,
}

impl BoneDesc {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            parent,
            head: Vec3::ZERO,
            tail: Vec3::ZERO,
            bind_rotation: Quat::IDENTITY,
            bind_translation: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn with_head_tail(mut self, head: Vec3, tail: Vec3) -> Self {
        self.head = head;
        self.tail = tail;
        self
    }

    #[must_use]
    pub fn with_bind(mut self, rotation: Quat, translation: Vec3) -> Self {
        self.bind_rotation = rotation;
        self.bind_translation = translation;
        self
    }
}

/// A node of the skeleton hierarchy.
///
/// Parent and children are indices into the owning [`Skeleton`]'s bone list.
#[derive(Debug, Clone)]
pub struct Bone {
    name: String,
    index: usize,
    parent: Option<usize>,
    children: BoneChildren,
    head: Vec3,
    tail: Vec3,
    bind: RigidTransform,
    bind_inverse: RigidTransform,
}

impl Bone {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position of this bone in the skeleton's bone list.
    #[inline]
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn head(&self) -> Vec3 {
        self.head
    }

    #[inline]
    #[must_use]
    pub fn tail(&self) -> Vec3 {
        self.tail
    }

    /// Bind-space (armature space) transform.
    #[inline]
    #[must_use]
    pub fn bind_transform(&self) -> &RigidTransform {
        &self.bind
    }

    /// Precomputed inverse of [`bind_transform`](Self::bind_transform).
    #[inline]
    #[must_use]
    pub fn inverse_bind_transform(&self) -> &RigidTransform {
        &self.bind_inverse
    }
}

/// Static bone hierarchy shared by every instance skinning the same mesh.
///
/// # Invariant
///
/// Bones are stored in topological order: a bone's parent always has a
/// strictly lower index. [`Skeleton::new`] rejects any other layout, which
/// lets pose composition walk the bones with a plain forward scan.
/// Bone names are unique within a skeleton.
#[derive(Debug, Clone)]
pub struct Skeleton {
    name: String,
    bones: Vec<Bone>,
    roots: BoneChildren,
    lookup: FxHashMap<String, usize>,
}

impl Skeleton {
    pub fn new(name: impl Into<String>, descs: Vec<BoneDesc>) -> Result<Self, ResourceError> {
        let name = name.into();
        let count = descs.len();

        let mut bones: Vec<Bone> = Vec::with_capacity(count);
        let mut roots = BoneChildren::new();
        let mut lookup = FxHashMap::default();

        for (index, desc) in descs.into_iter().enumerate() {
            if let Some(parent) = desc.parent {
                if parent >= count {
                    return Err(ResourceError::BoneParentOutOfRange {
                        bone: desc.name,
                        index,
                        parent,
                        count,
                    }
                    .context(format!("Skeleton \"{name}\"")));
                }
                if parent >= index {
                    return Err(ResourceError::BoneOrder {
                        bone: desc.name,
                        index,
                        parent,
                    }
                    .context(format!("Skeleton \"{name}\"")));
                }
                bones[parent].children.push(index);
            } else {
                roots.push(index);
            }

            if lookup.insert(desc.name.clone(), index).is_some() {
                return Err(ResourceError::Duplicate {
                    kind: "Bone",
                    name: desc.name,
                }
                .context(format!("Skeleton \"{name}\"")));
            }

            let bind = RigidTransform::new(desc.bind_rotation.normalize(), desc.bind_translation);
            bones.push(Bone {
                name: desc.name,
                index,
                parent: desc.parent,
                children: BoneChildren::new(),
                head: desc.head,
                tail: desc.tail,
                bind,
                bind_inverse: bind.inverse(),
            });
        }

        log::debug!(
            "Skeleton \"{name}\" built: {count} bones, {} roots",
            roots.len()
        );

        Ok(Self {
            name,
            bones,
            roots,
            lookup,
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Indices of the parentless bones.
    #[inline]
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    #[must_use]
    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.lookup.get(name).map(|&i| &self.bones[i])
    }
}
