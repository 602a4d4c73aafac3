//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! Load-time structural problems are reported through [`ResourceError`].
//! Every variant names the offending resource, and [`ResourceError::context`]
//! wraps an error with the asset or sub-resource it surfaced from, so a
//! failure deep inside a sub-model reads like:
//!
//! ```text
//! Model "knight": sub-model 2: resource "skin_mtl" and "knight_body" are incompatible: ...
//! ```
//!
//! The top level [`EmberError`] collects resource errors and configuration
//! errors (unparsable or out-of-range settings). All fallible public APIs return [`Result<T>`].
//!
//! Programming-contract violations (ticking an unbound animation controller,
//! sampling a clip outside `[0, frame_count)`) are not represented here. They
//! are defects and panic at the call site.

use thiserror::Error;

/// Load-time structural errors.
///
/// All of these are fatal to the asset being loaded, never to the process.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    // ========================================================================
    // Skeleton & Animation
    // ========================================================================
    /// An animation clip does not carry one track per skeleton bone.
    #[error(
        "SkelAnim \"{anim}\" and Skeleton \"{skeleton}\" don't have equal bone count ({tracks} tracks, {bones} bones)"
    )]
    BoneCountMismatch {
        anim: String,
        skeleton: String,
        tracks: usize,
        bones: usize,
    },

    /// A model lists skeleton animations but has no skeleton.
    #[error("model has skeleton animations but no skeleton")]
    MissingSkeleton,

    /// A bone's parent does not precede it in the bone list.
    #[error("bone \"{bone}\" (index {index}) has parent {parent} which does not precede it")]
    BoneOrder {
        bone: String,
        index: usize,
        parent: usize,
    },

    /// A bone references a parent index past the end of the bone list.
    #[error("bone \"{bone}\" (index {index}) references parent {parent}, but the skeleton has {count} bones")]
    BoneParentOutOfRange {
        bone: String,
        index: usize,
        parent: usize,
        count: usize,
    },

    /// A clip has no keyframes or spans zero frames.
    #[error("SkelAnim \"{anim}\" has no frames or no keyframes")]
    EmptyKeyframes { anim: String },

    /// Keyframe indices are not strictly increasing.
    #[error("SkelAnim \"{anim}\" keyframes are not strictly increasing at position {position}")]
    UnorderedKeyframes { anim: String, position: usize },

    /// A keyframe lies past the end of the clip.
    #[error("SkelAnim \"{anim}\" keyframe {keyframe} exceeds frame count {frame_count}")]
    KeyframeOutOfRange {
        anim: String,
        keyframe: u32,
        frame_count: u32,
    },

    /// An animated track does not hold one pose per keyframe.
    #[error("SkelAnim \"{anim}\" track {track} has {poses} poses, expected {keyframes}")]
    TrackLength {
        anim: String,
        track: usize,
        poses: usize,
        keyframes: usize,
    },

    // ========================================================================
    // Model Cross-Validation
    // ========================================================================
    /// Two resources cannot be used together (e.g. a material that needs
    /// texture coordinates paired with a mesh that has none).
    #[error("resource \"{first}\" and \"{second}\" are incompatible: {reason}")]
    IncompatibleResources {
        first: String,
        second: String,
        reason: Incompatibility,
    },

    /// A skinned model's sub-model material lacks hardware skinning support.
    #[error("sub-model {sub_model} material \"{material}\" does not have HW skinning")]
    MissingHwSkinning { sub_model: usize, material: String },

    // ========================================================================
    // Registry
    // ========================================================================
    /// The named resource was not registered.
    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: &'static str, name: String },

    /// A resource with the same name was already registered.
    #[error("{kind} \"{name}\" is already registered")]
    Duplicate { kind: &'static str, name: String },

    // ========================================================================
    // Context
    // ========================================================================
    /// Wraps an inner error with the identity of the asset being loaded.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<ResourceError>,
    },
}

/// The capability a mesh lacks for a material that needs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incompatibility {
    MissingTexCoords,
    MissingVertexWeights,
}

impl std::fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTexCoords => f.write_str("material needs texture coordinates the mesh lacks"),
            Self::MissingVertexWeights => f.write_str("material needs vertex weights the mesh lacks"),
        }
    }
}

impl ResourceError {
    /// Wraps `self` with a context string.
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping every context layer.
    #[must_use]
    pub fn root(&self) -> &ResourceError {
        let mut err = self;
        while let Self::Context { source, .. } = err {
            err = source;
        }
        err
    }
}

/// Extension for attaching context to `Result<T, ResourceError>`.
pub trait ResultExt<T> {
    fn with_context<C, F>(self, f: F) -> std::result::Result<T, ResourceError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> ResultExt<T> for std::result::Result<T, ResourceError> {
    #[inline]
    fn with_context<C, F>(self, f: F) -> std::result::Result<T, ResourceError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.context(f()))
    }
}

/// The main error type for the Ember engine.
#[derive(Error, Debug)]
pub enum EmberError {
    /// An asset failed load-time validation.
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Engine settings could not be parsed.
    #[error("Settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    /// Engine settings parsed but hold an unusable value.
    #[error("Invalid setting `{field}`: {reason}")]
    InvalidSettings { field: &'static str, reason: String },
}

/// Alias for `Result<T, EmberError>`.
pub type Result<T> = std::result::Result<T, EmberError>;
