use glam::{Affine3A, Mat4, Quat, Vec3};

/// Rotation + translation kept as separate components.
///
/// Bone chains are composed thousands of times per frame, so rotation and
/// translation are carried apart instead of being folded into a matrix after
/// every step. Use [`to_mat4`](Self::to_mat4) once at the end for GPU upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub rotation: Quat,
    pub translation: Vec3,
}

impl RigidTransform {
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    #[inline]
    #[must_use]
    pub const fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self::new(Quat::IDENTITY, translation)
    }

    #[inline]
    #[must_use]
    pub const fn from_rotation(rotation: Quat) -> Self {
        Self::new(rotation, Vec3::ZERO)
    }

    /// Returns `self ∘ rhs`: `rhs` is applied first, then `self`.
    #[inline]
    #[must_use]
    pub fn combine(&self, rhs: &Self) -> Self {
        Self {
            rotation: self.rotation * rhs.rotation,
            translation: self.rotation * rhs.translation + self.translation,
        }
    }

    #[inline]
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            rotation,
            translation: -(rotation * self.translation),
        }
    }

    #[inline]
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    #[inline]
    #[must_use]
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }

    #[inline]
    #[must_use]
    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_rotation_translation(self.rotation, self.translation)
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for RigidTransform {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.combine(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn combine_applies_rhs_first() {
        let rotate = RigidTransform::from_rotation(Quat::from_rotation_z(FRAC_PI_2));
        let shift = RigidTransform::from_translation(Vec3::X);

        // shift, then rotate: (1,0,0) -> (2,0,0) -> (0,2,0)
        let p = (rotate * shift).transform_point(Vec3::X);
        assert!((p - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);

        // rotate, then shift: (1,0,0) -> (0,1,0) -> (1,1,0)
        let p = (shift * rotate).transform_point(Vec3::X);
        assert!((p - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn inverse_cancels() {
        let t = RigidTransform::new(Quat::from_rotation_y(0.7), Vec3::new(1.0, -2.0, 3.0));
        let p = Vec3::new(0.3, 0.4, 0.5);
        let back = t.inverse().transform_point(t.transform_point(p));
        assert!((back - p).length() < 1e-5);
    }

    #[test]
    fn matrix_matches_components() {
        let t = RigidTransform::new(Quat::from_rotation_x(1.1), Vec3::new(4.0, 5.0, 6.0));
        let p = Vec3::new(-1.0, 2.0, 0.5);
        assert!((t.to_mat4().transform_point3(p) - t.transform_point(p)).length() < 1e-5);
    }
}
