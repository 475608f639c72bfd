//! Axis-aligned bounding boxes.

use crate::{Mat4, Vec3};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted box; extending it with any point yields that point.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |mut b, p| {
            b.extend(p);
            b
        })
    }

    #[inline]
    pub fn extend(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Zero for an empty box.
    #[inline]
    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            (self.min + self.max) * 0.5
        }
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Length of the main diagonal.
    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// Bounds of this box after `m`, via its eight corners.
    pub fn transformed(&self, m: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let (lo, hi) = (self.min, self.max);
        Self::from_points((0..8).map(|i| {
            let c = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            m.transform_point3(c)
        }))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_size_diagonal() {
        let b = Aabb::from_points([Vec3::new(1.0, 2.0, 3.0), Vec3::new(3.0, 6.0, 3.0)]);
        assert_eq!(b.center(), Vec3::new(2.0, 4.0, 3.0));
        assert_eq!(b.size(), Vec3::new(2.0, 4.0, 0.0));
        assert!((b.diagonal() - 20f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn empty_box_is_degenerate() {
        let b = Aabb::from_points(std::iter::empty());
        assert!(b.is_empty());
        assert_eq!(b.center(), Vec3::ZERO);
        assert_eq!(b.diagonal(), 0.0);
        assert!(b.transformed(&Mat4::from_scale(Vec3::splat(3.0))).is_empty());
    }

    #[test]
    fn transformed_by_scale_and_translation() {
        let b = Aabb::from_points([Vec3::splat(-1.0), Vec3::splat(1.0)]);
        let m = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let t = b.transformed(&m);
        assert_eq!(t.min, Vec3::new(3.0, -2.0, -2.0));
        assert_eq!(t.max, Vec3::new(7.0, 2.0, 2.0));
    }
}
