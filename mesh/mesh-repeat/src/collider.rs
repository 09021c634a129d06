//! Box collider placement derived from a bounding box.

use mesh_types::Aabb;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Center and full size of a box volume, ready for a physics collider.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxVolume {
    /// Box center.
    pub center: Point3<f64>,
    /// Full edge lengths.
    pub size: Vector3<f64>,
}

impl BoxVolume {
    /// Half the edge lengths.
    #[must_use]
    pub fn half_extents(&self) -> Vector3<f64> {
        self.size * 0.5
    }

    /// The box as min/max corners.
    #[must_use]
    pub fn to_aabb(&self) -> Aabb {
        let half = self.half_extents();
        Aabb::new(self.center - half, self.center + half)
    }
}

/// Derives a collider box from bounds: `center = (min + max) / 2`,
/// `size = max - min`.
///
/// # Example
///
/// ```
/// use mesh_repeat::derive_box_volume;
/// use mesh_types::{Aabb, Point3, Vector3};
///
/// let bounds = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));
/// let volume = derive_box_volume(&bounds);
/// assert_eq!(volume.center, Point3::new(1.0, 0.5, 0.5));
/// assert_eq!(volume.size, Vector3::new(2.0, 1.0, 1.0));
/// ```
#[must_use]
pub fn derive_box_volume(bounds: &Aabb) -> BoxVolume {
    BoxVolume {
        center: bounds.center(),
        size: bounds.size(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn volume_round_trips_to_bounds() {
        let bounds = Aabb::new(Point3::new(-1.0, 2.0, 0.5), Point3::new(3.0, 4.0, 1.5));
        let volume = derive_box_volume(&bounds);

        assert_relative_eq!(volume.half_extents(), Vector3::new(2.0, 1.0, 0.5));
        let back = volume.to_aabb();
        assert_relative_eq!(back.min, bounds.min);
        assert_relative_eq!(back.max, bounds.max);
    }

    #[test]
    fn degenerate_bounds_give_zero_size() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let volume = derive_box_volume(&Aabb::from_point(p));
        assert_eq!(volume.center, p);
        assert_eq!(volume.size, Vector3::zeros());
    }
}
