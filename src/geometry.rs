//! Cover geometry and placement.
//!
//! Geometry is never rejected. Out-of-range values are clamped into range
//! when a [`CoverGeometry`] is resolved against a [`DeviceProfile`].

use std::ops::RangeInclusive;

use crate::device::DeviceProfile;

/// Range of the cover size control, in pixels.
pub const COVER_SIZE_RANGE: RangeInclusive<u32> = 600..=1200;

/// Range of the corner radius control, in pixels.
pub const CORNER_RADIUS_RANGE: RangeInclusive<u32> = 0..=200;

/// Where and how large the cover is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoverGeometry {
    /// Edge length of the square cover.
    pub size: u32,
    /// Radius of the rounded corners.
    pub corner_radius: u32,
    /// Distance of the cover's top edge from the top of the frame.
    pub position_y: u32,
}

impl Default for CoverGeometry {
    fn default() -> Self {
        Self {
            size: 900,
            corner_radius: 40,
            position_y: 1100,
        }
    }
}

impl CoverGeometry {
    pub fn new(size: u32, corner_radius: u32, position_y: u32) -> Self {
        Self {
            size,
            corner_radius,
            position_y,
        }
    }

    /// Clamps every field into the range its UI control allows.
    ///
    /// The position range depends on the clamped size, so the profile is
    /// needed here as well.
    pub fn within_controls(&self, profile: &DeviceProfile) -> Self {
        let size = self
            .size
            .clamp(*COVER_SIZE_RANGE.start(), *COVER_SIZE_RANGE.end());
        let corner_radius = self
            .corner_radius
            .clamp(*CORNER_RADIUS_RANGE.start(), *CORNER_RADIUS_RANGE.end());
        let position_y = self.position_y.min(profile.height.saturating_sub(size));
        Self {
            size,
            corner_radius,
            position_y,
        }
    }

    /// Resolves this geometry against a frame.
    ///
    /// The size is clamped to `[1, profile.height]`, the radius to
    /// `[0, size / 2]` and the position so the cover ends inside the frame.
    /// The cover is always centered horizontally, which may put it on a
    /// half pixel.
    pub fn placement(&self, profile: &DeviceProfile) -> CoverPlacement {
        let size = self.size.clamp(1, profile.height.max(1));
        let max_y = profile.height.saturating_sub(size);
        let position_y = self.position_y.min(max_y);

        let size_f = size as f32;
        let corner_radius = (self.corner_radius as f32).min(size_f / 2.0);

        let clamped = size != self.size
            || position_y != self.position_y
            || corner_radius != self.corner_radius as f32;

        CoverPlacement {
            x: (profile.width as f32 - size_f) / 2.0,
            y: position_y as f32,
            size: size_f,
            corner_radius,
            clamped,
        }
    }
}

/// A resolved, in-range cover placement in frame coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverPlacement {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub corner_radius: f32,
    /// True if any field of the requested geometry had to be adjusted.
    pub clamped: bool,
}

impl CoverPlacement {
    pub fn bottom(&self) -> f32 {
        self.y + self.size
    }
}
