//! Device profile catalog.
//!
//! A [`DeviceProfile`] names the exact resolution a wallpaper must fill. The
//! built-in presets live in [`DEVICE_PROFILES`].

use crate::error::{WallpaperError, WallpaperResult};
use crate::source::SizePx;

/// A named target resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceProfile {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Built-in presets, in display order.
pub const DEVICE_PROFILES: &[DeviceProfile] = &[
    DeviceProfile::new("iPhone 15 Pro Max", 1290, 2796),
    DeviceProfile::new("iPhone 15 Pro", 1179, 2556),
    DeviceProfile::new("iPhone 15", 1179, 2556),
    DeviceProfile::new("iPhone 15 Plus", 1284, 2778),
    DeviceProfile::new("iPhone 16", 1179, 2556),
    DeviceProfile::new("iPhone 16 Plus", 1290, 2796),
    DeviceProfile::new("iPhone 16 Pro", 1206, 2622),
    DeviceProfile::new("iPhone 16 Pro Max", 1320, 2868),
];

impl DeviceProfile {
    /// Creates a profile. Use this for resolutions outside the catalog.
    pub const fn new(name: &'static str, width: u32, height: u32) -> Self {
        Self {
            name,
            width,
            height,
        }
    }

    /// Finds a catalog entry by name, ignoring case and surrounding whitespace.
    pub fn find(name: &str) -> Option<&'static DeviceProfile> {
        let name = name.trim();
        DEVICE_PROFILES
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Like [`find`](Self::find), but fails with [`WallpaperError::UnknownDevice`].
    pub fn lookup(name: &str) -> WallpaperResult<DeviceProfile> {
        Self::find(name)
            .copied()
            .ok_or_else(|| WallpaperError::unknown_device(name.trim()))
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.width, self.height)
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        DEVICE_PROFILES[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_dimensions_are_positive() {
        for profile in DEVICE_PROFILES {
            assert!(profile.width > 0 && profile.height > 0, "{}", profile.name);
            assert!(profile.height > profile.width, "{} should be portrait", profile.name);
        }
    }

    #[test]
    fn catalog_names_are_unique() {
        for (i, a) in DEVICE_PROFILES.iter().enumerate() {
            for b in &DEVICE_PROFILES[i + 1..] {
                assert!(!a.name.eq_ignore_ascii_case(b.name));
            }
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let profile = DeviceProfile::lookup("  iphone 16 ").unwrap();
        assert_eq!(profile.name, "iPhone 16");
        assert_eq!(profile.size(), SizePx::new(1179, 2556));
    }

    #[test]
    fn lookup_unknown_fails() {
        let err = DeviceProfile::lookup("Pixel 9").unwrap_err();
        assert!(matches!(err, WallpaperError::UnknownDevice(ref n) if n == "Pixel 9"));
    }

    #[test]
    fn default_is_pro_max() {
        let profile = DeviceProfile::default();
        assert_eq!(profile.name, "iPhone 15 Pro Max");
        assert_eq!((profile.width, profile.height), (1290, 2796));
    }
}
