// Video metadata
// Barn cameras name their files EventYYYYMMDDhhmmssCCC.mp4 where CCC is
// the camera id. Older recorders omit the camera suffix.

use regex::Regex;

use crate::constants::DEFAULT_CAMERA_ID;
use crate::error::{HerdwatchError, Result};

/// Identity of the footage a run is analyzing, carried onto every event.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMeta {
    pub name: String,
    pub date: String,
    pub time: String,
    pub camera: String,
    pub fps: f64,
}

impl VideoMeta {
    /// Parse date, time, and camera id out of a camera filename.
    /// The camera suffix defaults to "000" when the recorder left it off.
    pub fn from_filename(filename: &str, fps: f64) -> Result<Self> {
        let re = Regex::new(r"^Event(\d{8})(\d{6})(\d{3})?\.")
            .map_err(|e| HerdwatchError::Other(e.to_string()))?;
        let caps = re.captures(filename).ok_or_else(|| {
            HerdwatchError::InvalidFilename(format!(
                "expected EventYYYYMMDDhhmmss[CCC].<ext>, got '{}'",
                filename
            ))
        })?;

        Ok(Self {
            name: filename.to_string(),
            date: caps[1].to_string(),
            time: caps[2].to_string(),
            camera: caps
                .get(3)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| DEFAULT_CAMERA_ID.to_string()),
            fps,
        })
    }

    /// Metadata for footage that does not follow the camera naming scheme.
    pub fn unnamed(name: &str, fps: f64) -> Self {
        Self {
            name: name.to_string(),
            date: String::new(),
            time: String::new(),
            camera: DEFAULT_CAMERA_ID.to_string(),
            fps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_filename() {
        let meta = VideoMeta::from_filename("Event20240626151811002.mp4", 30.0).unwrap();
        assert_eq!(meta.date, "20240626");
        assert_eq!(meta.time, "151811");
        assert_eq!(meta.camera, "002");
        assert_eq!(meta.name, "Event20240626151811002.mp4");
    }

    #[test]
    fn test_parse_without_camera_suffix() {
        let meta = VideoMeta::from_filename("Event20240626151811.mp4", 25.0).unwrap();
        assert_eq!(meta.camera, "000");
        assert_eq!(meta.date, "20240626");
    }

    #[test]
    fn test_reject_foreign_filename() {
        assert!(VideoMeta::from_filename("holiday_clip.mp4", 30.0).is_err());
        assert!(VideoMeta::from_filename("Event2024.mp4", 30.0).is_err());
    }
}
