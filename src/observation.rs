use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

/// One tracked anchor point in image space.
///
/// Produced per frame by the external detector/tracker stack: already
/// class/confidence/zone filtered, non-max suppressed, and tagged with a
/// stable track id. The anchor is conventionally the bottom center of
/// the bounding box, where the vehicle touches the road.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    #[serde(rename = "id")]
    pub track_id: u32,
    pub x: f32,
    pub y: f32,
}

impl Observation {
    pub fn new(track_id: u32, x: f32, y: f32) -> Self {
        Self { track_id, x, y }
    }

    #[inline(always)]
    pub fn point(&self) -> na::Point2<f32> {
        na::Point2::new(self.x, self.y)
    }
}
