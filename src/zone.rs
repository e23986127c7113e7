use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;

/// Road region of interest: four image-space corners plus the metric
/// size of the ground rectangle they map onto.
///
/// Corners are listed in the same order as the target rectangle they
/// correspond to: near-left, near-right, far-right, far-left, with
/// `source[0]` mapping to the target origin. The quad must be oriented
/// so the direction of travel lands on the target's vertical (Y) axis;
/// the speed tracker measures displacement along that axis only and
/// cannot validate this precondition itself.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ZoneConfig {
    pub source: [[f32; 2]; 4],
    /// Width of the target region, in metric units (e.g. meters).
    pub target_width: f32,
    /// Length of the target region along the direction of travel.
    pub target_height: f32,
}

impl ZoneConfig {
    pub fn new(source: [[f32; 2]; 4], target_width: f32, target_height: f32) -> Self {
        Self {
            source,
            target_width,
            target_height,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.target_width > 0.0) || !(self.target_height > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "target region must have positive dimensions, got {}x{}",
                self.target_width, self.target_height
            )));
        }

        Ok(())
    }

    #[inline]
    pub fn source_points(&self) -> [na::Point2<f32>; 4] {
        self.source.map(|[x, y]| na::Point2::new(x, y))
    }

    /// Corners of the axis-aligned metric rectangle, ordered to match
    /// `source`.
    pub fn target_points(&self) -> [na::Point2<f32>; 4] {
        let w = self.target_width - 1.0;
        let h = self.target_height - 1.0;

        [
            na::Point2::new(0.0, 0.0),
            na::Point2::new(w, 0.0),
            na::Point2::new(w, h),
            na::Point2::new(0.0, h),
        ]
    }
}
