use std::collections::{HashMap, HashSet};

use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::circular_queue::CircularQueue;
use crate::error::Error;

/// Meters-per-second to kilometers-per-hour.
pub const KMH_PER_MPS: f32 = 3.6;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SpeedConfig {
    /// Samples retained per track; one second worth at native frame
    /// rate is the usual choice.
    pub window: usize,
    pub frame_rate: f32,
    /// Below this many samples a track only reports `Insufficient`.
    pub min_samples: usize,
    /// Conversion from metric-units-per-second to the display unit.
    pub unit_scale: f32,
}

impl SpeedConfig {
    /// `min_samples` defaults to half the window (rounded), `unit_scale`
    /// to km/h.
    pub fn new(window: usize, frame_rate: f32) -> Self {
        Self {
            window,
            frame_rate,
            min_samples: (window + 1) / 2,
            unit_scale: KMH_PER_MPS,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.window == 0 {
            return Err(Error::InvalidConfiguration(
                "window capacity must be positive".into(),
            ));
        }

        if !(self.frame_rate > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "frame rate must be positive, got {}",
                self.frame_rate
            )));
        }

        if self.min_samples == 0 || self.min_samples > self.window {
            return Err(Error::InvalidConfiguration(format!(
                "min_samples must be in 1..={}, got {}",
                self.window, self.min_samples
            )));
        }

        if !(self.unit_scale > 0.0) {
            return Err(Error::InvalidConfiguration(format!(
                "unit scale must be positive, got {}",
                self.unit_scale
            )));
        }

        Ok(())
    }
}

/// Per-track result of a speed query.
///
/// `Insufficient` is the normal warm-up state of every new track, not a
/// failure; callers branch on it rather than treat it as an error. The
/// renderer derives its two annotation colors from the variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedEstimate {
    /// Not enough history in the window yet, or the track is unknown.
    Insufficient { track_id: u32 },
    /// Speed sustained over the visible window, in display units.
    Speed { track_id: u32, value: f32 },
}

impl SpeedEstimate {
    #[inline]
    pub fn track_id(&self) -> u32 {
        match *self {
            SpeedEstimate::Insufficient { track_id } => track_id,
            SpeedEstimate::Speed { track_id, .. } => track_id,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, SpeedEstimate::Speed { .. })
    }

    #[inline]
    pub fn value(&self) -> Option<f32> {
        match *self {
            SpeedEstimate::Insufficient { .. } => None,
            SpeedEstimate::Speed { value, .. } => Some(value),
        }
    }

    /// Annotation text: `"#<id>"` while warming up, `"#<id> <speed> km/h"`
    /// once ready, with the speed truncated to a whole number. Consumers
    /// using a `unit_scale` other than km/h should format from `value()`
    /// instead.
    pub fn label(&self) -> String {
        match *self {
            SpeedEstimate::Insufficient { track_id } => format!("#{}", track_id),
            SpeedEstimate::Speed { track_id, value } => {
                format!("#{} {} km/h", track_id, value as i64)
            }
        }
    }
}

/// Sliding-window speed estimator keyed by track id.
///
/// Buffers the ground-plane Y coordinate of each track and derives speed
/// from the displacement between the newest and the oldest sample in the
/// window. Direction is discarded; the figure is only meaningful when
/// travel is predominantly along the target's vertical axis (see
/// [`ZoneConfig`](crate::ZoneConfig)).
pub struct SpeedTracker {
    config: SpeedConfig,
    buffers: HashMap<u32, CircularQueue<f32>>,
}

impl SpeedTracker {
    pub fn new(config: SpeedConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            config,
            buffers: HashMap::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &SpeedConfig {
        &self.config
    }

    /// Number of tracks currently holding a buffer.
    #[inline]
    pub fn tracked(&self) -> usize {
        self.buffers.len()
    }

    /// Pushes the displacement-axis coordinate of `ground_point` into
    /// the track's buffer, creating it on first sight of the id. The
    /// oldest sample is evicted once the window is full.
    pub fn observe(&mut self, track_id: u32, ground_point: na::Point2<f32>) {
        let window = self.config.window;

        self.buffers
            .entry(track_id)
            .or_insert_with(|| CircularQueue::with_capacity(window))
            .push(ground_point.y);
    }

    /// Pure with respect to buffer state: repeated calls without an
    /// intervening `observe` return identical results.
    pub fn estimate(&self, track_id: u32) -> SpeedEstimate {
        let buf = match self.buffers.get(&track_id) {
            Some(buf) if buf.len() >= self.config.min_samples => buf,
            _ => return SpeedEstimate::Insufficient { track_id },
        };

        let (newest, oldest) = match (buf.newest(), buf.oldest()) {
            (Some(n), Some(o)) => (*n, *o),
            _ => return SpeedEstimate::Insufficient { track_id },
        };

        // min_samples >= 1, so elapsed is never zero; a lone sample
        // yields zero displacement over one frame interval.
        let elapsed = buf.len() as f32 / self.config.frame_rate;
        let value = (newest - oldest).abs() / elapsed * self.config.unit_scale;

        SpeedEstimate::Speed { track_id, value }
    }

    /// Drops buffers for tracks the tracker no longer reports, bounding
    /// memory on long videos with many short-lived tracks.
    pub fn evict_stale(&mut self, active: &HashSet<u32>) {
        self.buffers.retain(|id, _| active.contains(id));
    }
}
