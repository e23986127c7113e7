use std::collections::HashSet;

use crate::error::Error;
use crate::speed::{SpeedConfig, SpeedEstimate, SpeedTracker};
use crate::view::ViewTransformer;
use crate::zone::ZoneConfig;
use crate::Observation;

/// Per-frame orchestration: image-space anchor points in, one speed
/// estimate per track out.
///
/// Frames must be fed strictly in capture order; the window arithmetic
/// in [`SpeedTracker`] relies on temporal ordering of samples. A
/// pipeline is a single-owner stateful object, one per video session.
pub struct SpeedPipeline {
    transformer: ViewTransformer<f32>,
    tracker: SpeedTracker,
}

impl SpeedPipeline {
    /// Geometry and configuration errors surface here, before any frame
    /// is processed.
    pub fn new(zone: ZoneConfig, speed: SpeedConfig) -> Result<Self, Error> {
        zone.validate()?;

        let transformer = ViewTransformer::new(zone.source_points(), zone.target_points())?;
        let tracker = SpeedTracker::new(speed)?;

        Ok(Self {
            transformer,
            tracker,
        })
    }

    /// One transform -> observe -> estimate cycle.
    ///
    /// Anchor points are transformed in a single batch, every track's
    /// buffer is updated, and estimates are returned in input order.
    /// Tracks absent from this frame are evicted afterwards.
    pub fn process_frame(&mut self, observations: &[Observation]) -> Vec<SpeedEstimate> {
        let points: Vec<_> = observations.iter().map(Observation::point).collect();
        let ground = self.transformer.transform_points(&points);

        for (obs, point) in observations.iter().zip(&ground) {
            self.tracker.observe(obs.track_id, *point);
        }

        let estimates = observations
            .iter()
            .map(|obs| self.tracker.estimate(obs.track_id))
            .collect();

        let active: HashSet<u32> = observations.iter().map(|obs| obs.track_id).collect();
        self.tracker.evict_stale(&active);

        estimates
    }

    #[inline]
    pub fn tracker(&self) -> &SpeedTracker {
        &self.tracker
    }

    #[inline]
    pub fn transformer(&self) -> &ViewTransformer<f32> {
        &self.transformer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Zone whose homography is the identity: 10x100 pixels onto 10x100
    // metric units, so image y is ground-plane y directly.
    fn identity_zone() -> ZoneConfig {
        ZoneConfig::new([[0.0, 0.0], [9.0, 0.0], [9.0, 99.0], [0.0, 99.0]], 10.0, 100.0)
    }

    #[test]
    fn bad_geometry_fails_before_first_frame() {
        let zone = ZoneConfig::new(
            [[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 0.0]],
            25.0,
            250.0,
        );

        assert!(matches!(
            SpeedPipeline::new(zone, SpeedConfig::new(30, 30.0)),
            Err(Error::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn bad_speed_config_fails_before_first_frame() {
        assert!(matches!(
            SpeedPipeline::new(identity_zone(), SpeedConfig::new(0, 30.0)),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn warm_up_then_speed() {
        let mut config = SpeedConfig::new(30, 30.0);
        config.min_samples = 4;

        let mut pipeline = SpeedPipeline::new(identity_zone(), config).unwrap();

        let mut last = Vec::new();
        for i in 0..6usize {
            let frame = [Observation::new(1, 4.0, i as f32 * 2.0)];
            last = pipeline.process_frame(&frame);

            if i + 1 < config.min_samples {
                assert!(!last[0].is_ready(), "still warming up at frame {}", i);
                assert_eq!(last[0].label(), "#1");
            }
        }

        assert_eq!(last.len(), 1);
        assert_eq!(last[0].track_id(), 1);
        assert!(last[0].is_ready());

        // |10 - 0| / (6/30) * 3.6
        let value = last[0].value().unwrap();
        assert!((value - 180.0).abs() < 1e-2, "got {}", value);
    }

    #[test]
    fn estimates_keep_input_order() {
        let mut pipeline =
            SpeedPipeline::new(identity_zone(), SpeedConfig::new(4, 30.0)).unwrap();

        let frame = [
            Observation::new(8, 1.0, 10.0),
            Observation::new(3, 2.0, 20.0),
            Observation::new(5, 3.0, 30.0),
        ];
        let estimates = pipeline.process_frame(&frame);

        let ids: Vec<_> = estimates.iter().map(SpeedEstimate::track_id).collect();
        assert_eq!(ids, vec![8, 3, 5]);
    }

    #[test]
    fn absent_tracks_are_evicted() {
        let mut pipeline =
            SpeedPipeline::new(identity_zone(), SpeedConfig::new(4, 30.0)).unwrap();

        for i in 0..3 {
            pipeline.process_frame(&[
                Observation::new(1, 4.0, i as f32),
                Observation::new(2, 6.0, i as f32),
            ]);
        }
        assert_eq!(pipeline.tracker().tracked(), 2);

        // Track 2 drops out of the tracker output.
        pipeline.process_frame(&[Observation::new(1, 4.0, 3.0)]);
        assert_eq!(pipeline.tracker().tracked(), 1);
        assert_eq!(
            pipeline.tracker().estimate(2),
            SpeedEstimate::Insufficient { track_id: 2 }
        );
    }

    #[test]
    fn empty_frame_is_noop_for_estimates() {
        let mut pipeline =
            SpeedPipeline::new(identity_zone(), SpeedConfig::new(4, 30.0)).unwrap();

        assert!(pipeline.process_frame(&[]).is_empty());
    }
}
