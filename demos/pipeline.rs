use speedtrack::{Observation, SpeedConfig, SpeedPipeline, ZoneConfig};

const FPS: f32 = 30.0;

fn main() -> Result<(), speedtrack::error::Error> {
    // Highway geometry from the reference footage: a 25x250 meter
    // stretch of road seen from an overpass camera.
    let zone = ZoneConfig::new(
        [[248.0, 510.0], [1552.0, 462.0], [1132.0, 290.0], [596.0, 314.0]],
        25.0,
        250.0,
    );

    let mut pipeline = SpeedPipeline::new(zone, SpeedConfig::new(FPS as usize, FPS))?;

    // With a path argument, replay dumped observations: one JSON array
    // per line, one line per frame. Otherwise synthesize a single
    // vehicle crossing the zone.
    let frames: Vec<Vec<Observation>> = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .expect("unable to read observations file")
            .lines()
            .map(|line| serde_json::from_str(line).expect("malformed observation line"))
            .collect(),
        None => synth_frames(90),
    };

    for (idx, observations) in frames.iter().enumerate() {
        for est in pipeline.process_frame(observations) {
            let state = if est.is_ready() { "ready" } else { "warming up" };
            println!("frame {:4}  {:<16} [{}]", idx, est.label(), state);
        }
    }

    Ok(())
}

/// A vehicle driving up the middle of the zone, entering at the near
/// edge and leaving at the far edge.
fn synth_frames(count: usize) -> Vec<Vec<Observation>> {
    let near = (900.0f32, 486.0f32);
    let far = (864.0f32, 302.0f32);

    (0..count)
        .map(|i| {
            let t = i as f32 / (count - 1) as f32;
            let x = near.0 + (far.0 - near.0) * t;
            let y = near.1 + (far.1 - near.1) * t;

            vec![Observation::new(1, x, y)]
        })
        .collect()
}
