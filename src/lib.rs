pub mod error;
pub mod observation;
pub mod pipeline;
pub mod speed;
pub mod view;
pub mod zone;

mod circular_queue;

pub use observation::Observation;
pub use pipeline::SpeedPipeline;
pub use speed::{SpeedConfig, SpeedEstimate, SpeedTracker, KMH_PER_MPS};
pub use view::ViewTransformer;
pub use zone::ZoneConfig;

use nalgebra as na;
use std::fmt;

pub trait Float:
    num_traits::FromPrimitive + na::RealField + Copy + fmt::Debug + PartialEq + 'static
{
}

impl<T> Float for T where
    T: num_traits::FromPrimitive + na::RealField + Copy + fmt::Debug + PartialEq + 'static
{
}
