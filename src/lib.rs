pub mod cdif;
pub mod histogram;
pub mod pri_transform;
pub mod pulse_correlation;
pub mod pulse_search;
pub mod sdif;

pub use cdif::CDIF;
pub use pri_transform::PRITransform;
pub use pulse_correlation::{PulseCorrelation, PulsePair};
pub use pulse_search::PulseSearcher;
pub use sdif::SDIF;
