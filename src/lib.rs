pub mod curve;
pub mod render;
pub mod settings;

pub use curve::{
    sample, ControlPoint, CubicBezier, CurveBuffer, ParameterScale, SampleCount, SampleError,
};
pub use render::{install, CurvePlugin};
pub use settings::CurveSettings;
