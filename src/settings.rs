use crate::curve::*;
use bevy::prelude::*;

/// Everything the scene needs to sample and draw its curve.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CurveSettings {
    pub curve: CubicBezier,
    /// `None` falls back to [`DEFAULT_SAMPLE_COUNT`].
    pub count: Option<usize>,
    pub tick: Option<f64>,
    pub stroke: Color,
    pub clear: Color,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            curve: CubicBezier::new(
                ControlPoint::new(-0.7, 0., 0.),
                ControlPoint::new(-0.25, 0.5, 0.),
                ControlPoint::new(0.25, 0.5, 0.),
                ControlPoint::new(0.7, 0., 0.),
            ),
            count: Some(20),
            tick: Some(DEFAULT_TICK),
            stroke: Color::rgba(0., 1., 1., 1.),
            clear: Color::BLACK,
        }
    }
}

impl CurveSettings {
    pub fn with_count(self, count: usize) -> Self {
        Self {
            count: Some(count),
            ..self
        }
    }

    pub fn with_tick(self, tick: f64) -> Self {
        Self {
            tick: Some(tick),
            ..self
        }
    }

    pub fn with_color(self, stroke: Color) -> Self {
        Self { stroke, ..self }
    }

    pub fn sample_count(&self) -> Result<SampleCount, SampleError> {
        SampleCount::resolve(self.count)
    }

    pub fn parameter_scale(&self) -> Result<ParameterScale, SampleError> {
        ParameterScale::resolve(self.tick)
    }

    pub fn sample(&self) -> Result<CurveBuffer, SampleError> {
        Ok(self
            .curve
            .sample(self.sample_count()?, self.parameter_scale()?))
    }
}
