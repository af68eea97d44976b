//! Uniform parameter sampling of a single cubic Bézier segment into a flat,
//! interleaved `[x, y, z, x, y, z, ...]` buffer ready for vertex upload.

use bevy::math::DVec3;
use derive_more::{Deref, Display, Error};
use itertools::Itertools;
use noisy_float::prelude::*;
use tap::{Pipe, Tap};

pub const DEFAULT_SAMPLE_COUNT: usize = 100;
pub const DEFAULT_TICK: f64 = 1.;

#[derive(Debug, Display, Error, Clone, Copy, PartialEq)]
pub enum SampleError {
    #[display(fmt = "sample count must be at least 1, got {}", count)]
    InvalidSampleCount { count: usize },
    #[display(fmt = "parameter scale must be finite, got {}", tick)]
    NonFiniteScale { tick: f64 },
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ControlPoint {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn axes(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for ControlPoint {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<DVec3> for ControlPoint {
    fn from(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<ControlPoint> for DVec3 {
    fn from(p: ControlPoint) -> Self {
        DVec3::new(p.x, p.y, p.z)
    }
}

/// Number of points emitted along the curve. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deref)]
pub struct SampleCount(usize);

impl Default for SampleCount {
    fn default() -> Self {
        Self(DEFAULT_SAMPLE_COUNT)
    }
}

impl SampleCount {
    pub fn new(count: usize) -> Result<Self, SampleError> {
        (0 < count)
            .then_some(Self(count))
            .ok_or(SampleError::InvalidSampleCount { count })
    }

    /// `None` falls back to [`DEFAULT_SAMPLE_COUNT`]. An explicit zero is rejected.
    pub fn resolve(count: Option<usize>) -> Result<Self, SampleError> {
        count.map_or(Ok(Self::default()), Self::new)
    }
}

impl TryFrom<usize> for SampleCount {
    type Error = SampleError;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        Self::new(count)
    }
}

/// Scales the parameter range to `[0, tick]`. Unclamped, so `tick > 1`
/// extrapolates past the end point.
#[derive(Debug, Clone, Copy, PartialEq, Deref)]
pub struct ParameterScale(R64);

impl Default for ParameterScale {
    fn default() -> Self {
        Self(r64(DEFAULT_TICK))
    }
}

impl ParameterScale {
    pub fn new(tick: f64) -> Result<Self, SampleError> {
        R64::try_new(tick)
            .map(Self)
            .ok_or(SampleError::NonFiniteScale { tick })
    }

    pub fn resolve(tick: Option<f64>) -> Result<Self, SampleError> {
        tick.map_or(Ok(Self::default()), Self::new)
    }
}

impl TryFrom<f64> for ParameterScale {
    type Error = SampleError;

    fn try_from(tick: f64) -> Result<Self, Self::Error> {
        Self::new(tick)
    }
}

/// Cubic Bernstein blend of four scalars.
#[rustfmt::skip]
pub fn bernstein(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1. - t;
    p0 * u.powi(3)
        + 3. * p1 * t * u.powi(2)
        + 3. * p2 * t.powi(2) * u
        + p3 * t.powi(3)
}

/// Parameters the curve is evaluated at, in emission order.
///
/// `t_i = tick * i / (count - 1)`, which lands exactly on `tick` for the last
/// sample. A single sample sits at `t = 0`.
pub fn parameters(count: SampleCount, tick: ParameterScale) -> impl Iterator<Item = f64> {
    let (count, tick) = (*count, tick.raw());
    let last = count - 1;

    (0..count).map(move |i| match last {
        0 => 0.,
        last => tick * i as f64 / last as f64,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: ControlPoint,
    pub p1: ControlPoint,
    pub p2: ControlPoint,
    pub p3: ControlPoint,
}

impl CubicBezier {
    pub fn new(p0: ControlPoint, p1: ControlPoint, p2: ControlPoint, p3: ControlPoint) -> Self {
        Self { p0, p1, p2, p3 }
    }

    pub fn point_at(&self, t: f64) -> ControlPoint {
        let [a, b, c, d] = [self.p0, self.p1, self.p2, self.p3].map(ControlPoint::axes);
        let axis = |i: usize| bernstein(a[i], b[i], c[i], d[i], t);
        ControlPoint::new(axis(0), axis(1), axis(2))
    }

    pub fn sample(&self, count: SampleCount, tick: ParameterScale) -> CurveBuffer {
        Vec::with_capacity(3 * *count)
            .tap_mut(|buffer| {
                buffer.extend(
                    parameters(count, tick)
                        .map(|t| self.point_at(t))
                        .flat_map(ControlPoint::axes),
                )
            })
            .pipe(CurveBuffer)
    }
}

pub fn sample(
    p0: ControlPoint,
    p1: ControlPoint,
    p2: ControlPoint,
    p3: ControlPoint,
    count: SampleCount,
    tick: ParameterScale,
) -> CurveBuffer {
    CubicBezier::new(p0, p1, p2, p3).sample(count, tick)
}

/// Interleaved `x, y, z` triples. Always `3 * count` long.
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct CurveBuffer(Vec<f64>);

impl CurveBuffer {
    pub fn vertex_count(&self) -> usize {
        self.len() / 3
    }

    pub fn points(&self) -> impl Iterator<Item = ControlPoint> + '_ {
        self.iter()
            .copied()
            .tuples()
            .map(|(x, y, z)| ControlPoint::new(x, y, z))
    }

    /// Narrowed to the tightly packed `Float32x3` layout the GPU consumes.
    pub fn positions_f32(&self) -> Vec<[f32; 3]> {
        self.points()
            .map(|p| [p.x as f32, p.y as f32, p.z as f32])
            .collect()
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}
