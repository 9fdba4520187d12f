use glam::Vec3;
use thiserror::Error;

/// Errors that can occur while converting floats to fixed-point integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScalingError {
    /// A precision of zero would divide by zero
    #[error("Scaling precision must be non-zero")]
    ZeroPrecision,
}

/// Result of a fixed-point conversion.
///
/// Values outside of the integer range are clamped to the nearest bound and
/// reported through `in_range`, so the caller decides whether that warrants
/// dropping the peer or simply carrying on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scaled<T> {
    pub value: T,
    pub in_range: bool,
}

impl<T> Scaled<T> {
    fn new(value: T, in_range: bool) -> Self {
        Self { value, in_range }
    }
}

/// `value / precision`, rounded to the nearest i64
pub fn scale_to_i64(value: f64, precision: f64) -> Result<Scaled<i64>, ScalingError> {
    if precision == 0.0 {
        return Err(ScalingError::ZeroPrecision);
    }

    let quotient = (value / precision).round();

    // i64::MAX is not representable as f64, the nearest f64 is 2^63
    let output = if quotient.is_nan() {
        Scaled::new(0, false)
    } else if quotient < i64::MIN as f64 {
        Scaled::new(i64::MIN, false)
    } else if quotient >= i64::MAX as f64 {
        Scaled::new(i64::MAX, false)
    } else {
        Scaled::new(quotient as i64, true)
    };

    Ok(output)
}

/// `value / precision`, rounded to the nearest i32
pub fn scale_to_i32(value: f32, precision: f32) -> Result<Scaled<i32>, ScalingError> {
    if precision == 0.0 {
        return Err(ScalingError::ZeroPrecision);
    }

    let quotient = (f64::from(value) / f64::from(precision)).round();

    let output = if quotient.is_nan() {
        Scaled::new(0, false)
    } else if quotient < f64::from(i32::MIN) {
        Scaled::new(i32::MIN, false)
    } else if quotient > f64::from(i32::MAX) {
        Scaled::new(i32::MAX, false)
    } else {
        Scaled::new(quotient as i32, true)
    };

    Ok(output)
}

pub fn scale_from_i64(value: i64, precision: f64) -> f64 {
    value as f64 * precision
}

pub fn scale_from_i32(value: i32, precision: f32) -> f32 {
    (f64::from(value) * f64::from(precision)) as f32
}

/// Scales each component independently. `in_range` is false if any component
/// had to be clamped.
pub fn scale_vec3_to_i64(value: Vec3, precision: f32) -> Result<Scaled<[i64; 3]>, ScalingError> {
    let precision = f64::from(precision);
    let x = scale_to_i64(f64::from(value.x), precision)?;
    let y = scale_to_i64(f64::from(value.y), precision)?;
    let z = scale_to_i64(f64::from(value.z), precision)?;

    Ok(Scaled::new(
        [x.value, y.value, z.value],
        x.in_range && y.in_range && z.in_range,
    ))
}

pub fn scale_i64_to_vec3(value: [i64; 3], precision: f32) -> Vec3 {
    let precision = f64::from(precision);
    Vec3::new(
        scale_from_i64(value[0], precision) as f32,
        scale_from_i64(value[1], precision) as f32,
        scale_from_i64(value[2], precision) as f32,
    )
}
