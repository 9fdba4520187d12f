use std::f32::consts::FRAC_1_SQRT_2;

use glam::Quat;
use log::debug;

use super::error::QuaternionError;

/// Bits used for each of the three transmitted components
pub const QUATERNION_BITS_PER_COMPONENT: u32 = 10;

/// Once the largest component is dropped, the other three of a unit
/// quaternion always lie within +/- 1/sqrt(2)
pub const QUATERNION_RANGE: f32 = FRAC_1_SQRT_2;

const COMPONENT_MASK: u32 = (1 << QUATERNION_BITS_PER_COMPONENT) - 1;
// an even step count puts 0.0 exactly on step 511, the top code is unused
const COMPONENT_STEPS: f32 = (COMPONENT_MASK - 1) as f32;

/// Smallest-three packed rotation:
/// `[2-bit dropped index][10-bit a][10-bit b][10-bit c]`, most significant first
pub type CompressedQuat = u32;

/// Packs a rotation into 32 bits.
///
/// Non-finite or zero-length input is packed as the identity rotation.
/// Consider using `try_compress_quaternion` to detect such input.
pub fn compress_quaternion(rotation: Quat) -> CompressedQuat {
    match try_compress_quaternion(rotation) {
        Ok(output) => output,
        Err(error) => {
            debug!("{}, sending identity instead", error);
            pack(Quat::IDENTITY)
        }
    }
}

/// Packs a rotation into 32 bits, rejecting input that isn't a rotation
pub fn try_compress_quaternion(rotation: Quat) -> Result<CompressedQuat, QuaternionError> {
    if !rotation.is_finite() {
        return Err(QuaternionError::NonFinite);
    }
    if rotation.length_squared() <= f32::EPSILON {
        return Err(QuaternionError::ZeroLength);
    }
    Ok(pack(rotation.normalize()))
}

fn pack(rotation: Quat) -> CompressedQuat {
    let mut components = rotation.to_array();

    let mut largest_index = 0;
    for index in 1..4 {
        if components[index].abs() > components[largest_index].abs() {
            largest_index = index;
        }
    }

    // q and -q are the same rotation, flip so the dropped component is positive
    if components[largest_index] < 0.0 {
        for component in components.iter_mut() {
            *component = -*component;
        }
    }

    let mut output = (largest_index as u32) << (QUATERNION_BITS_PER_COMPONENT * 3);
    let mut shift = QUATERNION_BITS_PER_COMPONENT * 2;
    for (index, component) in components.iter().enumerate() {
        if index == largest_index {
            continue;
        }
        output |= quantize(*component) << shift;
        shift = shift.saturating_sub(QUATERNION_BITS_PER_COMPONENT);
    }

    output
}

/// Unpacks a rotation produced by [`compress_quaternion`].
///
/// Any 32-bit input decodes to a finite unit quaternion.
pub fn decompress_quaternion(data: CompressedQuat) -> Quat {
    let largest_index = (data >> (QUATERNION_BITS_PER_COMPONENT * 3)) as usize;

    let mut shift = QUATERNION_BITS_PER_COMPONENT * 2;
    let mut others = [0.0f32; 3];
    for other in others.iter_mut() {
        *other = dequantize((data >> shift) & COMPONENT_MASK);
        shift = shift.saturating_sub(QUATERNION_BITS_PER_COMPONENT);
    }

    let sum_of_squares: f32 = others.iter().map(|value| value * value).sum();
    let largest = (1.0 - sum_of_squares).max(0.0).sqrt();

    let mut components = [0.0f32; 4];
    let mut others_iter = others.into_iter();
    for (index, component) in components.iter_mut().enumerate() {
        *component = if index == largest_index {
            largest
        } else {
            others_iter.next().unwrap_or(0.0)
        };
    }

    // adversarial input can describe a vector longer than 1, but never one
    // shorter: either the sum of squares is >= 1 or `largest` fills the gap
    Quat::from_array(components).normalize()
}

fn quantize(value: f32) -> u32 {
    let normalized = (value + QUATERNION_RANGE) / (2.0 * QUATERNION_RANGE);
    (normalized.clamp(0.0, 1.0) * COMPONENT_STEPS).round() as u32
}

fn dequantize(value: u32) -> f32 {
    (value as f32 / COMPONENT_STEPS) * (2.0 * QUATERNION_RANGE) - QUATERNION_RANGE
}
