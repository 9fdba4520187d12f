/// Property-based checks of the compression codecs

use glam::Quat;
use proptest::prelude::*;

use tidal_serde::{
    read_var_int, read_var_uint, var_uint_size, write_var_int, write_var_uint, ByteReader,
    ByteWriter, Serde,
};
use tidal_shared::compression::{
    compress_delta, compress_quaternion, compress_var_delta, decompress_delta,
    decompress_quaternion, decompress_var_delta, scale_from_i64, scale_to_i64,
};

fn angle_between(a: Quat, b: Quat) -> f32 {
    let dot = a.dot(b).abs().min(1.0);
    (2.0 * dot.acos()).to_degrees()
}

proptest! {
    #[test]
    fn var_uint_round_trips(value in any::<u64>()) {
        let mut writer = ByteWriter::new();
        write_var_uint(&mut writer, value);
        prop_assert_eq!(writer.position(), var_uint_size(value));

        let bytes = writer.to_bytes();
        let mut reader = ByteReader::new(&bytes);
        prop_assert_eq!(read_var_uint(&mut reader).unwrap(), value);
        prop_assert!(reader.is_empty());
    }

    #[test]
    fn var_int_round_trips(value in any::<i64>()) {
        let mut writer = ByteWriter::new();
        write_var_int(&mut writer, value);
        let bytes = writer.to_bytes();
        let mut reader = ByteReader::new(&bytes);
        prop_assert_eq!(read_var_int(&mut reader).unwrap(), value);
    }

    #[test]
    fn strings_round_trip(value in ".*") {
        let mut writer = ByteWriter::new();
        value.ser(&mut writer);
        let bytes = writer.to_bytes();
        let mut reader = ByteReader::new(&bytes);
        prop_assert_eq!(String::de(&mut reader).unwrap(), value);
    }

    #[test]
    fn any_quaternion_word_decodes_finite(data in any::<u32>()) {
        let rotation = decompress_quaternion(data);
        prop_assert!(rotation.is_finite());
        prop_assert!((rotation.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn quaternions_within_one_degree(
        x in -1.0f32..1.0,
        y in -1.0f32..1.0,
        z in -1.0f32..1.0,
        w in -1.0f32..1.0,
    ) {
        let rotation = Quat::from_xyzw(x, y, z, w);
        prop_assume!(rotation.length_squared() > 0.01);
        let rotation = rotation.normalize();

        let output = decompress_quaternion(compress_quaternion(rotation));
        prop_assert!(angle_between(rotation, output) <= 1.0);
    }

    #[test]
    fn delta_bytes_round_trip(
        (value, baseline) in (0usize..40).prop_flat_map(|length| {
            (
                prop::collection::vec(any::<u8>(), length),
                prop::collection::vec(any::<u8>(), length),
            )
        })
    ) {
        let mut writer = ByteWriter::new();
        compress_delta(&value, &baseline, &mut writer).unwrap();
        let bytes = writer.to_bytes();

        let changed = value.iter().zip(&baseline).filter(|(a, b)| a != b).count();
        prop_assert_eq!(bytes.len(), (value.len() + 7) / 8 + changed);

        let mut reader = ByteReader::new(&bytes);
        prop_assert_eq!(decompress_delta(&mut reader, &baseline).unwrap(), value);
    }

    #[test]
    fn var_delta_round_trips(current in any::<u64>(), baseline in any::<u64>()) {
        let mut writer = ByteWriter::new();
        compress_var_delta(current, baseline, &mut writer);
        let bytes = writer.to_bytes();
        let mut reader = ByteReader::new(&bytes);
        prop_assert_eq!(decompress_var_delta(&mut reader, baseline).unwrap(), current);
    }

    #[test]
    fn scaling_stays_within_precision(value in -1.0e6f64..1.0e6, precision in 0.001f64..1.0) {
        let scaled = scale_to_i64(value, precision).unwrap();
        prop_assert!(scaled.in_range);

        let restored = scale_from_i64(scaled.value, precision);
        prop_assert!((restored - value).abs() <= precision / 2.0 + 1e-9);
    }
}
