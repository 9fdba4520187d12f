pub mod interpolation;
pub mod interpolation_config;
pub mod moving_average;
pub mod snapshot;
pub mod snapshot_buffer;
