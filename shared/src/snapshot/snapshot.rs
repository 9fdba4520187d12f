use glam::{Quat, Vec3};

/// One timestamped capture of an entity's state as received.
///
/// `remote_time` is the sender's timestamp, `local_time` the moment the
/// snapshot arrived here. Both are in seconds.
pub trait Snapshot: Clone {
    fn remote_time(&self) -> f64;
    fn local_time(&self) -> f64;
}

/// Blends two values, `t` in `[0, 1]`
pub trait Interpolate {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self;
}

impl Interpolate for f64 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        from + (to - from) * t
    }
}

impl Interpolate for f32 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        from + (to - from) * t as f32
    }
}

impl Interpolate for Vec3 {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        from.lerp(*to, t as f32)
    }
}

impl Interpolate for Quat {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        from.slerp(*to, t as f32)
    }
}

/// Wraps any interpolatable state with its timestamps
#[derive(Clone, Debug, PartialEq)]
pub struct TimedSnapshot<T> {
    pub remote_time: f64,
    pub local_time: f64,
    pub state: T,
}

impl<T> TimedSnapshot<T> {
    pub fn new(remote_time: f64, local_time: f64, state: T) -> Self {
        Self {
            remote_time,
            local_time,
            state,
        }
    }
}

impl<T: Clone> Snapshot for TimedSnapshot<T> {
    fn remote_time(&self) -> f64 {
        self.remote_time
    }

    fn local_time(&self) -> f64 {
        self.local_time
    }
}

impl<T: Interpolate> Interpolate for TimedSnapshot<T> {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        Self {
            remote_time: f64::interpolate(&from.remote_time, &to.remote_time, t),
            local_time: f64::interpolate(&from.local_time, &to.local_time, t),
            state: T::interpolate(&from.state, &to.state, t),
        }
    }
}

/// Position, rotation and scale of an entity at one point in time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformSnapshot {
    pub remote_time: f64,
    pub local_time: f64,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl TransformSnapshot {
    pub fn new(
        remote_time: f64,
        local_time: f64,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> Self {
        Self {
            remote_time,
            local_time,
            position,
            rotation,
            scale,
        }
    }
}

impl Snapshot for TransformSnapshot {
    fn remote_time(&self) -> f64 {
        self.remote_time
    }

    fn local_time(&self) -> f64 {
        self.local_time
    }
}

impl Interpolate for TransformSnapshot {
    fn interpolate(from: &Self, to: &Self, t: f64) -> Self {
        Self {
            remote_time: f64::interpolate(&from.remote_time, &to.remote_time, t),
            local_time: f64::interpolate(&from.local_time, &to.local_time, t),
            position: Vec3::interpolate(&from.position, &to.position, t),
            rotation: Quat::interpolate(&from.rotation, &to.rotation, t),
            scale: Vec3::interpolate(&from.scale, &to.scale, t),
        }
    }
}
