/// Property-based checks of the snapshot buffer and the interpolation clock

use proptest::prelude::*;

use tidal_shared::{
    compute, CatchupSettings, InsertOutcome, InterpolationClock, RejectReason, SnapshotBuffer,
    TimedSnapshot,
};

fn snapshot(time: f64) -> TimedSnapshot<f64> {
    TimedSnapshot::new(time, time, time * 10.0)
}

proptest! {
    #[test]
    fn buffer_stays_strictly_ordered(times in prop::collection::vec(0u32..200, 0..60)) {
        let mut buffer = SnapshotBuffer::new(32);
        for time in times {
            let outcome = buffer.insert(snapshot(f64::from(time)));
            prop_assert_ne!(outcome, InsertOutcome::Rejected(RejectReason::InvalidTimestamp));
        }

        let remote_times: Vec<f64> = buffer.iter().map(|snapshot| snapshot.remote_time).collect();
        prop_assert!(remote_times.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(buffer.len() <= 32);
    }

    #[test]
    fn clock_never_extrapolates(
        gaps in prop::collection::vec(0.01f64..0.5, 2..40),
        ticks in prop::collection::vec(0.0f64..0.3, 1..80),
        buffer_delay in 0.0f64..0.3,
    ) {
        let mut buffer = SnapshotBuffer::new(64);
        let mut time = 0.0;
        for gap in &gaps {
            buffer.insert(snapshot(time));
            time += gap;
        }

        let settings = CatchupSettings { threshold: 4, multiplier: 0.1 };
        let mut clock = InterpolationClock::default();
        let mut local_time = time;

        for delta_time in ticks {
            local_time += delta_time;
            let output = compute(
                &mut buffer,
                &mut clock,
                local_time,
                delta_time,
                buffer_delay,
                &settings,
            );

            let (Some(first), Some(second)) = (buffer.first(), buffer.second()) else {
                prop_assert!(output.is_none());
                continue;
            };
            let distance = second.remote_time - first.remote_time;
            prop_assert!(clock.time >= 0.0);
            prop_assert!(clock.time <= distance);

            if let Some(output) = output {
                prop_assert!(output.state >= first.state - 1e-9);
                prop_assert!(output.state <= second.state + 1e-9);
            }
        }
    }
}
