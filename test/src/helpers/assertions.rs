/// Assert that a write or read report lists a failure for a member index
#[macro_export]
macro_rules! assert_member_failed {
    ($report:expr, $index:expr) => {
        assert!(
            $report.failures.iter().any(|failure| failure.index == $index),
            "Expected member {} to be reported as failed, failures: {:?}",
            $index,
            $report.failures
        );
    };
}

/// Assert that a read report applied a member index
#[macro_export]
macro_rules! assert_member_applied {
    ($report:expr, $index:expr) => {
        assert!(
            $report.applied.contains(&$index),
            "Expected member {} to be applied, applied: {:?}, failures: {:?}",
            $index,
            $report.applied,
            $report.failures
        );
    };
}

/// Assert that a member call panics, without aborting the test
#[macro_export]
macro_rules! assert_panics {
    ($call:expr) => {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            $call;
        }));
        assert!(result.is_err(), "Expected `{}` to panic", stringify!($call));
    };
}
