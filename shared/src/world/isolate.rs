use std::{
    any::Any,
    panic::{catch_unwind, AssertUnwindSafe},
};

use crate::world::component::error::MemberError;

/// Runs one member's serialize or deserialize call, turning both a returned
/// error and a panic into a printable reason
pub(crate) fn isolate(call: impl FnOnce() -> Result<(), MemberError>) -> Result<(), String> {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(error)) => Err(error.to_string()),
        Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic payload"
    }
}
