use std::time::Duration;

use crux_core::capability::Operation;
use crux_core::{Command, Request};

pub type TimerId = u64;

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum TimerOperation {
    /// Resolve with [`TimerOutput::Elapsed`] once `millis` have passed.
    Start { id: TimerId, millis: u64 },
    /// Abort a started timer, the shell resolves its `Start` request with [`TimerOutput::Cancelled`].
    Cancel { id: TimerId },
}

impl Operation for TimerOperation {
    type Output = TimerOutput;
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum TimerOutput {
    Elapsed { id: TimerId },
    Cancelled { id: TimerId },
}

pub fn start<Effect, Event, F>(id: TimerId, duration: Duration, make_event: F) -> Command<Effect, Event>
where
    Effect: From<Request<TimerOperation>> + Send + 'static,
    Event: Send + 'static,
    F: FnOnce(TimerOutput) -> Event + Send + 'static,
{
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);

    Command::request_from_shell(TimerOperation::Start {
        id,
        millis,
    })
    .then_send(make_event)
}

pub fn cancel<Effect, Event>(id: TimerId) -> Command<Effect, Event>
where
    Effect: From<Request<TimerOperation>> + Send + 'static,
    Event: Send + 'static,
{
    Command::notify_shell(TimerOperation::Cancel {
        id,
    })
    .into()
}
