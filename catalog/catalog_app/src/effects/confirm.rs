use crux_core::capability::Operation;
use crux_core::{Command, Request};

/// Ask the user a yes/no question before a destructive action.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum ConfirmOperation {
    Confirm { prompt: String },
}

impl Operation for ConfirmOperation {
    type Output = ConfirmResult;
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmResult {
    Confirmed,
    Declined,
}

impl From<bool> for ConfirmResult {
    fn from(value: bool) -> Self {
        match value {
            true => ConfirmResult::Confirmed,
            false => ConfirmResult::Declined,
        }
    }
}

pub fn confirm<Effect, Event, F>(prompt: impl Into<String>, make_event: F) -> Command<Effect, Event>
where
    Effect: From<Request<ConfirmOperation>> + Send + 'static,
    Event: Send + 'static,
    F: FnOnce(ConfirmResult) -> Event + Send + 'static,
{
    Command::request_from_shell(ConfirmOperation::Confirm {
        prompt: prompt.into(),
    })
    .then_send(make_event)
}
