use std::fmt::{Display, Formatter};
use std::time::Duration;

use crate::effects::timer::TimerId;

/// How long success and info messages stay visible.
pub const AUTO_CLEAR_DELAY: Duration = Duration::from_secs(5);

#[derive(serde::Serialize, serde::Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageKind {
    #[default]
    Info,
    Success,
    Error,
    Warning,
}

impl MessageKind {
    pub fn auto_clears(&self) -> bool {
        matches!(self, MessageKind::Success | MessageKind::Info)
    }
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Info => f.write_str("info"),
            MessageKind::Success => f.write_str("success"),
            MessageKind::Error => f.write_str("error"),
            MessageKind::Warning => f.write_str("warning"),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

/// The single visible message and, when it auto-clears, the timer that will clear it.
#[derive(Debug)]
pub(crate) struct ActiveMessage {
    pub message: Message,
    pub timer: Option<TimerId>,
}
