use catalog_app::effects::confirm::ConfirmResult;
use dialoguer::console::Term;
use dialoguer::Confirm;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Confirmation {
    /// `--yes` was given.
    AssumeYes,
    /// Ask on the terminal, anything but an explicit 'yes' declines.
    Prompt,
}

impl Confirmation {
    pub fn ask(&self, prompt: &str) -> ConfirmResult {
        match self {
            Confirmation::AssumeYes => {
                debug!("confirmation assumed. prompt: {}", prompt);
                ConfirmResult::Confirmed
            }
            Confirmation::Prompt => {
                let answer = Confirm::new()
                    .with_prompt(prompt)
                    .default(false)
                    .interact_on(&Term::stderr());

                match answer {
                    Ok(answer) => answer.into(),
                    Err(e) => {
                        warn!("Unable to ask for confirmation, treating as declined. cause: {}", e);
                        ConfirmResult::Declined
                    }
                }
            }
        }
    }
}
