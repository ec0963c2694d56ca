use anyhow::bail;
use catalog_app::Event;
use clap::Parser;
use tracing::debug;

use crate::client::CatalogClient;
use crate::confirm::Confirmation;
use crate::core::Shell;
use crate::opts::{CatalogCommand, Opts};
use crate::render::Summary;

mod client;
mod confirm;
mod core;
mod opts;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = argfile::expand_args(argfile::parse_fromfile, argfile::PREFIX)?;

    let opts = Opts::parse_from(args);

    cli::tracing::configure_tracing(opts.trace.clone(), opts.verbose.clone())?;

    debug!("base url: {}", opts.base_url);
    let client = CatalogClient::new(opts.base_url.clone())?;

    let confirmation = match opts.command {
        CatalogCommand::Remove {
            yes: true, ..
        } => Confirmation::AssumeYes,
        _ => Confirmation::Prompt,
    };
    let summary = Summary::for_command(&opts.command);

    let event = Event::from(opts.command);

    let mut shell = Shell::new(core::new(), client, confirmation);
    shell.run(event).await?;

    let view = shell.view();
    let outcome = shell.into_outcome();
    if !outcome.errors.is_empty() {
        bail!(outcome.errors.join("\n"))
    }

    summary.print(&view, outcome.succeeded);

    Ok(())
}
