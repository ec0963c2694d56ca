use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use catalog_app::effects::confirm::ConfirmOperation;
use catalog_app::effects::http::{HttpOperation, HttpResult};
use catalog_app::effects::timer::{TimerId, TimerOperation, TimerOutput};
use catalog_app::{Catalog, CatalogViewModel, Effect, Event};
use crux_core::capability::Operation;
use crux_core::Request;
use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, trace};

use crate::client::CatalogClient;
use crate::confirm::Confirmation;
use crate::render::{Printer, RunOutcome};

pub type Core = Arc<crux_core::Core<Catalog>>;

pub fn new() -> Core {
    Arc::new(crux_core::Core::new())
}

type RequestKey = u64;

/// Executes the core's effects until no HTTP request is outstanding.
///
/// Timers run concurrently with requests, any still pending when the run ends are dropped.
pub(crate) struct Shell {
    core: Core,
    client: CatalogClient,
    confirmation: Confirmation,
    printer: Printer,

    last_request_key: RequestKey,
    pending_http: HashMap<RequestKey, Request<HttpOperation>>,
    http_tasks: JoinSet<(RequestKey, HttpResult)>,

    pending_timers: HashMap<TimerId, (Request<TimerOperation>, AbortHandle)>,
    timer_tasks: JoinSet<TimerId>,
}

impl Shell {
    pub fn new(core: Core, client: CatalogClient, confirmation: Confirmation) -> Self {
        Self {
            core,
            client,
            confirmation,
            printer: Printer::default(),
            last_request_key: 0,
            pending_http: HashMap::new(),
            http_tasks: JoinSet::new(),
            pending_timers: HashMap::new(),
            timer_tasks: JoinSet::new(),
        }
    }

    pub async fn run(&mut self, event: Event) -> anyhow::Result<()> {
        trace!("event: {:?}", event);

        let effects = self.core.process_event(event);
        self.process_effects(effects)?;

        while !self.pending_http.is_empty() {
            tokio::select! {
                Some(joined) = self.http_tasks.join_next() => {
                    let (key, result) = joined?;
                    if let Some(mut request) = self.pending_http.remove(&key) {
                        let effects = self.resolve(&mut request, result)?;
                        self.process_effects(effects)?;
                    }
                }
                Some(joined) = self.timer_tasks.join_next() => {
                    match joined {
                        Ok(id) => self.resolve_timer(id, TimerOutput::Elapsed { id })?,
                        // cancelled timers are resolved when the cancellation is processed
                        Err(e) if e.is_cancelled() => (),
                        Err(e) => return Err(e.into()),
                    }
                }
                else => break,
            }
        }

        if !self.pending_timers.is_empty() {
            debug!("dropping pending timers. count: {}", self.pending_timers.len());
            self.pending_timers.clear();
            self.timer_tasks.abort_all();
        }

        Ok(())
    }

    pub fn view(&self) -> CatalogViewModel {
        self.core.view()
    }

    /// Error messages shown during the run, in order, and whether any change went through.
    pub fn into_outcome(self) -> RunOutcome {
        self.printer.into_outcome()
    }

    fn process_effects(&mut self, effects: Vec<Effect>) -> anyhow::Result<()> {
        let mut queue: VecDeque<Effect> = effects.into();

        while let Some(effect) = queue.pop_front() {
            trace!("effect: {:?}", effect);
            match effect {
                Effect::Render(_) => {
                    let view = self.core.view();
                    self.printer.render(&view);
                }
                Effect::Http(request) => self.spawn_http(request),
                Effect::Timer(request) => match request.operation.clone() {
                    TimerOperation::Start {
                        id,
                        millis,
                    } => self.start_timer(id, millis, request),
                    TimerOperation::Cancel {
                        id,
                    } => queue.extend(self.cancel_timer(id)?),
                },
                Effect::Confirm(mut request) => {
                    let result = match &request.operation {
                        ConfirmOperation::Confirm {
                            prompt,
                        } => self.confirmation.ask(prompt),
                    };
                    queue.extend(self.resolve(&mut request, result)?);
                }
            }
        }

        Ok(())
    }

    fn spawn_http(&mut self, request: Request<HttpOperation>) {
        self.last_request_key += 1;
        let key = self.last_request_key;

        let client = self.client.clone();
        let operation = request.operation.clone();
        self.pending_http.insert(key, request);

        self.http_tasks
            .spawn(async move { (key, client.execute(operation).await) });
    }

    fn start_timer(&mut self, id: TimerId, millis: u64, request: Request<TimerOperation>) {
        trace!("starting timer. id: {}, millis: {}", id, millis);

        let handle = self.timer_tasks.spawn(async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            id
        });
        self.pending_timers.insert(id, (request, handle));
    }

    fn cancel_timer(&mut self, id: TimerId) -> anyhow::Result<Vec<Effect>> {
        let Some((mut request, handle)) = self.pending_timers.remove(&id) else {
            return Ok(vec![]);
        };
        trace!("cancelling timer. id: {}", id);
        handle.abort();

        self.resolve(&mut request, TimerOutput::Cancelled {
            id,
        })
    }

    fn resolve_timer(&mut self, id: TimerId, output: TimerOutput) -> anyhow::Result<()> {
        if let Some((mut request, _handle)) = self.pending_timers.remove(&id) {
            let effects = self.resolve(&mut request, output)?;
            self.process_effects(effects)?;
        }
        Ok(())
    }

    fn resolve<Op: Operation>(&self, request: &mut Request<Op>, output: Op::Output) -> anyhow::Result<Vec<Effect>> {
        self.core
            .resolve(request, output)
            .map_err(|e| anyhow!("{:?}", e))
    }
}
