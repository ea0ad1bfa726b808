//! Declarative update scheduler.
//!
//! Bindings are registered once at startup: each names the inputs that fire
//! it, optional inputs it only reads, a pure handler and the outputs it owns.
//! Every output is owned by exactly one binding.
//!
//! An input event goes through three steps:
//! 1. [`Scheduler::plan`] stores the value and selects the bindings whose
//!    trigger inputs changed since they last ran, issuing each a ticket.
//! 2. [`Invocation::run`] executes the handler, on any thread.
//! 3. [`Scheduler::complete`] publishes the result if its ticket is still
//!    the newest for each output (last-request-wins).
//!
//! [`Scheduler::dispatch`] runs all three inline.

mod gate;
mod input;

pub use gate::RequestGate;
pub use input::{InputState, InputValue};

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::data::DataError;
use crate::quiz::QuizError;

/// Handler failure; fails only the outputs of the binding that raised it.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error("input '{0}' is not set")]
    MissingInput(String),

    #[error("input '{name}' has invalid value '{value}'")]
    InvalidInput { name: String, value: String },

    #[error("handler panicked: {0}")]
    Panicked(String),
}

/// Registration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("output '{output}' of binding '{binding}' is already owned by '{owner}'")]
    DuplicateOutput {
        output: String,
        binding: String,
        owner: String,
    },

    #[error("binding '{0}' declares no trigger inputs")]
    NoTriggers(String),

    #[error("binding '{0}' declares no outputs")]
    NoOutputs(String),
}

/// Handler result.
#[derive(Debug, Clone, PartialEq)]
pub enum Update<O> {
    /// Publish nothing.
    NoChange,
    /// One value per declared output, in declaration order.
    Set(Vec<O>),
    /// One slot per declared output; `None` leaves that output untouched.
    Partial(Vec<Option<O>>),
}

/// State of one published output region.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputState<O> {
    Ready(O),
    Failed(String),
}

/// `(outputName, value)` delivered to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication<O> {
    pub output: String,
    pub state: OutputState<O>,
}

pub type Handler<O> =
    Arc<dyn Fn(&HandlerContext) -> Result<Update<O>, HandlerError> + Send + Sync>;

/// What a handler sees: current values of its declared inputs.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    values: BTreeMap<String, InputValue>,
    triggered: Option<String>,
    cancel: Arc<AtomicBool>,
}

impl HandlerContext {
    pub fn new(values: BTreeMap<String, InputValue>, triggered: Option<String>) -> Self {
        Self {
            values,
            triggered,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn value(&self, name: &str) -> &InputValue {
        self.values.get(name).unwrap_or(&input::UNSET)
    }

    /// Text value of a declared input, or `MissingInput`.
    pub fn text(&self, name: &str) -> Result<&str, HandlerError> {
        self.value(name)
            .as_text()
            .ok_or_else(|| HandlerError::MissingInput(name.to_string()))
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.value(name).as_int()
    }

    /// Input whose change fired this run; `None` on initial or refresh passes.
    pub fn triggered(&self) -> Option<&str> {
        self.triggered.as_deref()
    }

    /// Best-effort cancellation: set when the request was superseded or its
    /// view was left. Long-running handlers may poll it.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// An (inputs, handler, outputs) triple.
pub struct Binding<O> {
    name: String,
    triggers: Vec<String>,
    reads: Vec<String>,
    outputs: Vec<String>,
    handler: Handler<O>,
}

impl<O> Binding<O> {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&HandlerContext) -> Result<Update<O>, HandlerError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            triggers: Vec::new(),
            reads: Vec::new(),
            outputs: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Inputs whose changes fire this binding.
    pub fn on<I, S>(mut self, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.triggers.extend(triggers.into_iter().map(Into::into));
        self
    }

    /// Inputs passed to the handler without firing it.
    pub fn reading<I, S>(mut self, reads: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reads.extend(reads.into_iter().map(Into::into));
        self
    }

    pub fn producing<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.outputs.extend(outputs.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn triggers(&self) -> &[String] {
        &self.triggers
    }
}

struct Registered<O> {
    binding: Binding<O>,
    /// Trigger values at the last invocation.
    last_seen: Option<Vec<InputValue>>,
    cancel: Arc<AtomicBool>,
}

/// A planned handler call, detached from the scheduler so it can run on a
/// worker thread.
pub struct Invocation<O> {
    binding: usize,
    name: String,
    ticket: u64,
    handler: Handler<O>,
    context: HandlerContext,
}

impl<O> Invocation<O> {
    pub fn binding_name(&self) -> &str {
        &self.name
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn context(&self) -> &HandlerContext {
        &self.context
    }

    /// Execute the handler. Panics are caught and reported as failures.
    pub fn run(self) -> Completion<O> {
        let Invocation {
            binding,
            name,
            ticket,
            handler,
            context,
        } = self;
        let result = panic::catch_unwind(AssertUnwindSafe(|| handler(&context)))
            .unwrap_or_else(|payload| Err(HandlerError::Panicked(panic_message(payload))));
        Completion {
            binding,
            name,
            ticket,
            result,
        }
    }
}

/// Handler result waiting to be published.
pub struct Completion<O> {
    binding: usize,
    name: String,
    ticket: u64,
    result: Result<Update<O>, HandlerError>,
}

impl<O> Completion<O> {
    pub fn binding_name(&self) -> &str {
        &self.name
    }

    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// The scheduler: input state, bindings, output ownership and the gate.
pub struct Scheduler<O> {
    inputs: InputState,
    bindings: Vec<Registered<O>>,
    owners: HashMap<String, usize>,
    gate: RequestGate,
}

impl<O> Default for Scheduler<O> {
    fn default() -> Self {
        Self {
            inputs: InputState::new(),
            bindings: Vec::new(),
            owners: HashMap::new(),
            gate: RequestGate::new(),
        }
    }
}

impl<O> Scheduler<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> &InputState {
        &self.inputs
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Name of the binding owning `output`.
    pub fn owner_of(&self, output: &str) -> Option<&str> {
        self.owners
            .get(output)
            .map(|&i| self.bindings[i].binding.name())
    }

    /// Outputs declared by the named binding.
    pub fn outputs_of(&self, binding: &str) -> &[String] {
        self.bindings
            .iter()
            .find(|r| r.binding.name == binding)
            .map(|r| r.binding.outputs())
            .unwrap_or(&[])
    }

    pub fn register(&mut self, binding: Binding<O>) -> Result<(), SchedulerError> {
        if binding.triggers.is_empty() {
            return Err(SchedulerError::NoTriggers(binding.name));
        }
        if binding.outputs.is_empty() {
            return Err(SchedulerError::NoOutputs(binding.name));
        }
        for output in &binding.outputs {
            if let Some(&owner) = self.owners.get(output) {
                return Err(SchedulerError::DuplicateOutput {
                    output: output.clone(),
                    binding: binding.name.clone(),
                    owner: self.bindings[owner].binding.name.clone(),
                });
            }
        }
        let index = self.bindings.len();
        for output in &binding.outputs {
            self.owners.insert(output.clone(), index);
        }
        self.bindings.push(Registered {
            binding,
            last_seen: None,
            cancel: Arc::new(AtomicBool::new(false)),
        });
        Ok(())
    }

    /// Store an input value without firing anything.
    pub fn seed(&mut self, name: &str, value: InputValue) {
        self.inputs.set(name, value);
    }

    /// Record an input change and plan the bindings it fires.
    ///
    /// An unchanged value plans nothing. A binding is skipped when the
    /// values of its trigger inputs equal those of its last invocation.
    pub fn plan(&mut self, name: &str, value: InputValue) -> Vec<Invocation<O>> {
        if !self.inputs.set(name, value) {
            debug!(input = name, "input unchanged; skipping");
            return Vec::new();
        }
        let fired: Vec<usize> = self
            .bindings
            .iter()
            .enumerate()
            .filter(|(_, r)| r.binding.triggers.iter().any(|t| t == name))
            .map(|(i, _)| i)
            .collect();

        let mut planned = Vec::with_capacity(fired.len());
        for index in fired {
            let snapshot = self.inputs.snapshot(&self.bindings[index].binding.triggers);
            if self.bindings[index].last_seen.as_ref() == Some(&snapshot) {
                debug!(
                    binding = %self.bindings[index].binding.name,
                    "triggers unchanged; skipping"
                );
                continue;
            }
            planned.push(self.issue(index, snapshot, Some(name.to_string())));
        }
        planned
    }

    /// Plan every binding with no triggering input (initial evaluation).
    pub fn plan_all(&mut self) -> Vec<Invocation<O>> {
        (0..self.bindings.len())
            .map(|index| {
                let snapshot = self.inputs.snapshot(&self.bindings[index].binding.triggers);
                self.issue(index, snapshot, None)
            })
            .collect()
    }

    /// Re-plan the bindings owning `outputs`, regardless of input changes.
    pub fn refresh_outputs<S: AsRef<str>>(&mut self, outputs: &[S]) -> Vec<Invocation<O>> {
        let mut indices: Vec<usize> = outputs
            .iter()
            .filter_map(|o| self.owners.get(o.as_ref()).copied())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
            .into_iter()
            .map(|index| {
                let snapshot = self.inputs.snapshot(&self.bindings[index].binding.triggers);
                self.issue(index, snapshot, None)
            })
            .collect()
    }

    /// Drop in-flight work for the bindings owning `outputs`.
    ///
    /// Their pending completions will be discarded, their cancel flags are
    /// raised, and their next trigger event runs even if values match.
    pub fn cancel_outputs<S: AsRef<str>>(&mut self, outputs: &[S]) {
        let mut indices: Vec<usize> = outputs
            .iter()
            .filter_map(|o| self.owners.get(o.as_ref()).copied())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        for index in indices {
            let reg = &mut self.bindings[index];
            reg.cancel.store(true, Ordering::Relaxed);
            reg.last_seen = None;
            self.gate.invalidate(&reg.binding.outputs);
            debug!(binding = %reg.binding.name, "cancelled pending outputs");
        }
    }

    /// Publish a completion, discarding outputs whose ticket is stale.
    pub fn complete(&mut self, completion: Completion<O>) -> Vec<Publication<O>> {
        let Completion {
            binding,
            name,
            ticket,
            result,
        } = completion;
        let Some(reg) = self.bindings.get(binding) else {
            return Vec::new();
        };
        let outputs = &reg.binding.outputs;
        let live: Vec<bool> = outputs
            .iter()
            .map(|o| self.gate.is_current(o, ticket))
            .collect();
        if !live.iter().any(|&l| l) {
            debug!(binding = %name, ticket, "stale completion discarded");
            return Vec::new();
        }

        let values = match result {
            Ok(Update::NoChange) => return Vec::new(),
            Ok(Update::Set(values)) => values.into_iter().map(Some).collect(),
            Ok(Update::Partial(values)) => values,
            Err(err) => {
                warn!(binding = %name, error = %err, "handler failed");
                return failed(outputs, &live, &err.to_string());
            }
        };
        if values.len() != outputs.len() {
            let message = format!(
                "binding '{name}' produced {} values for {} outputs",
                values.len(),
                outputs.len()
            );
            warn!("{message}");
            return failed(outputs, &live, &message);
        }

        outputs
            .iter()
            .zip(values)
            .zip(&live)
            .filter(|(_, l)| **l)
            .filter_map(|((output, value), _)| {
                value.map(|v| Publication {
                    output: output.clone(),
                    state: OutputState::Ready(v),
                })
            })
            .collect()
    }

    /// Plan, run and publish inline.
    pub fn dispatch(&mut self, name: &str, value: InputValue) -> Vec<Publication<O>> {
        let planned = self.plan(name, value);
        self.run_inline(planned)
    }

    /// Evaluate every binding once inline.
    pub fn initialize(&mut self) -> Vec<Publication<O>> {
        let planned = self.plan_all();
        self.run_inline(planned)
    }

    fn run_inline(&mut self, planned: Vec<Invocation<O>>) -> Vec<Publication<O>> {
        planned
            .into_iter()
            .map(Invocation::run)
            .flat_map(|c| self.complete(c))
            .collect::<Vec<_>>()
    }

    fn issue(
        &mut self,
        index: usize,
        snapshot: Vec<InputValue>,
        triggered: Option<String>,
    ) -> Invocation<O> {
        let ticket = self.gate.issue(&self.bindings[index].binding.outputs);
        let reg = &mut self.bindings[index];
        reg.last_seen = Some(snapshot);

        // Supersede the previous run of this binding.
        reg.cancel.store(true, Ordering::Relaxed);
        let cancel = Arc::new(AtomicBool::new(false));
        reg.cancel = Arc::clone(&cancel);

        let values = reg
            .binding
            .triggers
            .iter()
            .chain(&reg.binding.reads)
            .map(|n| (n.clone(), self.inputs.get(n).clone()))
            .collect();
        Invocation {
            binding: index,
            name: reg.binding.name.clone(),
            ticket,
            handler: Arc::clone(&reg.binding.handler),
            context: HandlerContext {
                values,
                triggered,
                cancel,
            },
        }
    }
}

fn failed<O>(outputs: &[String], live: &[bool], message: &str) -> Vec<Publication<O>> {
    outputs
        .iter()
        .zip(live)
        .filter(|(_, l)| **l)
        .map(|(output, _)| Publication {
            output: output.clone(),
            state: OutputState::Failed(message.to_string()),
        })
        .collect()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
