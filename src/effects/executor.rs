//! The guarded, audited transition protocol.

use crate::audit::{
    self, AuditEntryView, AuditError, AuditLogEntry, AuditStore, AuditTransition,
    InMemoryAuditStore,
};
use crate::core::guard::{self, GuardOutcome};
use crate::core::{Actor, ExtraArgs, GroupMembership, StateMachine, StateTransition};
use crate::effects::error::TransitionError;
use crate::effects::handle::StateMachineHandle;
use crate::effects::listener::{TransitionEvent, TransitionListener};
use crate::effects::record::StatefulRecord;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Snapshot of a record's current state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateInfo {
    pub name: String,
    pub description: String,
    pub is_initial: bool,
    pub groups: GroupMembership,
}

/// Runs transitions of one machine against records.
///
/// The executor owns no per-record state: one executor serves every record
/// of its machine. Callers must not run two transitions on the same record
/// concurrently; wrap each call in the persistence layer's transaction.
///
/// # Example
///
/// ```rust
/// use stately::builder::{MachineBuilder, StateBuilder, TransitionBuilder};
/// use stately::core::{CallbackError, ExtraArgs};
/// use stately::effects::{StatefulRecord, TransitionExecutor};
///
/// struct Door {
///     state: String,
/// }
///
/// impl StatefulRecord for Door {
///     fn record_id(&self) -> String {
///         "front-door".to_string()
///     }
///     fn current_state(&self) -> &str {
///         &self.state
///     }
///     fn set_current_state(&mut self, state: String) {
///         self.state = state;
///     }
///     fn save(&mut self) -> Result<(), CallbackError> {
///         Ok(())
///     }
/// }
///
/// let machine = MachineBuilder::<Door>::new("door")
///     .state(StateBuilder::new("closed").description("Closed").initial())
///     .state(StateBuilder::new("open").description("Open"))
///     .transition(
///         TransitionBuilder::new("open_door")
///             .from("closed")
///             .to("open")
///             .description("Open the door"),
///     )
///     .build()
///     .unwrap();
///
/// let executor = TransitionExecutor::new(machine);
/// let mut door = Door { state: String::new() };
/// executor.initialize(&mut door).unwrap();
///
/// executor
///     .make_transition(&mut door, "open_door", None, ExtraArgs::new())
///     .unwrap();
/// assert_eq!(door.state, "open");
/// assert_eq!(executor.list_transitions(&door).unwrap().len(), 1);
/// ```
pub struct TransitionExecutor<R> {
    machine: Arc<StateMachine<R>>,
    audit: Option<Arc<dyn AuditStore>>,
    listeners: Vec<Arc<dyn TransitionListener>>,
}

impl<R: StatefulRecord> TransitionExecutor<R> {
    /// Create an executor. Logging machines start with an in-memory audit store.
    pub fn new(machine: StateMachine<R>) -> Self {
        Self::from_shared(Arc::new(machine))
    }

    /// Create an executor for a machine shared with other executors.
    ///
    /// The default audit store belongs to this executor alone, so executors
    /// built this way keep separate histories. Pass one store to each with
    /// [`with_audit_store`](Self::with_audit_store) to share a history.
    pub fn from_shared(machine: Arc<StateMachine<R>>) -> Self {
        let audit = if machine.logs_transitions() {
            Some(Arc::new(InMemoryAuditStore::new()) as Arc<dyn AuditStore>)
        } else {
            None
        };

        Self {
            machine,
            audit,
            listeners: Vec::new(),
        }
    }

    /// Use `store` for audit entries instead of the in-memory default.
    pub fn with_audit_store(mut self, store: Arc<dyn AuditStore>) -> Self {
        self.audit = Some(store);
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn TransitionListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn machine(&self) -> &StateMachine<R> {
        &self.machine
    }

    /// The audit store, when the machine logs transitions.
    pub fn audit_store(&self) -> Option<&dyn AuditStore> {
        if self.machine.logs_transitions() {
            self.audit.as_deref()
        } else {
            None
        }
    }

    /// Borrow `record` together with this executor.
    pub fn handle<'a>(&'a self, record: &'a mut R) -> StateMachineHandle<'a, R> {
        StateMachineHandle::new(self, record)
    }

    /// Put a new record in the initial state, save it, then run the initial
    /// state's handler.
    pub fn initialize(&self, record: &mut R) -> Result<(), TransitionError> {
        let initial = self.machine.initial_state();
        record.set_current_state(initial.name().to_string());
        record.save().map_err(TransitionError::Persistence)?;
        debug!(
            machine = %self.machine.name(),
            record = %record.record_id(),
            state = %initial.name(),
            "record initialized"
        );
        initial.run_handler(record).map_err(TransitionError::Handler)
    }

    /// Fail unless the record's state is declared by the machine.
    pub fn validate_state(&self, record: &R) -> Result<(), TransitionError> {
        self.machine.get_state(record.current_state())?;
        Ok(())
    }

    pub fn state_info(&self, record: &R) -> Result<StateInfo, TransitionError> {
        let state = self.machine.get_state(record.current_state())?;
        Ok(StateInfo {
            name: state.name().to_string(),
            description: state.description().to_string(),
            is_initial: state.is_initial(),
            groups: self.machine.group_membership(state.name()),
        })
    }

    /// Description of the record's current state.
    pub fn state_display(&self, record: &R) -> Result<&str, TransitionError> {
        Ok(self.machine.get_state(record.current_state())?.description())
    }

    /// Transitions that can start from the record's current state.
    ///
    /// Only the source state is considered; permission and validation are not.
    pub fn possible_transitions(&self, record: &R) -> Vec<&StateTransition<R>> {
        self.machine.transitions_from(record.current_state())
    }

    pub fn state_choices(&self) -> Vec<(String, String)> {
        self.machine.state_choices()
    }

    /// Evaluate the guard of `transition` without changing anything.
    pub fn evaluate_guard(
        &self,
        record: &R,
        transition: &str,
        actor: Option<&dyn Actor>,
    ) -> Result<GuardOutcome, TransitionError> {
        let transition = self.machine.get_transition(transition)?;
        Ok(guard::evaluate(
            transition,
            record.current_state(),
            record,
            actor,
        ))
    }

    /// Dry run of a transition: the error it would fail with, if any.
    ///
    /// Never writes to the audit log.
    pub fn check_transition(
        &self,
        record: &R,
        transition: &str,
        actor: Option<&dyn Actor>,
    ) -> Result<(), TransitionError> {
        let transition = self.machine.get_transition(transition)?;
        self.check_guard(transition, record, actor)
    }

    /// Whether the transition would currently be allowed.
    pub fn test_transition(&self, record: &R, transition: &str, actor: Option<&dyn Actor>) -> bool {
        self.check_transition(record, transition, actor).is_ok()
    }

    /// Execute a transition.
    ///
    /// The guard runs first (source state, then permission when an actor is
    /// given, then validation). Once it passes, the transition handler sees
    /// the record in its old state, the new state is set and saved, and the
    /// destination state's handler runs last. With logging on, every attempt
    /// leaves exactly one audit entry, either completed or failed, as long
    /// as the audit store accepts the updates.
    ///
    /// A failed save restores the old state in memory. A failure of the
    /// destination state's handler is reported after the state was saved.
    /// If the audit store rejects the final update of a committed
    /// transition, the error is logged and the call still succeeds; that
    /// entry then stays `started` in the store.
    pub fn make_transition(
        &self,
        record: &mut R,
        transition: &str,
        actor: Option<&dyn Actor>,
        args: ExtraArgs,
    ) -> Result<(), TransitionError> {
        let machine = &*self.machine;
        let transition = machine.get_transition(transition)?;
        let event = TransitionEvent {
            machine: machine.name().to_string(),
            record_id: record.record_id(),
            transition: transition.name().to_string(),
            from_state: record.current_state().to_string(),
            to_state: transition.to_state().to_string(),
            actor: actor.map(|a| a.id()),
        };

        let mut entry = self.open_entry(&event, &args)?;

        if let Err(err) = self.check_guard(transition, record, actor) {
            warn!(
                machine = %event.machine,
                record = %event.record_id,
                transition = %event.transition,
                state = %event.from_state,
                error = %err,
                "transition refused"
            );
            self.fail_entry(entry.as_mut(), &err);
            return Err(err);
        }

        if let Err(err) = self.advance_entry(entry.as_mut(), AuditTransition::Start) {
            let err = TransitionError::from(err);
            self.fail_entry(entry.as_mut(), &err);
            return Err(err);
        }
        for listener in &self.listeners {
            listener.before_transition(&event);
        }

        if let Err(err) = self.commit(transition, record, actor, &args) {
            error!(
                machine = %event.machine,
                record = %event.record_id,
                transition = %event.transition,
                error = %err,
                "transition failed"
            );
            self.fail_entry(entry.as_mut(), &err);
            return Err(err);
        }

        for listener in &self.listeners {
            listener.after_transition(&event);
        }
        // The record is already saved; a lost completion only gets logged.
        if let Err(err) = self.advance_entry(entry.as_mut(), AuditTransition::Complete) {
            error!(
                machine = %event.machine,
                record = %event.record_id,
                transition = %event.transition,
                error = %err,
                "could not mark audit entry completed"
            );
        }
        info!(
            machine = %event.machine,
            record = %event.record_id,
            transition = %event.transition,
            from = %event.from_state,
            to = %event.to_state,
            "transition completed"
        );

        machine
            .get_state(transition.to_state())?
            .run_handler(record)
            .map_err(TransitionError::Handler)
    }

    /// Every audit entry of `record`, oldest first.
    pub fn list_transitions(&self, record: &R) -> Result<Vec<AuditEntryView<'_, R>>, AuditError> {
        match self.audit_store() {
            Some(store) => audit::list_transitions(self.machine(), store, &record.record_id()),
            None => Err(AuditError::LoggingDisabled {
                machine: self.machine.name().to_string(),
            }),
        }
    }

    /// Completed entries of public transitions; empty when nothing is logged.
    pub fn public_transitions(&self, record: &R) -> Result<Vec<AuditEntryView<'_, R>>, AuditError> {
        match self.audit_store() {
            Some(store) => {
                audit::list_public_completed_transitions(self.machine(), store, &record.record_id())
            }
            None => Ok(Vec::new()),
        }
    }

    fn check_guard(
        &self,
        transition: &StateTransition<R>,
        record: &R,
        actor: Option<&dyn Actor>,
    ) -> Result<(), TransitionError> {
        let outcome = guard::evaluate(transition, record.current_state(), record, actor);
        debug!(
            machine = %self.machine.name(),
            transition = %transition.name(),
            allowed = outcome.is_allowed(),
            "guard evaluated"
        );

        match outcome {
            GuardOutcome::Allowed => Ok(()),
            GuardOutcome::CannotStart { state } => Err(TransitionError::CannotStart {
                machine: self.machine.name().to_string(),
                transition: transition.name().to_string(),
                state,
            }),
            GuardOutcome::PermissionDenied { actor } => Err(TransitionError::PermissionDenied {
                transition: transition.name().to_string(),
                actor,
            }),
            GuardOutcome::ValidationFailed(errors) => Err(TransitionError::NotValidated {
                transition: transition.name().to_string(),
                errors,
            }),
        }
    }

    fn commit(
        &self,
        transition: &StateTransition<R>,
        record: &mut R,
        actor: Option<&dyn Actor>,
        args: &ExtraArgs,
    ) -> Result<(), TransitionError> {
        if let Some(argument) = args.names().find(|name| !transition.accepts_argument(name)) {
            return Err(TransitionError::UnexpectedArgument {
                transition: transition.name().to_string(),
                argument: argument.to_string(),
            });
        }

        transition
            .run_handler(record, actor, args)
            .map_err(TransitionError::Handler)?;

        let previous = record.current_state().to_string();
        record.set_current_state(transition.to_state().to_string());
        if let Err(err) = record.save() {
            record.set_current_state(previous);
            return Err(TransitionError::Persistence(err));
        }
        Ok(())
    }

    fn open_entry(
        &self,
        event: &TransitionEvent,
        args: &ExtraArgs,
    ) -> Result<Option<AuditLogEntry>, AuditError> {
        let Some(store) = self.audit_store() else {
            return Ok(None);
        };

        let entry = AuditLogEntry::initiate(
            event.record_id.clone(),
            event.from_state.clone(),
            event.to_state.clone(),
            event.actor.clone(),
            args.to_audit_json(),
        );
        store.append(&entry)?;
        Ok(Some(entry))
    }

    fn advance_entry(
        &self,
        entry: Option<&mut AuditLogEntry>,
        transition: AuditTransition,
    ) -> Result<(), AuditError> {
        match (entry, self.audit_store()) {
            (Some(entry), Some(store)) => {
                entry.advance(transition)?;
                store.update(entry)
            }
            _ => Ok(()),
        }
    }

    /// Mark the entry failed. Audit failures here are logged, not raised,
    /// so the caller sees the error that stopped the transition.
    fn fail_entry(&self, entry: Option<&mut AuditLogEntry>, reason: &TransitionError) {
        let (Some(entry), Some(store)) = (entry, self.audit_store()) else {
            return;
        };

        let result = entry
            .fail(reason.to_string())
            .and_then(|()| store.update(entry));
        if let Err(err) = result {
            error!(entry = %entry.id, error = %err, "could not mark audit entry failed");
        }
    }
}

impl<R> std::fmt::Debug for TransitionExecutor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionExecutor")
            .field("machine", &self.machine.name())
            .field("audited", &self.audit.is_some())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditState;
    use crate::builder::{MachineBuilder, StateBuilder, TransitionBuilder};
    use crate::core::CallbackError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Job {
        state: String,
        trail: Vec<String>,
        fail_save: bool,
        saves: usize,
    }

    impl StatefulRecord for Job {
        fn record_id(&self) -> String {
            "job-1".to_string()
        }

        fn current_state(&self) -> &str {
            &self.state
        }

        fn set_current_state(&mut self, state: String) {
            self.state = state;
        }

        fn save(&mut self) -> Result<(), CallbackError> {
            if self.fail_save {
                return Err("database unavailable".into());
            }
            self.saves += 1;
            Ok(())
        }
    }

    struct Operator;

    impl Actor for Operator {
        fn id(&self) -> String {
            "operator".to_string()
        }

        fn is_privileged(&self) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl TransitionListener for Recorder {
        fn before_transition(&self, event: &TransitionEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(format!("before {}->{}", event.from_state, event.to_state));
            }
        }

        fn after_transition(&self, event: &TransitionEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(format!("after {}->{}", event.from_state, event.to_state));
            }
        }
    }

    /// In-memory store that rejects the `update` calls picked by `rejects`.
    struct FlakyStore {
        inner: InMemoryAuditStore,
        updates: AtomicUsize,
        rejects: fn(usize) -> bool,
    }

    impl FlakyStore {
        fn new(rejects: fn(usize) -> bool) -> Arc<Self> {
            Arc::new(Self {
                inner: InMemoryAuditStore::new(),
                updates: AtomicUsize::new(0),
                rejects,
            })
        }
    }

    impl AuditStore for FlakyStore {
        fn append(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
            self.inner.append(entry)
        }

        fn update(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
            let call = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
            if (self.rejects)(call) {
                return Err(AuditError::Store("transient".to_string()));
            }
            self.inner.update(entry)
        }

        fn entries_for(&self, record_id: &str) -> Result<Vec<AuditLogEntry>, AuditError> {
            self.inner.entries_for(record_id)
        }
    }

    fn machine() -> StateMachine<Job> {
        MachineBuilder::new("job")
            .state(StateBuilder::new("queued").description("Queued").initial())
            .state(
                StateBuilder::new("running")
                    .description("Running")
                    .on_enter(|job: &mut Job| {
                        job.trail.push(format!("entered {}", job.state));
                        Ok(())
                    }),
            )
            .state(StateBuilder::new("broken").description("Broken"))
            .transition(
                TransitionBuilder::new("run")
                    .from("queued")
                    .to("running")
                    .description("Run")
                    .handler(|job: &mut Job, _: Option<&dyn Actor>, args: &ExtraArgs| {
                        job.trail.push(format!("handler saw {}", job.state));
                        if args.value("explode").is_some() {
                            return Err("handler exploded".into());
                        }
                        Ok(())
                    })
                    .handler_args(["explode", "priority"]),
            )
            .transition(
                TransitionBuilder::new("break")
                    .from_any(["queued", "running"])
                    .to("broken")
                    .description("Break"),
            )
            .build()
            .unwrap()
    }

    fn queued() -> Job {
        Job {
            state: "queued".to_string(),
            ..Job::default()
        }
    }

    #[test]
    fn handlers_run_around_the_state_change() {
        let executor = TransitionExecutor::new(machine());
        let mut job = queued();

        executor
            .make_transition(&mut job, "run", None, ExtraArgs::new())
            .unwrap();

        assert_eq!(job.state, "running");
        assert_eq!(job.trail, ["handler saw queued", "entered running"]);
        assert_eq!(job.saves, 1);
    }

    #[test]
    fn listeners_are_notified_in_order() {
        let recorder = Arc::new(Recorder::default());
        let executor = TransitionExecutor::new(machine()).with_listener(recorder.clone());
        let mut job = queued();

        executor
            .make_transition(&mut job, "run", None, ExtraArgs::new())
            .unwrap();

        let events = recorder.events.lock().unwrap();
        assert_eq!(*events, ["before queued->running", "after queued->running"]);
    }

    #[test]
    fn refused_transitions_do_not_notify() {
        let recorder = Arc::new(Recorder::default());
        let executor = TransitionExecutor::new(machine()).with_listener(recorder.clone());
        let mut job = queued();
        job.state = "broken".to_string();

        let result = executor.make_transition(&mut job, "run", None, ExtraArgs::new());

        assert!(matches!(result, Err(TransitionError::CannotStart { .. })));
        assert!(recorder.events.lock().unwrap().is_empty());
    }

    #[test]
    fn handler_failure_marks_entry_failed() {
        let executor = TransitionExecutor::new(machine());
        let mut job = queued();
        let args = ExtraArgs::new().with_value("explode", true);

        let err = executor
            .make_transition(&mut job, "run", Some(&Operator), args)
            .unwrap_err();

        assert!(matches!(err, TransitionError::Handler(_)));
        assert_eq!(err.to_string(), "handler exploded");
        assert_eq!(job.state, "queued");

        let entries = executor.list_transitions(&job).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].state, AuditState::Failed);
        assert_eq!(entries[0].failure_reason.as_deref(), Some("handler exploded"));
        assert_eq!(entries[0].actor.as_deref(), Some("operator"));
    }

    #[test]
    fn save_failure_restores_state() {
        let executor = TransitionExecutor::new(machine());
        let mut job = queued();
        job.fail_save = true;

        let err = executor
            .make_transition(&mut job, "break", None, ExtraArgs::new())
            .unwrap_err();

        assert!(matches!(err, TransitionError::Persistence(_)));
        assert_eq!(job.state, "queued");
        assert!(executor.list_transitions(&job).unwrap()[0].failed());
    }

    #[test]
    fn undeclared_arguments_fail_the_commit() {
        let executor = TransitionExecutor::new(machine());
        let mut job = queued();
        let args = ExtraArgs::new().with_value("colour", "red");

        let err = executor
            .make_transition(&mut job, "run", None, args)
            .unwrap_err();

        match err {
            TransitionError::UnexpectedArgument { argument, .. } => assert_eq!(argument, "colour"),
            other => panic!("Expected unexpected argument error, got {other:?}"),
        }
        assert_eq!(job.state, "queued");
        assert!(job.trail.is_empty());
    }

    #[test]
    fn extra_args_are_stored_with_the_entry() {
        let executor = TransitionExecutor::new(machine());
        let mut job = queued();
        let args = ExtraArgs::new().with_value("priority", 3);

        executor.make_transition(&mut job, "run", None, args).unwrap();

        let entries = executor.list_transitions(&job).unwrap();
        assert!(entries[0].completed());
        assert_eq!(
            entries[0].extra_args().get("priority"),
            Some(&serde_json::Value::from(3))
        );
    }

    #[test]
    fn opaque_args_store_no_payload() {
        let executor = TransitionExecutor::new(machine());
        let mut job = queued();
        let args = ExtraArgs::new().with_opaque("priority", Mutex::new(1u8));

        executor.make_transition(&mut job, "run", None, args).unwrap();

        let entries = executor.list_transitions(&job).unwrap();
        assert!(entries[0].serialized_extra_args.is_none());
        assert!(entries[0].extra_args().is_empty());
    }

    #[test]
    fn unknown_transition_is_reported_before_logging() {
        let executor = TransitionExecutor::new(machine());
        let mut job = queued();

        let result = executor.make_transition(&mut job, "fly", None, ExtraArgs::new());

        assert!(matches!(
            result,
            Err(TransitionError::UnknownTransition { .. })
        ));
        assert!(executor.list_transitions(&job).unwrap().is_empty());
    }

    #[test]
    fn initialize_runs_initial_handler_after_save() {
        let machine = MachineBuilder::<Job>::new("job")
            .state(
                StateBuilder::new("queued")
                    .description("Queued")
                    .initial()
                    .on_enter(|job: &mut Job| {
                        job.trail.push(format!("saved {} times", job.saves));
                        Ok(())
                    }),
            )
            .build()
            .unwrap();
        let executor = TransitionExecutor::new(machine);
        let mut job = Job::default();

        executor.initialize(&mut job).unwrap();

        assert_eq!(job.state, "queued");
        assert_eq!(job.trail, ["saved 1 times"]);
    }

    #[test]
    fn state_queries_follow_the_record() {
        let executor = TransitionExecutor::new(machine());
        let mut job = queued();

        let info = executor.state_info(&job).unwrap();
        assert!(info.is_initial);
        assert_eq!(executor.state_display(&job).unwrap(), "Queued");
        let possible: Vec<_> = executor
            .possible_transitions(&job)
            .iter()
            .map(|t| t.name())
            .collect();
        assert_eq!(possible, ["run", "break"]);

        job.state = "vanished".to_string();
        assert!(matches!(
            executor.validate_state(&job),
            Err(TransitionError::UnknownState { .. })
        ));
    }

    #[test]
    fn dry_runs_leave_no_trace() {
        let executor = TransitionExecutor::new(machine());
        let job = queued();

        assert!(executor.test_transition(&job, "run", Some(&Operator)));
        assert!(!executor.test_transition(&job, "fly", None));
        assert_eq!(
            executor.evaluate_guard(&job, "run", None).unwrap(),
            GuardOutcome::Allowed
        );
        assert!(executor.list_transitions(&job).unwrap().is_empty());
    }

    #[test]
    fn destination_handler_failure_is_reported_after_commit() {
        let machine = MachineBuilder::<Job>::new("job")
            .state(StateBuilder::new("queued").description("Queued").initial())
            .state(
                StateBuilder::new("running")
                    .description("Running")
                    .on_enter(|_: &mut Job| Err("boom".into())),
            )
            .transition(
                TransitionBuilder::new("run")
                    .from("queued")
                    .to("running")
                    .description("Run"),
            )
            .build()
            .unwrap();
        let executor = TransitionExecutor::new(machine);
        let mut job = queued();

        let err = executor
            .make_transition(&mut job, "run", None, ExtraArgs::new())
            .unwrap_err();

        assert!(matches!(err, TransitionError::Handler(_)));
        assert_eq!(err.to_string(), "boom");
        assert_eq!(job.state, "running");
        assert_eq!(job.saves, 1);
        let entries = executor.list_transitions(&job).unwrap();
        assert_eq!(entries[0].state, AuditState::Completed);
    }

    #[test]
    fn lost_completion_update_still_commits() {
        let store = FlakyStore::new(|call| call == 2);
        let executor = TransitionExecutor::new(machine()).with_audit_store(store.clone());
        let mut job = queued();

        executor
            .make_transition(&mut job, "run", None, ExtraArgs::new())
            .unwrap();

        assert_eq!(job.state, "running");
        assert_eq!(job.saves, 1);
        assert_eq!(job.trail, ["handler saw queued", "entered running"]);
        let stored = store.inner.entries_for("job-1").unwrap();
        assert_eq!(stored[0].state, AuditState::Started);
    }

    #[test]
    fn rejected_start_update_fails_the_attempt() {
        let store = FlakyStore::new(|call| call == 1);
        let recorder = Arc::new(Recorder::default());
        let executor = TransitionExecutor::new(machine())
            .with_audit_store(store.clone())
            .with_listener(recorder.clone());
        let mut job = queued();

        let err = executor
            .make_transition(&mut job, "run", None, ExtraArgs::new())
            .unwrap_err();

        assert!(matches!(err, TransitionError::Audit(AuditError::Store(_))));
        assert_eq!(job.state, "queued");
        assert_eq!(job.saves, 0);
        assert!(job.trail.is_empty());
        assert!(recorder.events.lock().unwrap().is_empty());
        let stored = store.inner.entries_for("job-1").unwrap();
        assert_eq!(stored[0].state, AuditState::Failed);
    }

    #[test]
    fn audit_failure_while_failing_keeps_the_original_error() {
        let store = FlakyStore::new(|_| true);
        let executor = TransitionExecutor::new(machine()).with_audit_store(store.clone());
        let mut job = queued();
        job.state = "broken".to_string();

        let err = executor
            .make_transition(&mut job, "run", None, ExtraArgs::new())
            .unwrap_err();

        assert!(matches!(err, TransitionError::CannotStart { .. }));
        assert_eq!(job.state, "broken");
        let stored = store.inner.entries_for("job-1").unwrap();
        assert_eq!(stored[0].state, AuditState::Initiated);
    }

    #[test]
    fn executors_share_history_only_through_one_store() {
        let machine = Arc::new(machine());
        let store: Arc<dyn AuditStore> = Arc::new(InMemoryAuditStore::new());
        let first =
            TransitionExecutor::from_shared(machine.clone()).with_audit_store(store.clone());
        let second = TransitionExecutor::from_shared(machine.clone()).with_audit_store(store);
        let separate = TransitionExecutor::from_shared(machine);
        let mut job = queued();

        first
            .make_transition(&mut job, "run", None, ExtraArgs::new())
            .unwrap();

        assert_eq!(second.list_transitions(&job).unwrap().len(), 1);
        assert!(separate.list_transitions(&job).unwrap().is_empty());
    }
}
