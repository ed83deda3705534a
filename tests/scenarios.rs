//! End-to-end behaviour of machines, the executor and the audit log.

use std::sync::Arc;
use stately::audit::{build_audit_log_schema, AuditError, AuditState, InMemoryAuditStore};
use stately::builder::{GroupBuilder, MachineBuilder, StateBuilder, TransitionBuilder};
use stately::core::{Actor, CallbackError, ExtraArgs, GuardOutcome, StateMachine};
use stately::effects::{StatefulRecord, TransitionError, TransitionExecutor};
use stately::validation::ValidationError;

#[derive(Debug, Default)]
struct Order {
    id: u32,
    state: String,
    total: i64,
}

impl StatefulRecord for Order {
    fn record_id(&self) -> String {
        format!("order-{}", self.id)
    }

    fn current_state(&self) -> &str {
        &self.state
    }

    fn set_current_state(&mut self, state: String) {
        self.state = state;
    }

    fn save(&mut self) -> Result<(), CallbackError> {
        Ok(())
    }
}

struct Person {
    name: &'static str,
    staff: bool,
}

impl Actor for Person {
    fn id(&self) -> String {
        self.name.to_string()
    }

    fn is_privileged(&self) -> bool {
        self.staff
    }
}

const ADMIN: Person = Person {
    name: "admin",
    staff: true,
};

const CUSTOMER: Person = Person {
    name: "customer",
    staff: false,
};

fn steps(log_transitions: bool) -> StateMachine<Order> {
    MachineBuilder::new("steps")
        .log_transitions(log_transitions)
        .state(StateBuilder::new("start").description("Starting state.").initial())
        .state(StateBuilder::new("step1").description("Normal State"))
        .state(StateBuilder::new("failstep").description("Failed state"))
        .state(StateBuilder::new("done").description("Final state"))
        .transition(
            TransitionBuilder::new("start_step1")
                .from("start")
                .to("step1")
                .description("Transition from start to normal"),
        )
        .transition(
            TransitionBuilder::new("step1_failstep")
                .from("step1")
                .to("failstep")
                .description("Transition from normal to failed"),
        )
        .transition(
            TransitionBuilder::new("step1_done")
                .from("step1")
                .to("done")
                .description("Transition from normal to done")
                .public()
                .require_pred(|o: &Order| o.total >= 0, "total cannot be negative"),
        )
        .transition(
            TransitionBuilder::new("failstep_step1")
                .from("failstep")
                .to("step1")
                .description("Transition from failed to normal"),
        )
        .group(GroupBuilder::new("ongoing").states(["start", "step1", "failstep"]))
        .group(GroupBuilder::new("healthy").exclude_states(["failstep"]))
        .build()
        .unwrap()
}

fn new_order(executor: &TransitionExecutor<Order>) -> Order {
    let mut order = Order {
        id: 1,
        ..Order::default()
    };
    executor.initialize(&mut order).unwrap();
    order
}

#[test]
fn records_start_in_initial_state_and_move_forward() {
    let executor = TransitionExecutor::new(steps(true));
    let mut order = new_order(&executor);

    assert_eq!(order.state, "start");
    let possible: Vec<_> = executor
        .possible_transitions(&order)
        .iter()
        .map(|t| t.name())
        .collect();
    assert_eq!(possible, ["start_step1"]);

    executor
        .make_transition(&mut order, "start_step1", Some(&ADMIN), ExtraArgs::new())
        .unwrap();

    assert_eq!(order.state, "step1");
    let entries = executor.list_transitions(&order).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].from_state, "start");
    assert_eq!(entries[0].to_state, "step1");
    assert_eq!(entries[0].state, AuditState::Completed);
    assert_eq!(entries[0].actor.as_deref(), Some("admin"));
}

#[test]
fn history_requires_logging() {
    let executor = TransitionExecutor::new(steps(false));
    let mut order = new_order(&executor);

    executor
        .make_transition(&mut order, "start_step1", Some(&ADMIN), ExtraArgs::new())
        .unwrap();

    assert!(matches!(
        executor.list_transitions(&order),
        Err(AuditError::LoggingDisabled { .. })
    ));
    assert!(executor.public_transitions(&order).unwrap().is_empty());
}

#[test]
fn unprivileged_actor_is_denied() {
    let executor = TransitionExecutor::new(steps(true));
    let mut order = new_order(&executor);

    let err = executor
        .make_transition(&mut order, "start_step1", Some(&CUSTOMER), ExtraArgs::new())
        .unwrap_err();

    match err {
        TransitionError::PermissionDenied { transition, actor } => {
            assert_eq!(transition, "start_step1");
            assert_eq!(actor, "customer");
        }
        other => panic!("Expected permission denied, got {other:?}"),
    }
    assert_eq!(order.state, "start");

    let entries = executor.list_transitions(&order).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].state, AuditState::Failed);
}

#[test]
fn validation_failure_carries_every_error() {
    let executor = TransitionExecutor::new(steps(true));
    let mut order = new_order(&executor);
    executor
        .make_transition(&mut order, "start_step1", None, ExtraArgs::new())
        .unwrap();
    order.total = -10;

    let err = executor
        .make_transition(&mut order, "step1_done", Some(&ADMIN), ExtraArgs::new())
        .unwrap_err();

    match &err {
        TransitionError::NotValidated { errors, .. } => {
            assert_eq!(errors, &[ValidationError::new("total cannot be negative")]);
        }
        other => panic!("Expected validation failure, got {other:?}"),
    }
    assert_eq!(order.state, "step1");
    let failed = executor.list_transitions(&order).unwrap();
    assert_eq!(failed.last().map(|e| e.state), Some(AuditState::Failed));
    assert!(failed
        .last()
        .and_then(|e| e.failure_reason.clone())
        .is_some_and(|reason| reason.contains("total cannot be negative")));
}

#[test]
fn guard_checks_source_state_before_permission() {
    let executor = TransitionExecutor::new(steps(true));
    let order = new_order(&executor);

    let outcome = executor
        .evaluate_guard(&order, "step1_done", Some(&CUSTOMER))
        .unwrap();

    assert_eq!(
        outcome,
        GuardOutcome::CannotStart {
            state: "start".to_string()
        }
    );
}

#[test]
fn system_transitions_skip_permission_checks() {
    let executor = TransitionExecutor::new(steps(true));
    let order = new_order(&executor);

    assert!(executor.test_transition(&order, "start_step1", None));
    assert!(!executor.test_transition(&order, "start_step1", Some(&CUSTOMER)));
    assert!(matches!(
        executor.check_transition(&order, "start_step1", Some(&CUSTOMER)),
        Err(TransitionError::PermissionDenied { .. })
    ));
}

#[test]
fn dry_runs_do_not_touch_the_audit_log() {
    let executor = TransitionExecutor::new(steps(true));
    let order = new_order(&executor);

    for _ in 0..3 {
        executor.test_transition(&order, "start_step1", Some(&ADMIN));
        executor.test_transition(&order, "step1_done", Some(&ADMIN));
    }

    assert_eq!(order.state, "start");
    assert!(executor.list_transitions(&order).unwrap().is_empty());
}

#[test]
fn public_history_lists_completed_public_transitions() {
    let executor = TransitionExecutor::new(steps(true));
    let mut order = new_order(&executor);

    for name in ["start_step1", "step1_failstep", "failstep_step1", "step1_done"] {
        executor
            .make_transition(&mut order, name, None, ExtraArgs::new())
            .unwrap();
    }

    let all = executor.list_transitions(&order).unwrap();
    assert_eq!(all.len(), 4);
    let public = executor.public_transitions(&order).unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].transition_description().unwrap(), "Transition from normal to done");
    assert_eq!(public[0].to_state_description().unwrap(), "Final state");
}

#[test]
fn group_membership_follows_the_record() {
    let executor = TransitionExecutor::new(steps(true));
    let mut order = new_order(&executor);
    executor
        .make_transition(&mut order, "start_step1", None, ExtraArgs::new())
        .unwrap();
    executor
        .make_transition(&mut order, "step1_failstep", None, ExtraArgs::new())
        .unwrap();

    let info = executor.state_info(&order).unwrap();
    assert_eq!(info.name, "failstep");
    assert!(!info.is_initial);
    assert!(info.groups.get("ongoing"));
    assert!(!info.groups.get("healthy"));
    assert!(!info.groups.get("no_such_group"));
}

#[test]
fn shared_audit_store_is_used() {
    let store = Arc::new(InMemoryAuditStore::new());
    let executor = TransitionExecutor::new(steps(true)).with_audit_store(store.clone());
    let mut order = new_order(&executor);

    executor
        .make_transition(&mut order, "start_step1", None, ExtraArgs::new())
        .unwrap();
    let _ = executor.make_transition(&mut order, "start_step1", None, ExtraArgs::new());

    let entries = store.all().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0].completed());
    assert!(entries[1].failed());
}

#[test]
fn handle_exposes_record_operations() {
    let executor = TransitionExecutor::new(steps(true));
    let mut order = new_order(&executor);
    let mut handle = executor.handle(&mut order);

    assert_eq!(handle.state_display().unwrap(), "Starting state.");
    assert!(handle.test_transition("start_step1", Some(&ADMIN)));
    handle
        .make_transition("start_step1", Some(&ADMIN), ExtraArgs::new())
        .unwrap();
    assert_eq!(handle.state(), "step1");
    assert_eq!(handle.list_transitions().unwrap().len(), 1);
}

#[test]
fn machines_render_as_dot() {
    let dot = steps(true).to_dot();

    assert!(dot.contains("\"START\""));
    assert!(dot.contains("shape=rect, fontname=\"Arial\""));
    assert!(dot.contains("0 -> 1 [ label=\"start\\n_step1\""));
}

#[test]
fn audit_schema_describes_log_entity() {
    let schema = build_audit_log_schema(&steps(true), "Order", "state");

    assert_eq!(schema.entity_name, "OrderStateLog");
    assert_eq!(schema.related_name, "state_history");
    assert_eq!(schema.state_choices.len(), 4);
    assert_eq!(schema.audit_state_choices[0].0, "transition_initiated");
}

#[test]
fn transitions_display_their_endpoints() {
    let machine = MachineBuilder::<Order>::new("shop")
        .state(StateBuilder::new("cart").description("Cart").initial())
        .state(StateBuilder::new("saved").description("Saved"))
        .state(StateBuilder::new("gone").description("Gone"))
        .transition(
            TransitionBuilder::new("discard")
                .from_any(["cart", "saved"])
                .to("gone")
                .description("Discard"),
        )
        .build()
        .unwrap();

    let discard = machine.get_transition("discard").unwrap();
    assert_eq!(discard.to_string(), "Discard: (from cart or saved to gone)");
}
