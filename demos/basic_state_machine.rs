//! Basic State Machine
//!
//! This example walks a connection record through a small machine.
//!
//! Key concepts:
//! - Declaring states and transitions with builders
//! - Guarded transitions run by the executor
//! - Group membership of the current state
//! - Reading back the audit log
//!
//! Run with: cargo run --example basic_state_machine

use stately::builder::{simple_transition, GroupBuilder, MachineBuilder, StateBuilder};
use stately::core::{CallbackError, ExtraArgs};
use stately::effects::{StatefulRecord, TransitionExecutor};

struct Connection {
    host: String,
    state: String,
}

impl StatefulRecord for Connection {
    fn record_id(&self) -> String {
        self.host.clone()
    }

    fn current_state(&self) -> &str {
        &self.state
    }

    fn set_current_state(&mut self, state: String) {
        self.state = state;
    }

    fn save(&mut self) -> Result<(), CallbackError> {
        println!("  saved {} as '{}'", self.host, self.state);
        Ok(())
    }
}

fn main() {
    println!("=== Basic State Machine Example ===\n");

    let machine = MachineBuilder::<Connection>::new("connection")
        .state(
            StateBuilder::new("disconnected")
                .description("Disconnected")
                .initial(),
        )
        .state(StateBuilder::new("connecting").description("Connecting"))
        .state(StateBuilder::new("connected").description("Connected"))
        .transitions(vec![
            simple_transition("dial", "disconnected", "connecting", "Dial the host"),
            simple_transition("handshake", "connecting", "connected", "Complete handshake"),
        ])
        .group(GroupBuilder::new("online").states(["connected"]))
        .build()
        .unwrap();

    println!("State machine created successfully!");
    println!("{}", machine.to_dot());

    let executor = TransitionExecutor::new(machine);
    let mut connection = Connection {
        host: "db.internal".to_string(),
        state: String::new(),
    };
    executor.initialize(&mut connection).unwrap();
    println!("Initial state: {}", connection.state);

    for transition in ["dial", "handshake"] {
        println!("Running '{transition}'");
        executor
            .make_transition(&mut connection, transition, None, ExtraArgs::new())
            .unwrap();
    }

    let info = executor.state_info(&connection).unwrap();
    println!("Current state: {} (online: {})", info.name, info.groups.get("online"));
    println!(
        "Can dial again: {}",
        executor.test_transition(&connection, "dial", None)
    );

    println!("\nHistory:");
    for entry in executor.list_transitions(&connection).unwrap() {
        println!("  {} [{}]", *entry, entry.state);
    }

    println!("\n=== Example Complete ===");
}
