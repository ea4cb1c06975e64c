//! Integration tests for the edit history: undo, redo, rejection.

use circuitlab_core::circuit::{Connection, Point};
use circuitlab_core::components::Component;
use circuitlab_core::{EngineConfig, StateManager};

/// Apply a fixed sequence of mutations, returning the snapshots seen after each.
fn edit_sequence(state: &mut StateManager) -> Vec<(usize, usize)> {
    let mut seen = vec![(0, 0)];
    let snap = |s: &StateManager| (s.components().len(), s.connections().len());

    state.add_component(Component::battery("b1", 9.0, 0.1)).unwrap();
    seen.push(snap(state));
    state.add_component(Component::resistor("r1", 10.0)).unwrap();
    seen.push(snap(state));
    state
        .add_connection(Connection::between("c1", "b1", 1, "r1", 0))
        .unwrap();
    seen.push(snap(state));
    state
        .add_connection(Connection::between("c2", "r1", 1, "b1", 0))
        .unwrap();
    seen.push(snap(state));
    state.remove_connection("c1").unwrap();
    seen.push(snap(state));
    state.move_component("r1", Point::new(100.0, 0.0)).unwrap();
    seen.push(snap(state));
    seen
}

// ── Undo/Redo Idempotence ───────────────────────────────────────────

#[test]
fn test_undo_then_redo_restores_state_for_every_depth() {
    let mut reference = StateManager::new();
    let steps = edit_sequence(&mut reference).len() - 1;

    for n in 0..=steps {
        let mut state = StateManager::new();
        edit_sequence(&mut state);
        let before = state.circuit().clone();

        for _ in 0..n {
            state.undo();
        }
        for _ in 0..n {
            state.redo();
        }
        assert_eq!(state.circuit(), &before, "undo/redo x{n} changed the circuit");
        assert_eq!(state.solve_result(), reference.solve_result());
    }
}

#[test]
fn test_undo_walks_back_through_snapshots() {
    let mut state = StateManager::new();
    let seen = edit_sequence(&mut state);

    for expected in seen.iter().rev().skip(1) {
        let view = state.undo();
        assert_eq!((view.components.len(), view.connections.len()), *expected);
    }
    assert!(!state.can_undo());
    assert!(state.can_redo());

    // Nothing left: undo is a no-op
    let view = state.undo();
    assert!(view.components.is_empty());
}

// ── History Invariant ───────────────────────────────────────────────

#[test]
fn test_mutation_enables_undo_and_clears_redo() {
    let mut state = StateManager::new();
    edit_sequence(&mut state);
    state.undo();
    state.undo();
    assert!(state.can_redo());

    state.add_component(Component::wire("w1")).unwrap();
    assert!(state.can_undo());
    assert!(!state.can_redo());
}

#[test]
fn test_clear_history_keeps_live_state() {
    let mut state = StateManager::new();
    edit_sequence(&mut state);
    state.undo();

    let live = state.circuit().clone();
    let view = state.clear_history();
    assert!(!view.can_undo && !view.can_redo);
    assert_eq!(state.circuit(), &live);
}

// ── Rejection ───────────────────────────────────────────────────────

#[test]
fn test_rejected_mutation_leaves_history_untouched() {
    let mut state = StateManager::new();
    edit_sequence(&mut state);
    let before = state.circuit().clone();

    assert!(state.add_component(Component::resistor("bad", -5.0)).is_err());
    assert!(state
        .add_connection(Connection::between("c7", "b1", 0, "ghost", 0))
        .is_err());
    assert_eq!(state.circuit(), &before);
    assert_eq!(
        state.last_error(),
        Some("Connection 'c7' references unknown destination component 'ghost'")
    );
    assert!(!state.validation_errors().is_empty());

    // The previous mutation is still the one undone
    state.undo();
    assert_eq!(state.components()[1].position, Point::default());
}

#[test]
fn test_successful_mutation_clears_last_error() {
    let mut state = StateManager::new();
    let _ = state.remove_component("missing");
    assert!(state.last_error().is_some());

    state.add_component(Component::wire("w1")).unwrap();
    assert_eq!(state.last_error(), None);
    assert!(state.validation_errors().is_empty());
}

#[test]
fn test_bounded_history() {
    let mut state = StateManager::with_config(EngineConfig::new().with_history_limit(3));
    for i in 0..10 {
        state.add_component(Component::wire(format!("w{i}"))).unwrap();
    }
    let mut undone = 0;
    while state.can_undo() {
        state.undo();
        undone += 1;
    }
    assert_eq!(undone, 3);
    assert_eq!(state.components().len(), 7);
}
