//! Property-based invariant tests for navigation.
//!
//! 1. Resolved indices always stay inside `[0, item_count - 1]`
//! 2. Exactly one item is active after every completed intent
//! 3. Internal and external indices agree after every completed intent

use chrono_timeline_core::{
    resolve, sample_descriptors, Key, NavigationIntent, RecordingHost, SimulatedSurface,
    TimelineConfig, TimelineEngine,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Next,
    Previous,
    First,
    Last,
    Jump(usize),
    Key(Key),
    Click,
    Tick,
}

fn intent_strategy() -> impl Strategy<Value = NavigationIntent> {
    prop_oneof![
        Just(NavigationIntent::Next),
        Just(NavigationIntent::Previous),
        Just(NavigationIntent::First),
        Just(NavigationIntent::Last),
        (0usize..64).prop_map(NavigationIntent::JumpTo),
    ]
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::ArrowRight),
        Just(Key::ArrowLeft),
        Just(Key::ArrowUp),
        Just(Key::ArrowDown),
        Just(Key::Home),
        Just(Key::End),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::First),
        Just(Op::Last),
        (0usize..64).prop_map(Op::Jump),
        key_strategy().prop_map(Op::Key),
        Just(Op::Click),
        Just(Op::Tick),
    ]
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn resolved_index_stays_in_bounds(
        count in 1usize..40,
        start in 0usize..40,
        focus in any::<bool>(),
        intents in prop::collection::vec(intent_strategy(), 0..64),
    ) {
        let mut current = start.min(count - 1);
        for intent in intents {
            if let Some(target) = resolve(intent, current, count, focus) {
                prop_assert!(target < count);
                current = target;
            }
        }
    }

    #[test]
    fn exactly_one_item_stays_active(
        count in 1usize..20,
        flip in any::<bool>(),
        ops in prop::collection::vec(op_strategy(), 0..48),
    ) {
        let config = TimelineConfig { flip_layout: flip, ..TimelineConfig::default() };
        let mut engine =
            TimelineEngine::new(config, RecordingHost::default(), SimulatedSurface::new()).unwrap();
        engine.load_items(Some(&sample_descriptors(count)), 0);

        for op in ops {
            match op {
                Op::Next => { engine.next(); }
                Op::Previous => { engine.previous(); }
                Op::First => { engine.first(); }
                Op::Last => { engine.last(); }
                Op::Jump(index) => { engine.jump_to(index); }
                Op::Key(key) => { engine.key_down(key); }
                Op::Click => engine.pointer_down(),
                Op::Tick => { engine.tick(); }
            }

            let active = engine.items().iter().filter(|item| item.active).count();
            prop_assert_eq!(active, 1);
            let index = engine.active_index();
            prop_assert!(index.is_some_and(|index| index < count));
            prop_assert!(engine.navigation().is_converged());
        }
    }
}
