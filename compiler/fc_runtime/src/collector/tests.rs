#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use super::*;
use crate::value::{CollectionValue, StructField, StructInstance};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use smallvec::smallvec;

fn holder(name: &str, child: ApartmentId) -> Value {
    Value::StructInstance(StructInstance {
        type_name: "Holder".to_string(),
        fields: smallvec![StructField {
            name: name.to_string(),
            apartment: child,
        }],
    })
}

#[test]
fn test_single_owner() {
    let mut gc = GarbageCollector::new();
    let a = gc.new_apartment(Value::Numerical(1.0));
    assert_eq!(gc.references(a).unwrap(), 0);

    gc.add_reference(a).unwrap();
    assert_eq!(gc.references(a).unwrap(), 1);
    assert!(!gc.can_delete(a).unwrap());

    gc.remove_reference(a).unwrap();
    assert_eq!(gc.references(a).unwrap(), 0);
    assert!(gc.can_delete(a).unwrap());
}

#[test]
fn test_structural_sharing() {
    let mut gc = GarbageCollector::new();
    let child = gc.new_apartment(Value::Character('c'));
    let p1 = gc.new_apartment(Value::Null);
    let p2 = gc.new_apartment(Value::Null);
    gc.add_reference(p1).unwrap();
    gc.add_reference(p2).unwrap();

    gc.set_value(p1, holder("c", child)).unwrap();
    gc.add_reference_from(child, p1).unwrap();
    gc.set_value(p2, holder("c", child)).unwrap();
    gc.add_reference_from(child, p2).unwrap();
    assert_eq!(gc.references(child).unwrap(), 2);

    gc.remove_reference_from(child, p1).unwrap();
    assert_eq!(gc.references(child).unwrap(), 1);
    assert!(!gc.can_delete(child).unwrap());

    gc.remove_reference_from(child, p2).unwrap();
    assert_eq!(gc.references(child).unwrap(), 0);
    assert!(gc.can_delete(child).unwrap());
}

#[test]
fn test_root_release_cascades() {
    let mut gc = GarbageCollector::new();
    let leaf = gc.new_apartment(Value::Numerical(3.0));
    let middle = gc.new_apartment(holder("leaf", leaf));
    let root = gc.new_apartment(holder("middle", middle));

    gc.add_reference(root).unwrap();
    for id in [root, middle, leaf] {
        assert_eq!(gc.references(id).unwrap(), 1);
    }

    gc.remove_reference(root).unwrap();
    for id in [root, middle, leaf] {
        assert!(gc.can_delete(id).unwrap());
    }
}

#[test]
fn test_shared_child_survives_one_parent() {
    let mut gc = GarbageCollector::new();
    let shared = gc.new_apartment(Value::Numerical(7.0));
    let left = gc.new_apartment(holder("x", shared));
    let right = gc.new_apartment(holder("x", shared));
    gc.add_reference(left).unwrap();
    gc.add_reference(right).unwrap();
    assert_eq!(gc.references(shared).unwrap(), 2);

    gc.remove_reference(left).unwrap();
    assert!(gc.can_delete(left).unwrap());
    assert_eq!(gc.references(shared).unwrap(), 1);

    assert_eq!(gc.collect(), 1);
    assert!(!gc.is_live(left));
    assert_eq!(gc.value(shared).unwrap(), &Value::Numerical(7.0));
}

#[test]
fn test_underflow_is_reported() {
    let mut gc = GarbageCollector::new();
    let a = gc.new_apartment(Value::Null);
    let err = gc.remove_reference(a).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::ReferenceUnderflow {
            apartment: a,
            held: 0,
            released: 1
        }
    );
    assert!(err.is_invariant_violation());
}

#[test]
fn test_overflow_is_reported_and_nothing_moves() {
    let mut gc = GarbageCollector::new();
    let child = gc.new_apartment(Value::Numerical(1.0));
    let root = gc.new_apartment(holder("child", child));
    gc.add_reference(root).unwrap();
    gc.get_mut(child).unwrap().references = u32::MAX;

    let err = gc.add_reference(root).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::ReferenceOverflow {
            apartment: child,
            held: u32::MAX,
            added: 1
        }
    );
    assert!(err.is_invariant_violation());
    assert_eq!(gc.references(root).unwrap(), 1);
    assert_eq!(gc.references(child).unwrap(), u32::MAX);
}

#[test]
fn test_failed_release_leaves_counts_intact() {
    let mut gc = GarbageCollector::new();
    let child = gc.new_apartment(Value::Numerical(1.0));
    let parent = gc.new_apartment(Value::Null);
    gc.add_reference(parent).unwrap();
    // Installed without accounting: the child still holds nothing.
    gc.set_value(parent, holder("child", child)).unwrap();

    let err = gc.remove_reference(parent).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::ReferenceUnderflow {
            apartment: child,
            held: 0,
            released: 1
        }
    );
    assert_eq!(gc.references(parent).unwrap(), 1);
    assert_eq!(gc.references(child).unwrap(), 0);
}

#[test]
fn test_child_reached_twice_counts_twice() {
    let mut gc = GarbageCollector::new();
    let shared = gc.new_apartment(Value::Numerical(5.0));
    let pair = gc.new_apartment(Value::StructInstance(StructInstance {
        type_name: "Pair".to_string(),
        fields: smallvec![
            StructField {
                name: "left".to_string(),
                apartment: shared,
            },
            StructField {
                name: "right".to_string(),
                apartment: shared,
            },
        ],
    }));

    gc.add_reference(pair).unwrap();
    assert_eq!(gc.references(pair).unwrap(), 1);
    assert_eq!(gc.references(shared).unwrap(), 2);

    gc.remove_reference(pair).unwrap();
    assert_eq!(gc.references(shared).unwrap(), 0);
    assert_eq!(gc.collect(), 2);
}

#[test]
fn test_long_chain_adjusts_without_recursion() {
    let depth = 100_000;
    let config = CollectorConfig::default().with_initial_capacity(depth);
    let mut gc = GarbageCollector::with_config(config);
    let mut top = gc.new_apartment(Value::Numerical(0.0));
    for _ in 1..depth {
        top = gc.new_apartment(holder("below", top));
    }

    gc.add_reference(top).unwrap();
    assert_eq!(gc.references(top).unwrap(), 1);
    gc.remove_reference(top).unwrap();
    assert_eq!(gc.collect(), depth);
}

#[test]
fn test_self_reference_is_rejected() {
    let mut gc = GarbageCollector::new();
    let a = gc.new_apartment(Value::Null);
    gc.add_reference(a).unwrap();

    let err = gc.replace_value(a, holder("me", a)).unwrap_err();
    assert_eq!(err, RuntimeError::CycleDetected { parent: a, child: a });
    assert_eq!(gc.value(a).unwrap(), &Value::Null);
    assert_eq!(gc.references(a).unwrap(), 1);
}

#[test]
fn test_indirect_cycle_is_rejected() {
    let mut gc = GarbageCollector::new();
    let inner = gc.new_apartment(Value::Null);
    let outer = gc.new_apartment(holder("inner", inner));
    gc.add_reference(outer).unwrap();

    let err = gc.replace_value(inner, holder("outer", outer)).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::CycleDetected {
            parent: inner,
            child: outer
        }
    );
    assert!(gc.add_reference_from(outer, inner).is_err());
}

#[test]
fn test_replace_value_moves_counts() {
    let mut gc = GarbageCollector::new();
    let old = gc.new_apartment(Value::Numerical(1.0));
    let new = gc.new_apartment(Value::Numerical(2.0));
    let owner = gc.new_apartment(holder("v", old));
    gc.add_reference(owner).unwrap();
    gc.add_reference(owner).unwrap();
    assert_eq!(gc.references(old).unwrap(), 2);

    gc.replace_value(owner, holder("v", new)).unwrap();
    assert_eq!(gc.references(old).unwrap(), 0);
    assert_eq!(gc.references(new).unwrap(), 2);
}

#[test]
fn test_chain_links_are_counted() {
    let mut gc = GarbageCollector::new();
    let second = gc.new_apartment(Value::Character('b'));
    let first = gc.new_apartment(Value::Character('a'));
    let head = gc.new_apartment(Value::Collection(CollectionValue { first: Some(first) }));
    gc.add_reference(head).unwrap();

    gc.set_next(first, Some(second)).unwrap();
    assert_eq!(gc.references(second).unwrap(), 1);
    assert_eq!(gc.get_children(head).unwrap().to_vec(), vec![first]);
    assert_eq!(gc.get_children(first).unwrap().to_vec(), vec![second]);

    gc.set_next(first, None).unwrap();
    assert_eq!(gc.references(second).unwrap(), 0);
}

#[test]
fn test_collect_reuses_slots() {
    let mut gc = GarbageCollector::new();
    let kept = gc.new_apartment(Value::Numerical(1.0));
    let dropped = gc.new_apartment(Value::Numerical(2.0));
    gc.add_reference(kept).unwrap();

    assert_eq!(gc.collect(), 1);
    assert_eq!(gc.live_count(), 1);
    assert_eq!(
        gc.value(dropped).unwrap_err(),
        RuntimeError::DanglingApartment { apartment: dropped }
    );

    let reused = gc.new_apartment(Value::Null);
    assert_eq!(reused, dropped);
    assert_eq!(
        gc.stats(),
        GcStats {
            allocated: 3,
            reclaimed: 1,
            sweeps: 1
        }
    );
}

#[test]
fn test_maybe_collect_waits_for_threshold() {
    let config = CollectorConfig::default()
        .with_initial_capacity(4)
        .with_collect_threshold(3);
    let mut gc = GarbageCollector::with_config(config);
    assert_eq!(gc.config().collect_threshold, 3);

    gc.new_apartment(Value::Null);
    gc.new_apartment(Value::Null);
    assert_eq!(gc.maybe_collect(), None);

    gc.new_apartment(Value::Null);
    assert_eq!(gc.maybe_collect(), Some(3));
    assert_eq!(gc.maybe_collect(), None);
    assert_eq!(gc.live_count(), 0);
}

// Property: after `owners` bindings and `released` releases of a root, every
// apartment under it holds exactly `owners - released`.

proptest! {
    #[test]
    fn prop_counts_track_bindings(depth in 1usize..12, owners in 1u32..6, released in 0u32..6) {
        let released = released.min(owners);
        let mut gc = GarbageCollector::new();
        let mut chain = vec![gc.new_apartment(Value::Numerical(0.0))];
        for _ in 1..depth {
            let below = *chain.last().unwrap();
            chain.push(gc.new_apartment(holder("below", below)));
        }
        let root = *chain.last().unwrap();

        for _ in 0..owners {
            gc.add_reference(root).unwrap();
        }
        for _ in 0..released {
            gc.remove_reference(root).unwrap();
        }

        for id in &chain {
            prop_assert_eq!(gc.references(*id).unwrap(), owners - released);
        }
        let reclaimed = gc.collect();
        prop_assert_eq!(reclaimed, if owners == released { depth } else { 0 });
    }
}
