//! Expansion of nested action lists matches the pre-flattened order

use jargal::action::{from_fn, ActionRef, Outcome};
use jargal::{Generator, Runner};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;

/// A tree of actions: leaves record their id, branches record theirs and expand.
#[derive(Debug, Clone)]
enum Shape {
    Leaf,
    Branch(Vec<Shape>),
}

fn shape() -> impl Strategy<Value = Shape> {
    Just(Shape::Leaf).prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Shape::Branch)
    })
}

fn build(shape: &Shape, next_id: &mut usize, log: &Arc<Mutex<Vec<usize>>>) -> ActionRef {
    let id = *next_id;
    *next_id += 1;
    let log = log.clone();
    match shape {
        Shape::Leaf => from_fn(format!("leaf-{}", id), move |_| {
            log.lock().push(id);
            Ok(Outcome::Done)
        }),
        Shape::Branch(children) => {
            let children: Vec<ActionRef> = children
                .iter()
                .map(|child| build(child, next_id, &log))
                .collect();
            from_fn(format!("branch-{}", id), move |_| {
                log.lock().push(id);
                Ok(Outcome::Many(children.clone()))
            })
        }
    }
}

/// Pre-order ids, the order a hand-flattened list would run in
fn preorder(shape: &Shape, next_id: &mut usize, out: &mut Vec<usize>) {
    out.push(*next_id);
    *next_id += 1;
    if let Shape::Branch(children) = shape {
        for child in children {
            preorder(child, next_id, out);
        }
    }
}

#[test]
fn test_expansion_order_is_preorder() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runner
        .run(&prop::collection::vec(shape(), 1..4), |roots| {
            let log = Arc::new(Mutex::new(Vec::new()));
            let mut next_id = 0;
            let actions: Vec<ActionRef> = roots
                .iter()
                .map(|root| build(root, &mut next_id, &log))
                .collect();

            let mut expected = Vec::new();
            let mut expected_id = 0;
            for root in &roots {
                preorder(root, &mut expected_id, &mut expected);
            }

            rt.block_on(Runner::new().run_generator(&Generator::new("tree", actions)))
                .unwrap();

            prop_assert_eq!(log.lock().clone(), expected);
            Ok(())
        })
        .unwrap();
}
