//! Property-based tests for the link editor.
//!
//! Any sequence of add/remove/reorder keeps `order` dense and matches a
//! plain `Vec` of ids driven by the same operations.

use cardlink_backend::domain::{Link, LinkEditor, LinkType};
use proptest::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone)]
enum EditOp {
    Add,
    Remove(usize),
    Reorder(usize, usize),
}

fn arb_edit_ops() -> impl Strategy<Value = Vec<EditOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => Just(EditOp::Add),
            2 => (0..16usize).prop_map(EditOp::Remove),
            3 => (0..16usize, 0..16usize).prop_map(|(f, t)| EditOp::Reorder(f, t)),
        ],
        1..50,
    )
}

fn seeded_editor(n: usize) -> LinkEditor {
    let links = (0..n)
        .map(|i| Link::new(LinkType::Website, format!("site {}", i), format!("https://s{}.example", i)))
        .collect();
    LinkEditor::with_links(Uuid::new_v4(), links)
}

fn ids(editor: &LinkEditor) -> Vec<Uuid> {
    editor.links().iter().map(|l| l.id).collect()
}

fn assert_dense(editor: &LinkEditor) -> Result<(), TestCaseError> {
    for (i, link) in editor.links().iter().enumerate() {
        prop_assert_eq!(link.order, i as u32);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Orders are exactly 0..n after every operation
    #[test]
    fn order_stays_dense(initial in 0..6usize, ops in arb_edit_ops()) {
        let mut editor = seeded_editor(initial);
        assert_dense(&editor)?;

        for op in &ops {
            match *op {
                EditOp::Add => {
                    editor.add();
                }
                EditOp::Remove(i) => {
                    if let Some(id) = editor.links().get(i).map(|l| l.id) {
                        editor.remove(id).unwrap();
                    }
                }
                EditOp::Reorder(from, to) => {
                    let _ = editor.reorder(from, to);
                }
            }
            assert_dense(&editor)?;
        }
    }

    // The editor behaves like Vec::remove + Vec::insert on the id list
    #[test]
    fn editor_matches_vec_model(initial in 0..6usize, ops in arb_edit_ops()) {
        let mut editor = seeded_editor(initial);
        let mut model = ids(&editor);

        for op in &ops {
            match *op {
                EditOp::Add => {
                    model.push(editor.add());
                }
                EditOp::Remove(i) => {
                    if i < model.len() {
                        let id = model.remove(i);
                        let removed = editor.remove(id).unwrap();
                        prop_assert_eq!(removed.id, id);
                    }
                }
                EditOp::Reorder(from, to) => {
                    let result = editor.reorder(from, to);
                    if from < model.len() && to < model.len() {
                        prop_assert!(result.is_ok());
                        let id = model.remove(from);
                        model.insert(to, id);
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
            }
            prop_assert_eq!(&ids(&editor), &model, "after {:?}", op);
        }
    }

    // Reorder moves one element; everything else keeps its relative order
    #[test]
    fn reorder_is_array_move(n in 1..12usize, from in 0..12usize, to in 0..12usize) {
        prop_assume!(from < n && to < n);

        let mut editor = seeded_editor(n);
        let before = ids(&editor);
        let moved = before[from];

        editor.reorder(from, to).unwrap();
        let after = ids(&editor);

        prop_assert_eq!(after[to], moved);

        let others_before: Vec<_> = before.iter().filter(|id| **id != moved).collect();
        let others_after: Vec<_> = after.iter().filter(|id| **id != moved).collect();
        prop_assert_eq!(others_before, others_after);
    }

    // Removing one link keeps the survivors in their original relative order
    #[test]
    fn removal_preserves_relative_order(n in 1..12usize, pick in 0..12usize) {
        prop_assume!(pick < n);

        let mut editor = seeded_editor(n);
        let mut expected = ids(&editor);
        let victim = expected.remove(pick);

        editor.remove(victim).unwrap();

        prop_assert_eq!(ids(&editor), expected);
        assert_dense(&editor)?;
    }
}
