//! # Fixture-Based Tests for the Larch Sentinel BST
//!
//! Scenarios are described as JSON and deserialized into insert/remove
//! scripts. For an unbalanced BST the insertion order fully determines the
//! shape, so a script pins down the exact topology a case needs (which
//! node is the root, where the successor sits) without reaching into tree
//! internals.

use larch::Tree;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct Scenario {
	name: String,
	inserts: Vec<(i32, i32)>,
	#[serde(default)]
	removes: Vec<i32>,
	expect: Vec<(i32, i32)>,
}

fn run(scenario: &Scenario) {
	let mut tree: Tree<i32, i32> = Tree::new();

	for &(k, v) in &scenario.inserts {
		tree.insert(k, v).unwrap();
	}
	tree.assert_invariants();

	for k in &scenario.removes {
		tree.remove(k);
		tree.assert_invariants();
	}

	let mut traversal = Vec::new();
	let mut iter = tree.iter();
	while let Some((k, v)) = iter.next() {
		traversal.push((*k, *v));
	}

	assert_eq!(traversal, scenario.expect, "scenario '{}' traversal mismatch", scenario.name);
	assert_eq!(tree.len(), scenario.expect.len(), "scenario '{}' length mismatch", scenario.name);

	assert_eq!(
		tree.first_key_value().map(|(k, v)| (*k, *v)),
		scenario.expect.first().copied(),
		"scenario '{}' cached minimum mismatch",
		scenario.name
	);
	assert_eq!(
		tree.last_key_value().map(|(k, v)| (*k, *v)),
		scenario.expect.last().copied(),
		"scenario '{}' cached maximum mismatch",
		scenario.name
	);
}

fn run_all(json: &str) {
	let scenarios: Vec<Scenario> = serde_json::from_str(json).expect("invalid fixture JSON");
	for scenario in &scenarios {
		run(scenario);
	}
}

#[test]
fn deletion_case_scenarios() {
	run_all(
		r#"[
		{
			"name": "leaf removal",
			"inserts": [[50, 1], [25, 2], [75, 3], [10, 4]],
			"removes": [10],
			"expect": [[25, 2], [50, 1], [75, 3]]
		},
		{
			"name": "single left child splice",
			"inserts": [[50, 1], [25, 2], [10, 3]],
			"removes": [25],
			"expect": [[10, 3], [50, 1]]
		},
		{
			"name": "single right child splice",
			"inserts": [[50, 1], [75, 2], [90, 3]],
			"removes": [75],
			"expect": [[50, 1], [90, 3]]
		},
		{
			"name": "double child root, successor is right child",
			"inserts": [[50, 1], [25, 2], [75, 3]],
			"removes": [50],
			"expect": [[25, 2], [75, 3]]
		},
		{
			"name": "double child root, deep successor with right child",
			"inserts": [[50, 1], [25, 2], [75, 3], [60, 4], [90, 5], [55, 6], [58, 7]],
			"removes": [50],
			"expect": [[25, 2], [55, 6], [58, 7], [60, 4], [75, 3], [90, 5]]
		},
		{
			"name": "double child mid-tree",
			"inserts": [[50, 1], [25, 2], [75, 3], [10, 4], [30, 5], [27, 6], [35, 7]],
			"removes": [25],
			"expect": [[10, 4], [27, 6], [30, 5], [35, 7], [50, 1], [75, 3]]
		}
	]"#,
	);
}

#[test]
fn drain_and_rebuild_scenarios() {
	run_all(
		r#"[
		{
			"name": "remove all",
			"inserts": [[5, 1], [3, 2], [8, 3], [1, 4], [4, 5], [7, 6], [9, 7]],
			"removes": [5, 3, 8, 1, 4, 7, 9],
			"expect": []
		},
		{
			"name": "remove absent keys is a no-op",
			"inserts": [[5, 1], [3, 2], [8, 3]],
			"removes": [6, 0, 100],
			"expect": [[3, 2], [5, 1], [8, 3]]
		},
		{
			"name": "duplicate inserts keep first value",
			"inserts": [[5, 1], [3, 2], [5, 99], [3, 98], [8, 3]],
			"expect": [[3, 2], [5, 1], [8, 3]]
		},
		{
			"name": "left chain collapse",
			"inserts": [[9, 1], [8, 2], [7, 3], [6, 4], [5, 5]],
			"removes": [8, 6],
			"expect": [[5, 5], [7, 3], [9, 1]]
		},
		{
			"name": "right chain collapse",
			"inserts": [[1, 1], [2, 2], [3, 3], [4, 4], [5, 5]],
			"removes": [2, 4],
			"expect": [[1, 1], [3, 3], [5, 5]]
		}
	]"#,
	);
}

#[test]
fn extreme_tracking_scenarios() {
	run_all(
		r#"[
		{
			"name": "remove minimum repeatedly",
			"inserts": [[50, 1], [25, 2], [75, 3], [10, 4], [30, 5]],
			"removes": [10, 25],
			"expect": [[30, 5], [50, 1], [75, 3]]
		},
		{
			"name": "remove maximum repeatedly",
			"inserts": [[50, 1], [25, 2], [75, 3], [90, 4], [60, 5]],
			"removes": [90, 75],
			"expect": [[25, 2], [50, 1], [60, 5]]
		},
		{
			"name": "single entry",
			"inserts": [[42, 7]],
			"expect": [[42, 7]]
		}
	]"#,
	);
}
