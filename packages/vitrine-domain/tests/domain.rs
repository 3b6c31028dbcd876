use vitrine_domain::{Selection, SortKey, Trait, id_matches_search};

fn traits(pairs: &[(&str, &str)]) -> Vec<Trait> {
	pairs.iter().map(|(t, v)| Trait::new(*t, *v)).collect()
}

#[test]
fn fur_selection_scenario() {
	// Items 0, 1, 2 carry Fur = Blue, Gold, Blue respectively.
	let items =
		[traits(&[("Fur", "Blue")]), traits(&[("Fur", "Gold")]), traits(&[("Fur", "Blue")])];
	let matching = |selection: &Selection| -> Vec<u32> {
		items
			.iter()
			.enumerate()
			.filter(|(_, t)| selection.matches(t))
			.map(|(id, _)| id as u32)
			.collect()
	};

	let mut selection = Selection::new();

	selection.select("Fur", "Blue");
	assert_eq!(matching(&selection), vec![0, 2]);

	selection.select("Fur", "Gold");
	assert_eq!(matching(&selection), vec![0, 1, 2]);

	let mut narrowed = Selection::new();

	narrowed.select("Fur", "Blue");
	narrowed.select("Eyes", "Red");
	assert_eq!(matching(&narrowed), Vec::<u32>::new());
}

#[test]
fn widening_a_type_never_shrinks_matches() {
	let items: Vec<Vec<Trait>> = (0..50)
		.map(|id| {
			let fur = match id % 3 {
				0 => "Blue",
				1 => "Gold",
				_ => "Red",
			};

			traits(&[("Fur", fur)])
		})
		.collect();
	let matching = |selection: &Selection| -> Vec<usize> {
		items.iter().enumerate().filter(|(_, t)| selection.matches(t)).map(|(id, _)| id).collect()
	};

	let mut selection = Selection::new();

	selection.select("Fur", "Blue");

	let narrow = matching(&selection);

	selection.select("Fur", "Gold");

	let wide = matching(&selection);

	for id in &narrow {
		assert!(wide.contains(id), "Widening Fur dropped id {id}.");
	}
}

#[test]
fn adding_a_type_never_grows_matches() {
	let items: Vec<Vec<Trait>> = (0..50)
		.map(|id| {
			let fur = if id % 2 == 0 { "Blue" } else { "Gold" };
			let eyes = if id % 5 == 0 { "Red" } else { "Green" };

			traits(&[("Fur", fur), ("Eyes", eyes)])
		})
		.collect();
	let matching = |selection: &Selection| -> Vec<usize> {
		items.iter().enumerate().filter(|(_, t)| selection.matches(t)).map(|(id, _)| id).collect()
	};

	let mut selection = Selection::new();

	selection.select("Fur", "Blue");

	let before = matching(&selection);

	selection.select("Eyes", "Red");

	let after = matching(&selection);

	for id in &after {
		assert!(before.contains(id), "Adding Eyes grew the match set with id {id}.");
	}
}

#[test]
fn search_12_over_150_ids() {
	let matches: Vec<u32> = (0..150).filter(|id| id_matches_search(*id, "12")).collect();
	let mut expected = vec![12, 112];

	expected.extend(120..130);
	expected.sort_unstable();

	assert_eq!(matches, expected);
}

#[test]
fn default_sort_is_ascending() {
	assert_eq!(SortKey::default(), SortKey::IdAscending);
}

#[test]
fn selection_serializes_as_a_plain_map() {
	let mut selection = Selection::new();

	selection.select("Fur", "Blue");
	selection.select("Fur", "Gold");

	let json = serde_json::to_value(&selection).expect("Expected selection to serialize.");

	assert_eq!(json, serde_json::json!({ "Fur": ["Blue", "Gold"] }));

	let restored: Selection =
		serde_json::from_value(json).expect("Expected selection to deserialize.");

	assert_eq!(restored, selection);
}

#[test]
fn sort_key_uses_snake_case() {
	let json = serde_json::to_value(SortKey::IdDescending).expect("Expected sort key to serialize.");

	assert_eq!(json, serde_json::json!("id_descending"));
}
