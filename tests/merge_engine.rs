// tests/merge_engine.rs
//
// Merge engine behaviour on small hand-built tables.
//
use std::collections::HashSet;

use serde_json::{json, Value};

use dynasty_market::schema::{IdentityRule, Position, SourceSchema};
use dynasty_market::{clean_and_merge, merge, DataSet, Error};

fn table(headers: &[&str], rows: Vec<Vec<Value>>) -> DataSet {
    DataSet { headers: headers.iter().map(|h| h.to_string()).collect(), rows }
}

fn col(ds: &DataSet, name: &str) -> usize {
    ds.column(name).unwrap_or_else(|| panic!("missing column {name}: {:?}", ds.headers))
}

fn row_for<'a>(ds: &'a DataSet, key: &str) -> &'a [Value] {
    let k = col(ds, "norm_name");
    ds.rows
        .iter()
        .find(|r| r[k] == json!(key))
        .unwrap_or_else(|| panic!("no row for {key}"))
}

fn sleeper_two() -> DataSet {
    table(
        &["full_name", "position", "player_id", "team"],
        vec![
            vec![json!("Patrick Mahomes"), json!("QB"), json!("1"), json!("KC")],
            vec![json!("Justin Jefferson"), json!("WR"), json!("2"), json!("MIN")],
        ],
    )
}

#[test]
fn two_player_scenario() {
    let market = table(
        &["name", "position", "value"],
        vec![
            vec![json!("Patrick Mahomes"), json!("QB"), json!(9000)],
            vec![json!("Justin Jefferson"), json!("WR"), json!(8500)],
        ],
    );
    let merged = merge(&sleeper_two(), &market).unwrap();

    assert_eq!(merged.len(), 2);
    for name in ["norm_name", "value", "team"] {
        assert!(merged.column(name).is_some(), "missing {name}");
    }
    assert_eq!(row_for(&merged, "patrick mahomes")[col(&merged, "team")], json!("KC"));
    assert_eq!(row_for(&merged, "justin jefferson")[col(&merged, "value")], json!(8500));
}

#[test]
fn column_order_market_then_roster_then_key() {
    let market = table(
        &["name", "position", "value"],
        vec![vec![json!("Patrick Mahomes"), json!("QB"), json!(9000)]],
    );
    let merged = merge(&sleeper_two(), &market).unwrap();
    assert_eq!(
        merged.headers,
        vec![
            "name", "position_ktc", "value",
            "full_name", "position_sleeper", "player_id", "team",
            "norm_name",
        ]
    );
}

#[test]
fn unmatched_market_row_keeps_roster_columns_null() {
    let market = table(
        &["name", "position", "value"],
        vec![
            vec![json!("Patrick Mahomes"), json!("QB"), json!(9000)],
            vec![json!("Rookie McRookface"), json!("RB"), json!(5100)],
        ],
    );
    let merged = merge(&sleeper_two(), &market).unwrap();
    assert_eq!(merged.len(), 2);

    let rookie = row_for(&merged, "rookie mcrookface");
    assert_eq!(rookie[col(&merged, "value")], json!(5100));
    assert_eq!(rookie[col(&merged, "team")], Value::Null);
    assert_eq!(rookie[col(&merged, "full_name")], Value::Null);
}

#[test]
fn roster_duplicate_key_keeps_first() {
    let roster = table(
        &["full_name", "position", "player_id", "team"],
        vec![
            vec![json!("Mike Williams"), json!("WR"), json!("10"), json!("NYJ")],
            vec![json!("Mike Williams Jr."), json!("WR"), json!("11"), json!("PIT")],
        ],
    );
    let market = table(
        &["playerName", "position", "value"],
        vec![vec![json!("Mike Williams"), json!("WR"), json!(2100)]],
    );
    let merged = merge(&roster, &market).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.rows[0][col(&merged, "team")], json!("NYJ"));
}

#[test]
fn market_duplicates_and_positions_are_cleaned() {
    let market = table(
        &["name", "position", "value"],
        vec![
            vec![json!("Patrick Mahomes"), json!("QB"), json!(9000)],
            vec![json!("Patrick Mahomes II"), json!("QB"), json!(1)],
            vec![json!("Harrison Butker"), json!("K"), json!(10)],
            vec![json!("Pick 1.01"), json!("RDP"), json!(7000)],
        ],
    );
    let merged = merge(&sleeper_two(), &market).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.rows[0][col(&merged, "value")], json!(9000));
}

#[test]
fn roster_non_skill_positions_do_not_match() {
    let roster = table(
        &["full_name", "position", "team"],
        vec![vec![json!("Travis Kelce"), json!("K"), json!("KC")]],
    );
    let market = table(
        &["name", "position", "value"],
        vec![vec![json!("Travis Kelce"), json!("TE"), json!(3000)]],
    );
    let merged = merge(&roster, &market).unwrap();
    // market row survives on its own position; roster side is null
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.rows[0][col(&merged, "team")], Value::Null);
}

#[test]
fn market_without_position_uses_roster_position() {
    let market = table(
        &["name", "value"],
        vec![
            vec![json!("Justin Jefferson"), json!(8500)],
            vec![json!("Unknown Guy"), json!(10)],
        ],
    );
    let merged = merge(&sleeper_two(), &market).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.rows[0][col(&merged, "position")], json!("WR"));
    assert_eq!(
        merged.headers,
        vec!["name", "value", "full_name", "position", "player_id", "team", "norm_name"]
    );
}

#[test]
fn roster_falls_back_to_player_id() {
    let roster = table(
        &["player_id", "position", "team"],
        vec![vec![json!(4046), json!("QB"), json!("KC")]],
    );
    let market = table(
        &["name", "position", "value"],
        vec![vec![json!("4046"), json!("QB"), json!(9000)]],
    );
    // the market key is normalized (digits stripped), the roster key is not,
    // so the fallback degrades matching but still yields a table
    let merged = merge(&roster, &market).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged.rows[0][col(&merged, "team")], Value::Null);
}

#[test]
fn market_falls_back_to_first_text_column() {
    let market = table(
        &["rank", "label", "position"],
        vec![
            vec![json!(1), json!("Patrick Mahomes"), json!("QB")],
            vec![json!(2), json!("Justin Jefferson"), json!("WR")],
        ],
    );
    let merged = merge(&sleeper_two(), &market).unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(row_for(&merged, "justin jefferson")[col(&merged, "team")], json!("MIN"));
}

#[test]
fn schema_errors() {
    let no_identity = table(&["team", "position"], vec![vec![json!("KC"), json!("QB")]]);
    let market = table(&["name", "position"], vec![vec![json!("A"), json!("QB")]]);
    assert!(matches!(merge(&no_identity, &market), Err(Error::Schema(_))));

    let no_position = table(&["full_name"], vec![vec![json!("A")]]);
    assert!(matches!(merge(&no_position, &market), Err(Error::Schema(_))));

    let numeric_market = table(&["rank", "value"], vec![vec![json!(1), json!(9000)]]);
    assert!(matches!(merge(&sleeper_two(), &numeric_market), Err(Error::Schema(_))));
}

#[test]
fn empty_result_is_not_an_error() {
    let market = table(
        &["name", "position", "value"],
        vec![vec![json!("Some Kicker"), json!("K"), json!(1)]],
    );
    let merged = merge(&sleeper_two(), &market).unwrap();
    assert!(merged.is_empty());
    assert_eq!(merged.headers.last().map(String::as_str), Some("norm_name"));
}

#[test]
fn existing_key_column_is_replaced() {
    let market = table(
        &["norm_name", "name", "position"],
        vec![vec![json!("stale"), json!("Patrick Mahomes"), json!("QB")]],
    );
    let merged = merge(&sleeper_two(), &market).unwrap();
    assert_eq!(merged.headers.iter().filter(|h| *h == "norm_name").count(), 1);
    assert_eq!(merged.rows[0][col(&merged, "norm_name")], json!("patrick mahomes"));
}

#[test]
fn custom_tags_and_identity() {
    let mut roster_schema = SourceSchema::sleeper();
    roster_schema.tag = "roster".into();
    let mut market_schema = SourceSchema::ktc();
    market_schema.tag = "market".into();
    market_schema.identity = vec![IdentityRule::Name("player".into())];

    let market = table(
        &["player", "position", "team"],
        vec![vec![json!("Justin Jefferson Jr"), json!("WR"), json!("MIN")]],
    );
    let merged = clean_and_merge(&sleeper_two(), &roster_schema, &market, &market_schema).unwrap();
    assert!(merged.column("team_market").is_some());
    assert!(merged.column("team_roster").is_some());
    assert!(merged.column("position_market").is_some());
    assert_eq!(merged.len(), 1);
}

#[test]
fn differently_named_position_columns_keep_unmatched_market_rows() {
    let mut roster_schema = SourceSchema::sleeper();
    roster_schema.position = "pos".into();

    let roster = table(
        &["full_name", "pos"],
        vec![
            vec![json!("Patrick Mahomes"), json!("QB")],
            vec![json!("Harrison Butker"), json!("K")],
        ],
    );
    let market = table(
        &["name", "position"],
        vec![
            vec![json!("Patrick Mahomes"), json!("QB")],
            vec![json!("Justin Jefferson"), json!("WR")],
            vec![json!("Harrison Butker"), json!("K")],
        ],
    );
    let merged = clean_and_merge(&roster, &roster_schema, &market, &SourceSchema::ktc()).unwrap();

    assert_eq!(merged.headers, vec!["name", "position", "full_name", "pos", "norm_name"]);
    assert_eq!(merged.len(), 2);
    let jj = row_for(&merged, "justin jefferson");
    assert_eq!(jj[col(&merged, "position")], json!("WR"));
    assert_eq!(jj[col(&merged, "pos")], Value::Null);
    assert_eq!(row_for(&merged, "patrick mahomes")[col(&merged, "pos")], json!("QB"));
}

#[test]
fn market_position_name_is_tag_suffixed_on_collision() {
    let mut market_schema = SourceSchema::ktc();
    market_schema.position = "slot".into();
    let mut roster_schema = SourceSchema::sleeper();
    roster_schema.position = "slot".into();

    let roster = table(
        &["full_name", "slot"],
        vec![vec![json!("Patrick Mahomes"), json!("QB")]],
    );
    let market = table(
        &["name", "slot"],
        vec![
            vec![json!("Patrick Mahomes"), json!("QB")],
            vec![json!("Rookie Runner"), json!("RB")],
        ],
    );
    let merged = clean_and_merge(&roster, &roster_schema, &market, &market_schema).unwrap();
    assert!(merged.column("slot_ktc").is_some());
    assert_eq!(merged.len(), 2);
    assert_eq!(row_for(&merged, "rookie runner")[col(&merged, "slot_sleeper")], Value::Null);
}

// Deterministic sweep standing in for the "for all tables" properties.
#[test]
fn invariants_hold_over_generated_tables() {
    let names = [
        "Josh Allen", "Josh Allen Jr.", "A.J. Brown", "AJ Brown", "Bijan Robinson",
        "Sam LaPorta", "Kyle Pitts", "Breece Hall", "C.J. Stroud", "Puka Nacua",
    ];
    let positions = ["QB", "RB", "WR", "TE", "K", "DEF", ""];

    for seed in 0..40usize {
        let roster_rows: Vec<Vec<Value>> = (0..12)
            .map(|i| {
                let n = names[(i * 7 + seed) % names.len()];
                let p = positions[(i + seed) % positions.len()];
                vec![json!(n), json!(p), json!(i.to_string()), json!(format!("T{i}"))]
            })
            .collect();
        let market_rows: Vec<Vec<Value>> = (0..15)
            .map(|i| {
                let n = names[(i * 3 + seed * 5) % names.len()];
                let p = positions[(i * 2 + seed) % positions.len()];
                vec![json!(n), json!(p), json!(1000 + i)]
            })
            .collect();

        let roster = table(&["full_name", "position", "player_id", "team"], roster_rows);
        let market = table(&["name", "position", "value"], market_rows.clone());
        let merged = merge(&roster, &market).unwrap();

        // unique keys
        let k = col(&merged, "norm_name");
        let keys: HashSet<String> = merged.rows.iter().map(|r| r[k].to_string()).collect();
        assert_eq!(keys.len(), merged.len(), "seed {seed}");

        // every row carries an allowed position
        let p = col(&merged, "position_ktc");
        assert!(merged.rows.iter().all(|r| Position::from_cell(&r[p]).is_some()), "seed {seed}");

        // never more rows than distinct, position-valid market keys
        let bound: HashSet<String> = market_rows
            .iter()
            .filter(|r| Position::from_cell(&r[1]).is_some())
            .map(|r| dynasty_market::normalize_name(r[0].as_str()))
            .collect();
        assert_eq!(merged.len(), bound.len(), "seed {seed}");
    }
}
