use club_compare::clubs::{ClubIndex, acronym, filter};
use club_compare::dataset::Club;
use club_compare::error::CompareError;

fn club(id: u32, name: &str) -> Club {
    Club {
        id,
        name: name.to_string(),
        total_market_value: None,
        squad_size: 0,
    }
}

fn index() -> ClubIndex {
    ClubIndex::new(&[
        club(418, "Real Madrid"),
        club(131, "Futbol Club Barcelona"),
        club(681, "Real Sociedad"),
        club(1050, "Villarreal CF"),
    ])
}

#[test]
fn filter_matches_name_substring_case_insensitively() {
    let names = ["Real Madrid", "Real Sociedad"];
    assert_eq!(filter("mad", &names), vec!["Real Madrid"]);
    assert_eq!(filter("REAL", &names), vec!["Real Madrid", "Real Sociedad"]);
    assert!(filter("xyz", &names).is_empty());
}

#[test]
fn empty_query_keeps_every_candidate_in_order() {
    let names = vec!["Villarreal CF".to_string(), "Real Madrid".to_string()];
    assert_eq!(filter("", &names), names);
}

#[test]
fn acronyms_are_searchable() {
    let index = index();
    assert_eq!(index.search("fcb"), vec!["Futbol Club Barcelona"]);
    assert_eq!(index.search("rs"), vec!["Real Sociedad"]);
    assert_eq!(index.acronym_of("Villarreal CF"), Some("VC"));
    assert_eq!(acronym("Futbol Club Barcelona"), "FCB");
}

#[test]
fn search_keeps_dataset_order() {
    let index = index();
    // "real" hits two names plus Villarreal by substring.
    assert_eq!(
        index.search("real"),
        vec!["Real Madrid", "Real Sociedad", "Villarreal CF"]
    );
    assert_eq!(index.search("").len(), index.len());
}

#[test]
fn resolve_maps_names_to_ids() {
    let index = index();
    assert_eq!(index.resolve("Real Madrid").unwrap(), 418);
    assert!(matches!(
        index.resolve("real madrid"),
        Err(CompareError::NotFound(name)) if name == "real madrid"
    ));
}

#[test]
fn duplicate_names_keep_first_row() {
    let index = ClubIndex::new(&[club(1, "Alpha"), club(2, "Alpha"), club(3, "Beta")]);
    assert_eq!(index.len(), 2);
    assert_eq!(index.resolve("Alpha").unwrap(), 1);
    assert_eq!(index.names(), vec!["Alpha", "Beta"]);
}

#[test]
fn empty_index() {
    let index = ClubIndex::new(&[]);
    assert!(index.is_empty());
    assert!(index.search("a").is_empty());
}
