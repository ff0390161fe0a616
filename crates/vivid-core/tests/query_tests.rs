use vivid_core::{parse, Json};

fn media_doc() -> Json {
    parse(
        r#"{
            "codec_name": "top",
            "streams": [
                {"codec_name": "h264", "tags": {"codec_name": "deep1"}},
                {"codec_name": "aac"}
            ],
            "format": {"codec_name": "fmt"}
        }"#,
    )
    .unwrap()
}

fn strings(values: impl Iterator<Item = Json>) -> Vec<String> {
    values.map(|v| v.as_string()).collect()
}

// ============================================================================
// Search by name
// ============================================================================

#[test]
fn find_all_order_is_shallow_first_per_container() {
    let doc = media_doc();
    assert_eq!(
        strings(doc.find_all("codec_name")),
        vec!["top", "fmt", "h264", "deep1", "aac"]
    );
}

#[test]
fn find_returns_the_first_match() {
    assert_eq!(media_doc().find("codec_name").as_string(), "top");
}

#[test]
fn find_below_a_subtree() {
    let doc = media_doc();
    let streams = doc.get("streams");
    assert_eq!(
        strings(streams.find_all("codec_name")),
        vec!["h264", "deep1", "aac"]
    );
    assert_eq!(streams.find("codec_name").as_string(), "h264");
}

#[test]
fn find_missing_name_is_absent() {
    let doc = media_doc();
    let found = doc.find("bitrate");
    assert!(!found.is_defined());
    assert_eq!(found.as_int_or(-1), -1);
    assert_eq!(doc.find_all("bitrate").count(), 0);
}

#[test]
fn exists_reports_presence() {
    let doc = media_doc();
    assert!(doc.exists("tags"));
    assert!(doc.exists("codec_name"));
    assert!(!doc.exists("bitrate"));
}

#[test]
fn null_values_count_as_found() {
    let doc = parse(r#"{"a":{"b":null}}"#).unwrap();
    assert!(doc.exists("b"));
    assert!(doc.find("b").is_null());
}

#[test]
fn container_values_are_returned_as_live_handles() {
    let doc = media_doc();
    let tags = doc.find("tags");
    assert!(tags.is_object());
    tags.set("language", "eng").unwrap();
    assert_eq!(
        doc.get("streams").at(0).get("tags").get("language").as_string(),
        "eng"
    );
}

#[test]
fn matches_under_a_matched_key_are_found_too() {
    let doc = parse(r#"{"k":{"k":{"k":1}}}"#).unwrap();
    let found: Vec<Json> = doc.find_all("k").collect();
    assert_eq!(found.len(), 3);
    assert!(found[0].is_object());
    assert_eq!(found[2].as_int(), 1);
}

#[test]
fn array_elements_have_no_key() {
    let doc = parse(r#"{"list":[{"0":"zero"},"x"]}"#).unwrap();
    assert_eq!(strings(doc.find_all("0")), vec!["zero"]);
    assert!(!doc.exists("1"));
}

#[test]
fn search_on_scalars_finds_nothing() {
    assert!(!Json::from(1).exists("a"));
    assert!(!Json::absent().exists("a"));
    assert_eq!(Json::from("a").find_all("a").count(), 0);
}

#[test]
fn search_is_lazy() {
    let doc = media_doc();
    let mut matches = doc.find_all("codec_name");
    assert_eq!(matches.next().unwrap().as_string(), "top");
    assert_eq!(matches.next().unwrap().as_string(), "fmt");
    assert_eq!(strings(matches), vec!["h264", "deep1", "aac"]);
}

#[test]
fn mutation_during_iteration_does_not_panic() {
    let doc = media_doc();
    let mut seen = 0;
    for found in doc.find_all("codec_name") {
        seen += 1;
        doc.set("extra", found).unwrap();
    }
    assert!(seen >= 5);
}

// ============================================================================
// Search by predicate
// ============================================================================

fn numbers_doc() -> Json {
    parse(r#"{"a":1,"b":{"c":2,"d":[3,{"e":4}]},"f":5}"#).unwrap()
}

#[test]
fn find_all_where_numbers() {
    let found: Vec<i32> = numbers_doc()
        .find_all_where(Json::is_number)
        .map(|v| v.as_int())
        .collect();
    assert_eq!(found, vec![1, 5, 2, 3, 4]);
}

#[test]
fn find_all_where_containers() {
    let doc = numbers_doc();
    let found: Vec<Json> = doc.find_all_where(Json::is_object).collect();
    assert_eq!(found.len(), 2);
    assert!(found[0].same_node(&doc.get("b")));
    assert_eq!(found[1].to_compact_string(), r#"{"e":4}"#);
}

#[test]
fn root_is_not_a_candidate() {
    let doc = parse(r#"{"a":[]}"#).unwrap();
    let found: Vec<Json> = doc.find_all_where(Json::is_object).collect();
    assert!(found.is_empty());
    assert!(doc.exists_where(Json::is_array));
}

#[test]
fn find_where_with_closure() {
    let doc = numbers_doc();
    let big = doc.find_where(|v| v.as_double_or(0.0) > 3.5);
    assert_eq!(big.as_int(), 5);
    assert!(!doc.find_where(|v| v.as_int() > 100).is_defined());
}

#[test]
fn predicate_can_borrow_local_state() {
    let doc = media_doc();
    let wanted = String::from("aac");
    let found: Vec<Json> = doc
        .find_all_where(|v| v.as_str() == Some(wanted.as_str()))
        .collect();
    assert_eq!(found.len(), 1);
}

#[test]
fn exists_where_reports_presence() {
    let doc = media_doc();
    assert!(doc.exists_where(|v| v == "deep1"));
    assert!(!doc.exists_where(Json::is_boolean));
}

#[test]
fn predicate_search_sees_array_elements() {
    let doc = parse(r#"{"list":["a",["b"],"c"]}"#).unwrap();
    let found = strings(doc.find_all_where(Json::is_string));
    assert_eq!(found, vec!["a", "c", "b"]);
}
