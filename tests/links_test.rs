use gmail_extract::*;
use serde_json::json;
use std::collections::HashSet;

fn set(values: Vec<String>) -> HashSet<String> {
    values.into_iter().collect()
}

fn expected(values: &[&str]) -> HashSet<String> {
    values.iter().map(ToString::to_string).collect()
}

#[test]
fn test_extract_detailed() {
    let links = extract_detailed(&["see https://a.com/x and https://b.com"]).unwrap();
    assert_eq!(set(links), expected(&["https://a.com/x", "https://b.com"]));
}

#[test]
fn test_extract_detailed_deduplicates_and_keeps_case() {
    let links = extract_detailed(&[
        "https://Example.com/Path?q=1",
        "again https://Example.com/Path?q=1",
        "http://other.org",
    ])
    .unwrap();

    assert_eq!(links.len(), 2);
    assert_eq!(
        set(links),
        expected(&["https://Example.com/Path?q=1", "http://other.org"])
    );
}

#[test]
fn test_extract_detailed_ignores_schemeless() {
    let links = extract_detailed(&["www.example.com", "ftp://files.example.com"]).unwrap();
    assert!(links.is_empty());
}

#[test]
fn test_extract_basic() {
    let links = extract_basic(&["https://a.com/x/y"]).unwrap();
    assert_eq!(set(links), expected(&["https://a.com"]));
}

#[test]
fn test_extract_basic_deduplicates_domains() {
    let links = extract_basic(&[
        "https://a.com/x",
        "https://a.com/y",
        "text http://b.org/page more",
    ])
    .unwrap();
    assert_eq!(set(links), expected(&["https://a.com", "http://b.org"]));
}

#[test]
fn test_extract_basic_boundaries() {
    // Port is part of the authority; query and fragment are not
    assert_eq!(
        extract_basic(&["https://a.com:8080/path"]).unwrap(),
        vec!["https://a.com:8080"]
    );
    assert_eq!(
        extract_basic(&["https://a.com:8080"]).unwrap(),
        vec!["https://a.com:8080"]
    );
    assert_eq!(
        extract_basic(&["https://a.com?utm_source=mail"]).unwrap(),
        vec!["https://a.com"]
    );
    assert_eq!(
        extract_basic(&["https://a.com#top"]).unwrap(),
        vec!["https://a.com"]
    );
    assert_eq!(
        extract_basic(&["https://a.com and more"]).unwrap(),
        vec!["https://a.com"]
    );
}

#[test]
fn test_extract_empty_input() {
    let none: [&str; 0] = [];
    assert!(extract_detailed(&none).unwrap().is_empty());
    assert!(extract_basic(&none).unwrap().is_empty());
}

#[test]
fn test_extract_value_accepts_string_list() {
    let links = extract_detailed_value(&json!(["https://a.com/x", "https://a.com/x"])).unwrap();
    assert_eq!(links, vec!["https://a.com/x"]);

    let domains = extract_basic_value(&json!(["https://a.com/x"])).unwrap();
    assert_eq!(domains, vec!["https://a.com"]);
}

#[test]
fn test_extract_value_rejects_non_list() {
    for value in [json!("https://a.com"), json!({"href": "https://a.com"}), json!(null)] {
        assert!(matches!(
            extract_detailed_value(&value),
            Err(ExtractError::TypeMismatch { .. })
        ));
        assert!(matches!(
            extract_basic_value(&value),
            Err(ExtractError::TypeMismatch { .. })
        ));
    }
}

#[test]
fn test_extract_value_rejects_non_string_element() {
    let value = json!(["https://a.com", 3]);

    let err = extract_detailed_value(&value).unwrap_err();
    assert!(matches!(err, ExtractError::TypeMismatch { found, .. } if found == "number"));

    assert!(matches!(
        extract_basic_value(&value),
        Err(ExtractError::TypeMismatch { .. })
    ));
}

#[test]
fn test_link_mode_dispatch() {
    let raw = vec![
        "https://a.com/x".to_string(),
        "https://a.com/y".to_string(),
        "www.b.com".to_string(),
    ];

    assert_eq!(LinkMode::None.extract(&raw).unwrap(), None);

    let basic = LinkMode::Basic.extract(&raw).unwrap().unwrap();
    assert_eq!(basic.count, 1);
    assert_eq!(basic.values, vec!["https://a.com"]);

    let detailed = LinkMode::Detailed.extract(&raw).unwrap().unwrap();
    assert_eq!(detailed.count, 2);
    assert_eq!(
        set(detailed.values),
        expected(&["https://a.com/x", "https://a.com/y"])
    );
}
