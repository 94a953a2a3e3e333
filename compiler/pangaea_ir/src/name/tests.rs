use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_name_layout() {
    let name = Name::new(5, 1000);
    assert_eq!(name.shard(), 5);
    assert_eq!(name.local(), 1000);
}

#[test]
fn test_name_empty() {
    assert_eq!(Name::EMPTY.as_str(), "");
    assert_eq!(Name::intern(""), Name::EMPTY);
}

#[test]
fn test_same_string_same_name() {
    let a = Name::intern("_missing");
    let b = Name::from("_missing");
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "_missing");
    assert_eq!(a.to_string(), "_missing");
}

#[test]
fn test_scoped_variable_names() {
    for s in ["\\", "\\0", "\\1", "\\_", "\\name", "even?", "<=>"] {
        assert_eq!(Name::intern(s).as_str(), s);
    }
}
