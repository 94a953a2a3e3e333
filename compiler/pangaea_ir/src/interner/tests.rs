use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_intern_is_idempotent() {
    let table = interner();
    let a = table.intern("bear");
    let b = table.intern("bear");
    assert_eq!(a, b);
    assert_eq!(table.lookup(a), "bear");
}

#[test]
fn test_distinct_strings_get_distinct_names() {
    let table = interner();
    assert!(table.intern("keys") != table.intern("values"));
}

#[test]
fn test_protocol_names_preinterned() {
    let table = interner();
    let before = table.len();
    table.intern("_iter");
    table.intern("_missing");
    assert_eq!(table.len(), before);
    assert!(!table.is_empty());
}

#[test]
fn test_concurrent_interning() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(move || {
                (0..100)
                    .map(|i| interner().intern(&format!("sym{}", i % 10)))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<Name>> = handles
        .into_iter()
        .map(|h| h.join().unwrap_or_default())
        .collect();
    for r in &results[1..] {
        assert_eq!(r, &results[0]);
    }
}
