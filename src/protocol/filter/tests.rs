use super::*;

fn set(pgns: &[u32]) -> BTreeSet<u32> {
    pgns.iter().copied().collect()
}

#[test]
/// When a PGN sits in both lists, the include list wins.
fn test_include_wins_over_exclude() {
    assert!(allowed(130306, &set(&[130306]), &set(&[130306])));
}

#[test]
fn test_include_only() {
    let include = set(&[127250, 128267]);
    assert!(allowed(127250, &include, &set(&[])));
    assert!(!allowed(129025, &include, &set(&[])));
    // Exclusions are ignored while an include list exists.
    assert!(!allowed(129025, &include, &set(&[127250])));
}

#[test]
fn test_exclude_only() {
    let exclude = set(&[129038, 129039]);
    assert!(!allowed(129038, &set(&[]), &exclude));
    assert!(allowed(127250, &set(&[]), &exclude));
}

#[test]
fn test_empty_lists_allow_everything() {
    let filter = PgnFilter::allow_all();
    assert!(filter.allows(0));
    assert!(filter.allows(129029));
    assert!(filter.allows(0x3FFFF));
}

#[test]
fn test_owned_filter_matches_function() {
    let filter = PgnFilter::new(set(&[]), set(&[60928]));
    assert!(!filter.allows(60928));
    assert!(filter.allows(129029));
    assert_eq!(filter.exclude(), &set(&[60928]));
}
