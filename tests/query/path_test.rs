//! Relationship path enumeration.

use custom_objects::query::{enumerate, path_count, DepthLimit, Direction, RelationshipPath};

#[test]
fn test_counts_follow_doubling() {
    for depth in 1..=6 {
        let limit = DepthLimit::new(depth).unwrap();
        let paths = enumerate(limit);
        let expected: u64 = 1 + (2..=depth).map(|d| 1u64 << (d - 1)).sum::<u64>();

        assert_eq!(paths.len() as u64, expected);
        assert_eq!(path_count(limit), expected);
    }
}

#[test]
fn test_each_level_is_a_binary_counter() {
    use Direction::{HigherToLower as H, LowerToHigher as L};

    let paths = enumerate(DepthLimit::new(4).unwrap());
    let level_four: Vec<RelationshipPath> = paths.into_iter().filter(|p| p.depth() == 4).collect();

    assert_eq!(level_four.len(), 8);
    assert_eq!(level_four[0], RelationshipPath::new([L, L, L]));
    assert_eq!(level_four[1], RelationshipPath::new([L, L, H]));
    assert_eq!(level_four[4], RelationshipPath::new([H, L, L]));
    assert_eq!(level_four[7], RelationshipPath::new([H, H, H]));
}

#[test]
fn test_paths_are_distinct() {
    let paths = enumerate(DepthLimit::new(5).unwrap());
    let unique: std::collections::HashSet<_> = paths.iter().collect();
    assert_eq!(unique.len(), paths.len());
}

#[test]
fn test_direction_columns() {
    assert_eq!(Direction::LowerToHigher.from_column(), "custom_item_id_lower");
    assert_eq!(Direction::LowerToHigher.to_column(), "custom_item_id_higher");
    assert_eq!(Direction::HigherToLower.from_column(), "custom_item_id_higher");
    assert_eq!(Direction::HigherToLower.to_column(), "custom_item_id_lower");
}
