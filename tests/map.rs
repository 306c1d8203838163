use landgrab::buildings::{Building, BuildingKind};
use landgrab::map::tile::LandType;
use landgrab::map::valid_agent_id;
use landgrab::{Map, MapPosition, MAX_AGENTS};

#[test]
fn valid_agent_ids_are_bounded_by_bitfield_width() {
    assert!(valid_agent_id(0));
    assert!(valid_agent_id(MAX_AGENTS - 1));
    assert!(!valid_agent_id(MAX_AGENTS));
    assert!(!valid_agent_id(MAX_AGENTS + 100));
}

#[test]
fn grid_dimensions_and_tile_positions() {
    let map = Map::new(100, 100);
    assert_eq!(map.width(), 100);
    assert_eq!(map.height(), 100);
    assert_eq!(map.tile_count(), 10_000);

    let tile = map.tile(MapPosition::new(5, 5)).unwrap();
    assert_eq!(tile.position(), MapPosition::new(5, 5));
    assert_eq!(tile.land(), LandType::Land);
    assert!(tile.buildings().is_empty());
}

#[test]
fn bounds_checking() {
    let map = Map::new(100, 100);

    assert!(map.contains(MapPosition::new(0, 0)));
    assert!(map.contains(MapPosition::new(99, 99)));
    assert!(map.contains(MapPosition::new(54, 50)));

    assert!(!map.contains(MapPosition::new(-1, 0)));
    assert!(!map.contains(MapPosition::new(0, -1)));
    assert!(!map.contains(MapPosition::new(100, 100)));
    assert!(!map.contains(MapPosition::new(100, 5)));
    assert!(!map.contains(MapPosition::new(5, 100)));
}

#[test]
fn off_grid_positions_yield_absent_tiles() {
    let map = Map::new(100, 100);

    assert!(map.tile(MapPosition::new(5, 5)).is_some());
    assert!(map.tile(MapPosition::new(0, 0)).is_some());
    assert!(map.tile(MapPosition::new(99, 99)).is_some());

    assert!(map.tile(MapPosition::new(100, 100)).is_none());
    assert!(map.tile(MapPosition::new(-1, 0)).is_none());
    assert!(map.tile(MapPosition::new(0, -1)).is_none());
}

#[test]
fn visibility_bits_are_independent_per_agent() {
    let mut map = Map::new(100, 100);
    let pos = MapPosition::new(3, 5);
    let agent = 10;
    let other = 3;

    assert!(!map.is_visible(pos, agent));
    assert!(!map.is_visible(pos, other));

    map.set_visible(pos, agent);
    assert!(map.is_visible(pos, agent));
    assert!(!map.is_visible(pos, other));

    map.set_visible(pos, other);
    assert!(map.is_visible(pos, agent));
    assert!(map.is_visible(pos, other));

    map.clear_visible(pos, agent);
    assert!(!map.is_visible(pos, agent));
    assert!(map.is_visible(pos, other));
}

#[test]
fn invalid_agent_ids_never_touch_the_bitfield() {
    let mut map = Map::new(100, 100);
    let pos = MapPosition::new(3, 5);
    let agent = 3;
    let invalid = MAX_AGENTS;

    map.set_visible(pos, agent);

    map.set_visible(pos, invalid);
    assert!(map.is_visible(pos, agent));
    assert!(!map.is_visible(pos, invalid));

    map.clear_visible(pos, invalid);
    assert!(map.is_visible(pos, agent));
    assert!(!map.is_visible(pos, invalid));

    let bits = map.tile(pos).unwrap().visibility_bits();
    assert_eq!(bits, 1 << agent);
}

#[test]
fn low_level_claim_sets_owner_unconditionally() {
    let mut map = Map::new(100, 100);
    let pos = MapPosition::new(2, 4);

    assert_eq!(map.tile(pos).unwrap().owner(), None);
    map.claim_tile(7, pos);
    assert_eq!(map.tile(pos).unwrap().owner(), Some(7));
}

#[test]
fn add_and_remove_building_through_the_map() {
    let mut map = Map::new(100, 100);
    let pos = MapPosition::new(2, 4);
    let city = Building::new(BuildingKind::City, Some(1), pos, 110.0, 10.0);

    assert!(!map.tile(pos).unwrap().has_any_building());
    map.add_building(city, pos);
    assert!(map.tile(pos).unwrap().has_any_building());
    assert!(map.tile(pos).unwrap().has_building(BuildingKind::City));

    let removed = map.remove_building(BuildingKind::City, pos).unwrap();
    assert_eq!(removed.kind, BuildingKind::City);
    assert!(!map.tile(pos).unwrap().has_any_building());
}

#[test]
fn tile_is_next_to_building() {
    let mut map = Map::new(100, 100);
    let pos = MapPosition::new(3, 5);
    let adjacent = MapPosition::new(4, 5);

    assert!(!map.tile_is_next_to_building(adjacent));

    let city = Building::new(BuildingKind::City, Some(1), pos, 110.0, 10.0);
    map.add_building(city, pos);

    assert!(map.tile_is_next_to_building(adjacent));
}

#[test]
fn surrounding_tiles_interior_edge_and_corner() {
    let map = Map::new(100, 100);

    let middle = map.surrounding_tiles(MapPosition::new(2, 2));
    assert_eq!(middle.len(), 8);
    let expected = [
        (1, 1),
        (2, 1),
        (3, 1),
        (1, 2),
        (3, 2),
        (1, 3),
        (2, 3),
        (3, 3),
    ];
    for tile in &middle {
        let pos = (tile.position().x, tile.position().y);
        assert!(expected.contains(&pos), "unexpected neighbor {pos:?}");
    }

    let corner = map.surrounding_tiles(MapPosition::new(0, 0));
    assert_eq!(corner.len(), 3);
    let expected = [(1, 0), (0, 1), (1, 1)];
    for tile in &corner {
        let pos = (tile.position().x, tile.position().y);
        assert!(expected.contains(&pos), "unexpected neighbor {pos:?}");
    }

    let edge = map.surrounding_tiles(MapPosition::new(2, 0));
    assert_eq!(edge.len(), 5);
    let expected = [(1, 0), (3, 0), (1, 1), (2, 1), (3, 1)];
    for tile in &edge {
        let pos = (tile.position().x, tile.position().y);
        assert!(expected.contains(&pos), "unexpected neighbor {pos:?}");
    }
}

#[test]
fn reset_clears_every_tile() {
    let mut map = Map::new(10, 10);
    let pos = MapPosition::new(4, 4);
    map.claim_tile(2, pos);
    map.set_visible(pos, 2);
    map.add_building(
        Building::new(BuildingKind::Farm, Some(2), pos, 20.0, 2.0),
        pos,
    );

    map.reset();

    let tile = map.tile(pos).unwrap();
    assert_eq!(tile.owner(), None);
    assert_eq!(tile.visibility_bits(), 0);
    assert!(!tile.has_any_building());
}
