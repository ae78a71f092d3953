use geo::Coord;
use parcours_core::prelude::*;

fn artwork(id: ArtworkId, x: f64, y: f64, room: RoomId, floor: Floor, kind: ArtworkType) -> Artwork {
    Artwork {
        id,
        title: format!("Artwork {id}"),
        position: Position::new(x, y, room, floor),
        narration_text: String::new(),
        narration_duration_seconds: 90.0,
        kind,
    }
}

/// Three ground-floor rooms in a row joined by two doors, with a partition
/// wall in the middle room
fn three_rooms() -> FloorPlanGraph {
    let rooms = vec![
        Room::rectangle(1, 0, (0.0, 0.0), (400.0, 300.0)),
        Room::rectangle(2, 0, (400.0, 0.0), (800.0, 300.0)),
        Room::rectangle(3, 0, (800.0, 0.0), (1200.0, 300.0)),
    ];
    let doors = [Door::at(1, 2, 400.0, 150.0), Door::at(2, 3, 800.0, 150.0)];
    let walls = [WallSegment::new(2, (600.0, 0.0), (600.0, 200.0))];
    FloorPlanGraph::build(rooms, &doors, &walls, &[]).unwrap()
}

fn ten_artworks() -> Vec<Artwork> {
    let kinds = [
        ArtworkType::Painting,
        ArtworkType::Sculpture,
        ArtworkType::Photography,
    ];
    (0..10)
        .map(|id| {
            let room = id % 3 + 1;
            let x = f64::from(room - 1) * 400.0 + 50.0 + f64::from(id) * 25.0;
            artwork(id, x, 100.0, room, 0, kinds[id as usize % 3])
        })
        .collect()
}

/// Two floors joined by stairs, plus a disconnected annex
fn two_floors() -> FloorPlanGraph {
    let rooms = vec![
        Room::rectangle(1, 0, (0.0, 0.0), (400.0, 300.0)),
        Room::rectangle(2, 0, (400.0, 0.0), (800.0, 300.0)),
        Room::rectangle(3, 1, (0.0, 0.0), (400.0, 300.0)),
        Room::rectangle(4, 1, (400.0, 0.0), (800.0, 300.0)),
        Room::rectangle(5, 0, (2000.0, 0.0), (2400.0, 300.0)),
        Room::rectangle(6, 0, (2400.0, 0.0), (2800.0, 300.0)),
    ];
    let doors = [Door::new(1, 2), Door::new(3, 4), Door::new(5, 6)];
    let stairs = VerticalLink {
        room_from: 2,
        room_to: 4,
        position: Coord { x: 700.0, y: 250.0 },
        kind: LinkKind::Stairs,
    };
    FloorPlanGraph::build(rooms, &doors, &[], &[stairs]).unwrap()
}

fn two_floor_artworks() -> Vec<Artwork> {
    let mut artworks = Vec::new();
    for (id, (room, floor, base)) in [(1, 0, 0.0), (2, 0, 400.0), (3, 1, 0.0), (4, 1, 400.0)]
        .into_iter()
        .cycle()
        .take(12)
        .enumerate()
    {
        let id = id as ArtworkId;
        let x = base + 40.0 + f64::from(id) * 25.0;
        artworks.push(artwork(id, x, 120.0, room, floor, ArtworkType::Painting));
    }
    artworks.push(artwork(100, 2100.0, 100.0, 5, 0, ArtworkType::Sculpture));
    artworks.push(artwork(101, 2500.0, 100.0, 6, 0, ArtworkType::Sculpture));
    artworks
}

#[test]
fn thirty_minute_tour_over_three_rooms() {
    let plan = three_rooms();
    let config = PlannerConfig::default();
    let candidates = ten_artworks();

    for seed in 0..8 {
        let request = PlanRequest::new(30.0).with_seed(seed);
        let tour = plan_tour(&plan, &candidates, &request, &config).unwrap();

        assert_eq!(tour.ordered_artworks().len(), 6);
        assert_eq!(tour.metadata().connectivity, ConnectivityMode::Connected);
        assert!(!tour.is_degraded());
        assert!(tour.total_distance_meters() > 0.0);
        assert!(tour.total_duration_minutes() > 0);

        let mut ids = tour.path_order();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }
}

#[test]
fn selection_is_bounded_by_candidates() {
    let plan = three_rooms();
    let config = PlannerConfig::default();
    let router = MultiRoomRouter::new(&plan, &config);
    let selector = ArtworkSelector::new(&router);
    let candidates = ten_artworks();

    for (target, seed) in [(1.0, 1), (30.0, 2), (600.0, 3)] {
        let selection = selector.select(&candidates, target, Some(seed)).unwrap();
        assert!(selection.artworks.len() <= candidates.len());
        assert!(selection.artworks.len() >= 3);
    }

    let two = &candidates[..2];
    let selection = selector.select(two, 30.0, Some(4)).unwrap();
    assert_eq!(selection.artworks.len(), 2);
}

#[test]
fn sequence_is_a_permutation_keeping_the_start() {
    let plan = three_rooms();
    let config = PlannerConfig::default();
    let router = MultiRoomRouter::new(&plan, &config);
    let sequencer = RouteSequencer::new(&router);

    let mut input = ten_artworks();
    input.rotate_left(4);
    let first = input[0].id;

    let ordered = sequencer.sequence(input.clone()).unwrap();
    assert_eq!(ordered.len(), input.len());
    assert_eq!(ordered[0].id, first);

    let mut expected: Vec<_> = input.iter().map(|a| a.id).collect();
    let mut actual: Vec<_> = ordered.iter().map(|a| a.id).collect();
    expected.sort_unstable();
    actual.sort_unstable();
    assert_eq!(actual, expected);
}

#[test]
fn pruning_keeps_one_component() {
    let plan = two_floors();
    let config = PlannerConfig::default();
    let candidates = two_floor_artworks();

    for seed in 0..8 {
        let request = PlanRequest::new(60.0).with_seed(seed);
        let tour = plan_tour(&plan, &candidates, &request, &config).unwrap();
        assert_eq!(tour.metadata().connectivity, ConnectivityMode::Connected);
        assert!(
            tour.ordered_artworks()
                .iter()
                .all(|artwork| (1..=4).contains(&artwork.position.room))
        );
    }
}

#[test]
fn segments_never_span_floors() {
    let plan = two_floors();
    let config = PlannerConfig::default();
    let candidates: Vec<_> = two_floor_artworks()
        .into_iter()
        .filter(|artwork| artwork.position.room <= 4)
        .collect();

    let entrance = Position::new(20.0, 20.0, 1, 0);
    let request = PlanRequest::new(90.0).with_seed(11).with_entrance(entrance);
    let tour = plan_tour(&plan, &candidates, &request, &config).unwrap();

    assert!(tour.metadata().floors_visited >= 1);
    assert!(tour.metadata().entrance_distance_meters.is_some());
    for segment in tour.segments() {
        assert_eq!(segment.from.position.floor, segment.to.position.floor);
        assert_eq!(segment.floor, segment.from.position.floor);
        assert!(segment.segment_index >= ENTRANCE_SEGMENT_INDEX);
    }
}

#[test]
fn isolated_catalogue_plans_in_minimal_mode() {
    let rooms = vec![
        Room::rectangle(1, 0, (0.0, 0.0), (400.0, 300.0)),
        Room::rectangle(2, 0, (1000.0, 0.0), (1400.0, 300.0)),
    ];
    let plan = FloorPlanGraph::build(rooms, &[], &[], &[]).unwrap();
    let config = PlannerConfig::default();
    let candidates = vec![
        artwork(1, 50.0, 50.0, 1, 0, ArtworkType::Painting),
        artwork(2, 350.0, 250.0, 1, 0, ArtworkType::Painting),
        artwork(3, 1100.0, 50.0, 2, 0, ArtworkType::Sculpture),
    ];

    let tour = plan_tour(&plan, &candidates, &PlanRequest::new(30.0).with_seed(5), &config).unwrap();
    assert!(tour.is_degraded());
    assert_eq!(tour.metadata().connectivity, ConnectivityMode::Minimal);
    assert!(matches!(
        tour.metadata().warnings[0],
        PlanningWarning::DegradedConnectivity { candidate_count: 3 }
    ));
    assert!(tour.metadata().low_confidence_legs >= 1);
}

#[test]
fn wall_forces_a_detour() {
    let plan = three_rooms();
    let config = PlannerConfig::default();
    let pathfinder = GridPathfinder::new(&plan, &config);

    let from = Position::new(500.0, 100.0, 2, 0);
    let to = Position::new(700.0, 100.0, 2, 0);
    let path = pathfinder.find_path(&from, &to).unwrap();

    assert_eq!(path.status, PathStatus::Found);
    assert!(path.distance_meters > from.planar_distance(&to) * config.scale_meters_per_unit);
    assert!(path.waypoints.len() > 2);
    assert!(path.waypoints.iter().any(|waypoint| waypoint.position.y > 200.0));
}

#[test]
fn tour_exports_geojson() {
    let plan = three_rooms();
    let config = PlannerConfig::default();
    let tour = plan_tour(
        &plan,
        &ten_artworks(),
        &PlanRequest::new(30.0).with_seed(42),
        &config,
    )
    .unwrap();

    let collection = tour.to_geojson();
    assert_eq!(collection.features.len(), tour.segments().len());
    let text = tour.to_geojson_string().unwrap();
    assert!(text.contains("\"segment_index\""));
}
