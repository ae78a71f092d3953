use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use parcours_core::prelude::*;

const ROOMS_PER_FLOOR: u32 = 6;
const FLOORS: i32 = 3;
const ROOM_SIZE: f64 = 800.0;

/// Row of rooms on every floor with a zigzag of partition walls and stairs
/// between floors at the last room
fn museum() -> (FloorPlanGraph, Vec<Artwork>) {
    let mut rooms = Vec::new();
    let mut doors = Vec::new();
    let mut walls = Vec::new();
    let mut links = Vec::new();
    let mut artworks = Vec::new();

    for floor in 0..FLOORS {
        for slot in 0..ROOMS_PER_FLOOR {
            let id = floor.unsigned_abs() * 100 + slot;
            let min_x = f64::from(slot) * ROOM_SIZE;
            rooms.push(Room::rectangle(
                id,
                floor,
                (min_x, 0.0),
                (min_x + ROOM_SIZE, ROOM_SIZE),
            ));
            if slot > 0 {
                doors.push(Door::at(id - 1, id, min_x, ROOM_SIZE / 2.0));
            }
            for step in 1..4 {
                let x = min_x + f64::from(step) * ROOM_SIZE / 4.0;
                let (y1, y2) = if step % 2 == 0 {
                    (ROOM_SIZE * 0.3, ROOM_SIZE)
                } else {
                    (0.0, ROOM_SIZE * 0.7)
                };
                walls.push(WallSegment::new(id, (x, y1), (x, y2)));
            }
            for index in 0..5 {
                let artwork_id = id * 10 + index;
                artworks.push(Artwork {
                    id: artwork_id,
                    title: format!("Artwork {artwork_id}"),
                    position: Position::new(
                        min_x + 40.0 + f64::from(index) * 180.0,
                        ROOM_SIZE / 2.0,
                        id,
                        floor,
                    ),
                    narration_text: String::new(),
                    narration_duration_seconds: 60.0 + f64::from(index) * 15.0,
                    kind: match index % 3 {
                        0 => ArtworkType::Painting,
                        1 => ArtworkType::Sculpture,
                        _ => ArtworkType::Photography,
                    },
                });
            }
        }
        if floor > 0 {
            let last = ROOMS_PER_FLOOR - 1;
            links.push(VerticalLink {
                room_from: (floor - 1).unsigned_abs() * 100 + last,
                room_to: floor.unsigned_abs() * 100 + last,
                position: geo::Coord {
                    x: f64::from(last) * ROOM_SIZE + ROOM_SIZE - 40.0,
                    y: 40.0,
                },
                kind: LinkKind::Stairs,
            });
        }
    }

    let plan = FloorPlanGraph::build(rooms, &doors, &walls, &links).unwrap();
    (plan, artworks)
}

fn bench_grid_pathfinding(c: &mut Criterion) {
    let (plan, _) = museum();
    let config = PlannerConfig::default();
    let from = Position::new(20.0, 20.0, 0, 0);
    let to = Position::new(ROOM_SIZE - 20.0, ROOM_SIZE - 20.0, 0, 0);

    c.bench_function("grid_astar_zigzag", |b| {
        b.iter(|| {
            // Fresh pathfinder so the obstacle grid is rasterized every time
            let pathfinder = GridPathfinder::new(&plan, &config);
            black_box(pathfinder.find_path(&from, &to).unwrap())
        });
    });

    let pathfinder = GridPathfinder::new(&plan, &config);
    c.bench_function("grid_astar_zigzag_cached", |b| {
        b.iter(|| black_box(pathfinder.find_path(&from, &to).unwrap()));
    });
}

fn bench_multi_room(c: &mut Criterion) {
    let (plan, _) = museum();
    let config = PlannerConfig::default();
    let router = MultiRoomRouter::new(&plan, &config);
    let from = Position::new(20.0, 20.0, 0, 0);
    let to = Position::new(400.0, 400.0, 200, 2);

    c.bench_function("multi_room_three_floors", |b| {
        b.iter(|| black_box(router.find_path(&from, &to).unwrap()));
    });
}

fn bench_plan_tour(c: &mut Criterion) {
    let (plan, artworks) = museum();
    let config = PlannerConfig::default();
    let request = PlanRequest::new(60.0).with_seed(7);

    let mut group = c.benchmark_group("plan_tour");
    group.sample_size(10);
    group.bench_function("sixty_minutes", |b| {
        b.iter(|| black_box(plan_tour(&plan, &artworks, &request, &config).unwrap()));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_grid_pathfinding,
    bench_multi_room,
    bench_plan_tour
);
criterion_main!(benches);
