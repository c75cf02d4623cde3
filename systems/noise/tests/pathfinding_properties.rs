use std::collections::{BTreeMap, VecDeque};

use maze_ctf_core::{Position, Tag};
use maze_ctf_system_noise::{PathError, Pathfinder};
use maze_ctf_world::Maze;
use proptest::prelude::*;

fn build_maze(width: u32, height: u32, walls: &[bool]) -> Maze {
    let mut maze = Maze::walled(width, height);
    let inner = (width - 2) as usize;
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let offset = (y - 1) as usize * inner + (x - 1) as usize;
            if !walls.get(offset).copied().unwrap_or(false) {
                maze.set(Position::new(x, y), Tag::Free).expect("in bounds");
            }
        }
    }
    maze
}

fn breadth_first_distances(maze: &Maze, origin: Position) -> BTreeMap<Position, usize> {
    let mut distances = BTreeMap::new();
    let mut queue = VecDeque::from([origin]);
    let _ = distances.insert(origin, 0);
    while let Some(cell) = queue.pop_front() {
        let next = distances[&cell] + 1;
        for neighbor in maze.free_neighbors(cell) {
            if !distances.contains_key(&neighbor) {
                let _ = distances.insert(neighbor, next);
                queue.push_back(neighbor);
            }
        }
    }
    distances
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// A* agrees with breadth-first search on every pair of free cells.
    #[test]
    fn path_lengths_match_breadth_first_search(
        width in 4u32..12,
        height in 4u32..10,
        walls in prop::collection::vec(prop::bool::weighted(0.3), 80),
        start_pick in any::<prop::sample::Index>(),
        goal_pick in any::<prop::sample::Index>(),
    ) {
        let maze = build_maze(width, height, &walls);
        let free = maze.pos_of(Tag::Free);
        prop_assume!(!free.is_empty());
        let start = free[start_pick.index(free.len())];
        let goal = free[goal_pick.index(free.len())];

        let distances = breadth_first_distances(&maze, start);
        let mut pathfinder = Pathfinder::new();
        let result = pathfinder.shortest_path(&maze, start, goal);

        match distances.get(&goal) {
            Some(expected) => {
                let path = result.expect("reachable goal");
                prop_assert_eq!(path.len(), *expected);
                let mut previous = start;
                for cell in &path {
                    prop_assert_eq!(previous.manhattan_distance(*cell), 1);
                    prop_assert!(maze.is_free(*cell));
                    previous = *cell;
                }
                if let Some(last) = path.last() {
                    prop_assert_eq!(*last, goal);
                }
            }
            None => {
                prop_assert_eq!(result, Err(PathError::Unreachable { start, goal }));
            }
        }
    }

    /// Repeated searches with a shared workspace return identical paths.
    #[test]
    fn searches_are_deterministic(
        width in 4u32..12,
        height in 4u32..10,
        walls in prop::collection::vec(prop::bool::weighted(0.2), 80),
    ) {
        let maze = build_maze(width, height, &walls);
        let free = maze.pos_of(Tag::Free);
        prop_assume!(free.len() >= 2);
        let start = free[0];
        let goal = free[free.len() - 1];

        let mut pathfinder = Pathfinder::new();
        let first = pathfinder.shortest_path(&maze, start, goal);
        let second = pathfinder.shortest_path(&maze, start, goal);
        prop_assert_eq!(first, second);
    }
}
