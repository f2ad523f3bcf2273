#[cfg(test)]
mod tests {
    use crate::builder::PuzzleBuilder;
    use crate::direction::Direction;
    use crate::generator::{Generator, GeneratorConfig};
    use crate::location::Location;
    use crate::puzzle::{Puzzle, PuzzleState};
    use crate::solver::Solver;
    use crate::validator::ValidatorEngine;

    fn square_with_tail() -> Puzzle {
        PuzzleBuilder::with_dims((5, 5))
            .add_island(Location(0, 0), 3)
            .add_island(Location(3, 0), 3)
            .add_island(Location(0, 3), 1)
            .add_island(Location(3, 3), 1)
            .build()
            .unwrap()
    }

    #[test]
    fn two_islands_double_bridge() {
        let mut puzzle = PuzzleBuilder::with_dims((5, 5))
            .add_island(Location(0, 0), 2)
            .add_island(Location(3, 0), 2)
            .build()
            .unwrap();

        assert_eq!(format!("{}", puzzle), "2..2.
.....
.....
.....
.....
");
        assert_eq!(puzzle.state(), PuzzleState::NotSolved);

        let solver = Solver::new();
        assert_eq!(solver.next_safe_connection(&puzzle), Some(0));
        assert_eq!(solver.solve(&mut puzzle), 2);
        assert_eq!(puzzle.connections().len(), 1);
        assert!(puzzle.connections()[0].is_double());
        assert_eq!(puzzle.state(), PuzzleState::Solved);
        assert_eq!(format!("{}", puzzle), "2==2.
.....
.....
.....
.....
");
    }

    #[test]
    fn two_islands_single_bridge() {
        let mut puzzle = PuzzleBuilder::with_dims((4, 4))
            .add_island(Location(1, 0), 1)
            .add_island(Location(1, 3), 1)
            .build()
            .unwrap();

        assert_eq!(Solver::new().solve(&mut puzzle), 1);
        assert_eq!(puzzle.state(), PuzzleState::Solved);
        assert_eq!(format!("{}", puzzle), ".1..
.|..
.|..
.1..
");
    }

    #[test]
    fn solve_square_with_tail() {
        let mut puzzle = square_with_tail();
        // the two single islands may not be joined to each other
        let bottom = puzzle.connection_between(2, 3).unwrap();
        assert!(!puzzle.has_possible_move(bottom));

        Solver::new().solve(&mut puzzle);
        assert_eq!(puzzle.state(), PuzzleState::Solved);
        assert_eq!(format!("{}", puzzle), "3==3.
|..|.
|..|.
1..1.
.....
");
    }

    #[test]
    fn restart_restores_requirements() {
        let mut puzzle = square_with_tail();
        Solver::new().solve(&mut puzzle);
        puzzle.restart();

        for island in puzzle.islands() {
            assert_eq!(
                puzzle.remaining_bridge_count(island.id()),
                i32::from(island.required_bridges())
            );
        }
        assert!(puzzle.connections().iter().all(|c| c.bridge_count() == 0 && c.is_valid()));
        assert_eq!(puzzle.state(), PuzzleState::NotSolved);
    }

    #[test]
    fn fill_missing_connections_is_idempotent() {
        let mut puzzle = PuzzleBuilder::with_dims((7, 7))
            .add_island(Location(0, 0), 2)
            .add_island(Location(4, 0), 3)
            .add_island(Location(0, 3), 2)
            .add_island(Location(4, 3), 4)
            .add_island(Location(6, 3), 1)
            .add_island(Location(4, 6), 2)
            .add_connection(3, 1, 1)
            .build()
            .unwrap();

        let before = puzzle.connections().to_vec();
        puzzle.fill_missing_connections();
        assert_eq!(puzzle.connections(), before.as_slice());

        let keys: Vec<(usize, usize)> = before.iter().map(|c| c.sort_key()).collect();
        assert_eq!(keys, vec![(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (3, 5)]);
        // declared direction is kept
        let existing = puzzle.connection_between(1, 3).unwrap();
        assert_eq!(puzzle.connections()[existing].start(), 3);
        assert_eq!(puzzle.connections()[existing].bridge_count(), 1);
    }

    #[test]
    fn adjacency_index_points_both_ways() {
        let puzzle = square_with_tail();
        let top = puzzle.connection_between(0, 1);

        assert_eq!(puzzle.neighbor(0, Direction::Right), top);
        assert_eq!(puzzle.neighbor(1, Direction::Left), top);
        assert_eq!(puzzle.neighbor(0, Direction::Up), None);
        assert_eq!(
            puzzle.neighbors(3).map(|(dir, _)| dir).collect::<Vec<_>>(),
            vec![Direction::Up, Direction::Left]
        );
        assert_eq!(puzzle.nearest_in_direction(2, Direction::Right), Some(3));
    }

    #[test]
    fn crossing_bridges_are_marked() {
        let mut puzzle = PuzzleBuilder::with_dims((5, 5))
            .add_island(Location(0, 2), 1)
            .add_island(Location(4, 2), 1)
            .add_island(Location(2, 0), 1)
            .add_island(Location(2, 4), 1)
            .add_connection(0, 1, 1)
            .add_connection(2, 3, 1)
            .build()
            .unwrap();

        puzzle.mark_invalid_connections();
        assert!(puzzle.connections().iter().all(|c| !c.is_valid()));
        assert_eq!(puzzle.state(), PuzzleState::Error);

        // marking again from a different state starts from scratch
        let vertical = puzzle.connection_between(2, 3).unwrap();
        puzzle.set_bridge_count(vertical, 0);
        puzzle.mark_invalid_connections();
        assert!(puzzle.connections().iter().all(|c| c.is_valid()));
        assert!(puzzle.would_cross(vertical));
    }

    #[test]
    fn one_bridge_crossing_two() {
        //   |
        // --+--
        //   |
        // --+--
        //   |
        let mut puzzle = PuzzleBuilder::with_dims((5, 5))
            .add_island(Location(2, 0), 1)
            .add_island(Location(0, 1), 1)
            .add_island(Location(4, 1), 1)
            .add_island(Location(0, 3), 1)
            .add_island(Location(4, 3), 1)
            .add_island(Location(2, 4), 1)
            .add_connection(0, 5, 1)
            .add_connection(1, 2, 1)
            .add_connection(3, 4, 1)
            .build()
            .unwrap();

        let vertical = puzzle.connection_between(0, 5).unwrap();
        let upper = puzzle.connection_between(1, 2).unwrap();
        let lower = puzzle.connection_between(3, 4).unwrap();
        let mut pairs = puzzle.crossing_pairs();
        pairs.sort();
        let mut expected = vec![
            (upper.min(vertical), upper.max(vertical)),
            (lower.min(vertical), lower.max(vertical)),
        ];
        expected.sort();
        assert_eq!(pairs, expected);

        // unbuilt placeholders never cross
        let side = puzzle.connection_between(1, 3).unwrap();
        assert_eq!(puzzle.connections()[side].bridge_count(), 0);

        puzzle.mark_invalid_connections();
        assert!(!puzzle.connections()[vertical].is_valid());
        assert!(!puzzle.connections()[upper].is_valid());
        assert!(!puzzle.connections()[lower].is_valid());
        assert!(puzzle.connections()[side].is_valid());
        assert_eq!(puzzle.state(), PuzzleState::Error);
    }

    #[test]
    fn parallel_bridges_stay_valid() {
        let mut puzzle = PuzzleBuilder::with_dims((5, 5))
            .add_island(Location(0, 0), 1)
            .add_island(Location(4, 0), 1)
            .add_island(Location(0, 2), 1)
            .add_island(Location(4, 2), 1)
            .add_connection(0, 1, 1)
            .add_connection(2, 3, 1)
            .build()
            .unwrap();

        puzzle.mark_invalid_connections();
        assert!(puzzle.connections().iter().all(|c| c.is_valid()));
        assert!(puzzle.crossing_pairs().is_empty());
    }

    #[test]
    fn disconnected_groups_are_not_solved() {
        let puzzle = PuzzleBuilder::with_dims((7, 7))
            .add_island(Location(0, 0), 2)
            .add_island(Location(2, 0), 2)
            .add_island(Location(4, 4), 2)
            .add_island(Location(6, 4), 2)
            .add_connection(0, 1, 2)
            .add_connection(2, 3, 2)
            .build()
            .unwrap();

        assert!(puzzle
            .islands()
            .iter()
            .all(|island| puzzle.remaining_bridge_count(island.id()) == 0));
        assert!(!puzzle.is_connected());
        assert_eq!(puzzle.state(), PuzzleState::NoLongerSolvable);
    }

    #[test]
    fn over_built_island_is_an_error() {
        let mut puzzle = PuzzleBuilder::with_dims((5, 5))
            .add_island(Location(0, 0), 1)
            .add_island(Location(3, 0), 2)
            .build()
            .unwrap();

        assert!(puzzle.increment_bridge(0));
        assert_eq!(puzzle.state(), PuzzleState::NoLongerSolvable);
        assert!(puzzle.increment_bridge(0));
        assert_eq!(puzzle.remaining_bridge_count(0), -1);
        assert_eq!(puzzle.state(), PuzzleState::Error);
        assert!(!puzzle.increment_bridge(0));
        assert_eq!(Solver::new().next_safe_connection(&puzzle), None);
    }

    #[test]
    fn solver_does_not_guess() {
        let puzzle = PuzzleBuilder::with_dims((5, 5))
            .add_island(Location(0, 0), 2)
            .add_island(Location(2, 0), 2)
            .add_island(Location(0, 2), 2)
            .add_island(Location(2, 2), 2)
            .build()
            .unwrap();

        assert_eq!(Solver::new().next_safe_connection(&puzzle), None);
        assert_eq!(puzzle.state(), PuzzleState::NotSolved);
    }

    #[test]
    fn cycling_and_emphasis() {
        let mut puzzle = square_with_tail();
        let top = puzzle.connection_between(0, 1).unwrap();

        assert_eq!(puzzle.cycle_bridge(top), Some(1));
        assert_eq!(puzzle.cycle_bridge(top), Some(2));
        assert_eq!(puzzle.cycle_bridge(top), Some(0));
        assert_eq!(puzzle.cycle_bridge(99), None);
        assert!(!puzzle.set_bridge_count(top, 3));

        puzzle.set_emphasized(top, true);
        assert!(puzzle.connections()[top].is_emphasized());
        puzzle.clear_emphasis();
        assert!(!puzzle.connections()[top].is_emphasized());
    }

    #[test]
    fn generated_puzzles_are_valid() {
        let engine = ValidatorEngine::generation();
        let sizes = [
            (4, 4, 2),
            (4, 4, 3),
            (6, 5, 5),
            (10, 10, 10),
            (15, 12, 14),
            (25, 25, 16),
        ];
        for (seed, (width, height, islands)) in sizes.into_iter().enumerate() {
            let puzzle = Generator::from_seed(seed as u64)
                .generate_solved(width, height, islands)
                .unwrap();
            assert_eq!(puzzle.islands().len(), islands);
            assert_eq!((puzzle.width(), puzzle.height()), (width, height));
            assert_eq!(engine.validate(&puzzle), Ok(()));
            assert_eq!(puzzle.state(), PuzzleState::Solved);
        }
    }

    #[test]
    fn generated_solution_is_recovered_by_solver() {
        let solver = Solver::new();
        for seed in 0..10 {
            let solved = Generator::from_seed(seed).generate_solved(8, 8, 7).unwrap();
            let mut puzzle = solved.clone();
            puzzle.restart();

            solver.solve(&mut puzzle);
            assert_eq!(puzzle.state(), PuzzleState::Solved);
            assert_eq!(puzzle.connections(), solved.connections());
        }
    }

    #[test]
    fn generator_without_deducibility_check() {
        let config = GeneratorConfig {
            require_deducible: false,
            solved: true,
            ..GeneratorConfig::default()
        };
        let mut generator = Generator::from_seed(11).with_config(config);

        for _ in 0..5 {
            let puzzle = generator.generate(12, 9, 12).unwrap();
            assert!(ValidatorEngine::generation().is_valid(&puzzle));
            assert_eq!(puzzle.state(), PuzzleState::Solved);
        }
    }
}
