mod index;
mod snapshot;

use self::index::TransitionTable;
pub use self::snapshot::Snapshot;
use crate::{
    Pos2,
    error::{GridError, Result},
    pos::MOORE_OFFSETS,
    rule::Rule,
};
use rand::{Rng, RngCore};
use rayon::prelude::*;

/// How a freshly allocated grid is populated
pub enum InitPolicy<'a> {
    /// Draw `max_live` positions uniformly, with replacement, and set each alive
    Random {
        max_live: usize,
        rng: &'a mut dyn RngCore,
    },
    /// Exactly these cells alive, every other cell dead
    Cells(&'a [Pos2]),
}

/// A bounded (non-wrapping) grid of binary cells
///
/// `step` recomputes every cell from the current generation into a fresh
/// buffer and then swaps it in, so no cell ever sees a neighbor from the
/// generation being built. Stepping takes `&mut self`: a grid has a single
/// writer at a time, and snapshots are owned copies.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    generation: u64,
    table: TransitionTable,
    cells: Vec<bool>,
}

impl Grid {
    /// A grid with every cell dead
    pub fn empty<R: Rule + ?Sized>(width: i32, height: i32, rule: &R) -> Result<Self> {
        if width <= 0 || height <= 0 {
            return Err(GridError::InvalidDimension { width, height });
        }
        Ok(Self {
            width,
            height,
            generation: 0,
            table: TransitionTable::compile(rule),
            cells: vec![false; width as usize * height as usize],
        })
    }

    pub fn new<R: Rule + ?Sized>(
        width: i32,
        height: i32,
        rule: &R,
        policy: InitPolicy<'_>,
    ) -> Result<Self> {
        let mut grid = Self::empty(width, height, rule)?;
        match policy {
            InitPolicy::Random { max_live, rng } => grid.seed_random(max_live, rng),
            InitPolicy::Cells(cells) => grid.seed_cells(cells)?,
        }
        log::debug!(
            "created {}x{} grid with {} live cells",
            width,
            height,
            grid.alive_count()
        );
        Ok(grid)
    }

    /// Convenience for [`InitPolicy::Cells`]
    #[inline]
    pub fn from_cells<R: Rule + ?Sized>(
        width: i32,
        height: i32,
        rule: &R,
        cells: &[Pos2],
    ) -> Result<Self> {
        Self::new(width, height, rule, InitPolicy::Cells(cells))
    }

    /// Sets `max_live` uniformly sampled cells alive
    ///
    /// Samples are drawn with replacement, so fewer than `max_live` distinct
    /// cells may end up alive.
    pub fn seed_random<G: Rng + ?Sized>(&mut self, max_live: usize, rng: &mut G) {
        for _ in 0..max_live {
            let x = rng.random_range(0..self.width);
            let y = rng.random_range(0..self.height);
            let i = self.index_unchecked(x, y);
            self.cells[i] = true;
        }
    }

    /// Sets every listed cell alive
    ///
    /// All coordinates are validated first; if any is out of bounds the grid
    /// is left untouched.
    pub fn seed_cells(&mut self, cells: &[Pos2]) -> Result<()> {
        let indices = cells
            .iter()
            .map(|&pos| {
                pos.to_index(self.width, self.height)
                    .ok_or(GridError::OutOfBounds {
                        pos,
                        width: self.width,
                        height: self.height,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        for i in indices {
            self.cells[i] = true;
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }
    /// Number of `step` calls applied since construction
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn is_alive(&self, x: i32, y: i32) -> bool {
        Pos2::new(x, y)
            .to_index(self.width, self.height)
            .is_some_and(|i| self.cells[i])
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Live cells among the 8 Moore neighbors of `(x, y)`
    ///
    /// Neighbors outside the grid count as dead; edges do not wrap.
    pub fn neighbor_count(&self, x: i32, y: i32) -> u8 {
        let mut count = 0;
        for offset in MOORE_OFFSETS {
            let (Some(nx), Some(ny)) = (x.checked_add(offset.x), y.checked_add(offset.y)) else {
                continue;
            };
            if nx < 0 || ny < 0 || nx >= self.width || ny >= self.height {
                continue;
            }
            count += u8::from(self.cells[self.index_unchecked(nx, ny)]);
        }
        count
    }

    /// Advances the grid by one generation
    pub fn step(&mut self) {
        let mut next = vec![false; self.cells.len()];
        for (y, row) in next.chunks_mut(self.width as usize).enumerate() {
            self.compute_row(y as i32, row);
        }
        self.swap_in(next);
    }

    /// Same as [`Grid::step`], with rows split across the rayon pool
    ///
    /// Every worker reads only the current generation and writes only its own
    /// rows of the next one; the swap happens after all rows are done.
    pub fn step_parallel(&mut self) {
        let mut next = vec![false; self.cells.len()];
        next.par_chunks_mut(self.width as usize)
            .enumerate()
            .for_each(|(y, row)| self.compute_row(y as i32, row));
        self.swap_in(next);
    }

    /// Steps until a generation equals the one before it
    ///
    /// Returns the number of steps taken, the last being the one that
    /// changed nothing, or [`None`] if `max_steps` ran out first.
    pub fn run_until_stable(&mut self, max_steps: u64) -> Option<u64> {
        for taken in 1..=max_steps {
            let before = self.cells.clone();
            self.step();
            if before == self.cells {
                return Some(taken);
            }
        }
        None
    }

    /// A copy of the current generation
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.width, self.height, self.generation, self.cells.clone())
    }

    fn compute_row(&self, y: i32, row: &mut [bool]) {
        let offset = self.index_unchecked(0, y);
        for (x, next) in row.iter_mut().enumerate() {
            let alive = self.cells[offset + x];
            *next = self
                .table
                .next_state(alive, self.neighbor_count(x as i32, y));
        }
    }

    fn swap_in(&mut self, next: Vec<bool>) {
        debug_assert_eq!(next.len(), self.cells.len());
        self.cells = next;
        self.generation += 1;
        log::trace!(
            "generation {} has {} live cells",
            self.generation,
            self.alive_count()
        );
    }

    /// Callers guarantee `(x, y)` is in bounds
    #[inline]
    fn index_unchecked(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        patterns,
        rule::{LifeLike, RuleVariant},
    };
    use rand::{SeedableRng, rngs::StdRng};

    fn pos(x: i32, y: i32) -> Pos2 {
        Pos2 { x, y }
    }

    fn alive(grid: &Grid) -> Vec<Pos2> {
        grid.snapshot().alive_positions().collect()
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        for (w, h) in [(0, 5), (5, 0), (-1, 3), (3, -4)] {
            let err = Grid::empty(w, h, &RuleVariant::Strict).unwrap_err();
            assert_eq!(err, GridError::InvalidDimension { width: w, height: h });
        }
    }

    #[test]
    fn out_of_bounds_seed_applies_nothing() {
        let mut grid = Grid::empty(4, 4, &RuleVariant::Strict).unwrap();
        let err = grid.seed_cells(&[pos(1, 1), pos(4, 0)]).unwrap_err();

        assert_eq!(
            err,
            GridError::OutOfBounds {
                pos: pos(4, 0),
                width: 4,
                height: 4
            }
        );
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn construction_with_negative_seed_fails() {
        let result = Grid::from_cells(4, 4, &RuleVariant::Strict, &[pos(-1, 2)]);

        assert!(matches!(result, Err(GridError::OutOfBounds { .. })));
    }

    #[test]
    fn neighbor_count_ignores_outside_cells() {
        // fully alive 3x3: corners see 3, edges 5, center 8
        let all: Vec<_> = (0..3).flat_map(|y| (0..3).map(move |x| pos(x, y))).collect();
        let grid = Grid::from_cells(3, 3, &RuleVariant::Strict, &all).unwrap();

        assert_eq!(grid.neighbor_count(0, 0), 3);
        assert_eq!(grid.neighbor_count(2, 2), 3);
        assert_eq!(grid.neighbor_count(1, 0), 5);
        assert_eq!(grid.neighbor_count(1, 1), 8);
    }

    #[test]
    fn neighbor_count_excludes_self() {
        let grid = Grid::from_cells(3, 3, &RuleVariant::Strict, &[pos(1, 1)]).unwrap();

        assert_eq!(grid.neighbor_count(1, 1), 0);
        assert_eq!(grid.neighbor_count(0, 0), 1);
    }

    #[test]
    fn neighbor_count_at_coordinate_limits() {
        let all: Vec<_> = (0..4).flat_map(|y| (0..4).map(move |x| pos(x, y))).collect();
        let grid = Grid::from_cells(4, 4, &RuleVariant::Strict, &all).unwrap();

        for (x, y) in [
            (i32::MAX, 0),
            (i32::MIN, 0),
            (0, i32::MAX),
            (0, i32::MIN),
            (i32::MAX, i32::MIN),
        ] {
            assert_eq!(grid.neighbor_count(x, y), 0, "({x}, {y})");
        }
        // just outside the grid still sees the border cells
        assert_eq!(grid.neighbor_count(-1, 0), 2);
        assert_eq!(grid.neighbor_count(4, 4), 1);
    }

    #[test]
    fn corner_cell_dies_without_wraparound() {
        for rule in [RuleVariant::Strict, RuleVariant::SurvivalBiased] {
            let mut grid = Grid::from_cells(8, 8, &rule, &[pos(0, 0)]).unwrap();
            for _ in 0..5 {
                grid.step();
                assert_eq!(grid.alive_count(), 0, "{rule}");
            }
        }
    }

    #[test]
    fn opposite_edges_do_not_interact() {
        // a vertical triple hugging the right edge would give (0, 1) three
        // neighbors on a torus; bounded, the blinker is cut off at the edge
        let mut grid = Grid::from_cells(
            6,
            6,
            &RuleVariant::Strict,
            &[pos(5, 0), pos(5, 1), pos(5, 2)],
        )
        .unwrap();
        grid.step();

        assert!(!grid.is_alive(0, 1));
        assert_eq!(alive(&grid), vec![pos(4, 1), pos(5, 1)]);
    }

    #[test]
    fn block_is_still_life() {
        let cells = patterns::block(pos(3, 3));
        let mut grid = Grid::from_cells(8, 8, &RuleVariant::Strict, &cells).unwrap();
        let initial = grid.snapshot();

        for _ in 0..10 {
            grid.step();
            assert_eq!(grid.snapshot().cells(), initial.cells());
        }
        assert_eq!(grid.generation(), 10);
    }

    #[test]
    fn blinker_oscillates() {
        let cells = patterns::blinker(pos(2, 3));
        let mut grid = Grid::from_cells(7, 7, &RuleVariant::Strict, &cells).unwrap();

        grid.step();
        assert_eq!(alive(&grid), vec![pos(3, 2), pos(3, 3), pos(3, 4)]);
        grid.step();
        assert_eq!(alive(&grid), cells);
    }

    #[test]
    fn glider_translates_diagonally() {
        let origin = pos(4, 4);
        let mut grid =
            Grid::from_cells(16, 16, &RuleVariant::Strict, &patterns::glider(origin)).unwrap();

        for _ in 0..4 {
            grid.step();
        }

        let mut expected = patterns::glider(origin + Pos2::one());
        expected.sort();
        assert_eq!(alive(&grid), expected);
    }

    #[test]
    fn strict_kills_overcrowded_cells() {
        // plus shape: the center has 4 neighbors
        let cells = [pos(2, 1), pos(1, 2), pos(2, 2), pos(3, 2), pos(2, 3)];
        let mut strict = Grid::from_cells(5, 5, &RuleVariant::Strict, &cells).unwrap();
        let mut biased = Grid::from_cells(5, 5, &RuleVariant::SurvivalBiased, &cells).unwrap();
        strict.step();
        biased.step();

        assert!(!strict.is_alive(2, 2));
        assert!(biased.is_alive(2, 2));
    }

    #[test]
    fn survival_biased_never_reproduces() {
        // (1, 1) is dead with exactly 3 neighbors
        let cells = [pos(0, 0), pos(2, 0), pos(0, 2)];
        let mut strict = Grid::from_cells(3, 3, &RuleVariant::Strict, &cells).unwrap();
        let mut biased = Grid::from_cells(3, 3, &RuleVariant::SurvivalBiased, &cells).unwrap();
        strict.step();
        biased.step();

        assert!(strict.is_alive(1, 1));
        assert!(!biased.is_alive(1, 1));
    }

    #[test]
    fn survival_biased_reaches_fixed_point() {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        let mut grid = Grid::new(
            16,
            16,
            &RuleVariant::SurvivalBiased,
            InitPolicy::Random {
                max_live: 96,
                rng: &mut rng,
            },
        )
        .unwrap();

        let mut last = grid.alive_count();
        let cap = 16 * 16;
        let mut steps = 0;
        loop {
            let before = grid.snapshot();
            grid.step();
            steps += 1;
            assert!(grid.alive_count() <= last);
            last = grid.alive_count();
            if grid.snapshot().cells() == before.cells() {
                break;
            }
            assert!(steps < cap, "no fixed point within {cap} generations");
        }
    }

    #[test]
    fn run_until_stable_reports_steps() {
        let mut grid =
            Grid::from_cells(8, 8, &RuleVariant::Strict, &patterns::block(pos(2, 2))).unwrap();
        assert_eq!(grid.run_until_stable(10), Some(1));

        let mut grid =
            Grid::from_cells(8, 8, &RuleVariant::Strict, &patterns::blinker(pos(2, 2))).unwrap();
        assert_eq!(grid.run_until_stable(10), None);
        assert_eq!(grid.generation(), 10);
    }

    #[test]
    fn random_seed_respects_bound() {
        let mut rng = StdRng::seed_from_u64(42);
        let grid = Grid::new(
            10,
            10,
            &RuleVariant::Strict,
            InitPolicy::Random {
                max_live: 30,
                rng: &mut rng,
            },
        )
        .unwrap();

        assert!(grid.alive_count() <= 30);
        assert!(grid.alive_count() > 0);
    }

    #[test]
    fn random_seed_keeps_duplicates_collapsed() {
        // on a 1x1 grid every sample hits the same cell
        let mut rng = StdRng::seed_from_u64(1);
        let grid = Grid::new(
            1,
            1,
            &RuleVariant::Strict,
            InitPolicy::Random {
                max_live: 5,
                rng: &mut rng,
            },
        )
        .unwrap();

        assert_eq!(grid.alive_count(), 1);
    }

    #[test]
    fn same_seed_same_grid() {
        let build = || {
            let mut rng = StdRng::seed_from_u64(7);
            Grid::new(
                20,
                12,
                &RuleVariant::Strict,
                InitPolicy::Random {
                    max_live: 50,
                    rng: &mut rng,
                },
            )
            .unwrap()
        };
        let (mut a, mut b) = (build(), build());

        for _ in 0..20 {
            assert_eq!(a.snapshot(), b.snapshot());
            a.step();
            b.step();
        }
    }

    #[test]
    fn parallel_step_matches_serial() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut serial = Grid::empty(33, 21, &RuleVariant::Strict).unwrap();
        serial.seed_random(300, &mut rng);
        let mut parallel = serial.clone();

        for _ in 0..15 {
            serial.step();
            parallel.step_parallel();
            assert_eq!(serial.snapshot(), parallel.snapshot());
        }
    }

    #[test]
    fn custom_rule_plugs_in() {
        // B1/S: every dead neighbor of a lone cell is born, the cell itself dies
        let rule: LifeLike = "B1/S".parse().unwrap();
        let mut grid = Grid::from_cells(5, 5, &rule, &[pos(2, 2)]).unwrap();
        grid.step();

        assert_eq!(grid.alive_count(), 8);
        assert!(!grid.is_alive(2, 2));
    }

    #[test]
    fn snapshot_is_detached_from_grid() {
        let mut grid = Grid::from_cells(4, 4, &RuleVariant::Strict, &[pos(1, 1)]).unwrap();
        let before = grid.snapshot();
        grid.step();

        assert_eq!(before.len(), 16);
        assert!(before.get(1, 1));
        assert_eq!(before.generation(), 0);
        assert!(!grid.is_alive(1, 1));
    }
}
