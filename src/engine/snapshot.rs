use crate::Pos2;

/// An owned, immutable copy of one generation
///
/// Cells are stored row-major (`index = y * width + x`). A snapshot never
/// changes after it is taken, so callers can render or hash it while the grid
/// keeps stepping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Snapshot {
    width: i32,
    height: i32,
    generation: u64,
    cells: Vec<bool>,
}

impl Snapshot {
    pub(super) fn new(width: i32, height: i32, generation: u64, cells: Vec<bool>) -> Self {
        debug_assert_eq!(cells.len(), width as usize * height as usize);
        Self {
            width,
            height,
            generation,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// State of the cell at `(x, y)`; anything outside the grid reads as dead
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        Pos2::new(x, y)
            .to_index(self.width, self.height)
            .is_some_and(|i| self.cells[i])
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Live cell positions in row-major order
    pub fn alive_positions(&self) -> impl Iterator<Item = Pos2> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &alive)| alive)
            .map(move |(i, _)| Pos2::from_index(i, width))
    }

    /// Live cell positions inside the half-open rectangle `[top_left, bottom_right)`
    pub fn window(&self, top_left: Pos2, bottom_right: Pos2) -> impl Iterator<Item = Pos2> + '_ {
        let rx = top_left.x..bottom_right.x;
        let ry = top_left.y..bottom_right.y;
        self.alive_positions()
            .filter(move |pos| rx.contains(&pos.x) && ry.contains(&pos.y))
    }

    #[inline]
    pub fn into_cells(self) -> Vec<bool> {
        self.cells
    }
}
