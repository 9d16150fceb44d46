use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, Sub},
};

/// Offsets of the 8 Moore neighbors, in row-major order
pub const MOORE_OFFSETS: [Pos2; 8] = [
    Pos2::new(-1, -1),
    Pos2::new(0, -1),
    Pos2::new(1, -1),
    Pos2::new(-1, 0),
    Pos2::new(1, 0),
    Pos2::new(-1, 1),
    Pos2::new(0, 1),
    Pos2::new(1, 1),
];

/// A cell coordinate; `x` grows to the right and `y` grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos2 {
    pub x: i32,
    pub y: i32,
}
impl Pos2 {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
    #[inline]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }
    #[inline]
    pub const fn one() -> Self {
        Self::new(1, 1)
    }

    /// Whether this position lies inside `[0, width) x [0, height)`
    #[inline]
    pub fn in_bounds(self, width: i32, height: i32) -> bool {
        (0..width).contains(&self.x) && (0..height).contains(&self.y)
    }

    /// Row-major buffer index, or [`None`] if the position is outside the grid
    #[inline]
    pub fn to_index(self, width: i32, height: i32) -> Option<usize> {
        self.in_bounds(width, height)
            .then(|| self.y as usize * width as usize + self.x as usize)
    }

    /// Inverse of [`Pos2::to_index`]
    #[inline]
    pub fn from_index(index: usize, width: i32) -> Self {
        let width = width as usize;
        Self::new((index % width) as i32, (index / width) as i32)
    }

    /// The Moore neighborhood of this position, bounds not considered
    pub fn neighbors(self) -> impl Iterator<Item = Pos2> {
        MOORE_OFFSETS.into_iter().map(move |offset| self + offset)
    }
}
impl Default for Pos2 {
    #[inline]
    fn default() -> Self {
        Self::zero()
    }
}
impl From<(i32, i32)> for Pos2 {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
impl fmt::Display for Pos2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
impl PartialOrd for Pos2 {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Pos2 {
    // row-major: y first, then x
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        Ord::cmp(&self.y, &other.y).then(Ord::cmp(&self.x, &other.x))
    }
}
impl Add for Pos2 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}
impl Sub for Pos2 {
    type Output = Pos2;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}
