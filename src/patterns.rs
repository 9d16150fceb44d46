//! Well-known seed patterns, placed relative to a caller-chosen top-left origin.

use crate::Pos2;

pub struct Pattern {
    pub name: &'static str,
    /// Offsets from the origin, row-major
    pub cells: &'static [(i32, i32)],
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "block",
        cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
    },
    Pattern {
        name: "blinker",
        cells: &[(0, 0), (1, 0), (2, 0)],
    },
    Pattern {
        name: "toad",
        cells: &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
    },
    Pattern {
        name: "beacon",
        cells: &[(0, 0), (1, 0), (0, 1), (3, 2), (2, 3), (3, 3)],
    },
    Pattern {
        // travels toward +x, +y
        name: "glider",
        cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
    },
    Pattern {
        name: "r-pentomino",
        cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
    },
];

impl Pattern {
    pub fn place(&self, origin: Pos2) -> Vec<Pos2> {
        let mut cells: Vec<_> = self
            .cells
            .iter()
            .map(|&offset| origin + Pos2::from(offset))
            .collect();
        cells.sort();
        cells
    }

    /// Width and height of the pattern's bounding box
    pub fn size(&self) -> (i32, i32) {
        let w = self.cells.iter().map(|c| c.0 + 1).max().unwrap_or(0);
        let h = self.cells.iter().map(|c| c.1 + 1).max().unwrap_or(0);
        (w, h)
    }
}

/// Looks up a pattern by name, ignoring case
pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

fn placed(name: &str, origin: Pos2) -> Vec<Pos2> {
    find(name).map(|p| p.place(origin)).unwrap_or_default()
}

pub fn block(origin: Pos2) -> Vec<Pos2> {
    placed("block", origin)
}
pub fn blinker(origin: Pos2) -> Vec<Pos2> {
    placed("blinker", origin)
}
pub fn glider(origin: Pos2) -> Vec<Pos2> {
    placed("glider", origin)
}
