//! Run-length encoded (RLE) pattern files.
//!
//! ```text
//! #N glider
//! x = 3, y = 3, rule = B3/S23
//! bo$2bo$3o!
//! ```

use crate::{
    Pos2,
    engine::Snapshot,
    error::{GridError, Result},
    rule::LifeLike,
};
use regex::Regex;

pub trait PatternCodec {
    fn encode(&self, cells: &[Pos2]) -> String;
    fn decode(&self, value: &str) -> Result<DecodedPattern>;

    fn encode_snapshot(&self, snapshot: &Snapshot) -> String {
        let cells: Vec<_> = snapshot.alive_positions().collect();
        self.encode(&cells)
    }
}

/// A pattern read back from a file, with cells relative to its top-left corner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPattern {
    pub name: Option<String>,
    pub width: i32,
    pub height: i32,
    pub rule: Option<LifeLike>,
    pub cells: Vec<Pos2>,
}

impl DecodedPattern {
    /// The cells shifted so the pattern's top-left lands on `origin`
    pub fn placed(&self, origin: Pos2) -> Vec<Pos2> {
        self.cells.iter().map(|&pos| pos + origin).collect()
    }
}

struct RunEncoder {
    sequence: String,
    line_len: usize,
    max_line_len: usize,
}
impl RunEncoder {
    fn new(max_line_len: usize) -> Self {
        Self {
            sequence: String::new(),
            line_len: 0,
            max_line_len,
        }
    }

    fn push_run(&mut self, run: i32, c: char) {
        let append = match run {
            0 => String::new(),
            1 => c.to_string(),
            n => format!("{}{}", n, c),
        };
        if self.line_len + append.len() > self.max_line_len {
            self.sequence.push('\n');
            self.line_len = 0;
        }
        self.line_len += append.len();
        self.sequence.push_str(&append);
    }

    fn end(mut self) -> String {
        self.sequence.push('!');
        self.sequence
    }
}

pub struct RunLengthEncoded {
    name: Option<String>,
    rule: Option<LifeLike>,
    header: bool,
}
impl RunLengthEncoded {
    pub fn set_name<T: AsRef<str>>(mut self, name: T) -> Self {
        self.name = Some(name.as_ref().to_owned());
        self
    }
    pub fn set_rule(mut self, rule: LifeLike) -> Self {
        self.rule = Some(rule);
        self
    }
    pub fn without_header(mut self) -> Self {
        self.header = false;
        self
    }

    /// Top-left corner and size of the smallest box holding every cell
    fn bounds(cells: &[Pos2]) -> (Pos2, i32, i32) {
        let Some(first) = cells.first() else {
            return (Pos2::zero(), 0, 0);
        };
        let (mut tl, mut br) = (*first, *first);
        for pos in cells {
            tl = Pos2::new(tl.x.min(pos.x), tl.y.min(pos.y));
            br = Pos2::new(br.x.max(pos.x), br.y.max(pos.y));
        }
        (tl, br.x - tl.x + 1, br.y - tl.y + 1)
    }

    fn encode_header(&self, width: i32, height: i32) -> String {
        let mut header = String::new();
        if !self.header {
            return header;
        }
        if let Some(name) = &self.name {
            header.push_str(&format!("#N {}\n", name));
        }
        let rule = self.rule.unwrap_or_default();
        header.push_str(&format!("x = {}, y = {}, rule = {}\n", width, height, rule));
        header
    }

    fn encode_cells(tl: Pos2, cells: &[Pos2]) -> String {
        let mut last = tl - Pos2::new(1, 0);
        let mut alive_run = 0;
        let mut seq = RunEncoder::new(70);
        for pos in cells {
            // if we're one ahead of the last, then only increment the run
            if last.y == pos.y && (last.x + 1) == pos.x {
                alive_run += 1;
                last = *pos;
                continue;
            }

            let lines_run = pos.y - last.y;
            let dead_run = match lines_run {
                0 => pos.x - last.x - 1,
                _ => pos.x - tl.x,
            };
            // NOTE: order matters!
            seq.push_run(alive_run, 'o');
            seq.push_run(lines_run, '$');
            seq.push_run(dead_run, 'b');

            alive_run = 1;
            last = *pos;
        }

        seq.push_run(alive_run, 'o');
        seq.end()
    }

    /// Moves a cursor coordinate along by `run`, refusing to pass the
    /// declared extent or overflow
    fn advance(from: i32, run: i32, limit: Option<i32>, axis: char) -> Result<i32> {
        let to = from
            .checked_add(run)
            .ok_or_else(|| GridError::Decode(format!("run of {run} overflows the {axis} axis")))?;
        match limit {
            Some(limit) if to > limit => Err(GridError::Decode(format!(
                "run of {run} passes the declared {axis} = {limit}"
            ))),
            _ => Ok(to),
        }
    }

    fn parse_header(line: &str) -> Result<(i32, i32, Option<LifeLike>)> {
        let re = Regex::new(r"^\s*x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)\s*(?:,\s*rule\s*=\s*(\S+))?")
            .map_err(|e| GridError::Decode(e.to_string()))?;
        let caps = re
            .captures(line)
            .ok_or_else(|| GridError::Decode(format!("bad header line `{line}`")))?;

        let dim = |i: usize| {
            caps[i]
                .parse::<i32>()
                .map_err(|e| GridError::Decode(format!("bad dimension `{}`: {e}", &caps[i])))
        };
        let rule = caps
            .get(3)
            .map(|m| m.as_str().parse::<LifeLike>())
            .transpose()?;
        Ok((dim(1)?, dim(2)?, rule))
    }
}
impl Default for RunLengthEncoded {
    fn default() -> Self {
        Self {
            name: None,
            rule: None,
            header: true,
        }
    }
}

impl PatternCodec for RunLengthEncoded {
    fn encode(&self, cells: &[Pos2]) -> String {
        let mut sorted = cells.to_vec();
        sorted.sort();
        sorted.dedup();

        let (tl, width, height) = Self::bounds(&sorted);
        format!(
            "{}{}\n",
            self.encode_header(width, height),
            Self::encode_cells(tl, &sorted)
        )
    }

    fn decode(&self, value: &str) -> Result<DecodedPattern> {
        let re = Regex::new(r"(\d*)([bo$!])").map_err(|e| GridError::Decode(e.to_string()))?;

        let mut name = None;
        let mut header = None;
        let mut cells = Vec::new();
        let mut cursor = Pos2::zero();
        'lines_loop: for line in value.lines() {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix('#') {
                if let Some(n) = rest.strip_prefix('N') {
                    name = Some(n.trim().to_owned());
                }
                continue;
            }
            if header.is_none() && cells.is_empty() && trimmed.starts_with('x') {
                header = Some(Self::parse_header(trimmed)?);
                continue;
            }

            if let Some(c) = trimmed
                .chars()
                .find(|c| !(c.is_ascii_digit() || c.is_whitespace() || "bo$!".contains(*c)))
            {
                return Err(GridError::Decode(format!("unexpected `{c}` in `{trimmed}`")));
            }

            for (_, [run_str, state]) in re.captures_iter(trimmed).map(|x| x.extract()) {
                let run = match run_str {
                    "" => 1,
                    digits => digits
                        .parse::<i32>()
                        .map_err(|e| GridError::Decode(format!("bad run `{digits}`: {e}")))?,
                };
                let limits = header.map(|(w, h, _)| (w, h));
                match state {
                    "!" => break 'lines_loop,
                    "o" => {
                        let end = Self::advance(cursor.x, run, limits.map(|l| l.0), 'x')?;
                        cells.extend((cursor.x..end).map(|x| Pos2::new(x, cursor.y)));
                        cursor.x = end;
                    }
                    "b" => cursor.x = Self::advance(cursor.x, run, limits.map(|l| l.0), 'x')?,
                    _ => {
                        cursor.x = 0;
                        cursor.y = Self::advance(cursor.y, run, limits.map(|l| l.1), 'y')?;
                    }
                }
            }
        }

        let (fallback_tl, fallback_w, fallback_h) = Self::bounds(&cells);
        let (width, height, rule) = match header {
            Some(h) => h,
            None => (fallback_tl.x + fallback_w, fallback_tl.y + fallback_h, None),
        };
        if let Some(&pos) = cells.iter().find(|pos| !pos.in_bounds(width, height)) {
            return Err(GridError::Decode(format!(
                "cell {pos} lies outside the declared {width}x{height} pattern"
            )));
        }

        Ok(DecodedPattern {
            name,
            width,
            height,
            rule,
            cells,
        })
    }
}
