use anyhow::{Context, bail};
use lifegrid::{LifeLike, RuleVariant};

const DEFAULT_WIDTH: i32 = 320;
const DEFAULT_HEIGHT: i32 = 240;

pub struct Args {
    matches: getopts::Matches,
}

impl Args {
    fn options() -> getopts::Options {
        let mut opts = getopts::Options::new();
        opts.optflag("", "help", "print this help menu");
        opts.optflag("t", "threads", "step rows in parallel");
        opts.optopt("o", "output", "write the last generation as RLE", "FILE");
        opts.optopt("i", "input", "seed from an RLE pattern file", "FILE");
        opts.optopt("p", "pattern", "seed from a named pattern", "NAME");
        opts.optopt("w", "width", "set grid width", "WIDTH");
        opts.optopt("h", "height", "set grid height", "HEIGHT");
        opts.optopt("l", "live", "max live cells for random seeding", "COUNT");
        opts.optopt("", "seed", "seed for the random number generator", "U64");
        opts.optopt(
            "r",
            "rule",
            "strict, survival, or a rule such as B36/S23",
            "RULE",
        );
        opts.optopt("g", "gens", "max number of generations", "COUNT");
        opts.optopt("", "stats", "write stats csv to file", "FILE");
        opts.optopt("", "log-level", "error, warn, info, debug or trace", "LEVEL");
        opts
    }

    /// `Ok(None)` when `--help` was requested and usage has been printed
    pub fn new<T: AsRef<str>>(args: &[T]) -> anyhow::Result<Option<Self>> {
        let opts = Self::options();
        let matches = opts
            .parse(args.iter().map(T::as_ref))
            .context("invalid arguments")?;
        if matches.opt_present("help") {
            println!("{}", opts.usage("usage: lifegrid [options]"));
            return Ok(None);
        }
        Ok(Some(Self { matches }))
    }
    pub fn from_env() -> anyhow::Result<Option<Self>> {
        let env = std::env::args().skip(1).collect::<Vec<_>>();
        Self::new(&env)
    }

    fn get<T>(&self, name: &str) -> anyhow::Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.matches
            .opt_get(name)
            .map_err(|e| anyhow::anyhow!("--{name}: {e}"))
    }

    pub fn grid_size(&self) -> anyhow::Result<(i32, i32)> {
        let width = self.get("width")?.unwrap_or(DEFAULT_WIDTH);
        let height = self.get("height")?.unwrap_or(DEFAULT_HEIGHT);
        Ok((width, height))
    }

    /// Defaults to a tenth of the grid
    pub fn max_live(&self) -> anyhow::Result<usize> {
        let (w, h) = self.grid_size()?;
        let default = (w.max(0) as usize * h.max(0) as usize) / 10;
        Ok(self.get("live")?.unwrap_or(default))
    }

    pub fn seed(&self) -> anyhow::Result<Option<u64>> {
        self.get("seed")
    }

    /// `None` runs until the grid stops changing
    pub fn generations(&self) -> anyhow::Result<Option<u64>> {
        self.get("gens")
    }

    pub fn rule(&self) -> anyhow::Result<Option<LifeLike>> {
        let Some(text) = self.matches.opt_str("rule") else {
            return Ok(None);
        };
        if let Ok(variant) = text.parse::<RuleVariant>() {
            return Ok(Some(variant.into()));
        }
        match text.parse::<LifeLike>() {
            Ok(rule) => Ok(Some(rule)),
            Err(e) => bail!("--rule: {e}"),
        }
    }

    pub fn threads(&self) -> bool {
        self.matches.opt_present("threads")
    }
    pub fn log_level(&self) -> Option<String> {
        self.matches.opt_str("log-level")
    }

    pub fn pattern(&self) -> Option<String> {
        self.matches.opt_str("pattern")
    }
    pub fn input_file(&self) -> Option<String> {
        self.matches.opt_str("input")
    }
    pub fn output_file(&self) -> Option<String> {
        self.matches.opt_str("output")
    }
    pub fn stats_file(&self) -> Option<String> {
        self.matches.opt_str("stats")
    }
}
