use anyhow::Context;
use lifegrid::{
    Grid, InitPolicy, LifeLike, PatternCodec, Pos2, RunLengthEncoded, patterns,
    stats::{CsvRecord, Recorder},
};
use rand::{RngCore, SeedableRng, rngs::StdRng};

mod options;

/// Cells to seed plus the rule a pattern file asked for, if any
enum Seeding {
    Random { max_live: usize, rng: Box<dyn RngCore> },
    Cells(Vec<Pos2>, Option<LifeLike>),
}

/// Places a `pw`x`ph` pattern in the middle of a `w`x`h` grid
fn centered(w: i32, h: i32, pw: i32, ph: i32) -> Pos2 {
    Pos2::new((w - pw) / 2, (h - ph) / 2)
}

fn seeding(args: &options::Args) -> anyhow::Result<Seeding> {
    let (w, h) = args.grid_size()?;

    if let Some(file_name) = args.input_file() {
        let text = std::fs::read_to_string(&file_name)
            .with_context(|| format!("reading pattern file {file_name}"))?;
        let pattern = RunLengthEncoded::default()
            .decode(&text)
            .with_context(|| format!("decoding {file_name}"))?;
        log::info!(
            "loaded {} ({} cells)",
            pattern.name.as_deref().unwrap_or(&file_name),
            pattern.cells.len()
        );
        let origin = centered(w, h, pattern.width, pattern.height);
        return Ok(Seeding::Cells(pattern.placed(origin), pattern.rule));
    }

    if let Some(name) = args.pattern() {
        let pattern =
            patterns::find(&name).with_context(|| format!("unknown pattern `{name}`"))?;
        let (pw, ph) = pattern.size();
        return Ok(Seeding::Cells(pattern.place(centered(w, h, pw, ph)), None));
    }

    let rng: Box<dyn RngCore> = match args.seed()? {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };
    Ok(Seeding::Random {
        max_live: args.max_live()?,
        rng,
    })
}

fn main() -> anyhow::Result<()> {
    let Some(args) = options::Args::from_env()? else {
        return Ok(());
    };

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = args.log_level() {
        logger.parse_filters(&level);
    }
    logger.init();

    let (w, h) = args.grid_size()?;
    let mut seeding = seeding(&args)?;
    let rule = match (&seeding, args.rule()?) {
        (_, Some(rule)) => rule,
        (Seeding::Cells(_, Some(rule)), None) => *rule,
        _ => LifeLike::default(),
    };
    let policy = match &mut seeding {
        Seeding::Random { max_live, rng } => InitPolicy::Random {
            max_live: *max_live,
            rng: rng.as_mut(),
        },
        Seeding::Cells(cells, _) => InitPolicy::Cells(cells.as_slice()),
    };
    let mut grid = Grid::new(w, h, &rule, policy)?;
    log::info!("{}x{} grid, rule {}, alive: {}", w, h, rule, grid.alive_count());

    let max_gens = args.generations()?;
    let threads = args.threads();
    let mut stats = CsvRecord::new(grid.alive_count());
    let mut previous = grid.snapshot();
    while max_gens.is_none_or(|max| grid.generation() < max) {
        if stats.has_report() {
            println!("{}", stats.report());
        }

        if threads {
            grid.step_parallel();
        } else {
            grid.step();
        }
        stats.record(grid.alive_count());

        let current = grid.snapshot();
        if current.cells() == previous.cells() {
            log::info!("stable after {} generations", grid.generation());
            break;
        }
        previous = current;
    }
    println!("gens:{}, alive:{}", grid.generation(), grid.alive_count());

    if let Some(file_name) = args.stats_file() {
        stats
            .save(&file_name)
            .with_context(|| format!("writing stats to {file_name}"))?;
    }

    if let Some(file_name) = args.output_file() {
        let encoder = RunLengthEncoded::default()
            .set_name("lifegrid generated pattern")
            .set_rule(rule);
        let encoded = encoder.encode_snapshot(&grid.snapshot());
        std::fs::write(&file_name, encoded)
            .with_context(|| format!("writing pattern to {file_name}"))?;
    }

    Ok(())
}
