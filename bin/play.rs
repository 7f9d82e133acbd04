use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use nearword::config::{parse_team_size, preset_by_id, DATASET_PRESETS};
use nearword::synth::synthetic_table;
use nearword::{
    Breakdown, ChallengeView, DatasetSource, FileSource, GameConfig, GuessOutcome, Language, Result,
    ScoredGuess, Session, Variant,
};

#[derive(Clone, Copy, ValueEnum, Debug)]
enum VariantArg { Equation, Teams }
impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v { VariantArg::Equation => Variant::Equation, VariantArg::Teams => Variant::Teams }
    }
}

#[derive(Clone, Copy, ValueEnum, Debug)]
enum LanguageArg { En, De }
impl From<LanguageArg> for Language {
    fn from(l: LanguageArg) -> Self {
        match l { LanguageArg::En => Language::En, LanguageArg::De => Language::De }
    }
}

#[derive(Parser, Debug)]
#[command(name="play", about="Word-embedding guessing game in the terminal")]
struct Args {
    /// JSON config file; flags below override it.
    #[arg(long)] config: Option<PathBuf>,
    /// Dataset path (relative to --root) or a preset id such as en-small.
    #[arg(long)] dataset: Option<String>,
    #[arg(long, default_value=".")] root: PathBuf,
    #[arg(long, value_enum)] language: Option<LanguageArg>,
    #[arg(long, value_enum)] variant: Option<VariantArg>,
    #[arg(long)] team_size: Option<usize>,
    #[arg(long)] auto_increment: bool,
    #[arg(long)] seed: Option<u64>,
    /// Play on a generated table with this many words instead of a file.
    #[arg(long)] synthetic: Option<usize>,
    #[arg(long, default_value_t=50)] synthetic_dim: usize,
    /// Print every result as one JSON line.
    #[arg(long, default_value_t=false)] json: bool,
}

const SYNTHETIC_PATH: &str = "synthetic";

/// Files from disk, plus an optional in-memory table under `SYNTHETIC_PATH`.
struct PlaySource {
    files: FileSource,
    synthetic: Option<String>,
}

impl DatasetSource for PlaySource {
    fn fetch(&mut self, path: &str) -> Result<String> {
        match (&self.synthetic, path) {
            (Some(raw), SYNTHETIC_PATH) => Ok(raw.clone()),
            _ => self.files.fetch(path),
        }
    }
}

struct Out { json: bool }

impl Out {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) {
        if self.json {
            match serde_json::to_string(value) {
                Ok(line) => println!("{}", line),
                Err(e) => eprintln!("json: {}", e),
            }
        } else {
            println!("{}", text());
        }
    }

    fn error(&self, e: &nearword::EngineError) {
        self.emit(&serde_json::json!({ "error": e.to_string() }), || format!("error: {}", e));
    }
}

fn describe(view: &ChallengeView) -> String {
    match view {
        ChallengeView::Equation { text, .. } => text.clone(),
        ChallengeView::Teams { yours, enemy } => {
            format!("yours: {}\nenemy: {}", yours.join(", "), enemy.join(", "))
        }
    }
}

fn describe_score(g: &ScoredGuess) -> String {
    let mut s = format!("round {}: {} -> {}/{} points", g.round, g.guess, g.points, g.max_points);
    match &g.breakdown {
        Breakdown::Equation { distance, .. } => s.push_str(&format!(" (distance {:.4})", distance)),
        Breakdown::Teams { nearest_enemy, .. } => s.push_str(&format!(" (nearest enemy {:.2})", nearest_enemy)),
    }
    for r in &g.ranking {
        s.push_str(&format!("\n  {:>2}. {:<16} {:<6} {:.4}", r.rank, r.word, format!("{:?}", r.side).to_lowercase(), r.distance));
    }
    s
}

fn run_command(session: &mut Session, source: &mut PlaySource, out: &Out, line: &str) -> Result<bool> {
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (line, ""),
    };
    match cmd {
        ":quit" | ":q" => return Ok(false),
        ":new" => {
            let view = session.start_round()?;
            out.emit(&view, || describe(&view));
        }
        ":suggest" => {
            let words = session.query_suggestions(arg);
            out.emit(&words, || words.join("  "));
        }
        ":score" => {
            let score = session.score();
            out.emit(&score, || format!("score: {} / {}", score.points, score.rounds));
        }
        ":history" => {
            let n = arg.parse().unwrap_or(10);
            let rows: Vec<&ScoredGuess> = session.history().iter().take(n).collect();
            out.emit(&rows, || {
                rows.iter()
                    .map(|g| format!("{}\t{}\t{}/{}", g.round, g.guess, g.points, g.max_points))
                    .collect::<Vec<_>>()
                    .join("\n")
            });
        }
        ":load" => {
            let path = preset_by_id(arg).map_or(arg, |p| p.path);
            let report = session.load_dataset(source, path)?;
            out.emit(&report, || format!("loaded {} words from {}", report.summary.rows, report.path));
            let view = session.start_round()?;
            out.emit(&view, || describe(&view));
        }
        ":presets" => {
            out.emit(&DATASET_PRESETS, || {
                DATASET_PRESETS.iter().map(|p| format!("{}\t{}", p.id, p.label)).collect::<Vec<_>>().join("\n")
            });
        }
        ":lang" => {
            session.set_language(Language::from_code(arg));
            let cfg = session.config();
            out.emit(cfg, || format!("language {}, dataset {}", cfg.language.code(), cfg.dataset_path));
        }
        ":variant" => {
            session.set_variant(if arg == "teams" { Variant::Teams } else { Variant::Equation });
            let view = session.start_round()?;
            out.emit(&view, || describe(&view));
        }
        ":n" => {
            session.set_team_size(parse_team_size(arg)?);
            let n = session.config().team_size;
            out.emit(&n, || format!("team size {}", n));
        }
        ":auto" => session.set_auto_increment(matches!(arg, "on" | "true" | "1")),
        _ => match session.submit_guess(line)? {
            GuessOutcome::Scored(g) => out.emit(&g, || describe_score(&g)),
            GuessOutcome::Advanced(view) => out.emit(&view, || describe(&view)),
        },
    }
    Ok(true)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let out = Out { json: args.json };
    let mut config = match &args.config {
        Some(p) => GameConfig::load(p).unwrap_or_else(|e| {
            out.error(&e);
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };
    if let Some(l) = args.language { config.set_language(l.into()); }
    if let Some(v) = args.variant { config.variant = v.into(); }
    if let Some(n) = args.team_size { config.set_team_size(n); }
    if args.auto_increment { config.auto_increment = true; }
    if args.seed.is_some() { config.seed = args.seed; }
    if let Some(d) = &args.dataset {
        if config.use_preset(d).is_err() { config.dataset_path = d.clone(); }
    }

    let mut source = PlaySource {
        files: FileSource::new(args.root.clone()),
        synthetic: args.synthetic.map(|n| synthetic_table(n, args.synthetic_dim, config.seed.unwrap_or(0))),
    };
    let path = if source.synthetic.is_some() { SYNTHETIC_PATH.to_string() } else { config.dataset_path.clone() };
    let mut session = Session::new(config);

    match session.load_dataset(&mut source, &path) {
        Ok(report) => {
            out.emit(&report, || format!("loaded {} words ({}d) from {}", report.summary.rows, report.summary.dim, report.path));
            match session.start_round() {
                Ok(view) => out.emit(&view, || describe(&view)),
                Err(e) => out.error(&e),
            }
        }
        Err(e) => out.error(&e),
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                out.error(&e.into());
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() { continue; }
        match run_command(&mut session, &mut source, &out, line) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => out.error(&e),
        }
        io::stdout().flush().ok();
    }
}
