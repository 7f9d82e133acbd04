use nearword::synth::synthetic_table;
use nearword::{GameConfig, GuessOutcome, Result, Session, Variant};

fn main() -> Result<()> {
    // Synthetic table so the demo runs without a dataset on disk.
    let raw = synthetic_table(500, 32, 1337);
    let mut session = Session::new(GameConfig { variant: Variant::Teams, team_size: 3, seed: Some(7), ..GameConfig::default() });
    let mut source = move |_: &str| -> Result<String> { Ok(raw.clone()) };
    let report = session.load_dataset(&mut source, "synthetic")?;
    println!("loaded {} words ({}d)", report.summary.rows, report.summary.dim);

    println!("{:?}", session.start_round()?);
    let guess = session.query_suggestions("ka").into_iter().next().unwrap_or_else(|| "ka".into());
    if let GuessOutcome::Scored(g) = session.submit_guess(&guess)? {
        for r in &g.ranking { println!("{}\t{:?}\t{}\t{:.4}", r.rank, r.side, r.word, r.distance); }
        println!("{} scored {}/{}", g.guess, g.points, g.max_points);
    }
    Ok(())
}
