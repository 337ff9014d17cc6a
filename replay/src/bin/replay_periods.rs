use std::{
    error::Error as StdError,
    fs, io,
    io::{BufWriter, Write as _},
    path::PathBuf,
};

use clap::Parser as _;
use glicko2_period::RatingSystem;
use glicko2_period_replay::{document::Document, league::League};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Replay the rating periods of a league document and print the standings
/// after each period.
#[derive(clap::Parser)]
struct Opt {
    /// TOML document with players, teams and periods.
    document: PathBuf,
    /// Constrains the change in volatility over time.
    #[clap(long, default_value = "0.3")]
    tau: f64,
    /// Print only the final standings.
    #[clap(long)]
    quiet: bool,
}

fn print_standings(out: &mut impl io::Write, league: &League) -> io::Result<()> {
    for (rank, (name, player)) in league.standings().into_iter().enumerate() {
        writeln!(
            out,
            "{:>3}{:>30}: {:>6.1}   +/- {:>5.1}   {:.5}",
            rank + 1,
            name,
            f64::from(player.rating()),
            f64::from(player.deviation()),
            f64::from(player.volatility()),
        )?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn StdError>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let opt = Opt::parse();

    let document: Document = fs::read_to_string(&opt.document)?.parse()?;
    let rating_system = RatingSystem::builder().tau(opt.tau).build()?;
    let mut league = League::new(&document, rating_system)?;

    let mut out = BufWriter::new(io::stdout().lock());

    if !opt.quiet {
        writeln!(out, "initial ratings")?;
        print_standings(&mut out, &league)?;
    }

    for (i, period) in document.periods.iter().enumerate() {
        let summary = league.play_period(period)?;
        info!(
            period = i + 1,
            encounters = summary.encounters,
            mean_deviance = summary.mean_deviance,
            "rating period closed"
        );

        if !opt.quiet {
            writeln!(out)?;
            writeln!(out, "after rating period {}", i + 1)?;
            print_standings(&mut out, &league)?;
        }
    }

    if opt.quiet {
        print_standings(&mut out, &league)?;
    }

    out.flush()?;
    Ok(())
}
