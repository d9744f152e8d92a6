use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;

use noding::api::{
    draw_linework, extract_strings, LineOrigin, LineworkKind, McIndexNoder, Noder, NodingValidator,
    ReplayToken, ScaledNoder, SegmentString, SnapRoundingNoder,
};

mod linework;
mod provenance;

use linework::{JsonPoint, LineworkFile};
use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Node, check and generate JSON linework")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Node the lines of a linework file
    Node {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = NoderKind::Mc)]
        noder: NoderKind,
        /// Grid scale for `scaled` and `snap-round` (grid spacing is 1/scale)
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        /// Fail unless the output is fully noded
        #[arg(long)]
        validate: bool,
    },
    /// Report whether a linework file is fully noded
    Check {
        #[arg(long)]
        input: PathBuf,
    },
    /// Write reproducible random linework
    Random {
        #[arg(long, value_enum, default_value_t = KindArg::Segments)]
        kind: KindArg,
        #[arg(long, default_value_t = 100)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum NoderKind {
    Mc,
    Scaled,
    SnapRound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Segments,
    Walks,
    Grid,
    Fan,
}

impl From<KindArg> for LineworkKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Segments => LineworkKind::Segments,
            KindArg::Walks => LineworkKind::Walks,
            KindArg::Grid => LineworkKind::Grid,
            KindArg::Fan => LineworkKind::Fan,
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Node {
            input,
            out,
            noder,
            scale,
            validate,
        } => node(&input, &out, noder, scale, validate),
        Action::Check { input } => {
            let report = check(&input)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Action::Random {
            kind,
            count,
            seed,
            index,
            out,
        } => random(kind, count, ReplayToken::new(seed, index), &out),
        Action::Report => {
            let payload = Payload::new("report", json!({}));
            println!("{}", serde_json::to_string_pretty(&provenance::block(&payload, &[]))?);
            Ok(())
        }
    }
}

fn node(input: &Path, out: &Path, noder: NoderKind, scale: f64, validate: bool) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), ?noder, scale, validate, "node");
    let lines = LineworkFile::read(input)?.to_lines();
    let strings = extract_strings(&lines).context("building segment strings")?;
    let lines_in = strings.len();
    let noded = run_noder(noder, scale, strings)?;
    if validate {
        NodingValidator::new(&noded)
            .check_valid()
            .context("validating noded output")?;
    }
    tracing::info!(lines_in, lines_out = noded.len(), "noded");

    LineworkFile::from_lines(&noded).write(out)?;
    write_sidecar(
        out,
        Payload::new(
            "node",
            json!({
                "input": input.to_string_lossy(),
                "noder": format!("{noder:?}"),
                "scale": scale,
                "validate": validate,
                "lines_in": lines_in,
                "lines_out": noded.len(),
            }),
        ),
    )?;
    Ok(())
}

fn run_noder(
    noder: NoderKind,
    scale: f64,
    strings: Vec<SegmentString<LineOrigin>>,
) -> Result<Vec<SegmentString<LineOrigin>>> {
    let out = match noder {
        NoderKind::Mc => McIndexNoder::new().node(strings)?,
        NoderKind::Scaled => ScaledNoder::snap_rounding(scale)?.node(strings)?,
        NoderKind::SnapRound => {
            let (out, stats) = SnapRoundingNoder::new(scale)?.node_with_stats(strings)?;
            tracing::info!(
                passes = stats.passes,
                hot_pixels = stats.hot_pixels,
                nodes_added = stats.nodes_added,
                collapsed = stats.collapsed,
                "snap rounding"
            );
            out
        }
    };
    Ok(out)
}

#[derive(Debug, serde::Serialize)]
struct CheckReport {
    valid: bool,
    intersections: Vec<JsonPoint>,
}

fn check(input: &Path) -> Result<CheckReport> {
    let lines = LineworkFile::read(input)?.to_lines();
    let strings = extract_strings(&lines).context("building segment strings")?;
    let report = NodingValidator::new(&strings).report()?;
    tracing::info!(lines = strings.len(), valid = report.is_valid, "check");
    Ok(CheckReport {
        valid: report.is_valid,
        intersections: report
            .intersections
            .iter()
            .map(|c| JsonPoint::Xy(c.x, c.y))
            .collect(),
    })
}

fn random(kind: KindArg, count: usize, tok: ReplayToken, out: &Path) -> Result<()> {
    tracing::info!(?kind, count, seed = tok.seed, index = tok.index, out = %out.display(), "random");
    let lines = draw_linework(kind.into(), count, tok);
    LineworkFile::from_lines(&lines).write(out)?;
    write_sidecar(
        out,
        Payload::new(
            "random",
            json!({
                "kind": format!("{kind:?}"),
                "count": count,
                "seed": tok.seed,
                "index": tok.index,
            }),
        ),
    )?;
    Ok(())
}
