use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use bevy::math::Vec2;
use clap::Parser;

use flow_currents::core::level::{build_flow_level, FlowFile};
use flow_currents::{FlowAffinity, GameConfig};

#[derive(Parser, Debug)]
#[command(about = "Ingest a level flow file and sample the current at given points", version)]
struct Args {
    /// flows.ron / flows.json to ingest
    flows: PathBuf,
    /// Sample point as `x,y` (repeatable)
    #[arg(long = "at", value_parser = parse_point)]
    at: Vec<Vec2>,
    /// Game config (RON) supplying flow tuning; defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Sample with harpoon affinity (sees harpoon-only regions)
    #[arg(long)]
    harpoon: bool,
}

fn parse_point(s: &str) -> Result<Vec2> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected `x,y`, got '{s}'"))?;
    let x: f32 = x.trim().parse().with_context(|| format!("bad x in '{s}'"))?;
    let y: f32 = y.trim().parse().with_context(|| format!("bad y in '{s}'"))?;
    Ok(Vec2::new(x, y))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let cfg = match &args.config {
        Some(p) => GameConfig::load_from_file(p)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("loading config {}", p.display()))?,
        None => GameConfig::default(),
    };
    let file = FlowFile::load_from_file(&args.flows)
        .with_context(|| format!("loading flows {}", args.flows.display()))?;
    let built = build_flow_level(&file, &cfg.flow);

    println!(
        "{}: annotations={} segments={} polygons={} ambient={} defaulted_directions={}",
        args.flows.display(),
        file.annotations.len(),
        built.field.segments().len(),
        built.field.polygons().len(),
        built.ambient.len(),
        built.backfilled
    );
    for d in &built.diagnostics {
        println!("  diagnostic: {d}");
    }
    for a in &built.ambient {
        println!(
            "  ambient {:<16} at=({:.1},{:.1}) dir={} every={:.2}s burst={}",
            a.name,
            a.position.x,
            a.position.y,
            a.direction.as_str(),
            a.interval,
            a.burst
        );
    }

    let affinity = if args.harpoon {
        FlowAffinity::Harpoon
    } else {
        FlowAffinity::Default
    };
    for p in &args.at {
        let s = built.field.compute_force_for(*p, affinity);
        if s.affected {
            println!("({:.1},{:.1}) -> force=({:.3},{:.3})", p.x, p.y, s.force.x, s.force.y);
        } else {
            println!("({:.1},{:.1}) -> unaffected", p.x, p.y);
        }
    }
    Ok(())
}
