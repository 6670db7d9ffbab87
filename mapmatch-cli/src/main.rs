use clap::Parser;
use mapmatch::io::load_rgba_image;
use mapmatch::{localize, LocalizeConfig, Localization, Match, ZoneMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "MapMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LocalizeConfigJson {
    scale: usize,
    inner_radius: f64,
    step: usize,
    probe_step: usize,
    concurrent: bool,
    gamma: f64,
    void_threshold: i32,
    spotlight_threshold: i32,
    consistency_step: usize,
    max_avg_diff: f64,
    min_z_score: f64,
    max_consistency: f64,
    max_disagreement: usize,
}

impl Default for LocalizeConfigJson {
    fn default() -> Self {
        let cfg = LocalizeConfig::default();
        Self {
            scale: cfg.scale,
            inner_radius: cfg.inner_radius,
            step: cfg.step,
            probe_step: cfg.probe_step,
            concurrent: cfg.concurrent,
            gamma: cfg.gamma,
            void_threshold: cfg.void_threshold,
            spotlight_threshold: cfg.spotlight_threshold,
            consistency_step: cfg.consistency_step,
            max_avg_diff: cfg.max_avg_diff,
            min_z_score: cfg.min_z_score,
            max_consistency: cfg.max_consistency,
            max_disagreement: cfg.max_disagreement,
        }
    }
}

impl From<LocalizeConfigJson> for LocalizeConfig {
    fn from(value: LocalizeConfigJson) -> Self {
        Self {
            scale: value.scale,
            inner_radius: value.inner_radius,
            step: value.step,
            probe_step: value.probe_step,
            concurrent: value.concurrent,
            gamma: value.gamma,
            void_threshold: value.void_threshold,
            spotlight_threshold: value.spotlight_threshold,
            consistency_step: value.consistency_step,
            max_avg_diff: value.max_avg_diff,
            min_z_score: value.min_z_score,
            max_consistency: value.max_consistency,
            max_disagreement: value.max_disagreement,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ZoneConfig {
    name: String,
    path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    minimap_path: String,
    /// Optional `[x, y, width, height]` crop of the minimap image.
    minimap_roi: Option<[i64; 4]>,
    zones: Vec<ZoneConfig>,
    output_path: Option<String>,
    localize: LocalizeConfigJson,
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: usize,
    y: usize,
    score: f64,
    coverage: f64,
}

impl From<Match> for MatchRecord {
    fn from(value: Match) -> Self {
        Self {
            x: value.x,
            y: value.y,
            score: value.score,
            coverage: value.coverage(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ZoneRecord {
    name: String,
    uniform: MatchRecord,
    weighted: Option<MatchRecord>,
}

#[derive(Debug, Serialize)]
struct BestRecord {
    zone: String,
    x: usize,
    y: usize,
    center_x: usize,
    center_y: usize,
    avg_diff: f64,
    weighted_diff: Option<f64>,
    z_score: f64,
    consistency: f64,
    disagreement: Option<usize>,
    accepted: bool,
}

#[derive(Debug, Serialize)]
struct Output {
    best: Option<BestRecord>,
    zones: Vec<ZoneRecord>,
}

impl From<Option<Localization>> for Output {
    fn from(value: Option<Localization>) -> Self {
        let Some(loc) = value else {
            return Self {
                best: None,
                zones: Vec::new(),
            };
        };
        let zones = loc
            .zones
            .into_iter()
            .map(|zone| ZoneRecord {
                name: zone.name,
                uniform: zone.uniform.into(),
                weighted: zone.weighted.map(MatchRecord::from),
            })
            .collect();
        let best = BestRecord {
            zone: loc.zone,
            x: loc.x,
            y: loc.y,
            center_x: loc.center_x,
            center_y: loc.center_y,
            avg_diff: loc.avg_diff,
            weighted_diff: loc.weighted_diff,
            z_score: loc.z_score,
            consistency: loc.consistency,
            disagreement: loc.disagreement,
            accepted: loc.accepted,
        };
        Self {
            best: Some(best),
            zones,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("mapmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.minimap_path.is_empty() {
        return Err("minimap_path must be set in the config".into());
    }
    if config.zones.is_empty() {
        return Err("at least one zone must be listed in the config".into());
    }

    let cfg = LocalizeConfig::from(config.localize);
    let mut minimap = load_rgba_image(&config.minimap_path)?;
    if let Some([x, y, width, height]) = config.minimap_roi {
        if width <= 0 || height <= 0 {
            return Err("minimap_roi width and height must be positive".into());
        }
        minimap = minimap.crop_clipped(x, y, width as usize, height as usize)?;
    }

    let mut zones = Vec::with_capacity(config.zones.len());
    for zone in &config.zones {
        let image = load_rgba_image(&zone.path)?;
        zones.push(ZoneMap::new(zone.name.clone(), &image, &cfg)?);
    }
    info!(zones = zones.len(), scale = cfg.scale, "zone maps loaded");

    let output = Output::from(localize(&minimap, &zones, &cfg)?);
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
