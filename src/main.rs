//! Surveyor CLI - Command-line interface for the survey planner library
//!
//! Usage:
//!   surveyor-cli plan <input.kml> --altitude 50 [options]
//!   surveyor-cli plan <input.kml> --altitude 50 --spacing 8 --fence-padding 5
//!   surveyor-cli plan <input.kml> --altitude 50 --home-lat 12.345678 --home-lon 78.901234
//!   surveyor-cli plan <input.kml> --config my_plan.json
//!   surveyor-cli info <input.kml>

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use std::path::PathBuf;
use surveyor::config::{PlanConfig, ScanPattern};
use surveyor::geometry::Coordinate;
use surveyor::kml::parse_kml_file;
use surveyor::mission::{assemble, MissionSummary};
use surveyor::pipeline::SurveyPlanner;

/// Convert KML survey polygons into autopilot lawnmower missions
#[derive(Parser, Debug)]
#[command(name = "surveyor-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Plan a coverage mission and write the waypoint file
    Plan {
        /// Input KML polygon file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output waypoint file (default: input with .waypoints extension)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Plan configuration file (JSON format); CLI flags override it
        #[arg(short, long, value_name = "CONFIG")]
        config: Option<PathBuf>,

        /// Flight altitude in meters AGL
        #[arg(long, default_value = "10")]
        altitude: u32,

        /// Line spacing in meters (default: derived from the camera
        /// footprint and sidelap)
        #[arg(long)]
        spacing: Option<f64>,

        /// Distance to stay inside fence boundaries in meters
        #[arg(long, default_value = "2")]
        fence_padding: f64,

        /// Scan pattern (auto, vertical, horizontal)
        #[arg(long, default_value = "auto")]
        pattern: String,

        /// Home position latitude (enables start/end optimization)
        #[arg(long)]
        home_lat: Option<f64>,

        /// Home position longitude
        #[arg(long)]
        home_lon: Option<f64>,

        /// Disable camera triggers
        #[arg(long)]
        no_camera: bool,

        /// Distance between photos in meters
        #[arg(long, default_value = "5")]
        trigger_dist: f64,

        /// Camera tilt angle in degrees (-90 = straight down)
        #[arg(long, default_value = "-90", allow_hyphen_values = true)]
        gimbal_tilt: f64,

        /// Photo overlap percentage
        #[arg(long, default_value = "80")]
        overlap: f64,

        /// Side overlap percentage
        #[arg(long, default_value = "60")]
        sidelap: f64,
    },

    /// Show polygon and side-analysis information for a KML file
    Info {
        /// Input KML polygon file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Scan pattern used for the analysis (auto, vertical, horizontal)
        #[arg(long, default_value = "auto")]
        pattern: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Plan {
            input,
            output,
            config,
            altitude,
            spacing,
            fence_padding,
            pattern,
            home_lat,
            home_lon,
            no_camera,
            trigger_dist,
            gimbal_tilt,
            overlap,
            sidelap,
        } => cmd_plan(
            input,
            output,
            config,
            altitude,
            spacing,
            fence_padding,
            pattern,
            home_lat,
            home_lon,
            no_camera,
            trigger_dist,
            gimbal_tilt,
            overlap,
            sidelap,
        ),
        Commands::Info { input, pattern } => cmd_info(input, pattern),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_plan(
    input: PathBuf,
    output: Option<PathBuf>,
    config_file: Option<PathBuf>,
    altitude: u32,
    spacing: Option<f64>,
    fence_padding: f64,
    pattern: String,
    home_lat: Option<f64>,
    home_lon: Option<f64>,
    no_camera: bool,
    trigger_dist: f64,
    gimbal_tilt: f64,
    overlap: f64,
    sidelap: f64,
) -> Result<()> {
    let output_path = output.unwrap_or_else(|| input.with_extension("waypoints"));

    // Create progress bar
    let progress = ProgressBar::new(100);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    progress.set_message("Parsing KML...");
    progress.set_position(10);

    info!("Parsing KML file: {}", input.display());
    let polygon = parse_kml_file(&input)
        .with_context(|| format!("Failed to parse KML file: {}", input.display()))?;
    info!("  Boundary points: {}", polygon.len());
    info!("  Area: {:.0} m²", polygon.area_m2());

    progress.set_message("Configuring plan...");
    progress.set_position(25);

    // Build plan config - config file first, CLI flags override
    let mut plan_config = if let Some(config_path) = config_file {
        info!("Loading plan config from: {}", config_path.display());
        PlanConfig::from_file(&config_path)
            .with_context(|| format!("Failed to load config file: {}", config_path.display()))?
    } else {
        PlanConfig::default()
    };

    plan_config.altitude_m = altitude;
    if spacing.is_some() {
        plan_config.spacing_m = spacing;
    }
    plan_config.fence_padding_m = fence_padding;
    plan_config.pattern = pattern
        .parse::<ScanPattern>()
        .context("Failed to parse scan pattern")?;
    plan_config.camera.enabled = !no_camera;
    plan_config.camera.trigger_distance_m = trigger_dist;
    plan_config.camera.gimbal_tilt_deg = gimbal_tilt;
    plan_config.camera.overlap_percent = overlap;
    plan_config.camera.sidelap_percent = sidelap;

    match (home_lat, home_lon) {
        (Some(lat), Some(lon)) => {
            plan_config.home = Some(Coordinate::new(lat, lon));
            info!("Home position: {:.6}, {:.6}", lat, lon);
        }
        (None, None) => {
            info!("No home position provided - start/end optimization disabled");
        }
        _ => anyhow::bail!("--home-lat and --home-lon must be given together"),
    }

    progress.set_message("Planning coverage path...");
    progress.set_position(50);

    let plan = SurveyPlanner::new(plan_config.clone())
        .plan(&polygon)
        .context("Planning failed")?;

    info!(
        "Generated {} waypoints across {} scan passes",
        plan.waypoint_count(),
        plan.line_count()
    );

    progress.set_message("Writing mission file...");
    progress.set_position(85);

    let mission = assemble(&plan, &plan_config);
    mission
        .write_to_file(&output_path)
        .with_context(|| format!("Failed to write waypoint file: {}", output_path.display()))?;

    progress.set_position(100);
    progress.finish_with_message("Done");

    println!("Waypoint file created: {}", output_path.display());
    println!();
    println!("{}", MissionSummary::new(&plan, &plan_config, &mission));

    Ok(())
}

fn cmd_info(input: PathBuf, pattern: String) -> Result<()> {
    let polygon = parse_kml_file(&input)
        .with_context(|| format!("Failed to parse KML file: {}", input.display()))?;
    let pattern = pattern
        .parse::<ScanPattern>()
        .context("Failed to parse scan pattern")?;

    let bounds = polygon.bounds();
    println!("Polygon Information:");
    println!("  File: {}", input.display());
    println!("  Boundary points: {}", polygon.len());
    println!("  Area: {:.0} m²", polygon.area_m2());
    println!("  Perimeter: {:.0} m", polygon.perimeter_m());
    println!(
        "  Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
        bounds.min_lat, bounds.min_lon, bounds.max_lat, bounds.max_lon
    );

    let analysis = surveyor::sides::analyze_sides(&polygon, pattern);
    println!("  Sides:");
    for (i, edge) in analysis.edges.iter().enumerate() {
        let marker = if i == analysis.longest_edge { " (longest)" } else { "" };
        println!(
            "    Side {}: length {:.1} m, bearing {:.1}°{}",
            i, edge.length_m, edge.bearing_deg, marker
        );
    }
    println!("  Scan bearing ({}): {:.1}°", pattern, analysis.scan_bearing_deg);

    println!("  Corners:");
    for label in surveyor::sides::CornerLabel::ALL {
        let corner = analysis.corners.get(label);
        println!(
            "    {}: ({:.6}, {:.6})",
            label.name(),
            corner.lat,
            corner.lon
        );
    }

    Ok(())
}
