use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use slit_fringe::analysis::RickerCwt;
use slit_fringe::batch::{analyze_dataset, successes};
use slit_fringe::config::Config;
use slit_fringe::data::{filter, loader};
use slit_fringe::report::{render_json, render_text, Summary};

/// Measure slit widths from single-slit Fraunhofer diffraction profiles.
#[derive(Debug, Parser)]
#[command(name = "slit-fringe", version, about)]
struct Cli {
    /// Profile file (.parquet, .json or .csv)
    input: PathBuf,

    /// JSON config file with `experiment` and `analysis` sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Laser wavelength, in the distance unit
    #[arg(long)]
    wavelength: Option<f64>,

    /// Slit-to-screen distance, in the distance unit
    #[arg(long)]
    distance: Option<f64>,

    /// Name of the distance unit
    #[arg(long)]
    unit: Option<String>,

    /// Fraction of the peak intensity used to seed the fringe-width estimate
    #[arg(long)]
    threshold: Option<f64>,

    /// Skip the refined second minimum search
    #[arg(long)]
    no_dynamic: bool,

    /// Only analyze profiles whose metadata matches column=value (repeatable)
    #[arg(short, long = "select", value_name = "COLUMN=VALUE")]
    select: Vec<String>,

    /// Metadata column used to label profiles in the output
    #[arg(long)]
    label: Option<String>,

    /// Print a JSON array instead of text reports
    #[arg(long)]
    json: bool,
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(wavelength) = self.wavelength {
            config.experiment.wavelength = wavelength;
        }
        if let Some(distance) = self.distance {
            config.experiment.screen_distance = distance;
        }
        if let Some(unit) = &self.unit {
            config.experiment.unit = unit.clone();
        }
        if let Some(threshold) = self.threshold {
            config.analysis.threshold = threshold;
        }
        if self.no_dynamic {
            config.analysis.dynamic_refine = false;
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let config = cli.resolve_config()?;
    let dataset = loader::load_file(&cli.input)?;
    let selection = filter::parse_selection(cli.select.as_slice())?;
    filter::check_columns(&dataset, &selection)?;
    let indices = filter::selected_indices(&dataset, &selection);
    info!("{} of {} profile(s) selected", indices.len(), dataset.len());

    let outcomes = analyze_dataset(
        &RickerCwt::default(),
        &dataset,
        &indices,
        cli.label.as_deref(),
        &config.experiment,
        &config.analysis,
    );

    let summaries: Vec<Summary> = successes(&outcomes)
        .map(|(outcome, result)| Summary::new(outcome.label.clone(), result))
        .collect();

    if cli.json {
        println!("{}", render_json(&summaries)?);
    } else {
        for summary in &summaries {
            println!("{}", render_text(summary));
        }
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                eprintln!("{}: analysis failed: {e}", outcome.label);
            }
        }
    }

    info!(
        "{} of {} analysis(es) succeeded",
        summaries.len(),
        outcomes.len()
    );
    Ok(!summaries.is_empty() || outcomes.is_empty())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
