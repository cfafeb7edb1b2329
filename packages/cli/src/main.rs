#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incarceration statistics dashboard.
//!
//! Fetches the incarceration records and county boundaries, then renders
//! a bar chart of grouped aggregates and a county choropleth as SVG
//! files. Run without a subcommand for the interactive menu, where each
//! selection change redraws the affected chart.
//!
//! Uses `indicatif-log-bridge` (via [`prison_viz_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and loading spinners never fight for the terminal.

mod dashboard;
mod interactive;

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use prison_viz_cli_utils::{LoadingSpinner, MultiProgress};
use prison_viz_dashboard_models::DashboardConfig;
use prison_viz_geography_models::GeoFeature;
use prison_viz_records_models::{BarMetric, GroupColumn, Record};
use prison_viz_source::SourceError;
use prison_viz_source::counties::fetch_counties;
use prison_viz_source::records::fetch_records;

use crate::dashboard::Dashboard;

#[derive(Parser)]
#[command(name = "prison_viz", about = "Incarceration statistics dashboard")]
struct Cli {
    /// TOML file overriding the default configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory the SVG files are written to
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// URL of the incarceration records JSON
    #[arg(long, global = true)]
    records_url: Option<String>,

    /// URL of the county boundaries `GeoJSON`
    #[arg(long, global = true)]
    counties_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the bar chart of grouped records
    Bar {
        /// Column to group by (X axis)
        #[arg(long)]
        group: Option<GroupColumn>,
        /// Statistic per group (Y axis): amount, ageAvg, timeServedAvg
        #[arg(long)]
        metric: Option<BarMetric>,
    },
    /// Render the county choropleth
    Map {
        /// County statistic to color by
        #[arg(long)]
        metric: Option<String>,
    },
    /// Show the county under a coordinate
    Inspect {
        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Statistic to highlight
        #[arg(long)]
        metric: Option<String>,
    },
    /// List grouping columns and county statistics
    Columns,
    /// Interactive menu (default)
    Interactive,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration.
    fn apply_overrides(&self, config: &mut DashboardConfig) {
        if let Some(url) = &self.records_url {
            config.data.records_url.clone_from(url);
        }
        if let Some(url) = &self.counties_url {
            config.data.counties_url.clone_from(url);
        }
        if let Some(dir) = &self.output {
            config.output.directory.clone_from(dir);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = prison_viz_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = prison_viz_source::config::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let client = prison_viz_source::client()?;

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Bar { group, metric } => {
            let records = load_records(&client, &config, &multi).await?;
            let mut dashboard = Dashboard::new(config, records, Vec::new());
            if let Some(group) = group {
                dashboard.select_group(group);
            }
            if let Some(metric) = metric {
                dashboard.select_bar_metric(metric);
            }
            let path = dashboard.write_bar_chart()?;
            println!("{}", path.display());
        }
        Commands::Map { metric } => {
            let counties = load_counties(&client, &config, &multi).await?;
            let mut dashboard = Dashboard::new(config, Vec::new(), counties);
            if let Some(metric) = metric {
                dashboard.select_map_metric(metric);
            }
            match dashboard.write_choropleth()? {
                Some(path) => println!("{}", path.display()),
                None => return Err("no county statistics to color by".into()),
            }
        }
        Commands::Inspect { lng, lat, metric } => {
            let counties = load_counties(&client, &config, &multi).await?;
            let dashboard = Dashboard::new(config, Vec::new(), counties);
            let metric = metric.as_deref().or_else(|| dashboard.map_metric());
            print!("{}", describe_county(dashboard.inspect(lng, lat), metric));
        }
        Commands::Columns => {
            let (records, counties) = tokio::try_join!(
                load_records(&client, &config, &multi),
                load_counties(&client, &config, &multi),
            )?;
            let dashboard = Dashboard::new(config, records, counties);
            println!("Grouping columns:");
            for column in dashboard.columns() {
                println!("  {column}");
            }
            println!("Bar statistics:");
            for metric in BarMetric::all() {
                println!("  {metric}");
            }
            println!("County statistics:");
            for metric in dashboard.map_metrics() {
                println!("  {metric}");
            }
        }
        Commands::Interactive => {
            let (records, counties) = tokio::try_join!(
                load_records(&client, &config, &multi),
                load_counties(&client, &config, &multi),
            )?;
            let mut dashboard = Dashboard::new(config, records, counties);
            interactive::run(&mut dashboard)?;
        }
    }

    Ok(())
}

/// Fetches the records behind a loading spinner.
async fn load_records(
    client: &reqwest::Client,
    config: &DashboardConfig,
    multi: &MultiProgress,
) -> Result<Vec<Record>, SourceError> {
    let spinner = LoadingSpinner::start(multi, "Loading incarceration records...");
    match fetch_records(client, &config.data.records_url).await {
        Ok(records) => {
            spinner.finish(format!("Loaded {} records", records.len()));
            Ok(records)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e)
        }
    }
}

/// Fetches the county boundaries behind a loading spinner.
async fn load_counties(
    client: &reqwest::Client,
    config: &DashboardConfig,
    multi: &MultiProgress,
) -> Result<Vec<GeoFeature>, SourceError> {
    let spinner = LoadingSpinner::start(multi, "Loading county boundaries...");
    match fetch_counties(
        client,
        &config.data.counties_url,
        &config.data.county_name_property,
    )
    .await
    {
        Ok(counties) => {
            spinner.finish(format!("Loaded {} counties", counties.len()));
            Ok(counties)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Err(e)
        }
    }
}

/// Formats the tooltip text for a county lookup.
fn describe_county(county: Option<&GeoFeature>, highlight: Option<&str>) -> String {
    let Some(county) = county else {
        return "No county at that location\n".to_string();
    };

    let mut out = format!("{}\n", county.name);
    for (name, value) in &county.stats {
        let marker = if Some(name.as_str()) == highlight { "*" } else { " " };
        let _ = writeln!(out, " {marker} {name}: {value}");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use geo::MultiPolygon;

    use super::*;

    #[test]
    fn parses_bar_command() {
        let cli = Cli::try_parse_from([
            "prison_viz",
            "bar",
            "--group",
            "ethnicity",
            "--metric",
            "timeServedAvg",
            "--output",
            "svg",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(PathBuf::from("svg")));
        match cli.command {
            Some(Commands::Bar { group, metric }) => {
                assert_eq!(group, Some(GroupColumn::Ethnicity));
                assert_eq!(metric, Some(BarMetric::TimeServedAvg));
            }
            _ => panic!("expected bar command"),
        }
    }

    #[test]
    fn parses_negative_coordinates() {
        let cli =
            Cli::try_parse_from(["prison_viz", "inspect", "--lng", "-87.6", "--lat", "41.8"])
                .unwrap();
        match cli.command {
            Some(Commands::Inspect { lng, lat, metric }) => {
                assert!((lng + 87.6).abs() < f64::EPSILON);
                assert!((lat - 41.8).abs() < f64::EPSILON);
                assert_eq!(metric, None);
            }
            _ => panic!("expected inspect command"),
        }
    }

    #[test]
    fn rejects_unknown_bar_metric() {
        assert!(Cli::try_parse_from(["prison_viz", "bar", "--metric", "median"]).is_err());
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["prison_viz"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "prison_viz",
            "--records-url",
            "http://r.test/records.json",
            "--output",
            "out",
            "columns",
        ])
        .unwrap();
        let mut config = prison_viz_source::config::parse_with_overlay("").unwrap();
        cli.apply_overrides(&mut config);
        assert_eq!(config.data.records_url, "http://r.test/records.json");
        assert_eq!(config.output.directory, PathBuf::from("out"));
    }

    #[test]
    fn describes_county_with_highlight() {
        let county = GeoFeature {
            name: "Cook".to_string(),
            geometry: MultiPolygon(vec![]),
            stats: BTreeMap::from([("inmates".to_string(), 12.0), ("rate".to_string(), 0.5)]),
        };
        let text = describe_county(Some(&county), Some("rate"));
        assert_eq!(text, "Cook\n   inmates: 12\n * rate: 0.5\n");
        assert_eq!(describe_county(None, None), "No county at that location\n");
    }
}
