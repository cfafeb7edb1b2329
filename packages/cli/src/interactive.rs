//! Interactive dashboard menu.
//!
//! The terminal counterpart of the dashboard's dropdowns: `dialoguer`
//! selections choose the bar chart's X column and Y statistic and the
//! map's fill statistic. Each change rewrites the affected SVG file.

use dialoguer::{Input, Select};
use prison_viz_records_models::BarMetric;

use crate::dashboard::Dashboard;

/// Top-level menu actions.
enum Action {
    GroupColumn,
    BarMetric,
    MapMetric,
    Inspect,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::GroupColumn,
        Self::BarMetric,
        Self::MapMetric,
        Self::Inspect,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::GroupColumn => "Bar chart: X axis (group by)",
            Self::BarMetric => "Bar chart: Y axis (statistic)",
            Self::MapMetric => "Map: fill statistic",
            Self::Inspect => "Map: inspect a county",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu until the user quits.
///
/// Both visuals are written once up front so the output directory always
/// reflects the current selections.
///
/// # Errors
///
/// Returns an error if user input or writing an SVG fails.
pub fn run(dashboard: &mut Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "Loaded {} records and {} counties",
        dashboard.record_count(),
        dashboard.county_count()
    );
    write_bar(dashboard)?;
    write_map(dashboard)?;

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        println!();
        let idx = Select::new()
            .with_prompt("What would you like to change?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::GroupColumn => {
                let columns = dashboard.columns();
                let names: Vec<String> = columns.iter().map(ToString::to_string).collect();
                let current = columns
                    .iter()
                    .position(|c| c == dashboard.group())
                    .unwrap_or(0);
                let choice = Select::new()
                    .with_prompt("Group records by")
                    .items(&names)
                    .default(current)
                    .interact()?;
                dashboard.select_group(columns[choice].clone());
                write_bar(dashboard)?;
            }
            Action::BarMetric => {
                let metrics = BarMetric::all();
                let names: Vec<String> = metrics.iter().map(ToString::to_string).collect();
                let current = metrics
                    .iter()
                    .position(|m| *m == dashboard.bar_metric())
                    .unwrap_or(0);
                let choice = Select::new()
                    .with_prompt("Statistic per group")
                    .items(&names)
                    .default(current)
                    .interact()?;
                dashboard.select_bar_metric(metrics[choice]);
                write_bar(dashboard)?;
            }
            Action::MapMetric => {
                let metrics = dashboard.map_metrics();
                if metrics.is_empty() {
                    println!("The county data carries no numeric statistics.");
                    continue;
                }
                let current = dashboard
                    .map_metric()
                    .and_then(|m| metrics.iter().position(|x| x == m))
                    .unwrap_or(0);
                let choice = Select::new()
                    .with_prompt("Color counties by")
                    .items(&metrics)
                    .default(current)
                    .interact()?;
                dashboard.select_map_metric(metrics[choice].clone());
                write_map(dashboard)?;
            }
            Action::Inspect => {
                let lng: f64 = Input::new().with_prompt("Longitude").interact_text()?;
                let lat: f64 = Input::new().with_prompt("Latitude").interact_text()?;
                print!(
                    "{}",
                    crate::describe_county(dashboard.inspect(lng, lat), dashboard.map_metric())
                );
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

fn write_bar(dashboard: &Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let path = dashboard.write_bar_chart()?;
    println!(
        "Bar chart ({} by {}) -> {}",
        dashboard.bar_metric(),
        dashboard.group(),
        path.display()
    );
    Ok(())
}

fn write_map(dashboard: &Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    match dashboard.write_choropleth()? {
        Some(path) => println!(
            "Choropleth ({}) -> {}",
            dashboard.map_metric().unwrap_or_default(),
            path.display()
        ),
        None => println!("Choropleth skipped: no county statistics to color by"),
    }
    Ok(())
}
