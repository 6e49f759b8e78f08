use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use burrito_planner::config::Config;
use burrito_planner::constants::REPORT_FILE;
use burrito_planner::csv_reader::{data_folder, read_catalog};
use burrito_planner::model::{SolveOptions, solve_placement};
use burrito_planner::render::{RenderOptions, render_solution};

/// Burrito truck placement planner
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured round id
    #[arg(long)]
    round: Option<u32>,

    /// Override the configured day id
    #[arg(long)]
    day: Option<u32>,

    /// Skip drawing the solution image
    #[arg(long)]
    no_render: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(round) = cli.round {
        config.data.round = round;
    }
    if let Some(day) = cli.day {
        config.data.day = day;
    }
    config.validate()?;

    println!(
        "Burrito truck placement, round {} day {}",
        config.data.round, config.data.day
    );

    let catalog = read_catalog(&config.data.root, config.data.round, config.data.day)?;
    let solution = solve_placement(&catalog, &SolveOptions::from(&config.solver))?;

    println!();
    println!("Place trucks in nodes:");
    for truck in &solution.trucks {
        println!(
            "\t{} @({:.0}, {:.0}) serving {} customers",
            truck.id.to_uppercase(),
            truck.x,
            truck.y,
            truck.customers.len()
        );
    }
    println!("Burritos sold: {:.0}", solution.burritos_sold);
    println!("Profit: {:.2}", solution.profit);

    let folder = data_folder(&config.data.root, config.data.round, config.data.day);
    solution.save_report(folder.join(REPORT_FILE))?;

    if !cli.no_render {
        match render_solution(&folder, &solution, &RenderOptions::from(&config.render)) {
            Ok(path) => println!("Solution image saved to: {}", path.display()),
            Err(e) => eprintln!("Failed to render solution: {}", e),
        }
    }

    Ok(())
}
