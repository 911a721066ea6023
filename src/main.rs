use sphere_repulsion::{bench_forces, bench_steps};
use sphere_repulsion::{Report, Scenario, ScenarioConfig, TracingObserver};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file, looked up in `scenarios/` when the path does not exist
    #[arg(short, default_value = "tetrahedron.yaml")]
    file_name: String,

    /// Time the force models instead of running a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let mut config_path = PathBuf::from(file_name);
    if !config_path.exists() {
        config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file_name);
    }
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn print_report(report: &Report) {
    println!(
        "{:?} after {} iterations, minimum separation {:.4} rad ({:.4}°)",
        report.phase,
        report.iterations,
        report.min_angle,
        report.min_angle.to_degrees()
    );
    for n in &report.nodes {
        println!(
            "node{}: x:{:.4} y:{:.4} z:{:.4} latRads:{:.4} longRads:{:.4} latDegs:{:.4}° longDegs:{:.4}°",
            n.id, n.x, n.y, n.z, n.latitude, n.longitude, n.latitude_degrees, n.longitude_degrees
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sphere_repulsion=info")),
        )
        .init();

    let args = Args::parse();

    if args.bench {
        bench_forces();
        bench_steps();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut simulation = Scenario::build_scenario(scenario_cfg)?.into_simulation()?;

    let report = simulation.run(&mut TracingObserver);
    print_report(&report);

    Ok(())
}
