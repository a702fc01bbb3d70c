use clap::{Parser, Subcommand};
use ox_fluids::ConstantSolubility;
use ox_results::{SimulationOutputs, TargetOutcome};
use ox_sim::{FlowSweep, SweepOutcome};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "ox-cli")]
#[command(about = "Oxyflow CLI - dissolved-gas exchange simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and invariants
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// Run a simulation
    Run {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Write full outputs (series + summary + metadata) as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the time series as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Sweep liquid flow and recommend a perfusion setpoint
    Recommend {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Lowest flow setpoint [mL/min]
        #[arg(long, default_value_t = 2.0)]
        flow_min: f64,
        /// Highest flow setpoint [mL/min]
        #[arg(long, default_value_t = 20.0)]
        flow_max: f64,
        /// Number of grid points
        #[arg(long, default_value_t = 10)]
        points: usize,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Scenario(#[from] ox_scenario::ScenarioError),

    #[error(transparent)]
    Sim(#[from] ox_sim::SimError),

    #[error(transparent)]
    Results(#[from] ox_results::ResultsError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

type CliResult<T> = Result<T, CliError>;

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            json,
            csv,
        } => cmd_run(&scenario_path, json.as_deref(), csv.as_deref()),
        Commands::Recommend {
            scenario_path,
            flow_min,
            flow_max,
            points,
        } => cmd_recommend(&scenario_path, flow_min, flow_max, points),
    }
}

fn cmd_validate(scenario_path: &Path) -> CliResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    ox_scenario::load_yaml(scenario_path)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_run(scenario_path: &Path, json: Option<&Path>, csv: Option<&Path>) -> CliResult<()> {
    let inputs = ox_scenario::load_yaml(scenario_path)?;
    let solubility = ConstantSolubility::new();

    let start = Instant::now();
    let outputs = ox_sim::simulate(&inputs, &solubility)?;
    let elapsed = start.elapsed();

    println!("Run {} completed in {:.3}s", outputs.metadata.run_id, elapsed.as_secs_f64());
    print_summary(&outputs);

    if let Some(path) = json {
        ox_results::save_outputs(path, &outputs)?;
        println!("Wrote outputs JSON: {}", path.display());
    }
    if let Some(path) = csv {
        let mut file = std::fs::File::create(path)?;
        write_series_csv(&mut file, &outputs)?;
        println!("Wrote series CSV: {}", path.display());
    }

    Ok(())
}

fn print_summary(outputs: &SimulationOutputs) {
    let summary = &outputs.summary;
    println!("  model: {} / {}", summary.model, summary.solver);
    println!(
        "  p_total = {:.3} kPa (dP = {:.1} mbar)",
        summary.p_total_kpa, summary.delta_p_mbar
    );
    println!(
        "  C*_O2 = {:.4} mmol/L, C*_N2 = {:.4} mmol/L",
        outputs.cstar_o2_mmol_l, outputs.cstar_n2_mmol_l
    );
    println!(
        "  residence = {:.1} s, transport delay = {:.1} s",
        summary.residence_time_s, summary.transport_delay_s
    );
    println!(
        "  k_eff O2 = {:.5} 1/s, N2 = {:.5} 1/s",
        summary.effective_kla_o2_s_inv, summary.effective_kla_n2_s_inv
    );
    if summary.o2_transfer_limited {
        println!(
            "  ! O2 transfer is gas-supply limited ({:.5} mmol/min available)",
            summary.o2_supply_rate_mmol_min
        );
    }
    println!(
        "  final outlet O2 = {:.4} mmol/L, vessel O2 = {:.4} mmol/L",
        outputs.c_o2_out_mmol_l.last().copied().unwrap_or_default(),
        outputs.c_o2_vessel_mmol_l.last().copied().unwrap_or_default()
    );
    if let Some(stages) = &summary.co2_stages {
        println!(
            "  CO2 ({}): in {:.3} -> conditioning {:.3} -> stripping {:.3} mmol/L, pH {:.2}",
            stages.stage_order,
            stages.c_co2_in_mmol_l,
            stages.c_after_conditioning_mmol_l,
            stages.c_after_stripping_mmol_l,
            stages.ph_outlet
        );
    }
    match summary.target {
        Some(TargetOutcome::Reached { t_s }) => {
            println!("  target DO reached at t = {:.1} s", t_s)
        }
        Some(TargetOutcome::AlreadyAt) => println!("  vessel already at target DO"),
        Some(TargetOutcome::NotReached) => {
            println!("  target DO not reached within the horizon")
        }
        None => {}
    }
}

fn write_series_csv(out: &mut dyn Write, outputs: &SimulationOutputs) -> io::Result<()> {
    let co2 = outputs.c_co2_vessel_mmol_l.as_ref();
    let ph = outputs.ph_vessel.as_ref();

    let mut header = vec![
        "time_s",
        "c_o2_out_mmol_l",
        "c_n2_out_mmol_l",
        "c_o2_vessel_mmol_l",
        "c_n2_vessel_mmol_l",
    ];
    if co2.is_some() {
        header.push("c_co2_vessel_mmol_l");
        header.push("ph_vessel");
    }
    writeln!(out, "{}", header.join(","))?;

    for i in 0..outputs.len() {
        write!(
            out,
            "{},{},{},{},{}",
            outputs.time_s[i],
            outputs.c_o2_out_mmol_l[i],
            outputs.c_n2_out_mmol_l[i],
            outputs.c_o2_vessel_mmol_l[i],
            outputs.c_n2_vessel_mmol_l[i]
        )?;
        if let (Some(co2), Some(ph)) = (co2, ph) {
            write!(out, ",{},{}", co2[i], ph[i])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn cmd_recommend(
    scenario_path: &Path,
    flow_min: f64,
    flow_max: f64,
    points: usize,
) -> CliResult<()> {
    let inputs = ox_scenario::load_yaml(scenario_path)?;
    let solubility = ConstantSolubility::new();
    let sweep = FlowSweep::new(flow_min, flow_max, points)?;

    let outcome = ox_sim::recommend_perfusion(&inputs, &sweep, &solubility)?;

    println!("flow_ml_min,p_total_kpa,do_o2_out_percent,o2_net_added_mmol_min");
    for point in outcome.points() {
        println!(
            "{:.3},{:.3},{:.2},{:.8}",
            point.flow_ml_min, point.p_total_kpa, point.do_o2_out_percent,
            point.o2_net_added_mmol_min
        );
    }

    match outcome {
        SweepOutcome::Recommended {
            flow_ml_min,
            o2_demand_mmol_min,
            ..
        } => {
            println!("Cell O2 demand: {:.6} mmol/min", o2_demand_mmol_min);
            println!("✓ Recommended perfusion: {:.2} mL/min", flow_ml_min);
        }
        SweepOutcome::DemandUnmet {
            o2_demand_mmol_min, ..
        } => {
            println!("Cell O2 demand: {:.6} mmol/min", o2_demand_mmol_min);
            println!(
                "✗ Demand not met within the tested range; raise gas transfer/supply or extend flow_max"
            );
        }
    }

    Ok(())
}
