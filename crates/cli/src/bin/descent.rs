use std::path::PathBuf;

use aero_response::chute::ChuteEvent;
use aero_response::export::{summary, telemetry};
use aero_response::scenario::{self, Replay, write_telemetry};
use clap::Parser;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Replay a scripted descent through the parachute and intake ram drag models"
)]
struct Cli {
    /// Scenario file (YAML list or TOML) or directory of TOML scenarios
    #[arg(long, default_value = "data/scenarios/descents.yaml")]
    scenarios: PathBuf,

    /// Scenario name (case-insensitive); defaults to the first one found
    #[arg(long)]
    name: Option<String>,

    /// Telemetry CSV output (`-` for stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Override the scenario's random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the scenario's time step in seconds
    #[arg(long)]
    dt: Option<f64>,

    /// Print parachute parameters and exit
    #[arg(long, default_value_t = false)]
    describe: bool,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let catalog = scenario::load_scenarios(&cli.scenarios)?;
    let mut config = scenario::select(&catalog, cli.name.as_deref())?.clone();
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(dt) = cli.dt {
        anyhow::ensure!(dt > 0.0, "time step must be positive, got {dt}");
        config.time_step_s = dt;
    }
    config.validate()?;

    if cli.describe {
        let replay = Replay::new(&config);
        for (chute, chute_cfg) in replay.chutes().iter().zip(&config.chutes) {
            println!("=== {} ===", chute_cfg.name);
            print!("{}", chute.describe());
            println!("Cost: {}", chute.module_cost());
        }
        return Ok(());
    }

    let report = Replay::new(&config).run()?;

    if let Some(output) = &cli.output {
        let mut writer = telemetry::writer_for_path(output)?;
        write_telemetry(&report, writer.as_mut())?;
        if output.as_os_str() != "-" {
            let generated = chrono::Utc::now().to_rfc3339();
            let path = summary::write_sidecar(output, &report.summary(generated))?;
            eprintln!("Summary written to {}", path.display());
        }
    }

    if cli.output.as_deref().is_some_and(|p| p.as_os_str() == "-") {
        return Ok(());
    }

    println!("=== Descent Replay ===");
    println!("Scenario        : {}", report.scenario);
    println!(
        "Ticks           : {} (dt = {} s)",
        report.ticks.len(),
        config.time_step_s
    );
    println!("Peak chute force: {:.1}", report.peak_chute_force());
    println!("Peak intake drag: {:.1}", report.peak_intake_force());
    for event in &report.events {
        let name = &report.chute_names[event.chute];
        match event.event {
            ChuteEvent::StateChanged { from, to } => {
                println!("t = {:>8.2} s  {:<12} {} -> {}", event.time_s, name, from, to)
            }
            ChuteEvent::DeployFailed { reason } => println!(
                "t = {:>8.2} s  {:<12} deployment failed: {}",
                event.time_s, name, reason
            ),
            _ => {}
        }
    }
    for (index, state) in report.final_states.iter().enumerate() {
        println!("Final state     : {} = {}", report.chute_names[index], state);
    }

    Ok(())
}
