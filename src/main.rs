use clap::{Args, Parser};
use log::{error, info};
use retroq::emitter::hardware_description;
use retroq::experiment::{
    entangled_clock_experiment, full_simulation, message_recovery_experiment, self_test, SimConfig,
};
use serde::Serialize;
use serde_json::to_writer_pretty;
use std::fs::File;
use std::io::Write;


const RETROQ_VERSION: &str = "0.3.1";

#[derive(Parser, Debug)]
#[command(name = "retroq", version = RETROQ_VERSION,
    about = "retroq - a quantum state-vector simulator demonstrating that messages \
             cannot be recovered from a decohering register (no backward-in-time signalling).\n\
             Use 'retroq help <command>' for more information on a specific command.",
    long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Runs the full simulation: entangled clocks, then message recovery.
    Run {
        /// Message to encode into the register.
        #[arg(long, default_value = "HELLO")]
        message: String,
        /// Signed time delta in seconds (negative means "into the past").
        #[arg(long, default_value_t = -3600.0, allow_hyphen_values = true)]
        time_delta: f64,
        #[command(flatten)]
        sim: SimArgs,
        /// Write the combined report as JSON to this path.
        #[arg(long)]
        report: Option<String>,
        /// Write the static hardware-description artifact to this path.
        #[arg(long)]
        emit_hdl: Option<String>,
    },
    /// Runs only the entangled-clocks experiment.
    Clock {
        #[command(flatten)]
        sim: SimArgs,
        #[arg(long)]
        report: Option<String>,
    },
    /// Runs only the message-recovery experiment.
    Message {
        #[arg(long, default_value = "HELLO")]
        message: String,
        #[arg(long, default_value_t = -3600.0, allow_hyphen_values = true)]
        time_delta: f64,
        #[command(flatten)]
        sim: SimArgs,
        #[arg(long)]
        report: Option<String>,
    },
    /// Runs the runtime self-test suite.
    Selftest {
        #[command(flatten)]
        sim: SimArgs,
    },
    /// Prints the retroq version.
    Version,
}

#[derive(Args, Debug)]
struct SimArgs {
    /// Register size in qubits.
    #[arg(long, default_value_t = 16)]
    qubits: usize,
    /// Base decoherence rate per step.
    #[arg(long, default_value_t = 0.001)]
    rate: f64,
    /// Number of clock evolution steps.
    #[arg(long, default_value_t = 100)]
    steps: usize,
}

impl SimArgs {
    fn config(&self) -> SimConfig {
        SimConfig {
            qubits: self.qubits,
            decoherence_rate: self.rate,
            evolution_steps: self.steps,
            ..SimConfig::default()
        }
    }
}

fn write_report<T: Serialize>(report: &T, path: &str) -> std::io::Result<()> {
    let file = File::create(path)?;
    to_writer_pretty(file, report)?;
    info!("report written to {}", path);
    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            message,
            time_delta,
            sim,
            report,
            emit_hdl,
        } => {
            let cfg = sim.config();
            let result = full_simulation(&cfg, &message, time_delta)
                .map_err(|e| format!("simulation failed: {}", e))?;

            println!(
                "clock experiment: final coherence {:.6} ({})",
                result.clock.final_coherence,
                if result.clock.success {
                    "coherence kept"
                } else {
                    "coherence lost"
                }
            );
            println!(
                "message experiment: recovery failed as expected, fidelity {:.6}, read back {:?}",
                result.message.fidelity, result.message.recovery.recovered
            );
            println!(
                "register distribution: {} basis states above cutoff",
                result.distribution.len()
            );

            if let Some(path) = report {
                write_report(&result, &path).map_err(|e| format!("error writing report: {}", e))?;
            }
            if let Some(path) = emit_hdl {
                let mut f =
                    File::create(&path).map_err(|e| format!("error creating {}: {}", path, e))?;
                f.write_all(hardware_description(&cfg).as_bytes())
                    .map_err(|e| format!("error writing {}: {}", path, e))?;
                println!("hardware description written to {}", path);
            }
        }
        Commands::Clock { sim, report } => {
            let cfg = sim.config();
            let result = entangled_clock_experiment(&cfg, 0, 1, 2)
                .map_err(|e| format!("clock experiment failed: {}", e))?;

            for (step, coherence) in &result.coherence_trace {
                println!("step {:>4}: coherence {:.6}", step, coherence);
            }
            println!(
                "final coherence {:.6}, entropy {:.6}, fidelity {:.6} ({})",
                result.final_coherence,
                result.entropy,
                result.fidelity,
                if result.success {
                    "coherence kept"
                } else {
                    "coherence lost"
                }
            );

            if let Some(path) = report {
                write_report(&result, &path).map_err(|e| format!("error writing report: {}", e))?;
            }
        }
        Commands::Message {
            message,
            time_delta,
            sim,
            report,
        } => {
            let cfg = sim.config();
            let result = message_recovery_experiment(&cfg, &message, time_delta)
                .map_err(|e| format!("message experiment failed: {}", e))?;

            println!(
                "encoded {} bits, evolved {} steps at scaled rate {:.6}",
                result.encoded_bits, cfg.message_decoherence_steps, result.scaled_rate
            );
            println!(
                "recovery failed as expected: read back {:?}, fidelity {:.6}, entropy {:.6}",
                result.recovery.recovered, result.fidelity, result.entropy
            );

            if let Some(path) = report {
                write_report(&result, &path).map_err(|e| format!("error writing report: {}", e))?;
            }
        }
        Commands::Selftest { sim } => {
            let cfg = sim.config();
            let result =
                self_test(&cfg).map_err(|e| format!("self-test suite failed to run: {}", e))?;

            for check in &result.checks {
                println!(
                    "[{}] {}: {}",
                    if check.passed { "pass" } else { "FAIL" },
                    check.name,
                    check.detail
                );
            }
            if result.success {
                println!("all self-tests passed");
            } else {
                error!("one or more self-tests failed");
                return Err("self-test failure".to_string());
            }
        }
        Commands::Version => {
            println!("retroq version {}", RETROQ_VERSION);
        }
    }
    Ok(())
}
