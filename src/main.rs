//! Contour - Four-mode envelope generator

use anyhow::{Context, Result};
use clap::Parser;
use contour::config;
use contour::engine::Recorder;
use contour::scenario::{self, Simulator};
use std::io::Write;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            config: config_path,
            scenario: scenario_path,
            output,
        } => {
            println!("Loading configuration from {:?}...", config_path);
            let cfg = config::load_config(&config_path)?;
            let scn = scenario::load_scenario(&scenario_path)?;

            let total = scn.frame_count();
            println!(
                "Rendering {} ms ({} frames) to {:?}...",
                scn.duration_ms, total, output
            );

            let mut recorder = Recorder::for_tick(&output, scn.tick_micros)?;
            let frames_per_second = recorder.sample_rate() as u64;

            for (i, frame) in Simulator::new(&cfg, &scn)?.enumerate() {
                recorder.write_frame(&frame)?;

                // Progress update every simulated second
                if i as u64 % frames_per_second == 0 {
                    print!(
                        "\r  Progress: {}s / {}s",
                        i as u64 / frames_per_second,
                        total / frames_per_second
                    );
                    std::io::stdout().flush()?;
                }
            }

            recorder.finalize()?;
            println!("\nRecorded to {:?}", output);
        }

        Commands::Trace {
            config: config_path,
            scenario: scenario_path,
            every,
        } => {
            let cfg = config::load_config(&config_path)?;
            let scn = scenario::load_scenario(&scenario_path)?;

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            for frame in Simulator::new(&cfg, &scn)?.step_by(every.max(1)) {
                let line = serde_json::to_string(&frame).context("failed to encode frame")?;
                writeln!(out, "{}", line)?;
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Default mode: {}", cfg.default_mode);
                    for (slot, range) in cfg.timing.slots() {
                        println!(
                            "  {:<8} {} - {} µs",
                            slot, range.min_micros, range.max_micros
                        );
                    }
                    println!("  Curve rate scale: {}", cfg.curve.rate_scale);
                    println!(
                        "  Loop when gate off: {}, hard sync on ping: {}",
                        cfg.looping.loop_when_gate_off, cfg.looping.hard_sync_on_ping
                    );
                    println!(
                        "  Triggers: EOR {}, EOF {} ({} µs pulses)",
                        on_off(cfg.triggers.end_of_release),
                        on_off(cfg.triggers.end_of_fall),
                        cfg.triggers.pulse_width_micros
                    );
                    println!("  Gate passthrough: {}", on_off(cfg.gate_passthrough));
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let files = [
                ("contour.yaml", include_str!("../contour.example.yaml")),
                ("scenario.yaml", include_str!("../scenario.example.yaml")),
            ];

            for (path, contents) in files {
                if std::path::Path::new(path).exists() {
                    println!("{} already exists. Not overwriting.", path);
                } else {
                    std::fs::write(path, contents)
                        .with_context(|| format!("failed to write {}", path))?;
                    println!("Created {} with example settings.", path);
                }
            }
        }
    }

    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
