// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;

use stemseq::arrangement::{presets, Arrangement};
use stemseq::config::{validate_config, ArrangementFile, ConfigEvent, ConfigWatcher};
use stemseq::Session;

fn print_usage() {
    println!("STEMSEQ - Measure-Driven Generative Stem Sequencer");
    println!();
    println!("Usage: stemseq [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --list                  List built-in arrangements");
    println!("  --validate <FILE>       Validate an arrangement YAML file");
    println!("  --export <NAME> <FILE>  Write a built-in arrangement to a YAML file");
    println!("  --demo <NAME> [SECS]    Run an arrangement, printing scheduled commands");
    println!("  --watch <FILE> [SECS]   Run an arrangement file with hot-reload");
    println!("  --help                  Show this help message");
}

fn find_preset(name: &str) -> Option<Arrangement> {
    presets::all().into_iter().find(|a| a.name() == name)
}

fn list_arrangements() {
    println!("Built-in arrangements:");
    for arrangement in presets::all() {
        println!(
            "  {:<10} {:>5.0} BPM, {} parts, {} voices",
            arrangement.name(),
            arrangement.tempo_bpm(),
            arrangement.parts().len(),
            arrangement.parts()[0].tracks().len()
        );
    }
}

/// Drive one session loop iteration, printing anything that fired
fn pump(session: &mut Session) {
    if let Some(measure) = session.process() {
        println!("-- measure {}", measure);
    }
    for scheduled in session.drain_commands() {
        println!("  {:>8.3}s  {:?}", scheduled.time, scheduled.command);
    }
}

fn run_demo(arrangement: &Arrangement, seconds: f64) -> Result<()> {
    println!(
        "Playing '{}' at {} BPM for {:.0}s...",
        arrangement.name(),
        arrangement.tempo_bpm(),
        seconds
    );

    let mut session = Session::new();
    session.resume();
    session.play(arrangement);

    let start = Instant::now();
    while start.elapsed().as_secs_f64() < seconds {
        pump(&mut session);

        // Sleep toward the next tick without overshooting it
        let wait = session.time_until_next_tick();
        if wait > 0.001 {
            thread::sleep(Duration::from_secs_f64(wait / 2.0));
        }
    }

    session.stop();
    pump(&mut session);
    println!("Demo complete!");
    Ok(())
}

fn run_watched(path: &str, seconds: f64) -> Result<()> {
    let arrangement = validate_config(path)?;
    let watcher = ConfigWatcher::new(path, None)?;

    println!(
        "Playing '{}' from {:?} (edit the file to hot-reload)...",
        arrangement.name(),
        watcher.watched_path()
    );

    let mut session = Session::new();
    session.resume();
    session.play(&arrangement);

    let start = Instant::now();
    while start.elapsed().as_secs_f64() < seconds {
        for event in watcher.recv_all() {
            match event {
                ConfigEvent::Reloaded(arrangement) => {
                    println!("Reloaded '{}'", arrangement.name());
                    session.play(&arrangement);
                }
                ConfigEvent::Error(message) => eprintln!("Reload failed: {}", message),
                ConfigEvent::FileCreated(path) => println!("Created: {:?}", path),
                ConfigEvent::FileDeleted(path) => println!("Deleted: {:?}", path),
            }
        }

        pump(&mut session);
        thread::sleep(Duration::from_millis(50));
    }

    session.stop();
    pump(&mut session);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("STEMSEQ - Measure-Driven Generative Stem Sequencer");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--list" => {
            list_arrangements();
        }
        "--validate" => {
            if args.len() < 3 {
                eprintln!("Error: --validate requires a file path");
                std::process::exit(1);
            }
            let arrangement = validate_config(&args[2])?;
            println!(
                "OK: '{}' at {} BPM, {} parts",
                arrangement.name(),
                arrangement.tempo_bpm(),
                arrangement.parts().len()
            );
        }
        "--export" => {
            if args.len() < 4 {
                eprintln!("Error: --export requires an arrangement name and a file path");
                eprintln!("Use --list to see available arrangements");
                std::process::exit(1);
            }
            let arrangement = find_preset(&args[2])
                .ok_or_else(|| anyhow::anyhow!("Unknown arrangement: {}", args[2]))?;
            ArrangementFile::from_arrangement(&arrangement).save(&args[3])?;
            println!("Wrote '{}' to {}", arrangement.name(), args[3]);
        }
        "--demo" => {
            if args.len() < 3 {
                eprintln!("Error: --demo requires an arrangement name");
                eprintln!("Use --list to see available arrangements");
                std::process::exit(1);
            }
            let arrangement = find_preset(&args[2])
                .ok_or_else(|| anyhow::anyhow!("Unknown arrangement: {}", args[2]))?;
            let seconds: f64 = if args.len() >= 4 {
                args[3].parse().unwrap_or(30.0)
            } else {
                30.0
            };
            run_demo(&arrangement, seconds)?;
        }
        "--watch" => {
            if args.len() < 3 {
                eprintln!("Error: --watch requires a file path");
                std::process::exit(1);
            }
            let seconds: f64 = if args.len() >= 4 {
                args[3].parse().unwrap_or(60.0)
            } else {
                60.0
            };
            run_watched(&args[2], seconds)?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
