//! RPS Arena headless runner
//!
//! Runs a seeded simulation without a renderer and logs the census as it
//! goes. Usage: `rps-arena [small|medium|large] [ticks] [seed]`, or
//! `rps-arena --config path/to/config.json [ticks]`.

use rps_arena::{GameConfig, PopulationPreset, SimulationEngine};

const DEFAULT_TICKS: u64 = 5_000;
const REPORT_EVERY: u64 = 500;

fn parse_args(args: &[String]) -> Result<(GameConfig, u64), String> {
    let mut config = GameConfig::default();
    let mut rest = args;

    if let Some(first) = rest.first() {
        if first == "--config" {
            let path = rest.get(1).ok_or("--config needs a path")?;
            let json = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            config = GameConfig::from_json(&json).map_err(|e| e.to_string())?;
            rest = &rest[2..];
        } else if let Some(preset) = PopulationPreset::from_str(first) {
            config = GameConfig::from_preset(preset);
            rest = &rest[1..];
        }
    }

    let ticks = match rest.first() {
        Some(s) => s.parse().map_err(|_| format!("invalid tick count: {}", s))?,
        None => DEFAULT_TICKS,
    };
    if let Some(s) = rest.get(1) {
        config.seed = s.parse().map_err(|_| format!("invalid seed: {}", s))?;
    }

    Ok((config, ticks))
}

fn main() {
    env_logger::init();
    log::info!("RPS Arena (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config, ticks) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };

    let mut engine = match SimulationEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(2);
        }
    };

    for _ in 0..ticks {
        engine.tick();
        let t = engine.time_ticks();
        if t % REPORT_EVERY == 0 {
            let census = engine.census();
            log::info!(
                "tick {}: rock={} paper={} scissors={}",
                t,
                census.rock,
                census.paper,
                census.scissors
            );
        }
        if engine.is_terminal() {
            break;
        }
    }

    match engine.winner() {
        Some(kind) => log::info!("{} wins after {} ticks", kind, engine.time_ticks()),
        None => log::info!("No winner after {} ticks", engine.time_ticks()),
    }

    match engine.snapshot().to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize snapshot: {}", e),
    }
}
