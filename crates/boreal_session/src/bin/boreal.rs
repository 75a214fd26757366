//! Boreal headless runner.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use boreal_foundation::EngineFamily;
use boreal_session::{Engine, FamilyProfile, StaticProvider, detect_install};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// CLI configuration parsed from arguments.
struct CliConfig {
    family: EngineFamily,
    module: String,
    ticks: u64,
    delta: f32,
    seed: u64,
    install: Option<PathBuf>,
    show_help: bool,
    show_version: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            family: EngineFamily::Aurora,
            module: "demo".to_owned(),
            ticks: 100,
            delta: 0.1,
            seed: 0,
            install: None,
            show_help: false,
            show_version: false,
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_family(name: &str) -> Result<EngineFamily, Box<dyn std::error::Error>> {
    match name.to_lowercase().as_str() {
        "aurora" => Ok(EngineFamily::Aurora),
        "odyssey" => Ok(EngineFamily::Odyssey),
        "electron" => Ok(EngineFamily::Electron),
        "eclipse" => Ok(EngineFamily::Eclipse),
        other => Err(format!("unknown engine family: {other}").into()),
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--family" => {
                i += 1;
                if i >= args.len() {
                    return Err("--family requires a value".into());
                }
                config.family = parse_family(&args[i])?;
            }
            "--ticks" => {
                i += 1;
                if i >= args.len() {
                    return Err("--ticks requires a value".into());
                }
                config.ticks = args[i]
                    .parse()
                    .map_err(|_| format!("invalid --ticks value: {}", args[i]))?;
            }
            "--delta" => {
                i += 1;
                if i >= args.len() {
                    return Err("--delta requires a value".into());
                }
                config.delta = args[i]
                    .parse()
                    .map_err(|_| format!("invalid --delta value: {}", args[i]))?;
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    return Err("--seed requires a value".into());
                }
                config.seed = args[i]
                    .parse()
                    .map_err(|_| format!("invalid --seed value: {}", args[i]))?;
            }
            "--install" => {
                i += 1;
                if i >= args.len() {
                    return Err("--install requires a path".into());
                }
                config.install = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            module => config.module = module.to_owned(),
        }
        i += 1;
    }

    Ok(config)
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_args(args)?;

    if config.show_help {
        print_help();
        return Ok(());
    }

    if config.show_version {
        println!("boreal {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut family = config.family;
    if let Some(path) = &config.install {
        let Some(game) = detect_install(path) else {
            return Err(format!("no known game install at {}", path.display()).into());
        };
        info!(family = %game.family, title = %game.title, "detected install");
        family = game.family;
    }

    // Native format decoders live behind ResourceProvider; the runner ships
    // with the built-in demo module.
    let mut engine =
        Engine::with_provider(FamilyProfile::for_family(family), StaticProvider::demo());
    engine.set_ai_seed(config.seed);
    engine.initialize();
    let mut session = engine.create_game_session()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut progress = |fraction: f32| tracing::debug!(fraction, "loading");
    let report = runtime.block_on(session.load_module(&config.module, Some(&mut progress)))?;
    info!(
        module = %config.module,
        spawned = report.instances_spawned,
        skipped = report.instances_skipped,
        "module ready"
    );

    for tick in 0..config.ticks {
        session.update(config.delta)?;
        for event in session.world_mut().drain_events() {
            info!(tick, ?event, "world event");
        }
    }
    info!(
        ticks = config.ticks,
        simulated_seconds = session.world().time(),
        "run complete"
    );

    session.shutdown();
    engine.shutdown();
    Ok(())
}

fn print_help() {
    println!(
        "\x1b[1mBoreal\x1b[0m - Headless RPG world simulation runner

\x1b[1mUSAGE:\x1b[0m
    boreal [OPTIONS] [MODULE]

\x1b[1mARGUMENTS:\x1b[0m
    [MODULE]           Module to load (default: demo)

\x1b[1mOPTIONS:\x1b[0m
    -h, --help         Print help information
    -V, --version      Print version information
    --family NAME      Engine family: aurora, odyssey, electron, eclipse
    --ticks N          Simulation ticks to run (default: 100)
    --delta SECONDS    Seconds per tick (default: 0.1)
    --seed N           AI random seed (default: 0)
    --install PATH     Detect the engine family from a game install

\x1b[1mEXAMPLES:\x1b[0m
    boreal                           Run the demo module 100 ticks
    boreal --ticks 600 --delta 0.05  Run longer with a finer tick
    boreal --family odyssey --seed 7 Odyssey idle behavior, fixed seed
    boreal --install ~/games/kotor   Probe an install directory

Set RUST_LOG to adjust logging, e.g. RUST_LOG=boreal_ai=debug."
    );
}
