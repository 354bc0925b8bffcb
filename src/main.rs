#![forbid(unsafe_code)]

mod headless;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::Parser;
use lattice_chunk::ChunkBuf;
use lattice_geom::Vec3;
use lattice_runtime::WorldRuntime;
use lattice_world::WorldConfig;
use simplelog::{ColorChoice, CombinedLogger, LevelFilter, TermLogger, TerminalMode, WriteLogger};

use headless::HeadlessBackend;

#[derive(Parser, Debug)]
#[command(name = "lattice", about = "Voxel terrain generation with concurrent chunk rendering")]
struct Args {
    /// World config (TOML). Missing sections use built-in defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the world seed
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<i32>,

    /// Number of headless frames to render
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Sleep between frames, in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Override the world size in blocks; the chunk grid is resized to cover it
    #[arg(long, value_delimiter = ',', value_name = "X,Y,Z")]
    world_size: Option<Vec<usize>>,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    match log_file {
        Some(path) => {
            CombinedLogger::init(vec![
                TermLogger::new(
                    LevelFilter::Info,
                    simplelog::Config::default(),
                    TerminalMode::Mixed,
                    ColorChoice::Auto,
                ),
                WriteLogger::new(LevelFilter::Debug, simplelog::Config::default(), File::create(path)?),
            ])?;
        }
        None => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        }
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<WorldConfig, Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => {
            let cfg = WorldConfig::load(path)?;
            log::info!("loaded world config from {}", path.display());
            cfg
        }
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.world.seed = seed;
    }
    if let Some(size) = &args.world_size {
        let [x, y, z] = size[..] else {
            return Err(format!("--world-size takes three values, got {}", size.len()).into());
        };
        cfg.world.size = [x, y, z];
        let e = cfg.covering_extent();
        cfg.grid.viewing_distance = [e.x, e.y, e.z];
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let cfg = load_config(&args)?;
    let mut rt = WorldRuntime::<ChunkBuf>::start(&cfg)?;
    let mut backend = HeadlessBackend::new();
    let frame_sleep = Duration::from_millis(args.frame_ms);

    let mut reported = false;
    for frame in 0..args.frames {
        let stats = rt.render_frame(&mut backend);
        if frame % 30 == 0 {
            let p = rt.task().progress();
            log::info!(
                "frame {}: {} chunks drawn, {} refreshed, generation {:?} {}/{}",
                frame,
                stats.drawn,
                stats.refreshed,
                p.pass,
                p.columns_done,
                p.columns_total
            );
        }
        if !reported && rt.task_mut().is_finished() {
            reported = true;
            log::info!("generation finished after {} frames", frame + 1);
        }
        thread::sleep(frame_sleep);
    }

    // Probe the hit-test seam at the render-space origin, straight down the column.
    let world = rt.world();
    let solid_rows = (0..world.size_y)
        .filter(|y| world.is_hitting(Vec3::new(0.0, *y as f32, 0.0)))
        .count();
    log::info!("hit test at render origin: {} solid rows", solid_rows);

    log::info!(
        "rendered {} frames: {} display lists, {} entries, {} refreshes",
        rt.driver().frames(),
        backend.lists_drawn,
        backend.entries_drawn,
        rt.driver().total_refreshes()
    );

    match rt.task_mut().try_outcome() {
        Some(Ok(report)) => log::info!("{:?}", report),
        Some(Err(e)) => return Err(e.clone().into()),
        None => log::info!("generation still running; cancelling"),
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = init_logging(args.log_file.as_ref()) {
        eprintln!("failed to initialise logging: {}", e);
        std::process::exit(1);
    }
    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
