//! Board Scan CLI
//!
//! Command-line interface for running the board analysis pipeline against
//! a mock camera filming a configured layout.

use board_scan::{
    analysis::{BoardAnalysis, BoardAnalyzer},
    board::LabelGrid,
    capture::{Camera, FileConfig, Frame, MockCamera},
    metrics::{MetricsRegistry, MetricsSnapshot},
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Layout filmed when no `--layout` file is given.
const DEFAULT_LAYOUT: &str = "
    W R R W W W
    W W W W O W
    Y Y W W O W
    W W W W W W
    G W P P W W
    G W W W B B
";

#[derive(Debug, Parser)]
#[command(name = "board-scan", version, about = "Reads a board from camera frames and lists its pieces")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board layout for the mock camera, one row of color labels per line.
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Number of frames to analyze (overrides the config file).
    #[arg(short, long)]
    frames: Option<u32>,

    /// Keep analyzing until interrupted.
    #[arg(long)]
    continuous: bool,

    /// Per-channel noise amplitude added by the mock camera.
    #[arg(long, default_value_t = 0)]
    noise: u8,

    /// Write annotated frames as PNG files into this directory.
    #[arg(long, value_name = "DIR")]
    annotate: Option<PathBuf>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("Board Scan v{}", board_scan::VERSION);

    let mut config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };
    if let Some(frames) = args.frames {
        config.output.frame_count = frames;
    }
    config.output.continuous |= args.continuous;
    if args.annotate.is_some() {
        config.output.annotate_dir = args.annotate.clone();
    }
    if let Some(dir) = &config.output.annotate_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Failed to create {}: {}", dir.display(), e);
            std::process::exit(1);
        }
    }

    let layout = match load_layout(args.layout.as_ref()) {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("Failed to load layout: {}", e);
            std::process::exit(1);
        }
    };
    if layout.size() != config.board.grid_size {
        eprintln!(
            "Layout is {}x{} but the board is configured as {}x{}",
            layout.size(),
            layout.size(),
            config.board.grid_size,
            config.board.grid_size
        );
        std::process::exit(1);
    }

    let mut camera = MockCamera::with_layout(layout).with_noise(args.noise);
    if let Err(e) = camera.open(&config.capture) {
        eprintln!("Failed to open camera: {}", e);
        std::process::exit(1);
    }

    let mut analyzer = match BoardAnalyzer::new(&config.board) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Failed to build analyzer: {}", e);
            std::process::exit(1);
        }
    };

    let registry = match MetricsRegistry::new() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Failed to create metrics registry: {}", e);
            std::process::exit(1);
        }
    };

    #[cfg(feature = "metrics")]
    let shared = (config.output.metrics_port != 0)
        .then(|| spawn_metrics_server(config.output.metrics_port))
        .flatten();

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl-C handler: {}", e);
        }
    }

    if config.output.continuous {
        info!("Analyzing frames until interrupted...");
    } else {
        info!("Analyzing {} frames...", config.output.frame_count);
    }

    let mut latest: Option<BoardAnalysis> = None;
    let mut processed = 0u64;

    while running.load(Ordering::SeqCst)
        && (config.output.continuous || processed < u64::from(config.output.frame_count))
    {
        processed += 1;

        let frame = match camera.capture() {
            Ok(f) => f,
            Err(e) => {
                warn!("Frame capture failed: {}", e);
                continue;
            }
        };

        if let Ok(analysis) = analyzer.analyze(&frame) {
            println!("{}", analysis.pieces);
            if let Some(dir) = &config.output.annotate_dir {
                if let Err(e) = save_annotated(&analyzer, &frame, &analysis, dir) {
                    warn!("Failed to save annotated frame {}: {}", frame.sequence(), e);
                }
            }
            latest = Some(analysis);
        }

        let snapshot =
            MetricsSnapshot::from_components(analyzer.stats(), latest.as_ref(), analyzer.colors());
        registry.update(&snapshot);

        #[cfg(feature = "metrics")]
        if let Some(shared) = &shared {
            shared.blocking_read().update(&snapshot);
        }
    }

    camera.close();

    let stats = analyzer.stats();
    info!(
        "Processed {} frames: {} analyzed, {} failed",
        processed, stats.frames_analyzed, stats.failures
    );
    if let Some(analysis) = &latest {
        info!("Final board:\n{}", analysis.labels);
    }

    match registry.encode() {
        Ok(output) => debug!("Metrics:\n{}", output),
        Err(e) => warn!("Failed to encode metrics: {}", e),
    }
}

fn load_layout(path: Option<&PathBuf>) -> Result<LabelGrid, String> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("{}: {}", path.display(), e))?,
        None => DEFAULT_LAYOUT.to_string(),
    };
    text.parse().map_err(|e| format!("{}", e))
}

fn save_annotated(
    analyzer: &BoardAnalyzer,
    frame: &Frame,
    analysis: &BoardAnalysis,
    dir: &Path,
) -> Result<(), String> {
    let annotated = analyzer.annotate(frame, analysis).map_err(|e| e.to_string())?;
    let image = annotated
        .to_rgb_image()
        .ok_or_else(|| "frame buffer does not match its dimensions".to_string())?;
    let path = dir.join(format!("frame-{:06}.png", frame.sequence()));
    image.save(&path).map_err(|e| e.to_string())?;
    debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(feature = "metrics")]
fn spawn_metrics_server(port: u16) -> Option<board_scan::metrics::SharedMetrics> {
    use board_scan::metrics::{MetricsServer, MetricsServerConfig};

    let registry = match MetricsRegistry::new() {
        Ok(registry) => registry,
        Err(e) => {
            warn!("Metrics server disabled: {}", e);
            return None;
        }
    };
    let server = MetricsServer::new(MetricsServerConfig::with_port(port), registry);
    let state = server.state();

    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Failed to start metrics runtime: {}", e);
                return;
            }
        };
        if let Err(e) = runtime.block_on(server.run()) {
            warn!("Metrics server stopped: {}", e);
        }
    });

    Some(state)
}
