use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use burner_input::{Command, InputEvent, InputRouter, KeyBindings};
use burner_kernel::{KindRegistry, Registry, SceneConfig, SpawnSpec};
use burner_render::{CssTextRenderer, DebugTextRenderer, Renderer, SupportedFeatures};
use burner_tools::{RegistryInspector, StatsOverlay};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "burner-cli", about = "Run burner scenes headlessly")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, kinds, and key bindings
    Info,
    /// List the registered item kinds
    Kinds,
    /// Run a scene for a number of frames
    Run {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Scene file (JSON). Defaults to a small demo scene.
        #[arg(short, long)]
        scene: Option<PathBuf>,
        /// Render collaborator
        #[arg(short, long, value_enum, default_value_t = RendererKind::Debug)]
        renderer: RendererKind,
        /// Simulated time between frames
        #[arg(long, default_value = "16")]
        interval_ms: u64,
        /// Print the rendered frame every N frames (0 prints only the last)
        #[arg(long, default_value = "0")]
        print_every: u64,
        /// Key presses as FRAME:CODE, e.g. 30:80 pauses on frame 30
        #[arg(long = "key", value_parser = parse_key_press)]
        keys: Vec<(u64, u32)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RendererKind {
    Css,
    Debug,
}

fn parse_key_press(s: &str) -> Result<(u64, u32), String> {
    let (frame, code) = s
        .split_once(':')
        .ok_or_else(|| format!("expected FRAME:CODE, got {s:?}"))?;
    let frame = frame.parse().map_err(|e| format!("bad frame {frame:?}: {e}"))?;
    let code = code.parse().map_err(|e| format!("bad key code {code:?}: {e}"))?;
    Ok((frame, code))
}

fn load_scene(path: &Path) -> anyhow::Result<SceneConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scene {}", path.display()))?;
    let scene = serde_json::from_str(&text)
        .with_context(|| format!("parsing scene {}", path.display()))?;
    Ok(scene)
}

fn demo_scene() -> SceneConfig {
    let spawn = |kind: &str, count| SpawnSpec {
        kind: kind.to_string(),
        count,
        options: Default::default(),
    };
    SceneConfig {
        spawn: vec![spawn("Ball", 3), spawn("Box", 2), spawn("Mover", 1)],
        ..Default::default()
    }
}

/// Simulated timestamp of `frame`, or an error when it does not fit.
fn frame_time(start: Instant, interval: Duration, frame: u64) -> anyhow::Result<Instant> {
    let index = u32::try_from(frame).with_context(|| format!("frame {frame} is out of range"))?;
    interval
        .checked_mul(index)
        .and_then(|offset| start.checked_add(offset))
        .with_context(|| format!("simulated time overflows on frame {frame}"))
}

struct RunOptions {
    frames: u64,
    interval: Duration,
    print_every: u64,
    keys: Vec<(u64, u32)>,
}

fn run_scene<R>(target: R, scene: &SceneConfig, opts: &RunOptions) -> anyhow::Result<Registry<R>>
where
    R: Renderer<Output = String> + 'static,
{
    let mut registry = Registry::new(target, scene.viewport()).context("creating registry")?;
    scene.install(&mut registry, false).context("installing scene")?;
    tracing::info!(
        items = registry.count(),
        worlds = registry.worlds().len(),
        "scene installed"
    );

    let router = InputRouter::default();
    let start = Instant::now();
    for frame in 0..opts.frames {
        if !registry.is_running() {
            break;
        }
        for &(_, code) in opts.keys.iter().filter(|(at, _)| *at == frame) {
            router
                .dispatch(&mut registry, InputEvent::KeyPressed(code))
                .with_context(|| format!("key {code} on frame {frame}"))?;
        }
        registry.update_at(frame_time(start, opts.interval, frame)?);

        if opts.print_every > 0 && frame % opts.print_every == 0 {
            println!("--- frame {frame} ---");
            print!("{}", registry.target().render());
        }
    }
    Ok(registry)
}

fn report<R: Renderer<Output = String>>(registry: &Registry<R>, print_frame: bool) {
    if print_frame {
        print!("{}", registry.target().render());
    }
    println!("{}", RegistryInspector::summary(registry));
    for id in RegistryInspector::list_items(registry) {
        if let Some(info) = RegistryInspector::inspect_item(registry, id) {
            println!("  {info}");
        }
    }
    if let Some(text) = StatsOverlay::for_registry(registry) {
        println!("{text}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("burner-cli v{}", env!("CARGO_PKG_VERSION"));
            let kinds: Vec<_> = KindRegistry::with_builtins().names().map(str::to_string).collect();
            println!("kinds: {}", kinds.join(", "));
            let keys = KeyBindings::default();
            for command in Command::ALL {
                println!("key {:?}: {:?}", keys.codes_for(command), command);
            }
        }
        Commands::Kinds => {
            for name in KindRegistry::with_builtins().names() {
                println!("{name}");
            }
        }
        Commands::Run {
            frames,
            scene,
            renderer,
            interval_ms,
            print_every,
            keys,
        } => {
            let scene = match scene {
                Some(path) => load_scene(&path)?,
                None => demo_scene(),
            };
            let opts = RunOptions {
                frames,
                interval: Duration::from_millis(interval_ms),
                print_every,
                keys,
            };
            let print_last = print_every == 0;
            match renderer {
                RendererKind::Css => {
                    let target = CssTextRenderer::new(SupportedFeatures::ALL);
                    report(&run_scene(target, &scene, &opts)?, print_last);
                }
                RendererKind::Debug => {
                    report(&run_scene(DebugTextRenderer::new(), &scene, &opts)?, print_last);
                }
            }
        }
    }

    Ok(())
}
