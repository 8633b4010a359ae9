mod script;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::Parser;
use log::{info, warn};

use nabu_engine::host::SceneTree;
use nabu_engine::logging::{LoggingConfig, init_logging};
use nabu_engine::time::FrameClock;
use nabu_ui::config::SessionConfig;
use nabu_ui::Session;

use script::Instruction;

/// Longest the driver keeps ticking after the script to let animations settle.
const SETTLE_LIMIT_SECS: f32 = 10.0;

#[derive(Parser, Debug)]
#[command(name = "nabu-studio", version, about = "Load a .uiml document, play a script, print the scene")]
struct Cli {
    /// Markup document. Defaults to the built-in demo.
    document: Option<PathBuf>,

    /// Command script. Defaults to the built-in demo script when no
    /// document is given.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Session settings (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Log filter, e.g. `debug` or `nabu_ui=trace`. Falls back to RUST_LOG.
    #[arg(long)]
    log: Option<String>,

    /// Print the scene tree before the script runs too.
    #[arg(long, default_value_t = false)]
    dump_initial: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::with_filter(cli.log.clone()));

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║            NABU STUDIO v0.1            ║");
    println!("  ║   headless host  ·  uiml runtime       ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    let config = match &cli.config {
        Some(path) => SessionConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    let mut ui = Session::new(SceneTree::new(), config);
    ui.set_event_handler(|inv| {
        println!("  [EVENT] {}.on{} → {}({})", inv.element, inv.event_type, inv.command, inv.args.join(", "));
    });

    let (stats, script_src) = match &cli.document {
        Some(path) => {
            let stats = ui.load_file(path).with_context(|| format!("loading {}", path.display()))?;
            let script = match &cli.script {
                Some(s) => Some(fs::read_to_string(s).with_context(|| format!("reading script {}", s.display()))?),
                None => None,
            };
            (stats, script)
        }
        None => {
            let stats = ui.load_str(include_str!("../ui/demo.uiml")).context("loading built-in demo")?;
            let script = match &cli.script {
                Some(s) => fs::read_to_string(s).with_context(|| format!("reading script {}", s.display()))?,
                None => include_str!("../ui/demo.script").to_string(),
            };
            (stats, Some(script))
        }
    };
    println!(
        "  Loaded {} element(s)  ·  {} name(s) registered  ·  {} skipped",
        stats.created,
        ui.loaded_count(),
        stats.unnamed + stats.unknown + stats.failed
    );
    if cli.dump_initial {
        println!();
        print!("{}", ui.host().dump());
    }

    let fps = cli.fps.max(1);
    let mut clock = FrameClock::fixed(Duration::from_secs_f64(1.0 / f64::from(fps)));

    if let Some(src) = script_src {
        let instructions = script::parse(&src)?;
        info!("playing {} script instruction(s) at {} fps", instructions.len(), fps);
        for inst in instructions {
            run(&mut ui, &mut clock, fps, inst);
        }
    }

    settle(&mut ui, &mut clock, fps);
    ui.wait_for_loads(Duration::from_secs(5));

    println!();
    print!("{}", ui.host().dump());
    println!();
    Ok(())
}

fn advance(ui: &mut Session<SceneTree>, clock: &mut FrameClock, frames: u32) {
    for _ in 0..frames {
        let t = clock.tick();
        ui.tick(t.dt);
    }
}

fn run(ui: &mut Session<SceneTree>, clock: &mut FrameClock, fps: u32, inst: Instruction) {
    match inst {
        Instruction::Wait(secs) => {
            let frames = (secs.max(0.0) * fps as f32).ceil() as u32;
            advance(ui, clock, frames);
        }
        Instruction::Command { element, command, args } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            // Failures are already logged by the session.
            let _ = ui.execute(&element, &command, &args);
        }
        Instruction::Text { slot, text } => {
            let n = ui.set_text(slot, &text);
            info!("slot {} text → {} widget(s)", slot, n);
        }
        Instruction::Image { slot, kind, source } => {
            if ui.load_image(slot, &source, kind).is_none() {
                warn!("image load into slot {} not started", slot);
            }
        }
        Instruction::Event { element, event, args } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let _ = ui.invoke_event(&element, &event, &args);
        }
        Instruction::Progress { element, value, animate } => {
            let _ = ui.set_progress_value(&element, value, animate);
        }
    }
}

/// Ticks until nothing is animating or pending, up to a limit.
fn settle(ui: &mut Session<SceneTree>, clock: &mut FrameClock, fps: u32) {
    let limit = (SETTLE_LIMIT_SECS * fps as f32) as u32;
    for _ in 0..limit {
        if ui.animator().is_idle() && ui.resources().pending_loads() == 0 {
            return;
        }
        advance(ui, clock, 1);
    }
    warn!("still animating after {}s; printing the current state", SETTLE_LIMIT_SECS);
}
