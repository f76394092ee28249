//! Boxlink CLI
//!
//! Usage:
//!   boxlink [OPTIONS] [FILE]
//!
//! Options:
//!   -s, --stylesheet <FILE>  Stylesheet file for colors (TOML format)
//!   -d, --debug              Trace replayed events to stderr
//!   -f, --format             Show the scene script format reference
//!   -h, --help               Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use boxlink::script::Script;
use boxlink::{render_svg, EngineConfig, Stylesheet, SvgConfig};

#[derive(Parser)]
#[command(name = "boxlink")]
#[command(about = "Replay a connector scene script and print an SVG snapshot")]
struct Cli {
    /// Input script file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Stylesheet file for colors (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Debug mode: trace each replayed event to stderr
    #[arg(short, long)]
    debug: bool,

    /// Show the scene script format reference
    #[arg(short, long)]
    format: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.format {
        print_format();
        return;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load stylesheet
    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Stylesheet::default(),
    };

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let script = match Script::from_str(&source) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.debug {
        eprintln!(
            "=== Replay: {} boxes, {} connectors, {} events ===",
            script.boxes.len(),
            script.connectors.len(),
            script.events.len()
        );
        for (index, event) in script.events.iter().enumerate() {
            eprintln!("  [{}] {:?}", index, event);
        }
    }

    match script.run(EngineConfig::default(), stylesheet) {
        Ok(diagram) => {
            if cli.debug {
                let scene = diagram.scene();
                eprintln!(
                    "=== Result: {} boxes, {} connectors ===",
                    scene.boxes.len(),
                    scene.connectors.len()
                );
            }
            let svg = render_svg(&diagram.scene(), &SvgConfig::default(), diagram.stylesheet());
            println!("{}", svg);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"Boxlink - live orthogonal connector routing between movable boxes

USAGE:
    boxlink [OPTIONS] [FILE]
    cat scene.toml | boxlink

OPTIONS:
    -f, --format       Show scene script format reference
    -s, --stylesheet   Custom color palette (TOML file)
    -d, --debug        Trace replayed events to stderr
    -h, --help         Print help

QUICK START:
    boxlink --format > scene.toml   # copy a starting point
    boxlink scene.toml > out.svg

A scene script declares boxes and connectors, then replays pointer and
move events through the routing engine. The output is an SVG snapshot of
the resulting diagram."#
    );
}

fn print_format() {
    println!(
        r#"# Boxlink scene script (TOML)

# Boxes are rectangles the surface owns; connectors reference them by name.
[[boxes]]
name = "a"
x = 0.0
y = 0.0
width = 100.0
height = 50.0

[[boxes]]
name = "b"
x = 200.0
y = 150.0
width = 100.0
height = 50.0

# Connectors are referenced by declaration index (0, 1, ...) in events.
[[connectors]]
from = "a"
to = "b"
label = "Dependency"

# Events replay in order. Kinds:
#   move        {{ name, dx, dy }}        translate a box
#   resize      {{ name, width, height }} resize a box in place
#   click       {{ connector }}           toggle the selection highlight
#   drag_anchor {{ connector, handle = "start" | "end", x, y }}
#   drag_elbow  {{ connector, x, y }}     grid-snapped free elbow
#   delete      {{ connector, confirm }}  confirmation prompt answer
[[events]]
kind = "move"
name = "b"
dx = 50.0
dy = 0.0

[[events]]
kind = "drag_elbow"
connector = 0
x = 213.0
y = 237.0"#
    );
}
