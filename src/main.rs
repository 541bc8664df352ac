// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use lyra::chordpro;
use lyra::layout::{distribute_content, LayoutSession};
use lyra::render::render_columns_text;
use lyra::template::{Template, TemplateWatcher};
use lyra::ui::{App, UiState};
use tracing::{info, Level};

/// Layout width used by `--render` when none is given
const DEFAULT_WIDTH: f32 = 800.0;

fn print_usage() {
    println!("Lyra - ChordPro song layout");
    println!();
    println!("Usage: lyra <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  --render <SONG>          Print the song laid out in columns");
    println!("  --check <SONG>           Parse and validate a song, print a summary");
    println!("  --preview <SONG>         Interactive terminal preview");
    println!("  --dump-template [FORMAT] Print the default template (yaml or toml)");
    println!("  --help                   Show this help message");
    println!();
    println!("Options:");
    println!("  --template <FILE>        Template file (YAML or TOML); reloaded live in --preview");
    println!("  --width <PX>             Layout width in pixels for --render (default {})", DEFAULT_WIDTH);
    println!("  --log-level <LEVEL>      error, warn, info, debug or trace (logs go to stderr)");
}

/// Command line after options have been pulled out
struct Args {
    command: Vec<String>,
    template: Option<PathBuf>,
    width: Option<f32>,
    log_level: Option<Level>,
}

fn take_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args {
        command: Vec::new(),
        template: None,
        width: None,
        log_level: None,
    };

    let mut args = raw.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--template" => parsed.template = Some(PathBuf::from(take_value(&mut args, &arg)?)),
            "--width" => {
                let value = take_value(&mut args, &arg)?;
                let width: f32 = value
                    .parse()
                    .map_err(|_| anyhow!("Invalid width: {}", value))?;
                parsed.width = Some(width);
            }
            "--log-level" => {
                let value = take_value(&mut args, &arg)?;
                let level: Level = value
                    .parse()
                    .map_err(|_| anyhow!("Invalid log level: {}", value))?;
                parsed.log_level = Some(level);
            }
            _ => parsed.command.push(arg),
        }
    }
    Ok(parsed)
}

fn init_logging(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_template(path: Option<&Path>) -> Result<Template> {
    match path {
        Some(path) => Template::load(path),
        None => Ok(Template::default()),
    }
}

fn render_song(song_path: &Path, template_path: Option<&Path>, width: f32) -> Result<()> {
    let song = chordpro::load(song_path)?;
    let template = load_template(template_path)?;
    let columns = distribute_content(&song.sections, &template, width)
        .with_context(|| format!("Failed to lay out {}", song_path.display()))?;

    if let Some(title) = &song.metadata.title {
        println!("{}", title);
        if let Some(subtitle) = &song.metadata.subtitle {
            println!("{}", subtitle);
        }
        println!();
    }
    print!("{}", render_columns_text(&columns, &template, width));
    Ok(())
}

fn check_song(song_path: &Path) -> Result<()> {
    let song = chordpro::load(song_path)?;
    song.validate()
        .with_context(|| format!("Malformed song: {}", song_path.display()))?;

    let metadata = &song.metadata;
    println!("{}", metadata.title.as_deref().unwrap_or("Untitled"));
    if let Some(artist) = &metadata.artist {
        println!("  Artist: {}", artist);
    }
    if let Some(key) = &metadata.key {
        println!("  Key:    {}", key);
    }
    if let Some(capo) = metadata.capo {
        println!("  Capo:   {}", capo);
    }
    if let Some(tempo) = metadata.tempo {
        println!("  Tempo:  {} BPM", tempo);
    }
    println!();

    for (i, section) in song.sections.iter().enumerate() {
        let chords: usize = section.lines.iter().map(|line| line.chords().count()).sum();
        let label = if section.has_heading() {
            section.label.as_str()
        } else {
            "(unlabelled)"
        };
        println!(
            "  {:>2}. {:<16} {:>3} lines {:>4} chords",
            i + 1,
            label,
            section.lines.len(),
            chords
        );
    }
    println!();
    println!(
        "OK: {} sections, {} lines",
        song.sections.len(),
        song.line_count()
    );
    Ok(())
}

fn dump_template(format: Option<&str>) -> Result<()> {
    let template = Template::default();
    let output = match format.unwrap_or("yaml") {
        "yaml" | "yml" => template.to_yaml()?,
        "toml" => template.to_toml()?,
        other => bail!("Unknown template format: {} (expected yaml or toml)", other),
    };
    print!("{}", output);
    Ok(())
}

fn preview(song_path: &Path, template_path: Option<&Path>) -> Result<()> {
    let song = chordpro::load(song_path)?;
    let template = load_template(template_path)?;

    let watcher = match template_path {
        Some(path) => Some(
            TemplateWatcher::new(path, None)
                .with_context(|| format!("Failed to watch {}", path.display()))?,
        ),
        None => None,
    };
    info!(song = %song_path.display(), template = %template.name, "starting preview");

    let mut app = App::new(UiState::new(song, template), LayoutSession::new())
        .context("Failed to initialise terminal")?;
    app.run(watcher.as_ref())
}

fn require_path(command: &[String], flag: &str) -> Result<PathBuf> {
    command
        .get(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("{} requires a song file", flag))
}

fn main() -> Result<()> {
    let args = parse_args(env::args().skip(1))?;

    let Some(command) = args.command.first().map(String::as_str) else {
        println!("Lyra - ChordPro song layout");
        println!("Run with --help for usage information");
        return Ok(());
    };

    // The preview owns the terminal, so it only logs when asked to
    match (command, args.log_level) {
        ("--preview", None) => {}
        (_, level) => init_logging(level.unwrap_or(Level::WARN)),
    }

    let template = args.template.as_deref();
    match command {
        "--render" => {
            let song = require_path(&args.command, command)?;
            render_song(&song, template, args.width.unwrap_or(DEFAULT_WIDTH))?;
        }
        "--check" => {
            let song = require_path(&args.command, command)?;
            check_song(&song)?;
        }
        "--preview" => {
            let song = require_path(&args.command, command)?;
            preview(&song, template)?;
        }
        "--dump-template" => {
            dump_template(args.command.get(1).map(String::as_str))?;
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", command);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
