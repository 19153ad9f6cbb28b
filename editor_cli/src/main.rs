//! Prose Editor - Runs editing commands against a file.
//!
//! Usage: prose-edit FILE --command NAME [--cursor LINE:COL] [--anchor LINE:COL]

use anyhow::{bail, Context, Result};
use clap::Parser;
use prose_editor_core::{Command, Editor, Position, Selection, Settings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "prose-edit", about, long_about = None)]
struct Cli {
    /// File to edit
    file: Option<PathBuf>,

    /// Command to run; repeat to run several in order
    #[arg(short, long = "command", value_name = "NAME")]
    commands: Vec<Command>,

    /// Cursor position (zero-based), the head of the selection
    #[arg(long, value_name = "LINE:COL", value_parser = parse_position)]
    cursor: Option<Position>,

    /// Other end of the selection; defaults to the cursor
    #[arg(long, value_name = "LINE:COL", value_parser = parse_position)]
    anchor: Option<Position>,

    /// Settings file (TOML)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the result back to the file instead of printing it
    #[arg(short, long)]
    in_place: bool,

    /// List the available commands and exit
    #[arg(long)]
    list: bool,
}

fn parse_position(s: &str) -> Result<Position, String> {
    let (line, col) = s
        .split_once(':')
        .ok_or_else(|| format!("expected LINE:COL, got `{s}`"))?;
    let line = line.trim().parse().map_err(|e| format!("bad line `{line}`: {e}"))?;
    let col = col.trim().parse().map_err(|e| format!("bad column `{col}`: {e}"))?;
    Ok(Position::new(line, col))
}

fn format_selection(sel: &Selection) -> String {
    if sel.is_point() {
        format!("{}:{}", sel.head.line, sel.head.col)
    } else {
        format!(
            "{}:{}-{}:{}",
            sel.anchor.line, sel.anchor.col, sel.head.line, sel.head.col
        )
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if cli.list {
        for command in Command::all() {
            println!("{command}");
        }
        return Ok(());
    }

    let Some(path) = cli.file else {
        bail!("no file given");
    };

    let mut editor = Editor::new();
    editor
        .open_file(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    log::info!("Opened {}", path.display());

    if let Some(config) = &cli.config {
        match Settings::load_from_path(config)? {
            Some(settings) => editor.set_settings(settings),
            None => log::warn!("Settings file {} not found, using defaults", config.display()),
        }
    }

    let head = cli.cursor.unwrap_or_default();
    let anchor = cli.anchor.unwrap_or(head);
    editor.set_selections(vec![Selection::new(anchor, head)]);

    for command in cli.commands {
        editor
            .execute(command)
            .with_context(|| format!("command {command} failed"))?;
    }

    if cli.in_place {
        if editor.is_modified() {
            editor.save()?;
            log::info!("Saved {}", path.display());
        }
    } else {
        print!("{}", editor.buffer().to_string());
    }

    let selections: Vec<String> = editor.selections().iter().map(format_selection).collect();
    eprintln!("selections: {}", selections.join(" "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("3:7"), Ok(Position::new(3, 7)));
        assert!(parse_position("3").is_err());
        assert!(parse_position("a:1").is_err());
    }

    #[test]
    fn test_cli_parses_commands() {
        let cli = Cli::try_parse_from([
            "prose-edit",
            "notes.md",
            "-c",
            "select-sentence",
            "--command",
            "move-sentence-down",
            "--cursor",
            "0:4",
        ])
        .unwrap();
        assert_eq!(
            cli.commands,
            vec![Command::SelectSentence, Command::MoveSentenceDown]
        );
        assert_eq!(cli.cursor, Some(Position::new(0, 4)));
        assert!(Cli::try_parse_from(["prose-edit", "-c", "nope"]).is_err());
    }

    #[test]
    fn test_format_selection() {
        assert_eq!(format_selection(&Selection::point(Position::new(1, 2))), "1:2");
        assert_eq!(
            format_selection(&Selection::new(Position::new(0, 0), Position::new(0, 5))),
            "0:0-0:5"
        );
    }
}
