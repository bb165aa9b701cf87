//! notemark - inspect the Markdown document model of a note.
//!
//! # Usage
//!
//! ```bash
//! notemark highlight notes.md
//! notemark --json tasks notes.md
//! notemark tables notes.md --aligned
//! notemark toggle notes.md 42 --write
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use notemark::config::OutputOptions;
use notemark::document::{Annotation, TextRange, Utf16Index};
use notemark::editor::{EditorBuffer, TextBuffer};
use notemark::highlight::Highlighter;
use notemark::{perf, table, tasks};

/// Inspect highlighting, task lists and tables of a Markdown note
#[derive(Parser, Debug)]
#[command(name = "notemark", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    options: OutputOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the resolved syntax annotations
    Highlight {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// List task lists with their progress
    Tasks {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print every table in canonical form
    Tables {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pad columns to a common width
        #[arg(long)]
        aligned: bool,
    },
    /// Toggle the task checkbox on the line holding OFFSET (UTF-16 units)
    Toggle {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(value_name = "OFFSET")]
        offset: u32,

        /// Write the result back to FILE
        #[arg(long)]
        write: bool,
    },
}

#[derive(Serialize)]
struct TaskReport {
    lists: Vec<tasks::TaskList>,
    total: usize,
    completed: usize,
    progress: f64,
}

fn read_note(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn snippet(text: &str, index: &Utf16Index, range: TextRange) -> String {
    match (index.to_byte(range.start), index.to_byte(range.end)) {
        (Some(start), Some(end)) => text[start..end].to_string(),
        _ => String::new(),
    }
}

fn run_highlight(file: &Path, options: &OutputOptions) -> Result<()> {
    let text = read_note(file)?;
    let mut highlighter = Highlighter::new(options.load_palette()?);
    let annotations = highlighter.highlight(&text);
    if options.json {
        return print_json::<[Annotation]>(&annotations);
    }
    let index = Utf16Index::new(&text);
    for ann in annotations.iter() {
        println!(
            "{:>14}  {:<22} {:?}",
            ann.range().to_string(),
            format!("{:?}", ann.kind),
            snippet(&text, &index, ann.range())
        );
    }
    Ok(())
}

fn run_tasks(file: &Path, options: &OutputOptions) -> Result<()> {
    let text = read_note(file)?;
    let lists = tasks::parse_all(&text);
    let stats = tasks::statistics(&text);
    if options.json {
        return print_json(&TaskReport {
            lists,
            total: stats.total,
            completed: stats.completed,
            progress: stats.progress(),
        });
    }
    for list in &lists {
        println!(
            "lines {}-{}: {}/{} done",
            list.start_line + 1,
            list.end_line + 1,
            list.completed_count(),
            list.total_count()
        );
        for item in &list.items {
            let mark = if item.completed { 'x' } else { ' ' };
            let indent = "  ".repeat(item.indent_level as usize);
            println!("  {indent}[{mark}] {}", item.text);
        }
    }
    println!(
        "{}/{} tasks complete ({:.0}%)",
        stats.completed,
        stats.total,
        stats.progress() * 100.0
    );
    Ok(())
}

fn run_tables(file: &Path, aligned: bool, options: &OutputOptions) -> Result<()> {
    let text = read_note(file)?;
    let tables = table::parse_all(&text);
    if options.json {
        return print_json(&tables);
    }
    for (i, table) in tables.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "<!-- lines {}-{}, {} x {} -->",
            table.start_line + 1,
            table.end_line + 1,
            table.row_count(),
            table.column_count()
        );
        if aligned {
            println!("{}", table.to_aligned_markdown());
        } else {
            println!("{}", table.to_markdown());
        }
    }
    Ok(())
}

fn run_toggle(file: &Path, offset: u32, write: bool, options: &OutputOptions) -> Result<()> {
    let text = read_note(file)?;
    let mut buffer = EditorBuffer::from_text(&text);
    if !tasks::toggle_at(&mut buffer, offset) {
        anyhow::bail!("No task item at offset {offset} in {}", file.display());
    }

    let updated = buffer.to_text().into_owned();
    let item = tasks::item_at(&updated, offset);
    if write {
        fs::write(file, &updated).with_context(|| format!("Failed to write {}", file.display()))?;
        buffer.mark_clean();
        tracing::debug!(path = %file.display(), "wrote toggled note");
    }

    if options.json {
        return print_json(&item);
    }
    if let Some(item) = item {
        let state = if item.completed { "done" } else { "open" };
        println!("line {}: {state}: {}", item.line + 1, item.text);
    }
    if !write {
        print!("{updated}");
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging. Perf scopes only emit once enabled by --perf.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into())
                .add_directive("perf=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    perf::set_enabled(cli.options.perf);
    let _scope = perf::scope("notemark.command");

    match cli.command {
        Command::Highlight { file } => run_highlight(&file, &cli.options),
        Command::Tasks { file } => run_tasks(&file, &cli.options),
        Command::Tables { file, aligned } => run_tables(&file, aligned, &cli.options),
        Command::Toggle {
            file,
            offset,
            write,
        } => run_toggle(&file, offset, write, &cli.options),
    }
}
