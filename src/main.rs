use std::{
    error::Error,
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;
use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFiles,
    term::{
        self,
        termcolor::{ColorChoice, ColorSpec, StandardStream, WriteColor},
    },
};
use kmpsearch::{FileHit, Hits, Kmp};
use log::info;

mod logger;

#[derive(Parser)]
#[command(disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Maximum level of log messages written to stderr.
    #[arg(long, global = true, default_value = "warn")]
    log_level: log::LevelFilter,
    /// Also write log messages to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the index of the first occurrence of PATTERN in TEXT, or -1 if there is none.
    Find { text: String, pattern: String },
    /// Print the failure table of PATTERN.
    Table { pattern: String },
    /// Show the first occurrence of PATTERN in every file under PATHS. Respects ignore files.
    Search(SearchArgs),
}

#[derive(clap::Args)]
struct SearchArgs {
    pattern: String,
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,
}

type FileId = usize;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logger::setup(cli.log_file.as_deref(), cli.log_level)?;

    let stdout = &mut StandardStream::stdout(ColorChoice::Auto);
    if !run(cli.command, stdout)? {
        std::process::exit(1);
    }
    Ok(())
}

/// Runs `command`, returning whether anything was found.
fn run(command: Command, out: &mut impl WriteColor) -> Result<bool, Box<dyn Error>> {
    match command {
        Command::Find { text, pattern } => Ok(find(&text, &pattern, out)?),
        Command::Table { pattern } => {
            table(&pattern, out)?;
            Ok(true)
        }
        Command::Search(args) => search(args, out),
    }
}

/// Searches by Unicode scalar value, so the reported index counts characters, not bytes.
fn find(text: &str, pattern: &str, out: &mut impl WriteColor) -> io::Result<bool> {
    let text: Vec<char> = text.chars().collect();
    let kmp = Kmp::new(pattern.chars().collect::<Vec<_>>());

    match kmp.find(&text) {
        Some(idx) => {
            let matched: String = text[idx..idx + kmp.len()].iter().collect();
            out.set_color(ColorSpec::new().set_bold(true))?;
            write!(out, "{idx}")?;
            out.reset()?;
            writeln!(out, " '{matched}'")?;
            Ok(true)
        }
        None => {
            writeln!(out, "-1")?;
            Ok(false)
        }
    }
}

fn table(pattern: &str, out: &mut impl WriteColor) -> io::Result<()> {
    let kmp = Kmp::new(pattern.chars().collect::<Vec<_>>());
    let table: Vec<_> = kmp.table().iter().map(usize::to_string).collect();
    writeln!(out, "{}", table.join(" "))
}

fn search(args: SearchArgs, out: &mut impl WriteColor) -> Result<bool, Box<dyn Error>> {
    if args.pattern.is_empty() {
        return Err("pattern must not be empty".into());
    }

    let hits = Hits::collect(args.pattern.as_bytes(), &args.paths)?;
    info!("pattern found in {} files", hits.files.len());

    let config = term::Config::default();
    let mut files = SimpleFiles::new();
    for hit in &hits.files {
        match label(&mut files, hit) {
            Ok(label) => {
                let diagnostic = Diagnostic::note()
                    .with_message(format!("first occurrence of `{}`", args.pattern))
                    .with_labels(vec![label]);
                term::emit(&mut *out, &config, &files, &diagnostic)?;
            }
            // Not valid UTF-8, so there is no source snippet to show.
            Err(err) if err.kind() == io::ErrorKind::InvalidData => emit_plain(out, hit)?,
            Err(err) => return Err(err.into()),
        }
    }

    Ok(!hits.is_empty())
}

fn label(files: &mut SimpleFiles<String, String>, hit: &FileHit) -> io::Result<Label<FileId>> {
    let file_id = files.add(hit.path.display().to_string(), hit.read_content()?);
    Ok(Label::primary(file_id, hit.span()))
}

fn emit_plain(out: &mut impl WriteColor, hit: &FileHit) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_bold(true))?;
    write!(out, "{}", hit.path.display())?;
    out.reset()?;
    writeln!(out, ": byte offset {}", hit.offset)
}
