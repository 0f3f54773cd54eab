use std::fs;
use std::path::Path;

use ansi_term::Colour::{Blue, Cyan};
use ansi_term::Style;
use anyhow::Result;
use serde::Deserialize;
use sigil_core::{DeclaredType, EnumType, FieldDecl, RecordSchema, Runner};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum PrintFormat {
    Pretty,
    LinePerEntry,
}

#[derive(Debug, Deserialize)]
struct ListArgs {
    paths: Vec<String>,
    exclude: Vec<String>,
    print_format: PrintFormat,
    follow_symlinks: bool,
    max_depth: Option<i64>,
}

fn list_schema() -> RecordSchema {
    RecordSchema::new("sigil-ls")
        .description("List directory entries; the whole CLI is derived from a record schema")
        .field(
            FieldDecl::new("paths", DeclaredType::list(DeclaredType::Str))
                .positional()
                .help("Directories to list (default: current directory)"),
        )
        .field(
            FieldDecl::new("exclude", DeclaredType::list(DeclaredType::Str))
                .help("Entry names to leave out"),
        )
        .field(
            FieldDecl::new(
                "print_format",
                DeclaredType::Enum(EnumType::new("PrintFormat", ["pretty", "line-per-entry"])),
            )
            .default_value("pretty")
            .help("Output style"),
        )
        .field(
            FieldDecl::new("follow_symlinks", DeclaredType::Bool)
                .default_value(true)
                .help("Descend into directories reached through symlinks"),
        )
        .field(
            FieldDecl::new("max_depth", DeclaredType::optional(DeclaredType::Int))
                .help("Recurse at most this many levels"),
        )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("SIGIL_LOG").unwrap_or_else(|_| "warn".to_string()),
        ))
        .init();

    let runner = Runner::from_record(list_schema(), |args: ListArgs| {
        run_listing(&args)?;
        Ok(())
    })?;

    runner.run()?;
    Ok(())
}

fn run_listing(args: &ListArgs) -> Result<()> {
    let paths = if args.paths.is_empty() {
        vec![".".to_string()]
    } else {
        args.paths.clone()
    };
    debug!("Listing {} path(s)", paths.len());

    for (index, path) in paths.iter().enumerate() {
        if matches!(args.print_format, PrintFormat::Pretty) {
            if index > 0 {
                println!();
            }
            println!("{}", Blue.bold().paint(path.as_str()));
        }
        list_dir(Path::new(path), args, args.max_depth.unwrap_or(1), "  ")?;
    }
    Ok(())
}

fn list_dir(dir: &Path, args: &ListArgs, depth: i64, indent: &str) -> Result<()> {
    if depth <= 0 {
        return Ok(());
    }

    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().to_string();
        if args.exclude.iter().any(|excluded| *excluded == name) {
            continue;
        }

        let file_type = entry.file_type()?;
        let descend = if file_type.is_symlink() {
            args.follow_symlinks && fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false)
        } else {
            file_type.is_dir()
        };

        match args.print_format {
            PrintFormat::Pretty => {
                if descend || file_type.is_dir() {
                    println!("{}{}/", indent, Cyan.paint(&name));
                } else if file_type.is_symlink() {
                    println!("{}{}", indent, Style::new().dimmed().paint(&name));
                } else {
                    println!("{}{}", indent, name);
                }
            }
            PrintFormat::LinePerEntry => println!("{}", entry.path().display()),
        }

        if descend {
            list_dir(&entry.path(), args, depth - 1, &format!("{}  ", indent))?;
        }
    }
    Ok(())
}
