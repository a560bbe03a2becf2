mod collectors;
mod config;
mod error;
mod models;
mod util;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use collectors::partitions::{self, Platform};
use collectors::{files, filesystem, hash, permissions, space};
use models::entry::{FileContent, FileSize};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use util::report::{self, Layout};

#[derive(Parser, Debug)]
#[command(name = "fscli", about = "Filesystem CLI tool for operations and forensic analysis", version)]
struct Cli {
    /// Also append report output to this file
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Path to operate on (default: current directory)
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Print results as JSON instead of a text report
    #[arg(long, global = true)]
    json: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List files and folders
    List {
        /// Include size and modification time
        #[arg(long)]
        detailed: bool,
    },
    /// Show drive space information
    Space,
    /// Show disk partition information
    Partitions {
        /// Include virtual filesystems (proc, sysfs, tmpfs, loop devices, ...)
        #[arg(long)]
        all: bool,
    },
    /// Show filesystem statistics
    Stats,
    /// Show file or folder permissions
    Perms {
        target: PathBuf,
    },
    /// Calculate a file hash
    Hash {
        file: PathBuf,
        /// md5, sha1 or sha256 (default from config, normally sha256)
        #[arg(long = "type")]
        hash_type: Option<String>,
    },
    /// Print a text file's contents
    Read {
        file: PathBuf,
    },
    /// Show a file's size
    Size {
        file: PathBuf,
    },
    /// Create a new file
    CreateFile {
        file: PathBuf,
        /// Content to write to the file
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Create a new folder (and any missing parents)
    CreateFolder {
        folder: PathBuf,
    },
    /// Delete a file or folder
    Delete {
        target: PathBuf,
        /// Recursively delete a folder and its contents
        #[arg(long)]
        recursive: bool,
    },
    /// Copy a file
    Copy {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Move a file or folder
    Move {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Rename a file or folder
    Rename {
        old_path: PathBuf,
        new_path: PathBuf,
    },
    /// Print config file path and current values
    Config,
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

/// Settings shared by every reporting command.
struct Ctx {
    base:   PathBuf,
    json:   bool,
    output: Option<PathBuf>,
    layout: Layout,
}

impl Ctx {
    fn show<T: Serialize>(&self, value: &T, text: impl FnOnce(&Layout) -> String) -> Result<()> {
        let rendered = if self.json {
            format!("{}\n", serde_json::to_string_pretty(value)?)
        } else {
            text(&self.layout)
        };
        report::emit(&rendered, self.output.as_deref());
        Ok(())
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fscli={}", level)));
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg = config::Config::load();

    let base = match cli.path {
        Some(p) => p,
        None    => std::env::current_dir().context("cannot read current directory")?,
    };
    let ctx = Ctx {
        base,
        json:   cli.json,
        output: cli.output.or_else(|| cfg.output_file()),
        layout: Layout::now(cfg.general.width, cfg.general.decimals as usize),
    };

    match cli.command {
        Cmd::List { detailed }        => run_list(&ctx, detailed),
        Cmd::Space                    => run_space(&ctx),
        Cmd::Partitions { all }       => run_partitions(&ctx, all || cfg.partitions.include_virtual),
        Cmd::Stats                    => run_stats(&ctx),
        Cmd::Perms { target }         => run_perms(&ctx, &target),
        Cmd::Hash { file, hash_type } => {
            let algo = hash_type.unwrap_or_else(|| cfg.hash.default_algorithm.clone());
            run_hash(&ctx, &file, &algo)
        }
        Cmd::Read { file }            => run_read(&ctx, file),
        Cmd::Size { file }            => run_size(&ctx, file),
        Cmd::CreateFile { file, content } => {
            files::create_file(&file, &content)?;
            println!("File creation successful: {}", file.display());
            Ok(())
        }
        Cmd::CreateFolder { folder } => {
            files::create_folder(&folder)?;
            println!("Folder creation successful: {}", folder.display());
            Ok(())
        }
        Cmd::Delete { target, recursive } => {
            files::delete(&target, recursive)?;
            println!("Deletion successful: {}", target.display());
            Ok(())
        }
        Cmd::Copy { source, destination } => {
            files::copy_file(&source, &destination)?;
            println!("File copy successful: {} to {}", source.display(), destination.display());
            Ok(())
        }
        Cmd::Move { source, destination } => {
            files::move_path(&source, &destination)?;
            println!("File move successful: {} to {}", source.display(), destination.display());
            Ok(())
        }
        Cmd::Rename { old_path, new_path } => {
            files::rename(&old_path, &new_path)?;
            println!("Rename successful: {} to {}", old_path.display(), new_path.display());
            Ok(())
        }
        Cmd::Config => run_print_config(&cfg),
        Cmd::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "fscli", &mut io::stdout());
            Ok(())
        }
    }
}

fn run_list(ctx: &Ctx, detailed: bool) -> Result<()> {
    let items = files::list(&ctx.base, detailed)?;
    ctx.show(&items, |l| report::listing("Directory Listing", &items, detailed, l))
}

fn run_space(ctx: &Ctx) -> Result<()> {
    let space = space::drive_space(&ctx.base)?;
    ctx.show(&space, |l| report::drive_space("Drive Space Information", &space, l))
}

fn run_partitions(ctx: &Ctx, include_virtual: bool) -> Result<()> {
    let volumes = partitions::enumerate(Platform::detect(), include_virtual);
    ctx.show(&volumes, |l| report::partitions("Disk Partitions", &volumes, l))
}

fn run_stats(ctx: &Ctx) -> Result<()> {
    let stats = filesystem::collect(&ctx.base)?;
    ctx.show(&stats, |l| report::filesystem_stats("Filesystem Statistics", &stats, l))
}

fn run_perms(ctx: &Ctx, target: &Path) -> Result<()> {
    let rep = permissions::permissions_for(target)?;
    let title = format!("Permissions for {}", target.display());
    ctx.show(&rep, |l| report::permissions(&title, &rep, l))
}

fn run_hash(ctx: &Ctx, file: &Path, algorithm: &str) -> Result<()> {
    let result = hash::hash_file_named(file, algorithm)?;
    let title = format!("Hash for {}", file.display());
    ctx.show(&result, |l| report::file_hash(&title, &result, l))
}

fn run_read(ctx: &Ctx, path: PathBuf) -> Result<()> {
    let content = files::read_file(&path)?;
    let file = FileContent { path, content };
    ctx.show(&file, |_| file.content.clone())
}

fn run_size(ctx: &Ctx, path: PathBuf) -> Result<()> {
    let bytes = files::file_size(&path)?;
    let size = FileSize { path, bytes };
    let title = format!("Size of {}", size.path.display());
    ctx.show(&size, |l| report::file_size(&title, &size, l))
}

fn run_print_config(cfg: &config::Config) -> Result<()> {
    let path = config::Config::config_path()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(unknown)".to_string());
    let output = if cfg.general.output_file.is_empty() { "(not set)" } else { cfg.general.output_file.as_str() };
    println!("Config: {}", path);
    println!();
    println!("[general]");
    println!("  decimals    = {}", cfg.general.decimals);
    println!("  output_file = {}", output);
    println!("  width       = {}", cfg.general.width);
    println!();
    println!("[hash]");
    println!("  default_algorithm = {}", cfg.hash.default_algorithm);
    println!();
    println!("[partitions]");
    println!("  include_virtual = {}", cfg.partitions.include_virtual);
    Ok(())
}
