#![forbid(unsafe_code)]

mod app;
mod config;
mod keymap;
mod screen;
mod scroll;
mod ui;
mod views;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use crate::views::dir::SortMode;

#[derive(Parser)]
#[command(name = "burrow", version, about = "Terminal file browser")]
struct Args {
    /// Folder to open (default: the current folder)
    path: Option<PathBuf>,

    /// Sort key for folder listings
    #[arg(long, value_enum, default_value_t = SortKey::Ext)]
    sort: SortKey,

    /// Reverse the sort order
    #[arg(long)]
    reverse: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortKey {
    Name,
    Ext,
    Size,
    Date,
}

fn sort_mode(key: SortKey, reverse: bool) -> SortMode {
    match (key, reverse) {
        (SortKey::Name, false) => SortMode::NameAsc,
        (SortKey::Name, true) => SortMode::NameDesc,
        (SortKey::Ext, false) => SortMode::ExtAsc,
        (SortKey::Ext, true) => SortMode::ExtDesc,
        (SortKey::Size, false) => SortMode::SizeAsc,
        (SortKey::Size, true) => SortMode::SizeDesc,
        (SortKey::Date, false) => SortMode::DateAsc,
        (SortKey::Date, true) => SortMode::DateDesc,
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let path = match args.path.map_or_else(std::env::current_dir, Ok) {
        Ok(path) => path,
        Err(err) => {
            eprintln!("burrow: {err}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = app::run(&path, sort_mode(args.sort, args.reverse)) {
        eprintln!("burrow: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
