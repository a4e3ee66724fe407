// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use bookman_app::AppState;
use config::Config;
use runtime::StoreRuntime;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `bookman --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let mut runtime = StoreRuntime::new(config.export_filename());
    if options.demo {
        runtime.load_books(bookman_testkit::BookFaker::new(1).books(120), "demo");
    } else if let Some(path) = &options.csv_path {
        runtime
            .load_csv(path)
            .with_context(|| format!("open {}", path.display()))?;
    }

    if options.check_only {
        return Ok(());
    }

    let mut state = AppState::default();
    bookman_tui::run_app(&mut state, &mut runtime, config.page_size())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    csv_path: Option<PathBuf>,
    demo: bool,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        csv_path: None,
        demo: false,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown if unknown.starts_with('-') => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
            path => {
                if options.csv_path.is_some() {
                    return Err(anyhow::anyhow!(
                        "only one CSV file may be given, got a second: {path:?}"
                    ));
                }
                options.csv_path = Some(PathBuf::from(path));
            }
        }
    }

    if options.demo && options.csv_path.is_some() {
        return Err(anyhow::anyhow!(
            "--demo and a CSV file path are mutually exclusive"
        ));
    }

    Ok(options)
}

fn print_help() {
    println!("bookman");
    println!("  <file.csv>               Open a CSV book list");
    println!("  --demo                   Launch with seeded demo data (in-memory)");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and input file, then exit");
    println!("  --help                   Show this help");
}
