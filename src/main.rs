//! Cellgraph - A dependency-tracking spreadsheet engine with a command-line front end

mod config;

use anyhow::Context;
use cellgraph_core::Document;
use cellgraph_engine::engine::{Spreadsheet, format_value};
use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: cellgraph [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Spreadsheet file to open (.sprd or .grd)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <NAME=CONTENT>  Set a cell (can be repeated)");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula and print the result");
    eprintln!("  -p, --print               Print every non-empty cell");
    eprintln!("  -o, --output <FILE>       Save to file (.grd for text, otherwise JSON)");
    eprintln!("  --config <FILE>           Load settings from a TOML file");
    eprintln!("  --no-config               Ignore the user config file");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct Options {
    file_path: Option<PathBuf>,
    edits: Vec<(String, String)>,
    command: Option<String>,
    print: bool,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    no_config: bool,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-s" | "--set" => {
                i += 1;
                let Some(edit) = args.get(i) else {
                    return Err("--set requires NAME=CONTENT".to_string());
                };
                let Some((name, content)) = edit.split_once('=') else {
                    return Err(format!("Expected NAME=CONTENT, got: {}", edit));
                };
                options.edits.push((name.trim().to_string(), content.to_string()));
            }
            "-c" | "--command" => {
                i += 1;
                let Some(formula) = args.get(i) else {
                    return Err("--command requires a formula".to_string());
                };
                options.command = Some(formula.clone());
            }
            "-p" | "--print" => options.print = true,
            "-o" | "--output" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    return Err("--output requires a file path".to_string());
                };
                options.output_file = Some(PathBuf::from(path));
            }
            "--config" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    return Err("--config requires a file path".to_string());
                };
                options.config_file = Some(PathBuf::from(path));
            }
            "--no-config" => options.no_config = true,
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            arg => {
                if options.file_path.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                options.file_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Run the requested actions. Returns the process exit code.
fn run(options: Options) -> anyhow::Result<i32> {
    let (settings, warnings) = if options.no_config && options.config_file.is_none() {
        (config::Settings::default(), Vec::new())
    } else {
        config::load_settings(options.config_file.as_deref())
    };
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    log::debug!("Using settings {:?}", settings);

    let mut doc = Document::with_file(options.file_path.clone(), settings.engine_config())
        .with_context(|| match &options.file_path {
            Some(path) => format!("Failed to open {}", path.display()),
            None => "Failed to create document".to_string(),
        })?;

    for (name, content) in &options.edits {
        let affected = doc
            .set_cell_from_input(name, content)
            .with_context(|| format!("Failed to set {}", name))?;
        eprintln!("Updated: {}", affected.join(", "));
    }

    let mut exit_code = 0;
    if let Some(formula) = &options.command {
        let value = doc.evaluate_formula(formula)?;
        println!("{}", format_value(&value));
        if value.is_error() {
            exit_code = 1;
        }
    }

    // Opening a file with no other action prints it.
    let nothing_else = options.edits.is_empty()
        && options.command.is_none()
        && options.output_file.is_none();
    if options.print || nothing_else {
        for name in doc.engine.get_names_of_all_nonempty_cells() {
            let input = doc.get_cell_input(&name)?;
            println!("{}: {} => {}", name, input, doc.get_cell_display(&name));
        }
    }

    if let Some(output_path) = &options.output_file {
        let path = doc.save_as(output_path)?;
        eprintln!("Saved to {}", path.display());
    } else if doc.is_modified() && doc.file_path.is_some() {
        let path = doc.save_file()?;
        eprintln!("Saved to {}", path.display());
    }

    Ok(exit_code)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.iter().skip(1).any(|arg| arg == "-h" || arg == "--help") {
        print_usage();
        return;
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            print_usage();
            std::process::exit(1);
        }
    };

    if options.file_path.is_none()
        && options.edits.is_empty()
        && options.command.is_none()
        && !options.print
    {
        print_usage();
        std::process::exit(1);
    }

    match run(options) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
