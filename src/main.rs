use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_IO: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate every family of a report request and print the structure grade
    Report {
        /// YAML request listing the families and their importance factors
        manifest: PathBuf,

        /// Write the consolidated HTML report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the report as JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Open the HTML report in a browser once written (requires --output)
        #[arg(long, requires = "output")]
        open: bool,
    },
    /// Evaluate a single family and print its per-element table
    Family {
        /// Inspection sheet, or a directory holding one sheet and a fotos/ folder
        path: PathBuf,

        /// Importance factor F_r (1-5, see `ingde factors`)
        #[arg(short, long)]
        importance: u8,

        /// Display name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Field delimiter of the sheet, overriding the config and the tab default of .tsv files
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Print the result as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// List the importance factors and the structural roles they stand for
    Factors,
}

#[derive(Parser, Debug)]
#[command(name = "ingde")]
#[command(about = "GDE/UnB deterioration grading for bridge inspections", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/ingde/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match ingde::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = ingde::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.verbose {
        eprintln!(
            "Sheet delimiter: {:?}, report title: {}",
            config.delimiter(),
            config.report_title()
        );
    }

    let use_colors = ingde::output::should_use_colors();

    let request = match &cli.command {
        Commands::Factors => {
            println!("{}", ingde::output::format_factors(&config.vocabulary()));
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::Report { manifest, .. } => match ingde::ingest::load_request(manifest) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Request error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
        Commands::Family {
            path,
            importance,
            name,
            delimiter,
            ..
        } => ingde::ingest::ReportRequest {
            title: None,
            families: vec![ingde::ingest::FamilyRequest {
                name: name.clone(),
                path: path.clone(),
                importance: *importance,
                delimiter: delimiter.clone(),
            }],
        },
    };

    if let Err(errors) = ingde::ingest::validate_request(&request) {
        eprintln!("Request errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.verbose {
        eprintln!("Evaluating {} families", request.families.len());
    }

    // Hold tolerated-data warnings until the results are printed
    ingde::stderr_buffer::activate();
    let report = match ingde::evaluate::evaluate_request(&request, &config, cli.verbose).await {
        Ok(r) => r,
        Err(e) => {
            ingde::stderr_buffer::flush();
            eprintln!("{:#}", e);
            std::process::exit(EXIT_INPUT);
        }
    };

    match cli.command {
        Commands::Report {
            output, json, open, ..
        } => {
            if json {
                match serde_json::to_string_pretty(&report) {
                    Ok(s) => println!("{}", s),
                    Err(e) => {
                        eprintln!("Failed to serialize report: {}", e);
                        std::process::exit(EXIT_IO);
                    }
                }
            } else {
                println!("{}", ingde::output::format_report(&report, use_colors));
            }

            if let Some(path) = output {
                let saved = ingde::output::render_report(&report)
                    .and_then(|html| ingde::output::save_report(&path, &html));
                if let Err(e) = saved {
                    ingde::stderr_buffer::flush();
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_IO);
                }
                eprintln!("Report written to {}", path.display());

                if open {
                    if let Err(e) = ingde::browser::open_report(&path) {
                        ingde::stderr_buffer::flush();
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_IO);
                    }
                }
            }
        }
        Commands::Family { json, .. } => {
            // A single-family request either succeeds or fails as a whole
            let Some(family) = report.families.first() else {
                std::process::exit(EXIT_INPUT);
            };
            if json {
                match serde_json::to_string_pretty(family) {
                    Ok(s) => println!("{}", s),
                    Err(e) => {
                        eprintln!("Failed to serialize family: {}", e);
                        std::process::exit(EXIT_IO);
                    }
                }
            } else {
                println!("{}", ingde::output::format_element_table(family, use_colors));
            }
        }
        Commands::Factors => {}
    }

    let warnings = ingde::stderr_buffer::drain();
    if !warnings.is_empty() {
        eprintln!();
        for warning in warnings {
            eprintln!("{}", warning);
        }
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(EXIT_SUCCESS);
}
