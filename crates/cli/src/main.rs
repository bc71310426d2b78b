// trilabel CLI - three-pass labeling of policy document spreadsheets

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use trilabel_cli::tui;
use trilabel_config::Settings;
use trilabel_engine::{eligible_rows, Dataset, Label, Stage};

use exit_codes::{EXIT_ERROR, EXIT_IO_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "trilabel")]
#[command(about = "Three-pass spreadsheet labeling (terminal review loop)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Review documents interactively and label the active stage
    #[command(after_help = "\
Keys:
  1-3        select the active stage
  y / n / m  label the current document
  Enter      next document
  d          toggle the detail panel
  s          save an interim copy next to the input
  w          (completion view) write the final or interim file
  q / Esc    quit; unsaved labels are lost")]
    Run {
        /// Input spreadsheet (first worksheet, header row required)
        file: PathBuf,
    },

    /// Print per-stage labeling progress
    Status {
        /// Input spreadsheet
        file: PathBuf,
    },

    /// Write a snapshot of the dataset (adds missing label columns)
    Export {
        /// Input spreadsheet
        file: PathBuf,

        /// Output xlsx file
        #[arg(long, short = 'o')]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_USAGE } else { EXIT_SUCCESS };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };
    let settings = Settings::load();

    let code = match cli.command {
        Commands::Run { file } => cmd_run(&file, settings),
        Commands::Status { file } => cmd_status(&file, &settings),
        Commands::Export { file, output } => cmd_export(&file, &output, &settings),
    };
    ExitCode::from(code)
}

fn load_dataset(file: &PathBuf, settings: &Settings) -> Result<Dataset, String> {
    let (dataset, report) = trilabel_io::load(file, &settings.label_columns)?;
    eprintln!("[import] {}", report.summary());
    Ok(dataset)
}

fn cmd_run(file: &PathBuf, settings: Settings) -> u8 {
    let dataset = match load_dataset(file, &settings) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_IO_ERROR;
        }
    };
    let app = tui::ReviewApp::new(dataset, settings, file.clone());
    match tui::run(app) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_ERROR
        }
    }
}

fn cmd_status(file: &PathBuf, settings: &Settings) -> u8 {
    let dataset = match load_dataset(file, settings) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("error: {}", e);
            return EXIT_IO_ERROR;
        }
    };

    println!("{:<8} {:>8} {:>5} {:>5} {:>5} {:>7}", "stage", "eligible", "Y", "N", "M", "unset");
    for stage in Stage::ALL {
        let eligible = eligible_rows(&dataset, stage);
        let mut counts = [0usize; 3];
        let mut unset = 0usize;
        for &row in &eligible {
            match dataset.label(row, stage) {
                Some(Label::Yes) => counts[0] += 1,
                Some(Label::No) => counts[1] += 1,
                Some(Label::Maybe) => counts[2] += 1,
                None => unset += 1,
            }
        }
        println!(
            "{:<8} {:>8} {:>5} {:>5} {:>5} {:>7}",
            settings.label_columns[stage.index()],
            eligible.len(),
            counts[0],
            counts[1],
            counts[2],
            unset
        );
    }
    EXIT_SUCCESS
}

fn cmd_export(file: &PathBuf, output: &PathBuf, settings: &Settings) -> u8 {
    let result = load_dataset(file, settings)
        .and_then(|dataset| trilabel_io::export_to_file(&dataset, output).map(|()| dataset));
    match result {
        Ok(dataset) => {
            println!(
                "wrote {} ({} rows, {} columns)",
                output.display(),
                dataset.num_rows(),
                dataset.num_cols()
            );
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            EXIT_IO_ERROR
        }
    }
}
