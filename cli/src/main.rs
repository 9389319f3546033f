mod logging;
mod tui;
mod view;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, ValueEnum};
use tracing::debug;
use marku_core::export::to_text;
use marku_core::{
    parse_subject_args, write_export, Config, ExportFormat, FileStorage, ResultsService, SubjectStore,
};

#[derive(Parser)]
#[command(name = "marku")]
#[command(about = "A grade point calculator (SGPA / CGPA / percentage)", long_about = None)]
struct Cli {
    /// Directory holding the stored subjects and results (default: $MARKU_HOME or ~/.marku)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a subject (usage: add Data Structures 4 9, or add Data Structures credits:4 grade:9)
    Add {
        /// Subject name followed by credits and grade, bare or as credits:N grade:N
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Remove a subject by id or id prefix
    Remove { id: String },
    /// List subjects with the live SGPA
    List,
    /// Remove every subject and the stored results
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Calculate results and show them
    Calculate,
    /// Show the last calculated results
    Results,
    /// Write the last calculated results to a file
    Export {
        #[arg(short, long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
        /// Output directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the last calculated results as a plain-text report
    Print,
    /// Open the Terminal User Interface
    Tui {
        /// Where exports from the TUI are written (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Text,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Text => ExportFormat::Text,
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui { .. }));
    logging::init(cli.verbose, interactive);

    let export_dir = match &cli.command {
        Some(Commands::Export { output, .. }) | Some(Commands::Tui { output }) => output.clone(),
        _ => None,
    };
    let config = Config::resolve(cli.data_dir, export_dir)?;
    debug!(data_dir = %config.data_dir.display(), "using data directory");
    let storage = FileStorage::new(Some(config.data_dir.clone()))?;
    let mut store = SubjectStore::open(storage.clone());
    let results = ResultsService::new(storage.clone());

    match cli.command {
        Some(Commands::Add { args }) => {
            let form = parse_subject_args(&args)?;
            let subject = store.add(&form.name, form.credits, form.grade)?;
            println!("Subject added: {} (ID: {})", subject.name, subject.short_id());
            println!("  Credits: {}", subject.credits);
            println!("  Grade: {} ({})", subject.grade_letter, subject.grade);
        }
        Some(Commands::Remove { id }) => {
            let target = store.find(&id)?.id;
            if let Some(removed) = store.remove(&target)? {
                println!("Subject removed: {}", removed.name);
            }
        }
        Some(Commands::List) => {
            view::show_subjects(store.subjects(), &store.summary());
        }
        Some(Commands::Clear { yes }) => {
            if yes || confirm("Are you sure you want to clear all subjects and results?")? {
                results.clear_all(&mut store)?;
                println!("All subjects cleared!");
            } else {
                println!("Nothing cleared.");
            }
        }
        Some(Commands::Calculate) => {
            let snapshot = results.calculate(&store)?;
            view::show_results(&snapshot);
        }
        Some(Commands::Results) => match results.latest() {
            Some(snapshot) => view::show_results(&snapshot),
            None => view::show_no_data(),
        },
        Some(Commands::Export { format, .. }) => {
            let snapshot = results.require_latest()?;
            let path = write_export(&snapshot, format.into(), &config.export_dir)?;
            println!("Results exported to {}", path.display());
        }
        Some(Commands::Print) => {
            let snapshot = results.require_latest()?;
            print!("{}", to_text(&snapshot, Local::now()));
        }
        Some(Commands::Tui { .. }) | None => {
            if let Some(report) = tui::run(store, results, config.export_dir)? {
                print!("{}", report);
            }
        }
    }
    Ok(())
}
