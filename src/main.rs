use clap::{Parser, Subcommand};
use class_scores::config::Config;
use class_scores::metrics::{class_summary, top_n};
use class_scores::output::{self, OutputFormat};
use class_scores::session::Session;
use class_scores::store::{RecordStore, StudentRecord};
use class_scores::ScoreError;
use std::path::PathBuf;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_VALIDATION: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive dashboard (default if no subcommand)
    Dashboard,
    /// Record one student's scores
    Add {
        /// Student ID
        #[arg(long)]
        id: String,
        /// Student name
        #[arg(long)]
        name: String,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        chinese: u8,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        math: u8,
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        english: u8,
    },
    /// List every record with its total
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Class size, subject averages and the top students
    Summary {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Rank students by total score
    Top {
        /// How many students to show (defaults to top_n from config)
        #[arg(short)]
        n: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Show one student's scores and commentary
    Student {
        /// Name of the student (the first matching record is shown)
        name: String,
    },
    /// Write a spreadsheet-friendly CSV with totals
    Export {
        /// Output path (defaults to export_file_name next to the data file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "class-scores")]
#[command(about = "Record exam scores and review class statistics", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/class-scores/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the score file (overrides data_file from config)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn exit_code(err: &ScoreError) -> i32 {
    match err {
        ScoreError::StorageRead { .. } | ScoreError::StorageWrite { .. } => EXIT_STORAGE,
        ScoreError::Validation(_) => EXIT_VALIDATION,
        ScoreError::EmptyTable => EXIT_FAILURE,
    }
}

fn fail(err: ScoreError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(exit_code(&err));
}

fn print_records(records: &[&StudentRecord], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{}", output::format_record_table(records, output::should_use_colors()))
        }
        OutputFormat::Tsv => println!("{}", output::format_records_tsv(records)),
        OutputFormat::Json => match output::format_records_json(records) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode JSON: {}", e);
                std::process::exit(EXIT_FAILURE);
            }
        },
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Dashboard);

    class_scores::logging::init(cli.verbose);

    // `init` writes the config, so it must not require one to load
    if let Commands::Init { force } = command {
        let path = cli
            .config
            .map(PathBuf::from)
            .unwrap_or_else(class_scores::config::get_config_path);
        if let Err(e) = class_scores::config::write_default_config(&path, force) {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        println!("Wrote default config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match class_scores::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let data_path = cli.data.unwrap_or_else(|| config.data_file());
    tracing::debug!(path = %data_path.display(), "opening score file");

    let session = match Session::open(RecordStore::new(data_path)) {
        Ok(s) => s,
        Err(e) => fail(e),
    };

    run_command(command, session, config).await;
    std::process::exit(EXIT_SUCCESS);
}

async fn run_command(command: Commands, mut session: Session, config: Config) {
    match command {
        Commands::Dashboard => {
            let theme = class_scores::tui::resolve_theme(config.theme);
            let app = class_scores::tui::App::new(session, config, theme);
            if let Err(e) = class_scores::tui::run_tui(app).await {
                eprintln!("TUI error: {:#}", e);
                std::process::exit(EXIT_FAILURE);
            }
        }
        Commands::Add { id, name, chinese, math, english } => {
            let record = StudentRecord::new(id, name, chinese, math, english);
            match session.submit(record) {
                Ok(name) => println!("Saved scores for {}", name),
                Err(e) => fail(e),
            }
        }
        Commands::List { format } => {
            let records: Vec<&StudentRecord> = session.table().iter().collect();
            print_records(&records, format);
        }
        Commands::Summary { format } => {
            let table = session.table();
            if table.is_empty() {
                println!("{}", output::EMPTY_TABLE_HINT);
                return;
            }
            let summary = class_summary(table).unwrap_or_else(|e| fail(e));
            let top = top_n(table, config.top_n()).unwrap_or_else(|e| fail(e));

            match format {
                OutputFormat::Table => {
                    let use_colors = output::should_use_colors();
                    println!("{}", output::format_summary(&summary, use_colors));
                    println!();
                    println!("Top {} by total:", config.top_n());
                    println!("{}", output::format_record_table(&top, use_colors));
                }
                OutputFormat::Tsv => {
                    println!("{}", output::format_summary_tsv(&summary));
                    println!();
                    println!("{}", output::format_records_tsv(&top));
                }
                OutputFormat::Json => {
                    let top_views: Vec<output::RecordView> =
                        top.iter().map(|r| output::RecordView::from(*r)).collect();
                    let value = serde_json::json!({
                        "summary": summary,
                        "top": top_views,
                    });
                    match serde_json::to_string_pretty(&value) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            eprintln!("Failed to encode JSON: {}", e);
                            std::process::exit(EXIT_FAILURE);
                        }
                    }
                }
            }
        }
        Commands::Top { n, format } => {
            let table = session.table();
            if table.is_empty() {
                println!("{}", output::EMPTY_TABLE_HINT);
                return;
            }
            let limit = n.unwrap_or_else(|| config.top_n());
            let top = top_n(table, limit).unwrap_or_else(|e| fail(e));
            print_records(&top, format);
        }
        Commands::Student { name } => match session.table().find_by_name(&name) {
            Some(record) => {
                println!("{}", output::format_student_detail(record, output::should_use_colors()))
            }
            None => {
                eprintln!("No student named '{}'", name);
                std::process::exit(EXIT_CONFIG);
            }
        },
        Commands::Export { output: out_path } => {
            let path = out_path.unwrap_or_else(|| {
                class_scores::export::resolve_export_path(
                    session.store().path(),
                    config.export_file_name(),
                )
            });
            if let Err(e) = class_scores::export::write_export(session.table(), &path) {
                fail(e);
            }
            println!("Exported {} students to {}", session.table().len(), path.display());
        }
        Commands::Init { .. } => unreachable!("handled before the config is loaded"),
    }
}
