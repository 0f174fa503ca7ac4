mod commands;
mod output;
mod server;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::generate::ReportFormat;
use commands::AnalyzerArgs;

#[derive(Parser)]
#[command(
    name = "tenken",
    version,
    about = "Monthly inspection report generator: tickets + inspection PDFs -> HTML report"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a monthly report from a ticket sheet and inspection PDFs
    Generate {
        /// Ticket sheet (.csv, .xlsx, .xls, .ods)
        #[arg(short, long, value_name = "FILE")]
        tickets: PathBuf,

        /// Inspection PDF(s); matched to tickets by file name
        #[arg(short, long = "docs", value_name = "PDF", num_args = 1..)]
        docs: Vec<PathBuf>,

        /// Reporting month, e.g. "2025年8月"
        #[arg(short, long)]
        month: String,

        /// Property name
        #[arg(short, long)]
        property: String,

        /// Client name shown in the header
        #[arg(short, long, default_value = "")]
        client: String,

        #[command(flatten)]
        analyzer: AnalyzerArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Html)]
        format: ReportFormat,

        /// Write the report to this file (default: stdout)
        #[arg(short = 'O', long = "out", value_name = "FILE", conflicts_with = "out_dir")]
        out: Option<PathBuf>,

        /// Write the report into this directory under its standard name
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Analyze a single inspection PDF and print its finding
    Analyze {
        /// Path to the PDF
        input_file: PathBuf,

        #[command(flatten)]
        analyzer: AnalyzerArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Parse a ticket sheet and print its rows
    Tickets {
        /// Ticket sheet (.csv, .xlsx, .xls, .ods)
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate keyword lexicons
    Keywords {
        #[command(subcommand)]
        action: Option<KeywordsAction>,
    },
    /// Serve the upload form over HTTP
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,

        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },
}

#[derive(Subcommand)]
enum KeywordsAction {
    /// Print the built-in lexicon
    Show,
    /// Validate a custom lexicon file
    Validate {
        /// Path to JSON lexicon file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate {
            tickets,
            docs,
            month,
            property,
            client,
            analyzer,
            format,
            out,
            out_dir,
        } => commands::generate::run(commands::generate::GenerateArgs {
            tickets,
            docs,
            month,
            property,
            client,
            analyzer,
            format,
            out,
            out_dir,
        }),
        Commands::Analyze {
            input_file,
            analyzer,
            output,
        } => commands::analyze::run(input_file, analyzer, &output),
        Commands::Tickets { input_file, output } => commands::tickets::run(input_file, &output),
        Commands::Keywords { action } => match action {
            None | Some(KeywordsAction::Show) => commands::keywords::show(),
            Some(KeywordsAction::Validate { file }) => commands::keywords::validate(&file),
        },
        Commands::Serve { addr, analyzer } => commands::serve::run(addr, analyzer),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
