use clap::{Parser, Subcommand};
use dda_dashboard::dataset::loader::DEFAULT_PATH;
use dda_dashboard::export::EXPORT_FILENAME;
use dda_dashboard::serve::{App, DEFAULT_LOGO, DEFAULT_PORT};
use dda_dashboard::{aggregate, Dashboard, Status};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dda-dashboard")]
#[command(author, version, about = "Dashboard for the DDA payment-linkage spreadsheet")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Spreadsheet to load
    #[arg(short, long, global = true, default_value = DEFAULT_PATH)]
    data: PathBuf,

    /// Worksheet name (default: first worksheet)
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// Pick the spreadsheet with a file dialog
    #[arg(long, global = true)]
    gui: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Warnings and errors only
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the web dashboard (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Logo image shown in the sidebar
        #[arg(long, default_value = DEFAULT_LOGO)]
        logo: PathBuf,

        /// Don't open the browser
        #[arg(long)]
        no_open: bool,
    },

    /// Print status counts and discrepancy totals
    Summary,

    /// Write the companies of one sector to a spreadsheet
    Export {
        /// Sector to export; lists the sectors when omitted
        #[arg(short, long)]
        sector: Option<String>,

        /// Output file
        #[arg(short, long, default_value = EXPORT_FILENAME)]
        output: PathBuf,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let data = spreadsheet_path(&args);
    let dashboard = match Dashboard::open(&data, args.sheet.as_deref()) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            error!(error = %e, "could not load spreadsheet");
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            std::process::exit(1);
        }
    };

    let command = args.command.unwrap_or(Command::Serve {
        port: DEFAULT_PORT,
        logo: PathBuf::from(DEFAULT_LOGO),
        no_open: false,
    });

    let result = match command {
        Command::Serve { port, logo, no_open } => {
            dda_dashboard::serve::start(port, App { dashboard, logo }, !no_open).map_err(Into::into)
        }
        Command::Summary => {
            print_summary(&dashboard);
            Ok(())
        }
        Command::Export { sector, output } => export(&dashboard, sector.as_deref(), output),
    };

    if let Err(e) = result {
        eprintln!("\x1b[31mError:\x1b[0m {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "gui")]
fn spreadsheet_path(args: &Args) -> PathBuf {
    if !args.gui {
        return args.data.clone();
    }
    match pick_spreadsheet_gui() {
        Some(path) => path,
        None => {
            eprintln!("No spreadsheet selected.");
            std::process::exit(0);
        }
    }
}

#[cfg(not(feature = "gui"))]
fn spreadsheet_path(args: &Args) -> PathBuf {
    if args.gui {
        eprintln!("Note: GUI mode not available in this build, using {}", args.data.display());
    }
    args.data.clone()
}

#[cfg(feature = "gui")]
fn pick_spreadsheet_gui() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select the DDA spreadsheet")
        .add_filter("Spreadsheets", &["xlsx", "xlsm", "xls", "ods"])
        .pick_file()
}

fn status_ansi(status: &Status) -> &'static str {
    match status {
        Status::Automatic => "\x1b[32m",
        Status::Manual => "\x1b[34m",
        Status::Pending => "\x1b[33m",
        Status::LinkedWithDifference => "\x1b[31m",
        Status::Other(_) => "\x1b[90m",
    }
}

fn print_summary(dashboard: &Dashboard) {
    let reset = "\x1b[0m";
    let statuses = dashboard.status_counts();
    let total = statuses.total();

    println!("\x1b[1mSituação Vinculo\x1b[0m");
    println!("{}", "─".repeat(50));
    for (status, count) in statuses.iter() {
        let share = if total == 0 { 0.0 } else { count as f64 * 100.0 / total as f64 };
        println!(
            "  {}{:<30}{} {:>6}  {:>5.1}%",
            status_ansi(status),
            status.label(),
            reset,
            count,
            share
        );
    }
    println!("  {:<30} {:>6}", "Total", total);

    let notes = aggregate::note_totals(dashboard.discrepancy_counts());
    println!("\n\x1b[1mObservação do Vínculo\x1b[0m ({})", Status::LinkedWithDifference);
    println!("{}", "─".repeat(50));
    if notes.is_empty() {
        println!("  \x1b[90m(nenhum)\x1b[0m");
    }
    for (note, count) in notes.iter() {
        println!("  {:<60} {:>6}", note, count);
    }

    println!("\n\x1b[90m{} setores\x1b[0m", dashboard.sectors().len());
}

fn export(
    dashboard: &Dashboard,
    sector: Option<&str>,
    output: PathBuf,
) -> dda_dashboard::Result<()> {
    let Some(sector) = sector else {
        println!("\x1b[1mSetores disponíveis:\x1b[0m");
        for sector in dashboard.sectors() {
            println!("  {}", sector);
        }
        return Ok(());
    };

    let download = dashboard.export_sector(sector)?;
    std::fs::write(&output, &download.bytes)?;
    info!(sector, path = %output.display(), "exported");
    eprintln!("\x1b[32mSaved: {}\x1b[0m", output.display());
    Ok(())
}
