use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

mod bundle;
mod catalog;
mod config;
mod discover;
mod error;
mod icon;
mod logs;
mod platform;

use bundle::{AppBundle, InfoPlist};
use config::ScanConfig;
use error::AppdexError;

#[derive(Parser)]
#[command(
    name = "appdex",
    about = "Desktop application inventory and inspection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the application directories and write a JSON inventory
    Apps {
        /// Scan these roots instead of the platform defaults
        #[arg(long = "root", value_name = "DIR")]
        roots: Vec<PathBuf>,

        /// Additional locations included as-is, without scanning
        #[arg(long = "extra", value_name = "PATH")]
        extras: Vec<PathBuf>,

        /// Where to write the inventory
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print the inventory instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// List currently running applications
    Running,

    /// Show the application that currently has input focus
    Frontmost,

    /// Save an application icon as a PNG file
    Icon {
        /// Bundle to pull the icon from; defaults to the frontmost application
        #[arg(long, value_name = "BUNDLE")]
        app: Option<PathBuf>,

        #[arg(short, long, default_value = "appicon.png", value_name = "FILE")]
        output: PathBuf,
    },

    /// Print bundle metadata as JSON
    Inspect {
        path: PathBuf,

        /// Dump the whole Info.plist instead of the digest
        #[arg(long)]
        full: bool,
    },

    Logs {
        #[command(subcommand)]
        action: Option<logs::LogsAction>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logs::init_logger()?;

    if let Err(err) = dispatch(Cli::parse().command) {
        logs::log_error(&err.to_string());
        return Err(err);
    }
    Ok(())
}

fn dispatch(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Apps {
            roots,
            extras,
            output,
            stdout,
        } => run_apps(roots, extras, output, stdout)?,
        Commands::Running => run_running()?,
        Commands::Frontmost => run_frontmost()?,
        Commands::Icon { app, output } => run_icon(app, output)?,
        Commands::Inspect { path, full } => run_inspect(path, full)?,
        Commands::Logs { action } => logs::handle_logs_command(action)?,
    }
    Ok(())
}

fn run_apps(
    roots: Vec<PathBuf>,
    extras: Vec<PathBuf>,
    output: Option<PathBuf>,
    stdout: bool,
) -> error::Result<()> {
    let mut config = ScanConfig::default();
    if !roots.is_empty() {
        config.roots = roots;
    }
    config.extra_locations.extend(extras);
    if let Some(output) = output {
        config.output = output;
    }

    logs::log_info("Scanning for installed applications...");
    let running_urls = running_urls();
    let catalog = catalog::build(&config, &running_urls)?;

    for failure in &catalog.failures {
        logs::log_warn(&format!(
            "could not list {}: {}",
            failure.dir.display(),
            failure.error
        ));
    }
    if !catalog.failures.is_empty() {
        eprintln!(
            "{} directories could not be listed; see 'appdex logs'",
            catalog.failures.len()
        );
    }

    if stdout {
        println!("{}", catalog::to_pretty_json(&catalog.records)?);
    } else {
        catalog::write_json(&catalog.records, &config.output)?;
        logs::log_info(&format!(
            "Wrote {} applications to {}",
            catalog.records.len(),
            config.output.display()
        ));
        println!(
            "{} applications written to {}",
            catalog.records.len(),
            config.output.display()
        );
    }
    Ok(())
}

/// Bundle URLs of everything currently running. When the platform cannot
/// answer, the inventory still gets produced, just with every `isRunning`
/// false.
fn running_urls() -> HashSet<String> {
    match platform::running_applications() {
        Ok(apps) => apps
            .into_iter()
            .filter_map(|app| app.bundle_path)
            .map(|path| catalog::file_url(&path))
            .collect(),
        Err(err) => {
            logs::log_warn(&format!("running applications unavailable: {err}"));
            HashSet::new()
        }
    }
}

fn run_running() -> error::Result<()> {
    let apps = platform::running_applications()?;
    for app in &apps {
        println!();
        println!("{}", app.name);
        if let Some(id) = &app.bundle_id {
            println!("  id:  {id}");
        }
        if let Some(path) = &app.bundle_path {
            println!("  url: {}", catalog::file_url(path));
        }
        if let Some(exe) = &app.executable {
            println!("  exe: {}", exe.display());
        }
        println!("  pid: {}", app.pid);
    }
    logs::log_info(&format!("Listed {} running applications", apps.len()));
    Ok(())
}

fn run_frontmost() -> error::Result<()> {
    let app = platform::frontmost_application()?;
    println!("The current application is \"{}\"", app.name);
    if let Some(id) = &app.bundle_id {
        println!("  id:  {id}");
    }
    if let Some(path) = &app.bundle_path {
        println!("  url: {}", catalog::file_url(path));
    }
    logs::log_info(&format!("Frontmost application: {}", app.name));
    Ok(())
}

fn run_icon(app: Option<PathBuf>, output: PathBuf) -> error::Result<()> {
    let bundle_path = match app {
        Some(path) => path,
        None => platform::frontmost_application()?
            .bundle_path
            .ok_or(AppdexError::NoBundleLocation)?,
    };

    let bundle = AppBundle::new(&bundle_path);
    if !bundle.is_app() {
        return Err(AppdexError::NotABundle { path: bundle_path });
    }

    let icns_path = icon::bundle_icon_path(&bundle).ok_or_else(|| AppdexError::NoIcon {
        path: bundle.path().to_path_buf(),
    })?;
    let png = icon::extract_png(&icns_path)?;
    fs::write(&output, &png).map_err(|source| AppdexError::WriteFailed {
        path: output.clone(),
        source,
    })?;

    logs::log_info(&format!(
        "Saved icon of {} to {}",
        bundle.name(),
        output.display()
    ));
    println!("Icon saved to {}", output.display());
    Ok(())
}

fn run_inspect(path: PathBuf, full: bool) -> error::Result<()> {
    let bundle = AppBundle::new(&path);
    let Some(plist_path) = bundle.info_plist_path() else {
        return Err(AppdexError::NotABundle { path });
    };

    if full {
        let value = InfoPlist::raw_value(&plist_path)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        let summary = bundle.summary(icon::bundle_icon_path(&bundle))?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    logs::log_info(&format!("Inspected {}", bundle.name()));
    Ok(())
}
