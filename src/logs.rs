use clap::Subcommand;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

const MAX_COMFORTABLE_SIZE: u64 = 5 * 1024 * 1024;

#[derive(Subcommand)]
pub enum LogsAction {
    /// Show recent log entries
    Show {
        /// Number of lines to show
        #[arg(short, long, default_value = "50")]
        lines: usize,
    },

    /// Clear the log file
    Clear,
}

pub fn init_logger() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = log_file()?.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub fn log_info(msg: &str) {
    append("INFO", msg);
}

pub fn log_warn(msg: &str) {
    append("WARN", msg);
}

pub fn log_error(msg: &str) {
    append("ERROR", msg);
}

fn append(level: &str, msg: &str) {
    let Ok(path) = log_file() else {
        return;
    };
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let entry = format!("[{timestamp}] {level}: {msg}\n");
    let _ = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut file| file.write_all(entry.as_bytes()));
}

pub fn handle_logs_command(action: Option<LogsAction>) -> Result<(), Box<dyn std::error::Error>> {
    match action.unwrap_or(LogsAction::Show { lines: 50 }) {
        LogsAction::Show { lines } => show_logs(lines),
        LogsAction::Clear => clear_logs(),
    }
}

fn show_logs(lines: usize) -> Result<(), Box<dyn std::error::Error>> {
    let path = log_file()?;

    if !path.exists() {
        println!("No log file found");
        return Ok(());
    }

    let size = fs::metadata(&path)?.len();
    if size > MAX_COMFORTABLE_SIZE {
        eprintln!(
            "Warning: Log file is {:.1} MiB. Consider running 'appdex logs clear'.",
            size as f64 / 1_048_576.0
        );
    }

    let reader = BufReader::new(File::open(&path)?);
    let all_lines: Vec<String> = reader.lines().collect::<Result<Vec<_>, _>>()?;

    let start = all_lines.len().saturating_sub(lines);
    for line in &all_lines[start..] {
        println!("{line}");
    }

    Ok(())
}

fn clear_logs() -> Result<(), Box<dyn std::error::Error>> {
    let path = log_file()?;

    if path.exists() {
        fs::write(&path, "")?;
        println!("Log file cleared");
    } else {
        println!("No log file to clear");
    }

    Ok(())
}

fn log_file() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|home| home.join("Library/Logs"))
            .ok_or("no home directory")?
    } else {
        dirs::data_dir().ok_or("no data directory")?
    };

    Ok(base.join("appdex").join("appdex.log"))
}
