use crate::errors::{Error, Result};
use crate::structs::Operation;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Reads one trimmed line from the terminal. `None` means the user asked to
/// leave (Ctrl-C or Ctrl-D).
///
/// The editor blocks, so it runs on the blocking pool to keep the gateway
/// heartbeat alive while the user thinks.
pub async fn prompt(description: &str) -> Result<Option<String>> {
    let label = format!("{} ", format!("[{description}]").cyan().bold());
    tokio::task::spawn_blocking(move || {
        let mut editor = DefaultEditor::new()?;
        match editor.readline(&label) {
            Ok(line) => Ok(Some(line.trim().to_string())),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(why) => Err(Error::from(why)),
        }
    })
    .await
    .map_err(|why| Error::Internal(format!("prompt task failed: {why}")))?
}

pub fn print_menu(database: &str, guild: &str) {
    println!();
    println!(
        "{} database {} / server {}",
        "Exporting".bold(),
        database.yellow(),
        guild.yellow()
    );
    for op in Operation::ALL {
        println!("  {} {}", format!("{})", op.key()).cyan(), op.label());
    }
    println!("  {} change database", "d)".cyan());
    println!("  {} change server", "s)".cyan());
    println!("  {} quit", "q)".cyan());
}

pub fn info(msg: &str) {
    println!("{} {msg}", "[INFO]".blue().bold());
}

pub fn error(msg: &str) {
    println!("{} {msg}", "[ERROR]".red().bold());
}

pub fn success(msg: &str) {
    println!("{} {msg}", "[SUCCESS]".green().bold());
}
