use std::io::{self, Write};

use anyhow::Result;
use colored::*;

use crate::advisor::CommandSuggestion;

/// Print a suggestion the way a user reads it: the command first, then what
/// it does and which OS it targets.
pub fn print_suggestion(suggestion: &CommandSuggestion) {
    if suggestion.known_command && !suggestion.command.is_empty() {
        println!();
        println!("  {}", suggestion.command.green().bold());
        println!("  {}", suggestion.explanation);
        println!("  {}", format!("({})", suggestion.os).dimmed());
    } else {
        println!();
        println!("{}", "❓ Command not recognized".bold().yellow());
        if !suggestion.explanation.is_empty() {
            println!("   {}", suggestion.explanation);
        }
    }
}

/// Ask whether to copy the command to the clipboard, defaulting to no.
pub fn prompt_copy() -> Result<bool> {
    print!("\nCopy to clipboard? [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
