use anyhow::{Context, Result};
use arboard::Clipboard;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::io::{self, IsTerminal, Read};

use crate::advisor::{self, CommandSuggestion, TargetOs};
use crate::config::Config;
use crate::gemini::GeminiClient;
use crate::render;

/// Entry point for the `tai` command-line interface.
#[derive(Debug, Parser)]
#[command(
    name = "tai",
    about = "Plain-English to shell-command assistant",
    version,
    long_about = None
)]
pub struct Cli {
    /// Optional subcommand (e.g., `config`)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Target OS for the suggested command (defaults to the current machine)
    #[arg(short = 'o', long = "os", value_enum)]
    pub os: Option<TargetOs>,

    /// Override the configured model for this invocation
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Copy a known command to the clipboard without prompting
    #[arg(short = 'c', long = "copy")]
    pub copy: bool,

    /// Default task: the question typed after `tai`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub query: Vec<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure tai settings
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Set the Gemini API key
    #[arg(long)]
    api_key: Option<String>,

    /// Set the request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Set the response token limit
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Set the model used for suggestions
    #[arg(long)]
    model: Option<String>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if let Some(Command::Config(args)) = &self.command {
            return handle_config(args);
        }

        let Some(query) = self.resolve_query()? else {
            return print_welcome();
        };

        let config = Config::load()?;
        let client = GeminiClient::new(&config)?;
        let model = self.model.as_deref().unwrap_or(&config.model);
        let target = self.os.unwrap_or_else(TargetOs::detect);

        // Any advise failure collapses to the canonical fallback: the
        // distinct condition goes to stderr, never a fabricated command.
        let suggestion =
            match advisor::advise(&client, &query, target, model, config.max_tokens).await {
                Ok(suggestion) => suggestion,
                Err(err) => {
                    eprintln!("{} {}", "⚠️".yellow(), err);
                    CommandSuggestion::fallback()
                }
            };

        render::print_suggestion(&suggestion);

        if suggestion.known_command && !suggestion.command.is_empty() {
            let wants_copy = self.copy || render::prompt_copy()?;
            if wants_copy {
                copy_to_clipboard(&suggestion.command)?;
                println!("{}", "✓ Copied to clipboard".green());
            }
        }

        Ok(())
    }

    fn resolve_query(&self) -> Result<Option<String>> {
        let typed = self.query.join(" ").trim().to_owned();
        if !typed.is_empty() {
            return Ok(Some(typed));
        }

        Ok(read_piped_stdin()?.map(|input| input.trim().to_owned()))
    }
}

fn handle_config(args: &ConfigArgs) -> Result<()> {
    let mut config = Config::load_lenient()?;

    if let Some(ref api_key) = args.api_key {
        config.api_key = api_key.trim().to_owned();
    }

    if let Some(timeout) = args.timeout {
        config.timeout_secs = timeout;
    }

    if let Some(max_tokens) = args.max_tokens {
        config.max_tokens = max_tokens;
    }

    if let Some(ref model) = args.model {
        config.model = model.clone();
    }

    config.save()?;

    println!(
        "✅ Configuration saved to {}",
        Config::config_path()?.display()
    );
    println!("📋 Current configuration:");
    println!("   API Key: {}", mask_api_key(&config.api_key));
    println!("   Timeout: {}s", config.timeout_secs);
    println!("   Max Tokens: {}", config.max_tokens);
    println!("   Model: {}", config.model);

    Ok(())
}

fn print_welcome() -> Result<()> {
    let config_exists = Config::config_path()?.exists();

    println!("🚀 Welcome to tai - your terminal AI assistant!");
    println!();
    println!("📖 What tai does:");
    println!("   • Turns a plain-English question into a single shell command");
    println!("   • Answers for Windows or Linux (auto-detected, or pick with --os)");
    println!("   • Says \"I do not know\" instead of inventing commands");
    println!("   • Offers to copy the suggested command to your clipboard");
    println!();

    if !config_exists && std::env::var_os("GEMINI_API_KEY").is_none() {
        println!("⚠️  No API key found. Set one up first:");
        println!("   tai config --api-key YOUR_KEY");
        println!();
    }

    println!("💡 How to use tai:");
    println!("   tai 'download youtube video as mp3'      # Suggest a command");
    println!("   tai --os windows 'list hidden files'     # Target another OS");
    println!("   tai --copy 'show open ports'             # Copy without prompting");
    println!("   tai config --model MODEL                 # Change the model");
    println!();
    println!("❓ For more help: tai --help");

    Ok(())
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("Failed to open the system clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to copy the command to the clipboard")?;
    Ok(())
}

fn read_piped_stdin() -> Result<Option<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;

    if buffer.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(buffer))
    }
}

fn mask_api_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }

    let visible = key.len().min(8);
    format!("{}***", &key[..visible])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_api_key_hides_the_tail() {
        assert_eq!(mask_api_key(""), "(not set)");
        assert_eq!(mask_api_key("short"), "short***");
        assert_eq!(mask_api_key("AIzaSyExampleKey"), "AIzaSyEx***");
    }
}
