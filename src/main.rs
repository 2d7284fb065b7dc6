use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::process::{Command, Stdio};

mod config;
mod environment;
mod error_handling;
mod executor;
mod logging;
mod prompt;
mod providers;
mod safety;
mod sanitize;

use config::Settings;
use environment::Environment;
use error_handling::enhance_error;
use logging::{init_logger, log_event};
use safety::is_dangerous_command;
use sanitize::clean_command;

/// Translate natural language into shell commands
#[derive(Parser)]
#[command(name = "aido", version)]
#[command(about = "Translate natural language into shell commands", long_about = "Translate natural language into shell commands.

Examples:

    aido list all s3 buckets

    aido \"show running docker containers\"

    aido -y get pods in production namespace

    aido --dry delete all stopped containers")]
struct Cli {
    /// The request, as free text
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    request: Vec<String>,

    /// Execute without confirmation (dangerous commands still ask)
    #[arg(short = 'y', long = "yes")]
    yes: bool,

    /// Show the command only, don't execute
    #[arg(long)]
    dry: bool,

    /// AI provider (openai, anthropic, minimax, qwen, ampcode)
    #[arg(short, long)]
    provider: Option<String>,

    /// Copy the command to the clipboard
    #[arg(short, long)]
    copy: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    std::process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    if let Err(e) = init_logger() {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    log_event("INFO", &format!("startup version={}", env!("CARGO_PKG_VERSION")));

    let request = cli.request.join(" ");
    if request.trim().is_empty() {
        eprintln!("{} Please provide a request", "Error:".red());
        return 1;
    }

    let env = Environment::detect().await;
    let settings = Settings::from_env();

    let provider = match providers::select_provider(cli.provider.as_deref(), &settings).await {
        Ok(provider) => provider,
        Err(e) => {
            enhance_error(&e).display();
            return 1;
        }
    };
    log_event("INFO", &format!("provider selected: {}", provider.name()));

    let pb = spinner("Thinking...");
    let raw = match provider.generate(&request, &env).await {
        Ok(raw) => {
            pb.finish_and_clear();
            raw
        }
        Err(e) => {
            pb.finish_and_clear();
            enhance_error(&e).display();
            return 1;
        }
    };

    let command = clean_command(&raw);
    if command.is_empty() {
        eprintln!("{} The provider returned an empty command", "Error:".red());
        return 1;
    }

    // Command first, on its own lines, with no decoration: copy-paste safe
    println!();
    println!("{}", command.bold());
    println!();

    let dangerous = is_dangerous_command(&command);
    if dangerous {
        println!("{} This command may be destructive!", "⚠️  Warning:".bold().yellow());
    }

    if cli.copy {
        if copy_to_clipboard(&command) {
            println!("{}", "✓ Copied to clipboard".dimmed());
        } else {
            println!("{}", "Could not copy to clipboard".dimmed());
        }
    }

    if cli.dry {
        return 0;
    }

    // -y never bypasses confirmation for a flagged command
    if cli.yes && !dangerous {
        println!();
        return executor::stream_command(&command).await;
    }

    let prompt_text = if dangerous {
        format!("{}", "Execute? (dangerous)".bold().red())
    } else {
        "Execute?".to_string()
    };

    println!();
    if confirm(&prompt_text, !dangerous) {
        println!();
        executor::stream_command(&command).await
    } else {
        println!("{}", "Cancelled".dimmed());
        0
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Ask a yes/no question on stdin. Empty input takes the default.
fn confirm(prompt: &str, default_yes: bool) -> bool {
    let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
    print!("{} {} ", prompt, hint.dimmed());
    let _ = io::stdout().flush();

    let mut answer = String::new();
    if io::stdin().read_line(&mut answer).is_err() {
        return false;
    }

    match answer.trim().to_lowercase().as_str() {
        "" => default_yes,
        "y" | "yes" => true,
        _ => false,
    }
}

/// Pipe the command into whichever clipboard tool is installed
fn copy_to_clipboard(text: &str) -> bool {
    let candidates: &[&[&str]] = &[
        &["pbcopy"],
        &["xclip", "-selection", "clipboard"],
        &["wl-copy"],
    ];

    for candidate in candidates {
        if pipe_into(candidate, text) {
            return true;
        }
    }
    false
}

fn pipe_into(command: &[&str], text: &str) -> bool {
    let Ok(mut child) = Command::new(command[0])
        .args(&command[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    else {
        return false;
    };

    if let Some(stdin) = child.stdin.as_mut() {
        if stdin.write_all(text.as_bytes()).is_err() {
            let _ = child.kill();
            return false;
        }
    }

    matches!(child.wait(), Ok(status) if status.success())
}
