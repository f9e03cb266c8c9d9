use std::io::BufRead;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use mxchat::ReplaceScope;
use mxchat::chat::{ChatSession, SessionConfig};
use mxchat::engine::EditOptions;

#[derive(Parser)]
#[command(name = "mxchat", about = "Edit draw.io diagrams with plain-language instructions")]
struct Cli {
    /// Diagram (.drawio, .xml) or reference image to load (starts empty if not provided)
    file: Option<PathBuf>,

    /// Instruction to apply; repeat for several. Without any, reads instructions from stdin
    #[arg(long = "instruction", short = 'e')]
    instructions: Vec<String>,

    /// Write the resulting markup here instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Pause before each reply, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Where "rename"/"replace" instructions may rewrite text
    #[arg(long, value_enum, default_value_t = Scope::Labels)]
    replace_scope: Scope,
}

#[derive(Clone, Copy, ValueEnum)]
enum Scope {
    Labels,
    Everywhere,
}

impl From<Scope> for ReplaceScope {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Labels => ReplaceScope::Labels,
            Scope::Everywhere => ReplaceScope::Everywhere,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut session = ChatSession::new(SessionConfig {
        edit: EditOptions {
            replace_scope: cli.replace_scope.into(),
        },
        response_delay: Duration::from_millis(cli.delay_ms),
    });

    if let Some(path) = &cli.file {
        if let Err(e) = session.load_file(path) {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }

    if cli.instructions.is_empty() {
        interactive(&mut session);
    } else {
        for instruction in &cli.instructions {
            if let Some(reply) = session.submit(instruction) {
                eprintln!("{}", reply.text);
            }
        }
    }

    match &cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, session.document()) {
                eprintln!("ERROR: failed to write {}: {e}", path.display());
                std::process::exit(1);
            }
        }
        None if !cli.instructions.is_empty() => println!("{}", session.document()),
        None => {}
    }
}

fn interactive(session: &mut ChatSession) {
    eprintln!("Type an instruction, /markup, /history or /quit.");
    for line in std::io::stdin().lock().lines() {
        let line = line.unwrap_or_else(|e| {
            eprintln!("ERROR: failed to read stdin: {e}");
            std::process::exit(1);
        });
        match line.trim() {
            "/quit" | "/exit" => break,
            "/markup" => println!("{}", session.document()),
            "/history" => println!("{}", session.transcript()),
            input => {
                if let Some(reply) = session.submit(input) {
                    println!("{}", reply.text);
                }
            }
        }
    }
}
