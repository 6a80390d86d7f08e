// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::io::{self, BufRead, Write};

use clap::Parser;
use cli::{Cli, Commands};
use explore_core::client::{RelayClient, converse};
use explore_core::transcript::TranscriptController;
use url::Url;
use view::TerminalView;

mod cli;
mod logging;
mod view;

const QUIT: &str = "/quit";

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Chat { url, no_greeting } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(chat(url, no_greeting))?;
        }
    }

    Ok(())
}

/// Interactive loop: one line in, one streamed reply out.
async fn chat(url: Url, no_greeting: bool) -> Result<()> {
    let client = RelayClient::new(url);
    let view = TerminalView::new(io::stdout());
    let mut controller = if no_greeting {
        TranscriptController::empty(view)
    } else {
        TranscriptController::new(view)
    };

    if let Some(greeting) = controller.messages().first() {
        println!("{}", greeting.content);
    }
    println!("(type {QUIT} to leave)");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim_end_matches(['\r', '\n']);
        if text.trim() == QUIT {
            break;
        }

        match converse(&mut controller, &client, text).await {
            Ok(true) => println!(),
            Ok(false) => {}
            Err(e) => eprintln!("\n[reply interrupted: {e}]"),
        }
    }

    Ok(())
}
