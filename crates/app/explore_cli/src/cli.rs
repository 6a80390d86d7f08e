use clap::{Parser, Subcommand};
use url::Url;

/// Default relay endpoint of a locally running `explore_api_server`.
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000/api/chat";

#[derive(Parser, Debug)]
#[command(name = "explore_cli", version, about = "ExploreMore terminal chat client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Chat with the ExploreMore travel assistant.
    Chat {
        /// Relay endpoint to send the transcript to.
        #[arg(long, default_value = DEFAULT_RELAY_URL)]
        url: Url,

        /// Start without the assistant greeting.
        #[arg(long, default_value_t = false)]
        no_greeting: bool,
    },
    /// Print the version.
    Version,
}
