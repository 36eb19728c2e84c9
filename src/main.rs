use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotstats::{
    cli, config, error,
    types::{TimeRange, TopKind},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Manage the Spotify client id
    Client(ClientOptions),

    /// Log in with Spotify (OAuth 2.0 PKCE)
    Login,

    /// Forget the current session, keeping the client id
    Logout,

    /// Show client id, redirect URI and session state
    Status,

    /// Show your Spotify profile
    Profile,

    /// Show your top artists or tracks
    Top(TopOptions),

    /// Rank your last 50 plays by play count and listening time
    Recent,

    /// Rank exported streaming history files by listening time
    History(HistoryOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ClientOptions {
    #[command(subcommand)]
    pub command: ClientSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ClientSubcommand {
    /// Save the client id from the Spotify developer dashboard
    Set(ClientSetOpts),

    /// Show the client id and the redirect URI to register
    Show,

    /// Remove the saved client id
    Clear,
}

#[derive(Parser, Debug, Clone)]
pub struct ClientSetOpts {
    /// Client id of your Spotify app
    pub client_id: String,

    /// Keep the client id only until the temp directory is cleared
    #[clap(long)]
    pub session_only: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TopOptions {
    /// What to rank
    #[clap(long, value_enum, default_value_t = TopKind::Artists)]
    pub kind: TopKind,

    /// Time range the ranking covers
    #[clap(long, value_enum, default_value_t = TimeRange::ShortTerm)]
    pub time_range: TimeRange,

    /// Number of entries (1-50)
    #[clap(long, default_value_t = 10)]
    pub limit: u32,
}

#[derive(Parser, Debug, Clone)]
pub struct HistoryOptions {
    /// Streaming history JSON files
    #[clap(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Client(opt) => match opt.command {
            ClientSubcommand::Set(s) => cli::client_set(s.client_id, s.session_only).await,
            ClientSubcommand::Show => cli::client_show().await,
            ClientSubcommand::Clear => cli::client_clear().await,
        },
        Command::Login => cli::login().await,
        Command::Logout => cli::logout().await,
        Command::Status => cli::status().await,
        Command::Profile => cli::profile().await,
        Command::Top(opt) => cli::top(opt.kind, opt.time_range, opt.limit).await,
        Command::Recent => cli::recent().await,
        Command::History(opt) => cli::history(opt.files).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
