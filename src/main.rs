//! CLI binary for lark.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lark::confirm::{AlwaysApprove, Confirmer, StdinConfirmer};
use lark::{Config, Controller, shell, view};
use tracing_subscriber::EnvFilter;

/// lark: terminal client for a speech synthesis and voice cloning service.
#[derive(Parser)]
#[command(name = "lark", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Speech service base URL (overrides the config file).
    #[arg(short, long)]
    server: Option<String>,

    /// Subcommand to run; the interactive shell when omitted.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Synthesize speech from text.
    Say {
        /// Text to synthesize.
        text: String,

        /// Preset voice ID to use.
        #[arg(long, conflicts_with = "custom_voice")]
        voice: Option<String>,

        /// Custom (cloned) voice ID to use.
        #[arg(long)]
        custom_voice: Option<String>,

        /// Save the audio here instead of the audio directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List preset voices.
    Voices,

    /// Clone a voice from sample audio.
    Clone {
        /// Publicly reachable URL of the sample audio.
        #[arg(long)]
        url: String,

        /// Display name for the new voice.
        #[arg(long)]
        name: String,
    },

    /// List cloned voices.
    Cloned,

    /// Delete a cloned voice.
    Delete {
        /// 1-based listing index or voice ID.
        voice: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Manage the stored API key.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

/// API key actions.
#[derive(Subcommand)]
enum KeyAction {
    /// Save an API key.
    Set {
        /// The key value.
        value: String,
    },
    /// Show the stored key, masked.
    Show,
    /// Remove the stored key.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing — suppress noisy dependency logs by default.
    // Users can override with RUST_LOG=debug to see everything.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lark=info,reqwest=warn,hyper=warn")),
        )
        .init();

    let cli = Cli::parse();

    // Load config: explicit path, else the default file when present.
    let mut config = if let Some(ref path) = cli.config {
        Config::from_file(path)?
    } else {
        let path = Config::default_config_path();
        if path.exists() {
            Config::from_file(&path)?
        } else {
            Config::default()
        }
    };
    if let Some(server) = cli.server {
        config.server.url = server;
    }

    match cli.command {
        None => shell::run(&config).await?,
        Some(Command::Say {
            text,
            voice,
            custom_voice,
            output,
        }) => run_say(&config, &text, voice, custom_voice, output).await?,
        Some(Command::Voices) => run_voices(&config).await?,
        Some(Command::Clone { url, name }) => run_clone(&config, &url, &name).await?,
        Some(Command::Cloned) => run_cloned(&config).await?,
        Some(Command::Delete { voice, yes }) => run_delete(&config, &voice, yes).await?,
        Some(Command::Key { action }) => run_key(&config, action)?,
    }
    Ok(())
}

async fn run_say(
    config: &Config,
    text: &str,
    voice: Option<String>,
    custom_voice: Option<String>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut controller = Controller::from_config(config, Box::new(AlwaysApprove))?;

    if let Some(ref id) = custom_voice {
        controller.set_custom_voice(id);
    } else if let Some(ref id) = voice {
        // Validate the preset against the live catalog, as the shell does.
        controller.load_voices().await?;
        controller.select_voice(id)?;
    }

    let outcome = controller.synthesize(text).await?;
    println!("{}", view::success_notice("synthesis complete"));
    let (audio, download) = controller.result_urls(&outcome)?;
    println!(
        "{}",
        view::result_panel(&outcome, audio.as_str(), download.as_str())
    );

    let path = match output {
        Some(path) => {
            controller
                .client()
                .download_audio(&outcome.filename, &path)
                .await?
        }
        None => controller.save_last_audio(&config.audio.save_dir).await?,
    };
    println!("  saved: {}", path.display());
    Ok(())
}

async fn run_voices(config: &Config) -> anyhow::Result<()> {
    let mut controller = Controller::from_config(config, Box::new(AlwaysApprove))?;
    controller.load_voices().await?;
    println!(
        "{}",
        view::voice_grid(&controller.state().voices, &controller.state().selection)
    );
    Ok(())
}

async fn run_clone(config: &Config, url: &str, name: &str) -> anyhow::Result<()> {
    let mut controller = Controller::from_config(config, Box::new(AlwaysApprove))?;
    let outcome = controller.clone_voice(url, name).await?;
    println!(
        "{}",
        view::success_notice(format!("voice cloned, ID: {}", outcome.voice_id))
    );
    println!(
        "{}",
        view::cloned_list(&controller.state().cloned, &controller.state().selection)
    );
    Ok(())
}

async fn run_cloned(config: &Config) -> anyhow::Result<()> {
    let mut controller = Controller::from_config(config, Box::new(AlwaysApprove))?;
    controller.load_cloned().await?;
    println!(
        "{}",
        view::cloned_list(&controller.state().cloned, &controller.state().selection)
    );
    Ok(())
}

async fn run_delete(config: &Config, voice: &str, yes: bool) -> anyhow::Result<()> {
    let confirmer: Box<dyn Confirmer + Send> = if yes {
        Box::new(AlwaysApprove)
    } else {
        Box::new(StdinConfirmer)
    };
    let mut controller = Controller::from_config(config, confirmer)?;
    controller.load_cloned().await?;
    match controller.delete_cloned(voice).await? {
        Some(_) => println!("{}", view::success_notice("voice deleted")),
        None => println!("  cancelled"),
    }
    Ok(())
}

fn run_key(config: &Config, action: KeyAction) -> anyhow::Result<()> {
    let mut controller = Controller::from_config(config, Box::new(AlwaysApprove))?;
    match action {
        KeyAction::Set { value } => {
            controller.set_api_key(&value)?;
            println!("{}", view::success_notice("API key saved"));
        }
        KeyAction::Show => match controller.api_key_display() {
            Some(masked) => println!("  API key: {masked}"),
            None => println!("  no API key stored"),
        },
        KeyAction::Clear => {
            controller.clear_api_key()?;
            println!("{}", view::success_notice("API key cleared"));
        }
    }
    Ok(())
}
