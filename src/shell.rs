//! Interactive shell.
//!
//! Slash commands drive the controller; any other input is synthesized
//! with the active voice. One command runs at a time, start to finish,
//! so output never interleaves.

use std::io::{BufRead, Write};
use std::time::Duration;

use indicatif::ProgressBar;
use tracing::warn;

use crate::config::Config;
use crate::confirm::StdinConfirmer;
use crate::controller::{Controller, MAX_TEXT_CHARS};
use crate::error::Result;
use crate::state::ActiveVoice;
use crate::view;

enum Flow {
    Continue,
    Quit,
}

/// Run the interactive shell until `/quit` or EOF.
///
/// # Errors
///
/// Returns an error if the controller cannot be built or stdio fails.
/// Operation failures are printed as notices and the shell continues.
pub async fn run(config: &Config) -> Result<()> {
    let mut controller = Controller::from_config(config, Box::new(StdinConfirmer))?;

    println!("lark v{}", env!("CARGO_PKG_VERSION"));
    println!("  server: {}", controller.client().base_url());
    match controller.api_key_display() {
        Some(masked) => println!("  API key: {masked}"),
        None => println!("  no API key stored, set one with /key <VALUE>"),
    }

    match controller.load_voices().await {
        Ok(()) => {
            println!("\npreset voices:");
            println!(
                "{}",
                view::voice_grid(&controller.state().voices, &controller.state().selection)
            );
        }
        Err(e) => println!("{}", view::error_notice(e)),
    }
    match controller.load_cloned().await {
        Ok(()) => {
            println!("\ncloned voices:");
            println!(
                "{}",
                view::cloned_list(&controller.state().cloned, &controller.state().selection)
            );
        }
        // Matches the quiet startup of the web client: the cloned list
        // is a convenience, so a failure here only logs.
        Err(e) => warn!(error = %e, "cloned voice list unavailable at startup"),
    }

    println!("\ntype text to synthesize it, /help for commands");

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("lark> ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match dispatch(&mut controller, config, input).await {
            Flow::Continue => {}
            Flow::Quit => break,
        }
    }
    Ok(())
}

async fn dispatch(controller: &mut Controller, config: &Config, input: &str) -> Flow {
    if !input.starts_with('/') {
        synthesize(controller, config, input).await;
        return Flow::Continue;
    }

    let (command, rest) = split_command(input);
    match command {
        "/help" => println!("{}", help_text()),
        "/quit" | "/exit" => return Flow::Quit,
        "/key" => key_command(controller, rest),
        "/voices" => match controller.load_voices().await {
            Ok(()) => println!(
                "{}",
                view::voice_grid(&controller.state().voices, &controller.state().selection)
            ),
            Err(e) => println!("{}", view::error_notice(e)),
        },
        "/pick" => match controller.select_voice(rest) {
            Ok(()) => println!(
                "{}",
                view::voice_grid(&controller.state().voices, &controller.state().selection)
            ),
            Err(e) => println!("{}", view::error_notice(e)),
        },
        "/voice" => println!("{}", active_voice_line(controller)),
        "/custom" => {
            controller.set_custom_voice(rest);
            println!("{}", active_voice_line(controller));
        }
        "/cloned" => match controller.load_cloned().await {
            Ok(()) => println!(
                "{}",
                view::cloned_list(&controller.state().cloned, &controller.state().selection)
            ),
            Err(e) => println!("{}", view::error_notice(e)),
        },
        "/use" => match controller.use_cloned(rest) {
            Ok(voice) => {
                println!(
                    "{}",
                    view::success_notice(format!("now using {} [{}]", voice.name, voice.voice_id))
                );
                println!("{}", active_voice_line(controller));
            }
            Err(e) => println!("{}", view::error_notice(e)),
        },
        "/clone" => clone_command(controller, rest).await,
        "/delete" => match controller.delete_cloned(rest).await {
            Ok(Some(_)) => {
                println!("{}", view::success_notice("voice deleted"));
                println!(
                    "{}",
                    view::cloned_list(&controller.state().cloned, &controller.state().selection)
                );
            }
            Ok(None) => {}
            Err(e) => println!("{}", view::error_notice(e)),
        },
        other => println!(
            "{}",
            view::error_notice(format!("unknown command {other}, try /help"))
        ),
    }
    Flow::Continue
}

async fn synthesize(controller: &mut Controller, config: &Config, text: &str) {
    let len = text.trim().chars().count();
    if len + 100 > MAX_TEXT_CHARS {
        println!("  {}", view::char_count_hint(len, MAX_TEXT_CHARS));
    }

    let pb = busy("synthesizing");
    let outcome = controller.synthesize(text).await;
    pb.finish_and_clear();

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("{}", view::error_notice(e));
            return;
        }
    };
    println!("{}", view::success_notice("synthesis complete"));
    match controller.result_urls(&outcome) {
        Ok((audio, download)) => println!(
            "{}",
            view::result_panel(&outcome, audio.as_str(), download.as_str())
        ),
        Err(e) => println!("{}", view::error_notice(e)),
    }

    match controller.save_last_audio(&config.audio.save_dir).await {
        Ok(path) => println!("  saved: {}", path.display()),
        Err(e) => println!("{}", view::error_notice(e)),
    }
}

async fn clone_command(controller: &mut Controller, rest: &str) {
    let (audio_url, voice_name) = split_command(rest);

    let pb = busy("cloning voice");
    let outcome = controller.clone_voice(audio_url, voice_name).await;
    pb.finish_and_clear();

    match outcome {
        Ok(outcome) => {
            println!(
                "{}",
                view::success_notice(format!("voice cloned, ID: {}", outcome.voice_id))
            );
            println!(
                "{}",
                view::cloned_list(&controller.state().cloned, &controller.state().selection)
            );
        }
        Err(e) => println!("{}", view::error_notice(e)),
    }
}

fn key_command(controller: &mut Controller, rest: &str) {
    match rest {
        "" => match controller.api_key_display() {
            Some(masked) => println!("  API key: {masked}"),
            None => println!("  no API key stored"),
        },
        "clear" => match controller.clear_api_key() {
            Ok(()) => println!("{}", view::success_notice("API key cleared")),
            Err(e) => println!("{}", view::error_notice(e)),
        },
        key => match controller.set_api_key(key) {
            Ok(()) => println!("{}", view::success_notice("API key saved")),
            Err(e) => println!("{}", view::error_notice(e)),
        },
    }
}

fn active_voice_line(controller: &Controller) -> String {
    match controller.state().selection.active() {
        ActiveVoice::Preset(id) => format!("  voice: {id} (preset)"),
        ActiveVoice::Custom(id) => format!("  voice: {id} (custom)"),
    }
}

/// Split a line into its first whitespace-delimited token and the
/// trimmed remainder.
fn split_command(input: &str) -> (&str, &str) {
    match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    }
}

fn busy(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn help_text() -> String {
    [
        "commands:",
        "  /key [VALUE|clear]   save, show, or clear the API key",
        "  /voices              reload and list preset voices",
        "  /pick ID             select a preset voice",
        "  /voice               show the active voice",
        "  /custom [ID]         set or clear a custom voice ID",
        "  /cloned              reload and list cloned voices",
        "  /use N|ID            switch to a cloned voice",
        "  /clone URL NAME      clone a voice from sample audio",
        "  /delete N|ID         delete a cloned voice",
        "  /help                this text",
        "  /quit                leave the shell",
        "anything else is synthesized with the active voice",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn split_command_separates_head_and_rest() {
        assert_eq!(split_command("/pick longhua_v2"), ("/pick", "longhua_v2"));
        assert_eq!(split_command("/voices"), ("/voices", ""));
        assert_eq!(
            split_command("/clone https://example.org/a.wav my narrator"),
            ("/clone", "https://example.org/a.wav my narrator")
        );
    }

    #[test]
    fn split_command_trims_rest() {
        assert_eq!(split_command("/key   sk-abc  "), ("/key", "sk-abc"));
    }

    #[test]
    fn clone_arguments_split_url_from_name() {
        let (_cmd, rest) = split_command("/clone https://example.org/a.wav my narrator");
        let (url, name) = split_command(rest);
        assert_eq!(url, "https://example.org/a.wav");
        assert_eq!(name, "my narrator");
    }

    #[test]
    fn help_lists_every_command() {
        let help = help_text();
        for command in [
            "/key", "/voices", "/pick", "/voice", "/custom", "/cloned", "/use", "/clone",
            "/delete", "/help", "/quit",
        ] {
            assert!(help.contains(command), "help should mention {command}");
        }
    }
}
