//! Aidline terminal client - composition root.
//!
//! 1. Load configuration from TOML
//! 2. Initialize tracing (stderr, so stdout stays clean for answers)
//! 3. Run the requested command: interactive chat, one-shot ask, or the
//!    nearby-hospital lookup

mod cli;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use aidline_chat::{build_client, ConversationController, GREETING};
use aidline_core::{AidlineConfig, AnalysisRecord, Coordinate};
use aidline_geo::{
    FacilityFinder, FacilityLookup, FixedLocator, OverpassClient, UnavailableLocator,
};
use aidline_voice::{UnavailablePlayback, VoiceSession};

use cli::{CliArgs, Command};

const QUIT_WORDS: &[&str] = &["quit", "exit", "q"];
const SPEAK_COMMAND: &str = "/speak";
const STOP_COMMAND: &str = "/stop";

/// The config decides the log level, so it is read before the real
/// subscriber exists. Its warnings go through a stderr bootstrap subscriber.
fn load_config(path: &Path) -> AidlineConfig {
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .finish();
    tracing::subscriber::with_default(bootstrap, || AidlineConfig::load_or_default(path))
}

/// `RUST_LOG` wins, then `--log-level`, then `general.log_level`.
fn filter_directive(
    rust_log: Option<String>,
    cli_level: Option<&str>,
    config_level: &str,
) -> String {
    rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| cli_level.unwrap_or(config_level).to_string())
}

fn init_tracing(cli_level: Option<&str>, config_level: &str) {
    let directive = filter_directive(
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
        cli_level,
        config_level,
    );
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// A terminal has no speech synthesis; speak requests report that.
fn voice_session(config: &AidlineConfig) -> VoiceSession<UnavailablePlayback> {
    VoiceSession::new(UnavailablePlayback, config.voice.clone())
}

fn print_analysis(analysis: &AnalysisRecord) {
    println!("  Injury:     {}", analysis.injury_type);
    println!("  Severity:   {}", analysis.severity);
    println!("  Confidence: {}%", analysis.confidence);
    if !analysis.first_aid_steps.is_empty() {
        println!("  First aid:");
        for (i, step) in analysis.first_aid_steps.iter().enumerate() {
            println!("    {}. {}", i + 1, step);
        }
    }
    println!("  Warnings:");
    for warning in &analysis.warnings {
        println!("    ! {}", warning);
    }
}

fn print_lookup(lookup: &FacilityLookup) {
    if let Some(notice) = lookup.notice() {
        println!("{}", notice);
    }
    for (i, f) in lookup.facilities.iter().enumerate() {
        let tag = if f.is_nearest { "  [nearest]" } else { "" };
        println!("{}. {}{}", i + 1, f.name, tag);
        println!("   {} away, about {}", f.distance_text, f.eta_text);
        println!("   {}", f.display_address());
        match f.dial_uri() {
            Some(uri) => println!("   Call: {}", uri),
            None => println!("   Phone number not available"),
        }
        if let Some(rating) = f.rating {
            println!("   Rating: {:.1}", rating);
        }
        println!("   Directions: {}", f.directions_url());
    }
}

async fn run_chat(config: &AidlineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(&config.inference)?;
    let mut controller =
        ConversationController::new(client, &config.inference, voice_session(config));
    let mut last_reply = None;

    println!("{}", GREETING);
    println!("Type '{}' to hear the last reply, 'quit' to exit.\n", SPEAK_COMMAND);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if QUIT_WORDS.contains(&input.to_lowercase().as_str()) {
            break;
        }
        if input.is_empty() {
            println!("Please describe your emergency.");
            continue;
        }
        if input == STOP_COMMAND {
            controller.stop_speech();
            continue;
        }
        if input == SPEAK_COMMAND {
            match last_reply {
                Some(id) => match controller.toggle_speech(id) {
                    Ok(phase) => println!("Voice: {}", phase),
                    Err(e) => println!("{}", e.user_message()),
                },
                None => println!("Nothing to read aloud yet."),
            }
            continue;
        }

        controller.set_input(input);
        match controller.send_pending().await {
            Ok(outcome) => {
                last_reply = Some(outcome.reply.id);
                println!("\nAssistant:\n{}\n", outcome.reply.content);
                print_analysis(&outcome.analysis);
                println!();
            }
            Err(e) => println!("\n{}\n", e.user_message()),
        }
    }

    println!("Stay safe.");
    Ok(())
}

async fn run_ask(config: &AidlineConfig, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(&config.inference)?;
    let mut controller =
        ConversationController::new(client, &config.inference, voice_session(config));

    match controller.submit(text).await {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(outcome.analysis.as_ref())?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}

async fn run_hospitals(
    config: &AidlineConfig,
    origin: Option<Coordinate>,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = OverpassClient::from_config(&config.facilities)?;
    let finder = FacilityFinder::from_config(provider, &config.facilities);

    let lookup = match origin {
        Some(origin) => finder.locate_and_find(&FixedLocator(origin)).await,
        None => finder.locate_and_find(&UnavailableLocator::default()).await,
    };
    print_lookup(&lookup);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let config = load_config(&config_file);

    init_tracing(args.log_level.as_deref(), &config.general.log_level);
    tracing::debug!(path = %config_file.display(), "Configuration resolved");

    match args.command {
        Command::Chat => run_chat(&config).await,
        Command::Ask { text } => run_ask(&config, &text).await,
        Command::Hospitals { lat, lon } => {
            let origin = match (lat, lon) {
                (Some(lat), Some(lon)) => Some(Coordinate::checked(lat, lon)?),
                _ => None,
            };
            run_hospitals(&config, origin).await
        }
    }
}
