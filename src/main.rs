use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use voice_assistant::application::errors::AssistantError;
use voice_assistant::domain::traits::{Platform, SpeechInput};
use voice_assistant::infrastructure::adapters::{
    voice_from_config, CommandRecognizer, ConsoleDisplay, ConsolePermissions, ConsoleRecognizer,
    ScriptedRecognizer,
};
use voice_assistant::infrastructure::config::{Config, RecognizerBackend};
use voice_assistant::infrastructure::platform::{DesktopPlatform, RecordingPlatform};
use voice_assistant::infrastructure::process::ExternalCommand;
use voice_assistant::{ActionDispatcher, Adapters, CommandService, Interpreter, Transcript, Turn, VoiceAssistant};

#[derive(Parser)]
#[command(name = "voice-assistant")]
#[command(about = "A keyword-driven voice assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "assistant.yaml")]
    config: String,

    /// Log platform requests instead of performing them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for commands until the input ends
    Run {
        /// Replay utterances from a file instead of listening
        #[arg(long)]
        script: Option<PathBuf>,
    },
    /// Handle one utterance as if it had just been recognized
    Say {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Show the intent an utterance resolves to
    Interpret {
        /// Print the intent as JSON
        #[arg(long)]
        json: bool,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List command rules in priority order
    Rules,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging; stdout is the assistant's display
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { script } => {
            let config = load_config(&cli.config, cli.dry_run);
            run_assistant(config, script);
        }
        Commands::Say { text } => {
            let config = load_config(&cli.config, cli.dry_run);
            say(config, text.join(" "));
        }
        Commands::Interpret { json, text } => {
            print_intent(&text.join(" "), json);
        }
        Commands::Rules => {
            let config = load_config(&cli.config, true);
            print!("{}", build_commands(&config).get_help(None));
        }
        Commands::Version => {
            println!("voice-assistant v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config(&cli.config);
        }
    }
}

fn load_config(config_path: &str, dry_run: bool) -> Config {
    let from_file = if Path::new(config_path).exists() {
        Config::load(config_path)
            .map_err(|e| tracing::warn!("{}, using defaults", AssistantError::from(e)))
            .ok()
    } else {
        None
    };

    let mut config = match from_file {
        Some(mut config) => {
            if let Err(e) = config.apply_env() {
                tracing::warn!("Ignoring environment overrides: {}", e);
            }
            config
        }
        None => Config::load_env().unwrap_or_else(|e| {
            tracing::warn!("Ignoring environment overrides: {}", e);
            Config::default()
        }),
    };

    if dry_run {
        config.platform.dry_run = true;
    }
    config
}

fn build_platform(config: &Config) -> Arc<dyn Platform> {
    if config.platform.dry_run {
        tracing::info!("Dry run: platform requests are only logged");
        return Arc::new(RecordingPlatform::new());
    }

    let opener = config.platform.opener
        .as_deref()
        .and_then(ExternalCommand::from_argv)
        .unwrap_or_else(ExternalCommand::system_opener);
    let mut platform = DesktopPlatform::new(opener);

    if let Some(search) = config.platform.web_search_command.as_deref().and_then(ExternalCommand::from_argv) {
        platform = platform.with_search_command(search);
    }
    Arc::new(platform)
}

fn build_commands(config: &Config) -> CommandService {
    let dispatcher = ActionDispatcher::new(build_platform(config))
        .with_search_url(config.platform.search_url.clone());
    CommandService::new(Interpreter::standard(), dispatcher)
}

fn build_input(config: &Config, script: Option<&Path>) -> Result<Box<dyn SpeechInput>, std::io::Error> {
    if let Some(path) = script {
        let content = std::fs::read_to_string(path)?;
        return Ok(Box::new(ScriptedRecognizer::from_script(&content)));
    }

    let input: Box<dyn SpeechInput> = match config.recognizer.backend {
        RecognizerBackend::Console => Box::new(ConsoleRecognizer::stdin()),
        RecognizerBackend::Command => {
            let command = config.recognizer.command
                .as_deref()
                .and_then(ExternalCommand::from_argv)
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "recognizer.command is empty"))?;
            Box::new(CommandRecognizer::new(command, Duration::from_secs(config.recognizer.timeout_seconds)))
        }
    };
    Ok(input)
}

fn build_assistant(config: &Config, input: Box<dyn SpeechInput>) -> VoiceAssistant {
    let display = ConsoleDisplay;
    let output = voice_from_config(&config.voice, &display);
    let adapters = Adapters {
        input,
        output,
        display: Box::new(display),
        permissions: Box::new(ConsolePermissions::new(config.permissions.microphone)),
    };

    VoiceAssistant::new(adapters, build_commands(config))
        .with_prompt(config.assistant.prompt.clone())
}

fn run_assistant(config: Config, script: Option<PathBuf>) {
    tracing::info!("Starting {}", config.assistant.name);

    let input = match build_input(&config, script.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("Failed to set up speech input: {}", e);
            return;
        }
    };

    // Typed and scripted utterances arrive on their own; a recognizer program waits for Enter
    let needs_trigger = script.is_none() && config.recognizer.backend == RecognizerBackend::Command;
    let assistant = build_assistant(&config, input);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return;
        }
    };

    rt.block_on(async {
        let mut triggers = BufReader::new(tokio::io::stdin()).lines();

        loop {
            if needs_trigger {
                println!("Press Enter to talk (Ctrl-D to quit)");
                match triggers.next_line().await {
                    Ok(Some(_)) => {}
                    _ => break,
                }
            }

            match assistant.trigger().await {
                Turn::Closed => break,
                Turn::Failed { error: AssistantError::PermissionDenied | AssistantError::RecognitionUnavailable, .. }
                    if !needs_trigger => break,
                Turn::Handled { .. } | Turn::Failed { .. } => {}
            }
        }
    });

    assistant.shutdown();
}

fn say(config: Config, text: String) {
    let input = Box::new(ScriptedRecognizer::new(Vec::<String>::new()));
    let assistant = build_assistant(&config, input);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return;
        }
    };
    rt.block_on(assistant.handle_transcript(Transcript::new(text)));
    assistant.shutdown();
}

fn print_intent(text: &str, json: bool) {
    let intent = Interpreter::standard().interpret(&Transcript::new(text));
    if !json {
        println!("{}", intent);
        return;
    }

    match serde_json::to_string(&intent) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::error!("Failed to serialize intent: {}", e),
    }
}

fn init_config(config_path: &str) {
    let yaml = match Config::default().to_yaml() {
        Ok(yaml) => yaml,
        Err(e) => {
            tracing::error!("{}", e);
            return;
        }
    };

    if Path::new(config_path).exists() {
        println!("{}", yaml);
        println!("\n{} already exists; save the above and adjust as needed.", config_path);
        return;
    }

    match std::fs::write(config_path, &yaml) {
        Ok(()) => println!("Wrote default config to {}", config_path),
        Err(e) => tracing::error!("Failed to write {}: {}", config_path, e),
    }
}
