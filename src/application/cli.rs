use std::io;
use std::path;

use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use tokio::fs;

use crate::domain::models::SettingsField;
use crate::domain::models::GEMINI_MODELS;

pub struct CliOptions {
    pub settings_path: path::PathBuf,
    pub transcript_path: path::PathBuf,
    pub images_dir: path::PathBuf,
    pub overrides: Vec<SettingsField>,
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

pub fn build() -> Command {
    return Command::new("mrdep")
        .about("Terminal companion for Mr Dep Dodep: persona chat over the Gemini API, an image gallery, and a character documentation browser.")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("completions")
                .long("completions")
                .help("Generates shell completions.")
                .value_parser(value_parser!(Shell)),
        )
        .arg(
            Arg::new("clear-history")
                .long("clear-history")
                .help("Deletes the persisted chat transcript and exits.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Directory holding the persisted settings and transcript records.")
                .num_args(1),
        )
        .arg(
            Arg::new("images-dir")
                .long("images-dir")
                .help("Directory scanned for the gallery tab.")
                .num_args(1)
                .default_value("images"),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .env("GEMINI_API_KEY")
                .help("Gemini API key. Stored in settings when provided.")
                .num_args(1),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .help("Model used for chat completions.")
                .num_args(1)
                .value_parser(PossibleValuesParser::new(GEMINI_MODELS)),
        )
        .arg(
            Arg::new("temperature")
                .long("temperature")
                .help("Generation temperature, between 0.0 and 2.0.")
                .num_args(1)
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("max-tokens")
                .long("max-tokens")
                .help("Maximum output tokens per reply.")
                .num_args(1)
                .value_parser(value_parser!(u32)),
        );
}

/// Returns the resolved options, or None when the invocation already
/// completed (completions printed, history cleared).
pub async fn parse() -> Result<Option<CliOptions>> {
    let mut cmd = build();
    let matches = cmd.get_matches_mut();

    if let Some(completions) = matches.get_one::<Shell>("completions") {
        print_completions(*completions, &mut cmd);
        return Ok(None);
    }

    let data_dir = match matches.get_one::<String>("data-dir") {
        Some(dir) => path::PathBuf::from(dir),
        None => dirs::data_dir().unwrap().join("mrdep"),
    };
    let settings_path = data_dir.join("settings.json");
    let transcript_path = data_dir.join("transcript.json");

    if matches.get_flag("clear-history") {
        if transcript_path.exists() {
            fs::remove_file(&transcript_path).await?;
        }
        println!("Chat history cleared.");
        return Ok(None);
    }

    let mut overrides: Vec<SettingsField> = vec![];
    if let Some(api_key) = matches.get_one::<String>("api-key") {
        if !api_key.is_empty() {
            overrides.push(SettingsField::ApiKey(api_key.to_string()));
        }
    }
    if let Some(model) = matches.get_one::<String>("model") {
        overrides.push(SettingsField::Model(model.to_string()));
    }
    if let Some(temperature) = matches.get_one::<f64>("temperature") {
        overrides.push(SettingsField::Temperature(*temperature));
    }
    if let Some(max_tokens) = matches.get_one::<u32>("max-tokens") {
        overrides.push(SettingsField::MaxTokens(*max_tokens));
    }

    let images_dir = path::PathBuf::from(matches.get_one::<String>("images-dir").unwrap());

    return Ok(Some(CliOptions {
        settings_path,
        transcript_path,
        images_dir,
        overrides,
    }));
}
