//! The `tinct` command line.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use tinct_customize::{CapabilitySet, RecordingHost, RESET_CAPABILITY};
use tinct_schema::ResetTarget;
use tinct_tokens::Origin;

use crate::app::Tinct;
use crate::config::TinctConfig;

#[derive(Debug, Parser)]
#[command(name = "tinct", version, about = "Theme settings from design tokens")]
pub struct Cli {
    /// Config file (defaults to ./tinct.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding default/theme/custom token documents
    #[arg(long, global = true)]
    pub tokens_dir: Option<PathBuf>,

    /// JSON file holding setting overrides
    #[arg(long, global = true)]
    pub mods_file: Option<PathBuf>,

    /// Token layer to read: default, theme or custom
    #[arg(long, global = true)]
    pub origin: Option<Origin>,

    /// Prefix for generated CSS variables
    #[arg(long, global = true)]
    pub css_prefix: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the merged settings schema
    Schema {
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },
    /// Print a setting's effective value, or every value
    Get { id: Option<String> },
    /// Store a value (parsed as JSON, else taken as a string)
    Set { id: String, value: String },
    /// Drop a stored override
    Reset { id: String },
    /// Drop every override in a reset group, e.g. `colors palette`
    ResetGroup {
        category: String,
        #[arg(value_name = "TYPE")]
        kind: String,
        /// Act with the reset capability
        #[arg(long)]
        allow: bool,
    },
    /// Print the token patch implied by stored values
    Patch,
    /// Print the CSS variables of the patched token document
    Css,
    /// Print the host registrations as JSON
    Bind,
    /// Simulate a preview change and print what it touched
    Preview { id: String, value: String },
}

impl Cli {
    /// The config file overlaid with command line overrides.
    pub fn resolve_config(&self) -> anyhow::Result<TinctConfig> {
        let cwd = std::env::current_dir().context("reading working directory")?;
        let mut config = TinctConfig::discover(self.config.as_deref(), &cwd)?;
        if let Some(dir) = &self.tokens_dir {
            config.tokens_dir = dir.clone();
        }
        if let Some(file) = &self.mods_file {
            config.mods_file = file.clone();
        }
        if let Some(origin) = self.origin {
            config.origin = origin;
        }
        if let Some(prefix) = &self.css_prefix {
            config.css_prefix = prefix.clone();
        }
        Ok(config)
    }
}

/// Parses a command line value: JSON when it parses, a plain string otherwise.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Runs `cli`, writing results to `out`.
pub fn run(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let config = cli.resolve_config()?;
    let tinct = Tinct::open(config).context("opening settings pipeline")?;
    execute(&tinct, &cli.command, out)
}

/// Runs one command against an open pipeline.
pub fn execute(tinct: &Tinct, command: &Command, out: &mut dyn Write) -> anyhow::Result<()> {
    match command {
        Command::Schema { format } => match format {
            Format::Json => print_json(out, tinct.schema())?,
            Format::Yaml => {
                let yaml = serde_yaml::to_string(tinct.schema()).context("serializing schema")?;
                write!(out, "{}", yaml)?;
            }
        },
        Command::Get { id: Some(id) } => {
            if tinct.registry().definition(id).is_none() {
                anyhow::bail!("unknown setting `{}`", id);
            }
            print_json(out, &tinct.get(id))?;
        }
        Command::Get { id: None } => {
            let accessor = tinct.accessor();
            let values: serde_json::Map<String, Value> = tinct
                .registry()
                .defaults()
                .into_keys()
                .map(|id| {
                    let value = accessor.get(&id);
                    (id, value)
                })
                .collect();
            print_json(out, &values)?;
        }
        Command::Set { id, value } => {
            let stored = tinct
                .set(id, parse_value(value))
                .with_context(|| format!("setting `{}`", id))?;
            print_json(out, &stored)?;
        }
        Command::Reset { id } => {
            tinct
                .reset(id)
                .with_context(|| format!("resetting `{}`", id))?;
        }
        Command::ResetGroup {
            category,
            kind,
            allow,
        } => {
            let caller = if *allow {
                CapabilitySet::new().grant(RESET_CAPABILITY)
            } else {
                CapabilitySet::new()
            };
            let outcome = tinct
                .reset_group(&ResetTarget::new(category.as_str(), kind.as_str()), &caller)
                .with_context(|| format!("resetting {} {}", category, kind))?;
            print_json(out, &outcome.removed)?;
        }
        Command::Patch => print_json(out, &tinct.patch().to_document())?,
        Command::Css => write!(out, "{}", tinct.stylesheet()?)?,
        Command::Bind => {
            let mut host = RecordingHost::new();
            let report = tinct.bind(&mut host);
            print_json(out, &report)?;
        }
        Command::Preview { id, value } => {
            let mut client = tinct.preview_client(tinct_preview::RecordingDom::new())?;
            client.dom_mut().take_ops();
            let report = client.set(id, parse_value(value))?;
            let ops: Vec<String> = client
                .dom()
                .ops()
                .iter()
                .map(|op| format!("{:?}", op))
                .collect();
            print_json(
                out,
                &serde_json::json!({
                    "changes": report.changes,
                    "corrections": report.corrections,
                    "ops": ops,
                }),
            )?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(value).context("serializing output")?;
    writeln!(out, "{}", body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn values_parse_as_json_first() {
        assert_eq!(parse_value("true"), json!(true));
        assert_eq!(parse_value("720"), json!(720));
        assert_eq!(parse_value("grid"), json!("grid"));
        assert_eq!(parse_value("#112233"), json!("#112233"));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["tinct", "css", "--css-prefix", "acme", "--origin", "custom"])
            .unwrap();
        assert_eq!(cli.css_prefix.as_deref(), Some("acme"));
        assert_eq!(cli.origin, Some(Origin::Custom));
        assert!(matches!(cli.command, Command::Css));
    }

    #[test]
    fn reset_group_takes_category_and_type() {
        let cli = Cli::try_parse_from(["tinct", "reset-group", "colors", "palette", "--allow"])
            .unwrap();
        match cli.command {
            Command::ResetGroup {
                category,
                kind,
                allow,
            } => {
                assert_eq!(category, "colors");
                assert_eq!(kind, "palette");
                assert!(allow);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
