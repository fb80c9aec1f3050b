use clap::{ArgGroup, Parser, Subcommand};
use countdown_core::config::{ConfigOverrides, canonicalize_key};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a new todo
    ///
    /// Example: countdown add Buy milk
    Add {
        #[arg(trailing_var_arg = true)]
        title: Vec<String>,
    },
    /// Flip a todo between active and completed
    ///
    /// Example: countdown toggle 3f2a
    Toggle { id: String },
    /// Complete every todo, or reopen them all when all are completed
    ///
    /// Example: countdown toggle-all
    ToggleAll,
    /// Change a todo's title; an empty title deletes it
    ///
    /// Example: countdown edit 3f2a Buy oat milk
    Edit {
        id: String,
        #[arg(trailing_var_arg = true)]
        title: Vec<String>,
    },
    /// Delete a todo
    ///
    /// Example: countdown delete 3f2a
    Delete { id: String },
    /// Delete every completed todo
    ///
    /// Example: countdown clear-completed
    ClearCompleted,
    /// Start a countdown; 0 clears it
    ///
    /// Example: countdown deadline 3f2a 15
    Deadline {
        id: String,
        #[arg(allow_hyphen_values = true)]
        minutes: String,
    },
    /// Move a todo next to another one
    ///
    /// Example: countdown move 3f2a --before 9c41
    #[command(group(ArgGroup::new("position").required(true).args(["before", "after"])))]
    Move {
        id: String,
        #[arg(long, value_name = "ID")]
        before: Option<String>,
        #[arg(long, value_name = "ID")]
        after: Option<String>,
    },
    /// List todos (all, active, completed)
    ///
    /// Example: countdown list active
    /// Example: countdown list /completed
    List { filter: Option<String> },
    /// Show the list with live countdowns and read commands from stdin
    ///
    /// Example: countdown watch
    Watch { filter: Option<String> },
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    Namespace,
    TickIntervalMs,
    TickingThresholdSecs,
    Alerts,
    LogLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field = canonicalize_key(key_raw);
    if field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "namespace" => ConfigOverrideTarget::Namespace,
        "tick_interval_ms" | "tick_interval" => ConfigOverrideTarget::TickIntervalMs,
        "ticking_threshold_secs" | "ticking_threshold" => {
            ConfigOverrideTarget::TickingThresholdSecs
        }
        "alerts" | "alert" => ConfigOverrideTarget::Alerts,
        "log_level" | "log" => ConfigOverrideTarget::LogLevel,
        other => return Err(format!("unknown config field '{other}'")),
    };

    Ok(ParsedConfigOverride { target, value })
}

/// Folds parsed overrides into a `ConfigOverrides`, later values winning.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, String> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::Namespace => overrides.namespace = Some(parsed.value),
            ConfigOverrideTarget::TickIntervalMs => {
                let millis = parsed
                    .value
                    .parse::<u64>()
                    .map_err(|_| format!("tick_interval_ms must be a number, got '{}'", parsed.value))?;
                overrides.tick_interval_ms = Some(millis);
            }
            ConfigOverrideTarget::TickingThresholdSecs => {
                let secs = parsed.value.parse::<i64>().map_err(|_| {
                    format!(
                        "ticking_threshold_secs must be a number, got '{}'",
                        parsed.value
                    )
                })?;
                overrides.ticking_threshold_secs = Some(secs);
            }
            ConfigOverrideTarget::Alerts => overrides.alerts = Some(parsed.value),
            ConfigOverrideTarget::LogLevel => overrides.log_level = Some(parsed.value),
        }
    }
    Ok(overrides)
}
