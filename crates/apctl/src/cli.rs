//! Clap derive structures for the `apctl` CLI.

use std::path::PathBuf;

use apctl_core::{Band, LedMode, MacAddress, PowerLevel};
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// apctl -- UniFi access point radio power and LED control
#[derive(Debug, Parser)]
#[command(
    name = "apctl",
    version,
    about = "Control UniFi access point radio power and LEDs",
    long_about = "Polls a UniFi Network controller for its access points and \
        sets per-band transmit power and status LED overrides.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "APCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller URL (overrides profile)
    #[arg(long, short = 'c', env = "APCTL_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Site name
    #[arg(long, short = 's', env = "APCTL_SITE", global = true)]
    pub site: Option<String>,

    /// Controller username (overrides profile)
    #[arg(long, short = 'u', env = "APCTL_USERNAME", global = true)]
    pub username: Option<String>,

    /// Controller password
    #[arg(long, env = "APCTL_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "APCTL_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Verify the controller's TLS certificate (off by default)
    #[arg(long, env = "APCTL_VERIFY_TLS", global = true)]
    pub verify_tls: bool,

    /// Custom CA certificate (PEM) for TLS verification
    #[arg(long, env = "APCTL_CA_CERT", global = true)]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "APCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the controller is reachable and the credentials work
    Validate,

    /// List access points with their radio power and LED state
    #[command(alias = "ls")]
    List,

    /// Set the transmit power of one band on an access point
    SetPower(SetPowerArgs),

    /// Set the status LED override of an access point
    Led(LedArgs),

    /// Poll the controller and print entity states on every change
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Write commands ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SetPowerArgs {
    /// Access point MAC address
    #[arg(value_parser = parse_mac)]
    pub mac: MacAddress,

    /// Band: 2.4GHz, 5GHz, 6GHz (also 2.4 / 5 / 6)
    #[arg(value_parser = parse_band)]
    pub band: Band,

    /// Power level: auto, low, medium, high
    #[arg(value_parser = parse_power)]
    pub level: PowerLevel,
}

#[derive(Debug, Args)]
pub struct LedArgs {
    /// Access point MAC address
    #[arg(value_parser = parse_mac)]
    pub mac: MacAddress,

    /// LED mode: on, off, default (follow site setting)
    #[arg(value_parser = parse_led)]
    pub mode: LedMode,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Refresh period in seconds (overrides profile)
    #[arg(long, short = 'i', value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
}

/// Accepts `aa:bb:cc:dd:ee:ff` or `AA-BB-CC-DD-EE-FF`.
fn parse_mac(s: &str) -> Result<MacAddress, String> {
    let mac = MacAddress::new(s);
    let octets: Vec<&str> = mac.as_str().split(':').collect();
    let valid = octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(mac)
    } else {
        Err(format!("invalid MAC address '{s}'"))
    }
}

fn parse_band(s: &str) -> Result<Band, String> {
    s.parse()
        .map_err(|_| format!("unknown band '{s}' (expected 2.4GHz, 5GHz or 6GHz)"))
}

fn parse_power(s: &str) -> Result<PowerLevel, String> {
    match s.parse::<PowerLevel>() {
        Ok(level) if level.is_settable() => Ok(level),
        _ => Err(format!(
            "unknown power level '{s}' (expected auto, low, medium or high)"
        )),
    }
}

fn parse_led(s: &str) -> Result<LedMode, String> {
    s.parse()
        .map_err(|_| format!("unknown LED mode '{s}' (expected on, off or default)"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
