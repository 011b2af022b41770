//! Clap derive structures for the `restsync` CLI.
//!
//! Only clap types live here; build.rs includes this file to render man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// restsync -- reconcile RESTCONF device configuration
#[derive(Debug, Parser)]
#[command(
    name = "restsync",
    version,
    about = "Reconcile RESTCONF device configuration against a desired tree",
    long_about = "Fetches configuration from a RESTCONF device, compares it with the\n\
        configuration you want, and writes only when they differ.\n\n\
        Comparison ignores list order, string vs number vs boolean spelling,\n\
        and read-only `state` mirrors of `config` branches.",
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
    /// Device profile to use
    #[arg(long, short = 'p', env = "RESTSYNC_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device base URL (overrides profile)
    #[arg(long, short = 'H', env = "RESTSYNC_HOST", global = true)]
    pub host: Option<String>,

    /// Username for basic auth (overrides profile)
    #[arg(long, short = 'u', env = "RESTSYNC_USERNAME", global = true)]
    pub username: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "RESTSYNC_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "RESTSYNC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "RESTSYNC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary and diff table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Request Enums ────────────────────────────────────────────────────

/// HTTP verb used to push a changed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Put,
    Patch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    /// The resource should exist with the given config
    Present,
    /// The resource should be deleted
    Absent,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a resource and print the raw response
    Get(GetArgs),

    /// Bring a resource in line with the desired config
    Apply(ApplyArgs),

    /// Send a POST request (actions, RPCs)
    Post(PostArgs),

    /// Compare two config files offline, no device needed
    #[command(alias = "cmp")]
    Compare(CompareArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Device Commands ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Resource path, e.g. /restconf/data/openconfig-system:system/ntp
    pub uri: String,
}

/// Desired config given either as a file or inline.
#[derive(Debug, Args)]
#[group(multiple = false)]
pub struct PayloadArgs {
    /// Read the desired config from a JSON or YAML file
    #[arg(long, short = 'f', value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Desired config as inline JSON
    #[arg(long, value_name = "JSON")]
    pub config: Option<String>,
}

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Resource path
    pub uri: String,

    #[command(flatten)]
    pub payload: PayloadArgs,

    /// Write method when the resource differs
    #[arg(long, short = 'm', default_value = "put")]
    pub method: MethodArg,

    /// Whether the resource should exist
    #[arg(long, short = 's', default_value = "present")]
    pub state: StateArg,

    /// Field names to leave out of the comparison (repeatable)
    #[arg(long = "keys-ignore", short = 'i', value_name = "KEY")]
    pub keys_ignore: Vec<String>,

    /// JMESPath query that filters the live config before it is compared
    #[arg(long, value_name = "QUERY")]
    pub config_query: Option<String>,

    /// Report what would change without writing
    #[arg(long)]
    pub check: bool,

    /// Include the before/after record in the report
    #[arg(long)]
    pub diff: bool,
}

#[derive(Debug, Args)]
pub struct PostArgs {
    /// Resource path
    pub uri: String,

    #[command(flatten)]
    pub payload: PayloadArgs,

    /// Secret value to mask in the echoed response (repeatable)
    #[arg(long = "secret", value_name = "VALUE")]
    pub secrets: Vec<String>,
}

// ── Offline Commands ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompareArgs {
    /// File holding the live config (JSON or YAML)
    pub current: PathBuf,

    /// File holding the desired config (JSON or YAML)
    pub desired: PathBuf,

    /// Field names to leave out of the comparison (repeatable)
    #[arg(long = "keys-ignore", short = 'i', value_name = "KEY")]
    pub keys_ignore: Vec<String>,

    /// Keep `state` branches that sit next to a `config` branch
    #[arg(long)]
    pub keep_state: bool,

    /// Exit with status 6 when the files differ
    #[arg(long)]
    pub exit_code: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive profile setup
    Init,

    /// Show the current configuration (passwords masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (host, username, password_env, ca_cert, insecure, timeout)
        key: String,
        /// Value to store
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },

    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
