//! `config` subcommands: profile wizard, inspection, and edits.

use std::str::FromStr;

use dialoguer::{Confirm, Input, Select};
use tabled::{Table, Tabled, settings::Style};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

const SETTABLE_KEYS: &str = "host, username, password_env, insecure, timeout, ca_cert";

// ── Show ────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Password")]
    password: String,
    #[tabled(rename = "TLS")]
    tls: String,
    #[tabled(rename = "Timeout")]
    timeout: String,
}

impl ProfileRow {
    fn new(name: &str, p: &Profile, cfg: &Config) -> Self {
        let password = match (&p.password_env, &p.password) {
            (Some(var), _) => format!("${var}"),
            (None, Some(_)) => "plaintext".into(),
            (None, None) if p.username.is_some() => "keyring".into(),
            (None, None) => "-".into(),
        };
        let tls = match (p.insecure, &p.ca_cert) {
            (Some(true), _) => "insecure".into(),
            (_, Some(ca)) => ca.display().to_string(),
            (Some(false), None) => "system".into(),
            (None, None) => "insecure (default)".into(),
        };
        let marker = if cfg.default_profile.as_deref() == Some(name) { " *" } else { "" };

        Self {
            name: format!("{name}{marker}"),
            host: p.host.clone(),
            user: p.username.clone().unwrap_or_else(|| "(anonymous)".into()),
            password,
            tls,
            timeout: format!("{}s", p.timeout.unwrap_or(cfg.defaults.timeout)),
        }
    }
}

fn sorted_names(cfg: &Config) -> Vec<&String> {
    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    names
}

fn render_config_table(cfg: &Config) -> String {
    let defaults = format!(
        "defaults: output={} color={} timeout={}s diff={}{}",
        cfg.defaults.output,
        cfg.defaults.color,
        cfg.defaults.timeout,
        cfg.defaults.diff,
        if cfg.defaults.insecure { " insecure" } else { "" },
    );
    if cfg.profiles.is_empty() {
        return format!("{defaults}\nNo profiles configured. Run: restsync config init");
    }

    let rows: Vec<ProfileRow> = sorted_names(cfg)
        .into_iter()
        .map(|name| ProfileRow::new(name, &cfg.profiles[name], cfg))
        .collect();
    format!("{defaults}\n{}", Table::new(rows).with(Style::rounded()))
}

/// Replace plaintext passwords before anything is printed.
fn redact(cfg: &mut Config) {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(MASK.into());
        }
    }
}

// ── Set ─────────────────────────────────────────────────────────────

fn parse_field<T: FromStr>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}, got '{value}'"),
    })
}

/// Write one `config set` key onto a profile. Dashes and underscores are
/// interchangeable in key names.
fn apply_setting(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key.replace('-', "_").as_str() {
        "host" => {
            restsync_config::parse_host(&value)?;
            profile.host = value;
        }
        "username" => profile.username = Some(value),
        "password_env" => profile.password_env = Some(value),
        "insecure" => profile.insecure = Some(parse_field("insecure", &value, "true or false")?),
        "timeout" => profile.timeout = Some(parse_field("timeout", &value, "a number of seconds")?),
        "ca_cert" => profile.ca_cert = Some(value.into()),
        _ => {
            return Err(CliError::Validation {
                field: key.into(),
                reason: format!("unknown config key. Valid keys: {SETTABLE_KEYS}"),
            });
        }
    }
    Ok(())
}

// ── Prompts ─────────────────────────────────────────────────────────

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn profile_not_found(cfg: &Config, name: String) -> CliError {
    let available = sorted_names(cfg)
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available
        },
    }
}

fn prompt_new_password() -> Result<String, CliError> {
    let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(password)
}

/// Keyring or plaintext. `Some` is the plaintext to write into the file.
fn store_password_choice(password: String, profile_name: &str) -> Result<Option<String>, CliError> {
    let keyring = Select::new()
        .with_prompt("Where should the password live?")
        .items(&["System keyring", "Config file (plaintext)"])
        .default(0)
        .interact()
        .map_err(prompt_err)?
        == 0;

    if keyring {
        config::store_password(profile_name, &password)?;
        eprintln!("   ✓ Password saved to the system keyring");
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let mut cfg = config::load_config_or_default();
            redact(&mut cfg);
            let out = output::render_single(global.output, &cfg, render_config_table)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            apply_setting(cfg.profiles.entry(profile_name.clone()).or_default(), &key, value)?;
            config::save_config(&cfg)?;
            eprintln!("✓ {key} updated on profile '{profile_name}'");
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: restsync config init");
                return Ok(());
            }
            let default = cfg.default_profile.as_deref();
            for name in sorted_names(&cfg) {
                if default == Some(name.as_str()) {
                    println!("{name} *");
                } else {
                    println!("{name}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, name));
            }
            eprintln!("✓ Now using profile '{name}'");
            cfg.default_profile = Some(name);
            config::save_config(&cfg)?;
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, name));
            }
            config::store_password(&name, &prompt_new_password()?)?;
            eprintln!("✓ Keyring updated for profile '{name}'");
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

/// Interactive wizard that adds (or replaces) one profile and makes it
/// the default.
fn init() -> Result<(), CliError> {
    let path = config::config_path();
    eprintln!("restsync setup");
    eprintln!("   Writing to {}\n", path.display());

    let mut cfg = config::load_config_or_default();

    let name: String = Input::new()
        .with_prompt("Profile")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let host: String = Input::new()
        .with_prompt("Device URL")
        .default("https://192.0.2.1:8888".into())
        .validate_with(|input: &String| {
            restsync_config::parse_host(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let username: String = Input::new()
        .with_prompt("Username (blank for anonymous)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let (username, password) = if username.is_empty() {
        (None, None)
    } else {
        let plaintext = store_password_choice(prompt_new_password()?, &name)?;
        (Some(username), plaintext)
    };

    let verify = Confirm::new()
        .with_prompt("Verify the device's TLS certificate?")
        .default(false)
        .interact()
        .map_err(prompt_err)?;

    cfg.profiles.insert(
        name.clone(),
        Profile {
            host,
            username,
            password,
            insecure: Some(!verify),
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Profile '{name}' saved and set as default");
    eprintln!("  Try: restsync get /restconf/data/ietf-yang-library:modules-state");
    Ok(())
}
