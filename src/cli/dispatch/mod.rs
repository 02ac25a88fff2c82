use crate::{
    alert::{SmtpConfig, smtp::parse_address},
    check::CheckRequest,
    cli::actions::Action,
    tls::TlsConfig,
};
use anyhow::{Context, Result};
use clap::ArgMatches;
use std::{path::PathBuf, time::Duration};

fn required_string(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("{id} is required"))
}

/// Convert `ArgMatches` into typed Action enum with validation
///
/// # Errors
///
/// Returns an error if required parameters are missing or empty, or if
/// `--to` / `--from` are not valid email addresses
pub fn dispatch(matches: &ArgMatches) -> Result<Action> {
    let address = required_string(matches, "address")?;
    if address.trim().is_empty() {
        anyhow::bail!("address must not be empty");
    }

    let port = matches.get_one::<u16>("port").copied().unwrap_or(443);
    let recipient = required_string(matches, "to")?;
    parse_address(&recipient).context("invalid --to")?;
    let sender = required_string(matches, "from")?;
    parse_address(&sender).context("invalid --from")?;
    let warning_days = matches
        .get_one::<u32>("expiry")
        .copied()
        .context("expiry is required")?;

    let timeout = Duration::from_secs(matches.get_one::<u64>("timeout").copied().unwrap_or(10));

    let tls = TlsConfig {
        ca: matches.get_one::<String>("tls-ca").map(PathBuf::from),
        timeout,
    };

    let smtp = SmtpConfig {
        host: matches
            .get_one::<String>("smtp-host")
            .cloned()
            .unwrap_or_else(|| "localhost".to_string()),
        port: matches.get_one::<u16>("smtp-port").copied().unwrap_or(25),
        timeout,
    };

    Ok(Action::Check {
        request: CheckRequest {
            address,
            port,
            recipient,
            sender,
            warning_days,
        },
        tls,
        smtp,
        json: matches.get_flag("json"),
    })
}
