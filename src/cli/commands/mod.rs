use clap::{
    Arg, ArgAction, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

/// Pure clap command definitions with zero business logic
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new(env!("CARGO_PKG_NAME"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("address")
                .env("CERTPULSE_ADDRESS")
                .help("The endpoint to check")
                .long("address")
                .short('a')
                .value_name("HOST")
                .required(true),
        )
        .arg(
            Arg::new("port")
                .default_value("443")
                .env("CERTPULSE_PORT")
                .help("The port on the endpoint to check")
                .long("port")
                .short('p')
                .value_parser(clap::value_parser!(u16).range(1..)),
        )
        .arg(
            Arg::new("to")
                .env("CERTPULSE_TO")
                .help("who to email in case of alert")
                .long("to")
                .short('t')
                .value_name("EMAIL")
                .required(true),
        )
        .arg(
            Arg::new("from")
                .env("CERTPULSE_FROM")
                .help("who should email come from")
                .long("from")
                .short('f')
                .value_name("EMAIL")
                .required(true),
        )
        .arg(
            Arg::new("expiry")
                .env("CERTPULSE_EXPIRY")
                .help("Number of days until expiry")
                .long("expiry")
                .long_help(
                    "Warning window in days.\n\
                    An alert is sent when the certificate expires before now + <DAYS>.\n\
                    A certificate expiring exactly at that instant is not reported."
                )
                .short('e')
                .value_name("DAYS")
                .required(true)
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("smtp-host")
                .default_value("localhost")
                .env("CERTPULSE_SMTP_HOST")
                .help("SMTP relay used to deliver alerts")
                .long("smtp-host")
                .value_name("HOST"),
        )
        .arg(
            Arg::new("smtp-port")
                .default_value("25")
                .env("CERTPULSE_SMTP_PORT")
                .help("SMTP relay port")
                .long("smtp-port")
                .value_name("PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("tls-ca")
                .env("CERTPULSE_TLS_CA")
                .help("Path to CA certificate bundle used to validate the endpoint chain")
                .long("tls-ca")
                .long_help(
                    "Path to a PEM bundle of trusted Certificate Authorities.\n\
                    When not set the Mozilla root program (webpki-roots) is used.\n\n\
                    Example: /etc/ssl/certs/ca-certificates.crt"
                )
                .value_name("PATH"),
        )
        .arg(
            Arg::new("timeout")
                .default_value("10")
                .env("CERTPULSE_TIMEOUT")
                .help("number of seconds allowed for connect and TLS handshake")
                .long("timeout")
                .value_name("SECONDS")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new("json")
                .env("CERTPULSE_JSON")
                .help("print the check report as JSON")
                .long("json")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .help("increase log verbosity (-v debug, -vv trace)")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count),
        )
}
