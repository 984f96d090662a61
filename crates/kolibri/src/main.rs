mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;
use kolibri_protocol::{negotiate, Protocol, LATEST};
use kolibri_schema::{ProtocolVersion, ValidatorConfig};
use tracing::debug;

use crate::cmd::Command;
use crate::exit::{CliError, CliResult, USAGE};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "kolibri", version, about = "Kolibri protocol inspection CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Protocol version spoken by the peer (e.g. 3.1 or v3.1).
    #[arg(
        long,
        value_name = "VERSION",
        env = "KOLIBRI_PROTOCOL_VERSION",
        default_value_t = LATEST,
        global = true
    )]
    protocol_version: ProtocolVersion,

    /// Reject undeclared fields and stray params.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn protocol(&self) -> CliResult<Protocol> {
        let version = negotiate(self.protocol_version).ok_or_else(|| {
            CliError::new(
                USAGE,
                format!("protocol version {} predates v1.0", self.protocol_version),
            )
        })?;
        if version != self.protocol_version {
            debug!(requested = %self.protocol_version, %version, "negotiated down to known layer");
        }
        let config = ValidatorConfig {
            strict_mode: self.strict,
            ..ValidatorConfig::default()
        };
        Ok(Protocol::with_config(version, config))
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cli
        .protocol()
        .and_then(|protocol| cmd::run(cli.command, format, &protocol));

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use kolibri_protocol::{V2_1, V3_3};

    use super::*;

    #[test]
    fn parses_validate_subcommand() {
        let cli = Cli::try_parse_from([
            "kolibri",
            "--protocol-version",
            "v2.1",
            "validate",
            "--json",
            "{}",
        ])
        .expect("validate args should parse");

        assert!(matches!(cli.command, Command::Validate(_)));
        assert_eq!(cli.protocol_version, V2_1);
    }

    #[test]
    fn rejects_conflicting_input_args() {
        let err = Cli::try_parse_from([
            "kolibri",
            "classify",
            "--json",
            "{}",
            "--file",
            "msg.json",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_malformed_protocol_version() {
        let err = Cli::try_parse_from(["kolibri", "--protocol-version", "three", "methods"])
            .expect_err("bad version should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn unknown_versions_negotiate_down() {
        let args = ["kolibri", "--protocol-version", "4.0", "--strict", "methods"];
        let cli = Cli::try_parse_from(args).expect("methods args should parse");
        let protocol = cli.protocol().unwrap();
        assert_eq!(protocol.version(), V3_3);
        assert!(protocol.config().strict_mode);

        let cli = Cli::try_parse_from(["kolibri", "--protocol-version", "0.5", "methods"])
            .expect("methods args should parse");
        assert_eq!(cli.protocol().unwrap_err().code, USAGE);
    }
}
