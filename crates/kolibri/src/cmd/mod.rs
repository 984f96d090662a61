use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use kolibri_protocol::Protocol;

use crate::exit::{io_error, CliResult};
use crate::output::OutputFormat;

pub mod classify;
pub mod describe;
pub mod methods;
pub mod validate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the kind of one message.
    Classify(InputArgs),
    /// Run one message through the full validation pipeline.
    Validate(InputArgs),
    /// List the methods available at the protocol version.
    Methods(MethodsArgs),
    /// Show the resolved shape of one method.
    Describe(DescribeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat, protocol: &Protocol) -> CliResult<i32> {
    match command {
        Command::Classify(args) => classify::run(args, format),
        Command::Validate(args) => validate::run(args, format, protocol),
        Command::Methods(args) => methods::run(args, format, protocol),
        Command::Describe(args) => describe::run(args, format, protocol),
        Command::Version(args) => version::run(args),
    }
}

/// Where to read the message from. Stdin when neither flag is given.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Message as a JSON string.
    #[arg(long, conflicts_with = "file")]
    pub json: Option<String>,
    /// Read the message from a file.
    #[arg(long, conflicts_with = "json")]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub fn read(&self) -> CliResult<Vec<u8>> {
        if let Some(json) = &self.json {
            return Ok(json.as_bytes().to_vec());
        }
        if let Some(path) = &self.file {
            return fs::read(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err));
        }
        let mut payload = Vec::new();
        std::io::stdin()
            .read_to_end(&mut payload)
            .map_err(|err| io_error("failed reading stdin", err))?;
        Ok(payload)
    }
}

#[derive(Args, Debug)]
pub struct MethodsArgs {
    /// Only the methods introduced or reshaped at exactly this version.
    #[arg(long)]
    pub layer: bool,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Dotted method name, e.g. kolibri.node.browse.
    pub method: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
