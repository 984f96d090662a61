use kolibri_protocol::{Inbound, Protocol, ProtocolError};
use kolibri_schema::Violation;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::cmd::InputArgs;
use crate::exit::{protocol_exit_code, CliResult, SUCCESS};
use crate::output::{or_dash, print_json, table, OutputFormat};

#[derive(Serialize)]
struct ValidateOutput {
    valid: bool,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    violations: Vec<Violation>,
    /// Error envelope that would be sent back to the peer.
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<Value>,
}

impl ValidateOutput {
    fn accepted(protocol: &Protocol, inbound: &Inbound) -> Self {
        Self {
            valid: true,
            version: protocol.version().to_string(),
            kind: Some(inbound.kind.name()),
            method: inbound.envelope.method.clone(),
            id: inbound.id(),
            server: inbound.server().map(str::to_string),
            error: None,
            violations: Vec::new(),
            response: None,
        }
    }

    fn rejected(protocol: &Protocol, err: &ProtocolError) -> Self {
        Self {
            valid: false,
            version: protocol.version().to_string(),
            kind: None,
            method: None,
            id: None,
            server: None,
            error: Some(err.to_string()),
            violations: err.violations().to_vec(),
            response: err.to_response().and_then(|envelope| envelope.to_value().ok()),
        }
    }
}

pub fn run(args: InputArgs, format: OutputFormat, protocol: &Protocol) -> CliResult<i32> {
    let payload = args.read()?;
    let (out, code) = match protocol.inspect_slice(&payload) {
        Ok(inbound) => {
            info!(kind = %inbound.kind, method = ?inbound.method(), "message accepted");
            (ValidateOutput::accepted(protocol, &inbound), SUCCESS)
        }
        Err(err) => (
            ValidateOutput::rejected(protocol, &err),
            protocol_exit_code(&err),
        ),
    };

    print_output(&out, format);
    Ok(code)
}

fn print_output(out: &ValidateOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(out),
        OutputFormat::Table => {
            if out.valid {
                let mut t = table(vec!["KIND", "METHOD", "ID", "SERVER", "VERSION"]);
                t.add_row(vec![
                    or_dash(out.kind),
                    or_dash(out.method.as_deref()),
                    or_dash(out.id),
                    or_dash(out.server.as_deref()),
                    out.version.clone(),
                ]);
                println!("{t}");
                return;
            }
            println!("rejected: {}", or_dash(out.error.as_deref()));
            if !out.violations.is_empty() {
                let mut t = table(vec!["PATH", "RULE", "MESSAGE"]);
                for violation in &out.violations {
                    t.add_row(vec![
                        violation.path.clone(),
                        violation.rule.to_string(),
                        violation.message.clone(),
                    ]);
                }
                println!("{t}");
            }
            if let Some(response) = &out.response {
                println!("response: {response}");
            }
        }
        OutputFormat::Pretty => {
            if out.valid {
                println!("Accepted ({}):", out.version);
                println!("  Kind:    {}", or_dash(out.kind));
                println!("  Method:  {}", or_dash(out.method.as_deref()));
                println!("  Id:      {}", or_dash(out.id));
                println!("  Server:  {}", or_dash(out.server.as_deref()));
                return;
            }
            println!("Rejected ({}): {}", out.version, or_dash(out.error.as_deref()));
            for violation in &out.violations {
                println!("  {violation}");
            }
            if let Some(response) = &out.response {
                println!("  Response: {response}");
            }
        }
        OutputFormat::Raw => match &out.response {
            Some(response) => println!("{response}"),
            None => println!("{}", if out.valid { "valid" } else { "invalid" }),
        },
    }
}
