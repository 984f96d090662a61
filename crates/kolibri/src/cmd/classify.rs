use kolibri_envelope::{diagnose, MessageKind};
use serde::Serialize;
use serde_json::Value;

use crate::cmd::InputArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct ClassifyOutput {
    kind: &'static str,
    routed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

/// Classification is total: invalid input still exits with success.
pub fn run(args: InputArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = args.read()?;
    let out = classify_payload(&payload);

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => match out.reason {
            Some(reason) => println!("{} ({reason})", out.kind),
            None => println!("{}", out.kind),
        },
        OutputFormat::Raw => println!("{}", out.kind),
    }
    Ok(SUCCESS)
}

fn classify_payload(payload: &[u8]) -> ClassifyOutput {
    let kind = match serde_json::from_slice::<Value>(payload) {
        Ok(value) => diagnose(&value),
        Err(_) => Err("input is not JSON"),
    };
    match kind {
        Ok(kind) => ClassifyOutput {
            kind: kind.name(),
            routed: kind.is_routed(),
            reason: None,
        },
        Err(reason) => ClassifyOutput {
            kind: MessageKind::Invalid.name(),
            routed: false,
            reason: Some(reason),
        },
    }
}
