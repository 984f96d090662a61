use kolibri_protocol::Protocol;
use kolibri_schema::{MethodDescriptor, MethodKind};
use serde::Serialize;

use crate::cmd::MethodsArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{or_dash, print_json, table, OutputFormat};

#[derive(Serialize)]
struct MethodRow {
    name: &'static str,
    since: String,
    kind: &'static str,
    params: Option<String>,
    result: Option<String>,
}

impl From<&MethodDescriptor> for MethodRow {
    fn from(descriptor: &MethodDescriptor) -> Self {
        Self {
            name: descriptor.name,
            since: descriptor.since.to_string(),
            kind: kind_name(descriptor.kind),
            params: descriptor.params.as_ref().map(|rule| rule.describe()),
            result: descriptor.result.as_ref().map(|rule| rule.describe()),
        }
    }
}

pub(crate) fn kind_name(kind: MethodKind) -> &'static str {
    match kind {
        MethodKind::Call => "call",
        MethodKind::Notification => "notification",
    }
}

pub fn run(args: MethodsArgs, format: OutputFormat, protocol: &Protocol) -> CliResult<i32> {
    let registry = protocol.registry();
    let descriptors = if args.layer {
        registry.layer(protocol.version())
    } else {
        registry.effective(protocol.version())
    };
    let rows: Vec<MethodRow> = descriptors.into_iter().map(MethodRow::from).collect();

    match format {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Table => {
            let mut t = table(vec!["METHOD", "SINCE", "KIND", "PARAMS"]);
            for row in &rows {
                t.add_row(vec![
                    row.name.to_string(),
                    row.since.clone(),
                    row.kind.to_string(),
                    or_dash(row.params.as_deref()),
                ]);
            }
            println!("{t}");
        }
        OutputFormat::Pretty => {
            println!("Methods at {} ({}):", protocol.version(), rows.len());
            for row in &rows {
                println!("  {:<40} {} {}", row.name, row.since, row.kind);
            }
        }
        OutputFormat::Raw => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
    }
    Ok(SUCCESS)
}
