use kolibri_protocol::Protocol;
use kolibri_schema::{FieldRule, MethodDescriptor};
use serde::Serialize;

use crate::cmd::methods::kind_name;
use crate::cmd::DescribeArgs;
use crate::exit::{CliError, CliResult, SUCCESS, USAGE};
use crate::output::{or_dash, print_json, table, OutputFormat};

#[derive(Serialize)]
struct FieldOutput {
    name: &'static str,
    required: bool,
    rule: String,
}

#[derive(Serialize)]
struct DescribeOutput {
    name: &'static str,
    since: String,
    kind: &'static str,
    /// `object`, `list` or `none`.
    params: &'static str,
    fields: Vec<FieldOutput>,
    partial_update: bool,
    result: Option<String>,
}

impl From<&MethodDescriptor> for DescribeOutput {
    fn from(descriptor: &MethodDescriptor) -> Self {
        let schema = descriptor.param_schema();
        let fields = schema
            .map(|schema| {
                schema
                    .fields()
                    .iter()
                    .map(|field| FieldOutput {
                        name: field.name,
                        required: field.is_required(),
                        rule: field.rule.describe(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self {
            name: descriptor.name,
            since: descriptor.since.to_string(),
            kind: kind_name(descriptor.kind),
            params: params_shape(descriptor.params.as_ref()),
            fields,
            partial_update: schema.is_some_and(|schema| schema.set_rule().is_some()),
            result: descriptor.result.as_ref().map(FieldRule::describe),
        }
    }
}

fn params_shape(rule: Option<&FieldRule>) -> &'static str {
    match rule {
        None => "none",
        Some(FieldRule::Nested(_)) => "object",
        Some(FieldRule::NonEmptyArray(_) | FieldRule::ArrayOf(_)) => "list",
        Some(_) => "value",
    }
}

pub fn run(args: DescribeArgs, format: OutputFormat, protocol: &Protocol) -> CliResult<i32> {
    let descriptor = protocol.resolve(&args.method).ok_or_else(|| {
        CliError::new(
            USAGE,
            format!("method {} is not available at {}", args.method, protocol.version()),
        )
    })?;
    let out = DescribeOutput::from(descriptor);

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{} ({}, since {})", out.name, out.kind, out.since);
            println!("  Params: {}", out.params);
            if out.partial_update {
                println!("  At least one optional field must be set.");
            }
            if !out.fields.is_empty() {
                let mut t = table(vec!["FIELD", "REQUIRED", "RULE"]);
                for field in &out.fields {
                    t.add_row(vec![
                        field.name.to_string(),
                        if field.required { "yes" } else { "no" }.to_string(),
                        field.rule.clone(),
                    ]);
                }
                println!("{t}");
            }
            println!("  Result: {}", or_dash(out.result.as_deref()));
        }
        OutputFormat::Raw => println!("{}", out.since),
    }
    Ok(SUCCESS)
}
