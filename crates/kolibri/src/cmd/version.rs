use kolibri_protocol::{KNOWN_VERSIONS, LATEST};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("kolibri {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    let protocols: Vec<String> = KNOWN_VERSIONS.iter().map(ToString::to_string).collect();
    println!("name: kolibri");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("protocol_versions: {}", protocols.join(", "));
    println!("protocol_latest: {LATEST}");
    println!(
        "target: {}",
        option_env!("KOLIBRI_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);

    Ok(SUCCESS)
}
