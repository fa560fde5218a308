use ttyprims_termios::{ATTRIBUTES_WIRE_SIZE, NCCS};

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("ttyprims {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: ttyprims");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "build_target: {}",
        option_env!("TTYPRIMS_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));
    println!("control_chars: {NCCS}");
    println!("wire_size: {ATTRIBUTES_WIRE_SIZE}");
    println!("max_waitable_fd: {}", ttyprims_io::MAX_WAITABLE_FD);

    Ok(SUCCESS)
}
