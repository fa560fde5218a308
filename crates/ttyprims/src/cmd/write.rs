use serde::Serialize;
use tracing::debug;

use crate::cmd::WriteArgs;
use crate::device::open_device;
use crate::exit::{io_error, tty_io_error, CliError, CliResult, DEVICE_ERROR, SUCCESS, USAGE};
use crate::output::{print_json, schema_id, OutputFormat};

#[derive(Serialize)]
struct WriteOutput {
    schema_id: String,
    device: String,
    bytes_written: usize,
    calls: usize,
}

pub fn run(args: WriteArgs, format: OutputFormat) -> CliResult<i32> {
    let payload = load_payload(&args)?;
    let path = &args.device.device;
    let fd = open_device(path, args.device.nonblock)?;

    // A single write may be short; keep going until the payload is out.
    let mut written = 0usize;
    let mut calls = 0usize;
    while written < payload.len() {
        let n = ttyprims_io::write(&fd, &payload[written..])
            .map_err(|err| tty_io_error("write failed", err))?;
        calls += 1;
        if n == 0 {
            return Err(CliError::new(
                DEVICE_ERROR,
                format!("write stalled after {written} bytes"),
            ));
        }
        written += n;
        debug!(n, written, total = payload.len(), "wrote");
    }

    let output = WriteOutput {
        schema_id: schema_id("write-result"),
        device: path.display().to_string(),
        bytes_written: written,
        calls,
    };
    match format {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("wrote {} bytes to {}", output.bytes_written, output.device);
        }
        OutputFormat::Raw => println!("{}", output.bytes_written),
    }

    Ok(SUCCESS)
}

fn load_payload(args: &WriteArgs) -> CliResult<Vec<u8>> {
    if let Some(data) = &args.data {
        return Ok(data.as_bytes().to_vec());
    }
    if let Some(path) = &args.file {
        return std::fs::read(path)
            .map_err(|err| io_error(&format!("failed to read {}", path.display()), err));
    }
    Err(CliError::new(USAGE, "one of --data or --file is required"))
}
