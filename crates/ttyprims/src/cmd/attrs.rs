use ttyprims_termios::{encode_attributes, get_attributes, TerminalAttributes};

use crate::cmd::AttrsArgs;
use crate::device::open_device;
use crate::exit::{termios_error, CliResult, SUCCESS};
use crate::output::{print_attributes, AttributesOutput, OutputFormat};

pub fn run(args: AttrsArgs, format: OutputFormat) -> CliResult<i32> {
    let fd = open_device(&args.device.device, args.device.nonblock)?;
    let attrs = get_attributes(&fd).map_err(|err| termios_error("get attributes", err))?;

    let wire = args.wire.then(|| wire_bytes(&attrs));
    let output = AttributesOutput::new(&args.device.device, &attrs, wire.as_deref());
    print_attributes(&output, format);

    Ok(SUCCESS)
}

pub(crate) fn wire_bytes(attrs: &TerminalAttributes) -> Vec<u8> {
    let mut buf = bytes::BytesMut::new();
    encode_attributes(attrs, &mut buf);
    buf.to_vec()
}
