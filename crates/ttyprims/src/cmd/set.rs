use tracing::{debug, info};
use ttyprims_termios::{
    get_attributes, set_attributes, DataBits, FlowControl, LineSettings, Parity, StopBits,
    TerminalAttributes,
};

use crate::cmd::{FlowArg, ParityArg, SetArgs};
use crate::device::open_device;
use crate::exit::{termios_error, CliResult, SUCCESS};
use crate::output::{print_attributes, AttributesOutput, OutputFormat};

pub fn run(args: SetArgs, format: OutputFormat) -> CliResult<i32> {
    let path = &args.device.device;
    let fd = open_device(path, args.device.nonblock)?;

    let current = get_attributes(&fd).map_err(|err| termios_error("get attributes", err))?;
    let desired = desired_attributes(&args, &current);
    debug!(?current, ?desired, "applying attributes");

    set_attributes(&fd, &desired).map_err(|err| termios_error("set attributes", err))?;
    info!(device = %path.display(), "attributes applied and verified");

    let applied = get_attributes(&fd).map_err(|err| termios_error("get attributes", err))?;
    print_attributes(&AttributesOutput::new(path, &applied, None), format);

    Ok(SUCCESS)
}

/// Layer the requested changes over `current`: raw mode, then line settings,
/// then explicit flag words, then individual control characters.
pub(crate) fn desired_attributes(
    args: &SetArgs,
    current: &TerminalAttributes,
) -> TerminalAttributes {
    let mut desired = *current;

    if args.raw {
        desired.make_raw();
    }
    if args.has_line_settings() {
        desired = line_settings(args).apply_to(&desired);
    }

    if let Some(iflag) = args.iflag {
        desired.input_flags = iflag;
    }
    if let Some(oflag) = args.oflag {
        desired.output_flags = oflag;
    }
    if let Some(cflag) = args.cflag {
        desired.control_flags = cflag;
    }
    if let Some(lflag) = args.lflag {
        desired.local_flags = lflag;
    }
    for &(index, value) in &args.control_chars {
        desired.control_chars[index] = value;
    }

    desired
}

// Options left out fall back to 8N1 without flow control.
fn line_settings(args: &SetArgs) -> LineSettings {
    let defaults = LineSettings::default();

    LineSettings {
        data_bits: args
            .data_bits
            .and_then(DataBits::from_count)
            .unwrap_or(defaults.data_bits),
        parity: match args.parity {
            Some(ParityArg::None) => Parity::None,
            Some(ParityArg::Odd) => Parity::Odd,
            Some(ParityArg::Even) => Parity::Even,
            None => defaults.parity,
        },
        stop_bits: match args.stop_bits {
            Some(2) => StopBits::Two,
            Some(_) => StopBits::One,
            None => defaults.stop_bits,
        },
        flow_control: match args.flow {
            Some(FlowArg::None) => FlowControl::None,
            Some(FlowArg::Software) => FlowControl::Software,
            Some(FlowArg::Hardware) => FlowControl::Hardware,
            None => defaults.flow_control,
        },
    }
}
