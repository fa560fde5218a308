use tracing::debug;
use ttyprims_termios::{modem_lines, set_dtr, set_rts};

use crate::cmd::ModemArgs;
use crate::device::open_device;
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{print_modem, ModemOutput, OutputFormat};

pub fn run(args: ModemArgs, format: OutputFormat) -> CliResult<i32> {
    let path = &args.device.device;
    let fd = open_device(path, args.device.nonblock)?;

    if let Some(dtr) = args.dtr {
        set_dtr(&fd, dtr.is_on()).map_err(|err| io_error("set DTR", err))?;
        debug!(on = dtr.is_on(), "DTR updated");
    }
    if let Some(rts) = args.rts {
        set_rts(&fd, rts.is_on()).map_err(|err| io_error("set RTS", err))?;
        debug!(on = rts.is_on(), "RTS updated");
    }

    let lines = modem_lines(&fd).map_err(|err| io_error("read modem lines", err))?;
    print_modem(&ModemOutput::new(path, lines), format);

    Ok(SUCCESS)
}
