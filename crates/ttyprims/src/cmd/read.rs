use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};
use ttyprims_io::IoError;

use crate::cmd::ReadArgs;
use crate::device::{open_device, parse_timeout};
use crate::exit::{tty_io_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_chunk, OutputFormat};

/// Poll interval used by `--follow` when no timeout is given, so Ctrl-C is
/// noticed even on a blocking handle.
const FOLLOW_POLL: Duration = Duration::from_millis(250);

pub fn run(args: ReadArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_timeout(&args.timeout)?;
    let path = &args.device.device;
    let fd = open_device(path, args.device.nonblock)?;
    let mut buf = vec![0u8; args.count as usize];

    if !args.follow {
        let n = ttyprims_io::read(&fd, &mut buf, timeout)
            .map_err(|err| tty_io_error("read failed", err))?;
        print_chunk(path, &buf[..n], format);
        return Ok(SUCCESS);
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let wait = if timeout.is_zero() {
        FOLLOW_POLL
    } else {
        timeout
    };
    let mut total = 0usize;

    while running.load(Ordering::SeqCst) {
        match ttyprims_io::read(&fd, &mut buf, wait) {
            Ok(0) => {
                debug!("end of stream");
                break;
            }
            Ok(n) => {
                total = total.saturating_add(n);
                print_chunk(path, &buf[..n], format);
            }
            Err(IoError::ReadTimeout(_)) => continue,
            Err(IoError::SelectFailure(source))
                if source.kind() == std::io::ErrorKind::Interrupted =>
            {
                continue
            }
            Err(err) => return Err(tty_io_error("read failed", err)),
        }
    }

    info!(bytes = total, "follow stopped");
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
