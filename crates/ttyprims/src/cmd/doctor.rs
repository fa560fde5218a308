use std::io;
use std::os::fd::{FromRawFd, OwnedFd};
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use ttyprims_io::{IoError, MAX_WAITABLE_FD};
use ttyprims_termios::{get_attributes, set_attributes, NCCS};

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::{print_json, schema_id, OutputFormat};

const CHECK_TIMEOUT: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: &'static str,
    status: CheckStatus,
    detail: String,
}

impl CheckResult {
    fn new(name: &'static str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name,
            status,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    schema_id: String,
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(_args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let mut checks = Vec::new();

    match allocate_pty() {
        Ok((master, slave)) => {
            checks.push(CheckResult::new(
                "pty_allocation",
                CheckStatus::Pass,
                "openpty succeeded",
            ));
            checks.push(attribute_round_trip_check(&slave));
            checks.push(idle_timeout_check(&slave));
            checks.push(loopback_check(&master, &slave));
        }
        Err(err) => {
            checks.push(CheckResult::new(
                "pty_allocation",
                CheckStatus::Fail,
                format!("openpty failed: {err}"),
            ));
            for name in ["attribute_round_trip", "idle_timeout", "pty_loopback"] {
                checks.push(CheckResult::new(name, CheckStatus::Skip, "no pty available"));
            }
        }
    }

    checks.push(fd_ceiling_check());
    checks.push(termios_layout_check());

    let has_fail = checks.iter().any(|c| c.status == CheckStatus::Fail);
    let output = DoctorOutput {
        schema_id: schema_id("doctor-report"),
        checks,
        overall: if has_fail { "fail" } else { "pass" },
    };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn allocate_pty() -> io::Result<(OwnedFd, OwnedFd)> {
    let mut master = -1;
    let mut slave = -1;
    // SAFETY: out-pointers are valid; name, termios and winsize are optional.
    let rc = unsafe {
        libc::openpty(
            &mut master,
            &mut slave,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: openpty succeeded, so both descriptors are open and owned here.
    Ok(unsafe { (OwnedFd::from_raw_fd(master), OwnedFd::from_raw_fd(slave)) })
}

fn attribute_round_trip_check(slave: &OwnedFd) -> CheckResult {
    let result = get_attributes(slave).and_then(|mut desired| {
        desired.make_raw();
        set_attributes(slave, &desired)
    });

    match result {
        Ok(()) => CheckResult::new(
            "attribute_round_trip",
            CheckStatus::Pass,
            "raw attributes applied and verified",
        ),
        Err(err) => CheckResult::new("attribute_round_trip", CheckStatus::Fail, err.to_string()),
    }
}

fn idle_timeout_check(slave: &OwnedFd) -> CheckResult {
    let mut buf = [0u8; 1];
    match ttyprims_io::read(slave, &mut buf, CHECK_TIMEOUT) {
        Err(IoError::ReadTimeout(_)) => CheckResult::new(
            "idle_timeout",
            CheckStatus::Pass,
            format!("idle read timed out after {CHECK_TIMEOUT:?}"),
        ),
        Ok(n) => CheckResult::new(
            "idle_timeout",
            CheckStatus::Warn,
            format!("unexpected {n} bytes on a fresh pty"),
        ),
        Err(err) => CheckResult::new("idle_timeout", CheckStatus::Fail, err.to_string()),
    }
}

fn loopback_check(master: &OwnedFd, slave: &OwnedFd) -> CheckResult {
    const PAYLOAD: &[u8] = b"ttyprims";

    let result = ttyprims_io::write(master, PAYLOAD).and_then(|_| {
        let mut buf = [0u8; 16];
        ttyprims_io::read(slave, &mut buf, CHECK_TIMEOUT * 10).map(|n| buf[..n].to_vec())
    });

    match result {
        Ok(data) if data == PAYLOAD => CheckResult::new(
            "pty_loopback",
            CheckStatus::Pass,
            format!("{} bytes echoed master to slave", data.len()),
        ),
        Ok(data) => CheckResult::new(
            "pty_loopback",
            CheckStatus::Warn,
            format!("received {} of {} bytes", data.len(), PAYLOAD.len()),
        ),
        Err(err) => CheckResult::new("pty_loopback", CheckStatus::Fail, err.to_string()),
    }
}

fn fd_ceiling_check() -> CheckResult {
    CheckResult::new(
        "fd_ceiling",
        CheckStatus::Info,
        format!("timed reads need descriptors below {MAX_WAITABLE_FD}"),
    )
}

fn termios_layout_check() -> CheckResult {
    CheckResult::new(
        "termios_layout",
        CheckStatus::Info,
        format!(
            "{} native control characters of {NCCS} carried, {}-bit flag words",
            libc::NCCS,
            std::mem::size_of::<libc::tcflag_t>() * 8
        ),
    )
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    let passed = output.overall == "pass";
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["STATUS", "CHECK", "DETAIL"]);
            for check in &output.checks {
                table.add_row(vec![
                    status_text(check.status).to_string(),
                    check.name.to_string(),
                    check.detail.clone(),
                ]);
            }
            println!("{table}");
            println!("overall: {}", output.overall);
        }
        OutputFormat::Pretty => {
            println!("ttyprims doctor");
            for check in &output.checks {
                println!(
                    "  {:<5} {:<22} {}",
                    status_text(check.status),
                    check.name,
                    check.detail
                );
            }
            let verdict = if passed {
                "all checks passed"
            } else {
                "one or more checks failed"
            };
            println!("{verdict}");
        }
        OutputFormat::Raw => println!("{}", output.overall),
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "ok",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "warn",
        CheckStatus::Info => "info",
        CheckStatus::Skip => "skip",
    }
}
