use std::fmt::Write as _;
use std::io::{IsTerminal, Write};
use std::path::Path;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use ttyprims_termios::{control_char_name, ModemLines, TerminalAttributes};

const SCHEMA_BASE: &str = "https://schemas.3leaps.dev/ttyprims/cli/v1";

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn schema_id(name: &str) -> String {
    format!("{SCHEMA_BASE}/{name}.schema.json")
}

pub fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

pub fn hex(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for byte in data {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[derive(Debug, Serialize)]
struct ControlCharOutput {
    index: usize,
    name: Option<&'static str>,
    value: u8,
}

#[derive(Debug, Serialize)]
pub struct AttributesOutput {
    schema_id: String,
    device: String,
    iflag: u32,
    oflag: u32,
    cflag: u32,
    lflag: u32,
    control_chars: Vec<ControlCharOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    wire: Option<String>,
}

impl AttributesOutput {
    pub fn new(device: &Path, attrs: &TerminalAttributes, wire: Option<&[u8]>) -> Self {
        let control_chars = attrs
            .control_chars
            .iter()
            .enumerate()
            .filter_map(|(index, &value)| {
                let name = control_char_name(index);
                (name.is_some() || value != 0).then_some(ControlCharOutput { index, name, value })
            })
            .collect();

        Self {
            schema_id: schema_id("attributes"),
            device: device.display().to_string(),
            iflag: attrs.input_flags,
            oflag: attrs.output_flags,
            cflag: attrs.control_flags,
            lflag: attrs.local_flags,
            control_chars,
            wire: wire.map(hex),
        }
    }
}

pub fn print_attributes(output: &AttributesOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            let mut flags = Table::new();
            flags
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["GROUP", "VALUE"]);
            for (group, value) in flag_groups(output) {
                flags.add_row(vec![group.to_string(), format!("{value:#010x}")]);
            }
            println!("{flags}");

            let mut chars = Table::new();
            chars
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INDEX", "NAME", "VALUE"]);
            for cc in &output.control_chars {
                chars.add_row(vec![
                    cc.index.to_string(),
                    cc.name.unwrap_or("-").to_string(),
                    format!("{:#04x}", cc.value),
                ]);
            }
            println!("{chars}");

            if let Some(wire) = &output.wire {
                println!("wire: {wire}");
            }
        }
        OutputFormat::Pretty => {
            println!("{}", output.device);
            for (group, value) in flag_groups(output) {
                println!("  {group:<6} {value:#010x}");
            }
            let named: Vec<String> = output
                .control_chars
                .iter()
                .map(|cc| format!("{}={:#04x}", cc.name.unwrap_or("?"), cc.value))
                .collect();
            println!("  cc     {}", named.join(" "));
            if let Some(wire) = &output.wire {
                println!("  wire   {wire}");
            }
        }
        OutputFormat::Raw => {
            let cc: Vec<String> = output
                .control_chars
                .iter()
                .map(|cc| format!("{}:{}", cc.index, cc.value))
                .collect();
            println!(
                "{:x} {:x} {:x} {:x} {}",
                output.iflag,
                output.oflag,
                output.cflag,
                output.lflag,
                cc.join(",")
            );
        }
    }
}

fn flag_groups(output: &AttributesOutput) -> [(&'static str, u32); 4] {
    [
        ("iflag", output.iflag),
        ("oflag", output.oflag),
        ("cflag", output.cflag),
        ("lflag", output.lflag),
    ]
}

#[derive(Serialize)]
struct ChunkOutput<'a> {
    schema_id: String,
    device: String,
    size: usize,
    data: String,
    hex: String,
    #[serde(skip)]
    raw: &'a [u8],
}

pub fn print_chunk(device: &Path, data: &[u8], format: OutputFormat) {
    let out = ChunkOutput {
        schema_id: schema_id("read-chunk"),
        device: device.display().to_string(),
        size: data.len(),
        data: preview(data),
        hex: hex(data),
        raw: data,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SIZE", "DATA", "HEX"])
                .add_row(vec![out.size.to_string(), out.data, out.hex]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("size={} data={}", out.size, out.data),
        OutputFormat::Raw => print_raw(out.raw),
    }
}

#[derive(Serialize)]
pub struct ModemOutput {
    schema_id: String,
    device: String,
    bits: i32,
    asserted: Vec<&'static str>,
}

impl ModemOutput {
    pub fn new(device: &Path, lines: ModemLines) -> Self {
        Self {
            schema_id: schema_id("modem-lines"),
            device: device.display().to_string(),
            bits: lines.bits(),
            asserted: lines.names(),
        }
    }
}

pub fn print_modem(output: &ModemOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DEVICE", "BITS", "ASSERTED"])
                .add_row(vec![
                    output.device.clone(),
                    format!("{:#x}", output.bits),
                    output.asserted.join(" "),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{}: {}", output.device, output.asserted.join(" "));
        }
        OutputFormat::Raw => println!("{:#x}", output.bits),
    }
}

fn preview(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => format!("<binary {} bytes>", data.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(hex(&[0x00, 0x0a, 0xff]), "000aff");
    }

    #[test]
    fn attributes_output_lists_named_and_nonzero_slots() {
        let mut attrs = TerminalAttributes::default();
        attrs.control_chars[libc::VMIN] = 1;
        attrs.control_chars[31] = 9;

        let output = AttributesOutput::new(Path::new("/dev/ttyS0"), &attrs, None);
        let json = serde_json::to_value(&output).unwrap();

        let slots = json["control_chars"].as_array().unwrap();
        assert!(slots
            .iter()
            .any(|cc| cc["name"] == "VMIN" && cc["value"] == 1));
        assert!(slots
            .iter()
            .any(|cc| cc["index"] == 31 && cc["name"].is_null()));
        assert!(json.get("wire").is_none());
        assert!(json["schema_id"]
            .as_str()
            .unwrap()
            .ends_with("attributes.schema.json"));
    }

    #[test]
    fn binary_chunks_are_previewed_by_size() {
        assert_eq!(preview(b"ok"), "ok");
        assert_eq!(preview(&[0xff, 0xfe]), "<binary 2 bytes>");
    }
}
