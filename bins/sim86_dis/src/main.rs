use clap::{ArgAction, Parser};
use sim86_decoder::{decode_instruction, ByteReader, DecodeError};
use sim86_instruction::Instruction;
use std::path::PathBuf;

/// Widest encoding of any instruction the decoder understands.
const MAX_INSTRUCTION_BYTES: usize = 6;

#[derive(Parser)]
#[command(name = "sim86-dis", version, about = "Disassemble raw 8086 machine code")]
struct Opt {
    /// The binary file to disassemble
    binary: PathBuf,

    /// Write the listing to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Prefix every instruction with its offset and encoded bytes. The result can not be
    /// assembled again.
    #[arg(long)]
    offsets: bool,

    /// Log more, repeat for even more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn format_with_offset(offset: usize, bytes: &[u8], instruction: &Instruction) -> String {
    let mut b: String = bytes.iter().map(|b| format!("{:02X} ", b)).collect();

    for _ in bytes.len()..MAX_INSTRUCTION_BYTES {
        b.push_str("   ");
    }

    format!("{:04X}  {} {}", offset, b, instruction)
}

/// Build the listing for `data`. Without offsets the listing is valid NASM source that assembles
/// back into `data`.
fn listing(data: &[u8], offsets: bool) -> Result<String, DecodeError> {
    let mut reader = ByteReader::new(data);
    let mut lines = Vec::new();

    if !offsets {
        lines.push("bits 16".to_string());
    }

    while !reader.is_at_end() {
        let start = reader.position();
        let instruction = decode_instruction(&mut reader)?;

        lines.push(if offsets {
            format_with_offset(start, &data[start..reader.position()], &instruction)
        } else {
            instruction.to_string()
        });
    }

    tracing::info!("Decoded {} bytes", data.len());

    let mut text = lines.join("\n");
    text.push('\n');

    Ok(text)
}

fn disassemble(opt: &Opt) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(&opt.binary)?;
    let text = listing(&data, opt.offsets)?;

    match opt.output {
        Some(ref path) => std::fs::write(path, text)?,
        None => print!("{}", text),
    }

    Ok(())
}

fn main() {
    let opt = Opt::parse();

    init_logging(opt.verbose);

    if let Err(err) = disassemble(&opt) {
        eprintln!("{}: {}", opt.binary.display(), err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rustfmt::skip]
    const PROGRAM: [u8; 8] = [
        0xB8, 0x05, 0x00,       // mov ax, 5
        0x89, 0xD8,             // mov ax, bx
        0x8B, 0x46, 0x05,       // mov ax, [bp + 5]
    ];

    #[test]
    fn listing_is_assemblable() {
        assert_eq!(
            listing(&PROGRAM, false).unwrap(),
            "bits 16\nmov ax, 5\nmov ax, bx\nmov ax, [bp + 5]\n"
        );
    }

    #[test]
    fn listing_with_offsets() {
        let text = listing(&PROGRAM, true).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines,
            [
                "0000  B8 05 00           mov ax, 5",
                "0003  89 D8              mov ax, bx",
                "0005  8B 46 05           mov ax, [bp + 5]",
            ]
        );
    }

    #[test]
    fn empty_listing() {
        assert_eq!(listing(&[], false).unwrap(), "bits 16\n");
    }

    #[test]
    fn listing_fails_on_unknown_op_code() {
        assert_eq!(
            listing(&[0xB8, 0x05, 0x00, 0xF4], false),
            Err(DecodeError::InvalidOpCode {
                op_code: 0xF4,
                position: 3
            })
        );
    }
}
