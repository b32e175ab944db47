use clap::Parser;
use sim86_instruction::bits::binary_u8;
use std::path::PathBuf;

/// Print every byte of a file in binary, useful when matching bytes against op code tables.
#[derive(Parser)]
#[command(name = "sim86-bits", version)]
struct Opt {
    /// The file to dump
    binary: PathBuf,
}

fn dump(data: &[u8]) -> String {
    data.iter().map(|byte| binary_u8(*byte) + " ").collect()
}

fn main() {
    let opt = Opt::parse();

    match std::fs::read(&opt.binary) {
        Ok(data) => println!("{}", dump(&data)),
        Err(err) => {
            eprintln!("{}: {}", opt.binary.display(), err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
#[test]
fn test_dump() {
    assert_eq!(dump(&[]), "");
    assert_eq!(dump(&[0x89, 0xD9]), "10001001 11011001 ");
    assert_eq!(dump(&[0x00, 0xFF, 0x05]), "00000000 11111111 00000101 ");
}
