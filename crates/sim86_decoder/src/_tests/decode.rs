use super::*;
use std::sync::{Arc, Mutex};

fn decode_one(bytes: &[u8]) -> Instruction {
    let mut reader = ByteReader::new(bytes);
    let instruction = decode_instruction(&mut reader).unwrap();
    assert_eq!(reader.position(), instruction.size);
    instruction
}

fn text(bytes: &[u8]) -> String {
    let instruction = decode_one(bytes);
    assert_eq!(
        instruction.size,
        bytes.len(),
        "all bytes should be consumed: {}",
        instruction
    );
    instruction.to_string()
}

#[test]
fn mov_immediate_to_register() {
    let instruction = decode_one(&[0xB8, 0x05, 0x00]);
    assert_eq!(
        instruction,
        Instruction::new(
            Operation::MOV,
            Operand::Register(Register::AX),
            Operand::ImmediateWord(5),
            3
        )
    );
    assert_eq!(instruction.to_string(), "mov ax, 5");

    assert_eq!(text(&[0xB1, 0x0C]), "mov cl, 12");
    assert_eq!(text(&[0xB5, 0xF4]), "mov ch, 244");
    assert_eq!(text(&[0xB9, 0x0C, 0x00]), "mov cx, 12");
    assert_eq!(text(&[0xB9, 0xF4, 0xFF]), "mov cx, 65524");
    assert_eq!(text(&[0xBF, 0x01, 0x10]), "mov di, 4097");
}

#[test]
fn mov_register_to_register() {
    assert_eq!(text(&[0x89, 0xD8]), "mov ax, bx");
    assert_eq!(text(&[0x89, 0xD9]), "mov cx, bx");
    assert_eq!(text(&[0x88, 0xE5]), "mov ch, ah");
    assert_eq!(text(&[0x8B, 0xC3]), "mov ax, bx");
    assert_eq!(text(&[0x8A, 0xF3]), "mov dh, bl");
}

#[test]
fn mov_memory_to_register() {
    let instruction = decode_one(&[0x8B, 0x46, 0x05]);
    assert_eq!(instruction.destination, Operand::Register(Register::AX));
    assert_eq!(instruction.source.to_string(), "[bp + 5]");
    assert_eq!(instruction.size, 3);

    assert_eq!(text(&[0x8A, 0x00]), "mov al, [bx + si]");
    assert_eq!(text(&[0x8B, 0x1B]), "mov bx, [bp + di]");
    assert_eq!(text(&[0x8B, 0x56, 0x00]), "mov dx, [bp + 0]");
    assert_eq!(text(&[0x8A, 0x60, 0x04]), "mov ah, [bx + si + 4]");
    assert_eq!(text(&[0x8A, 0x80, 0x87, 0x13]), "mov al, [bx + si + 4999]");
    assert_eq!(text(&[0x8B, 0x41, 0xDB]), "mov ax, [bx + di - 37]");
}

#[test]
fn mov_register_to_memory() {
    assert_eq!(text(&[0x89, 0x09]), "mov [bx + di], cx");
    assert_eq!(text(&[0x88, 0x0A]), "mov [bp + si], cl");
    assert_eq!(text(&[0x88, 0x6E, 0x00]), "mov [bp + 0], ch");
    assert_eq!(text(&[0x89, 0x8C, 0xD4, 0xFE]), "mov [si - 300], cx");
}

#[test]
fn mov_direct_address_respects_direction() {
    assert_eq!(text(&[0x8B, 0x2E, 0x05, 0x00]), "mov bp, [5]");
    assert_eq!(text(&[0x89, 0x1E, 0x82, 0x0D]), "mov [3458], bx");
}

#[test]
fn mov_immediate_to_memory() {
    assert_eq!(text(&[0xC6, 0x03, 0x07]), "mov [bp + di], byte 7");
    assert_eq!(
        text(&[0xC7, 0x85, 0x85, 0x03, 0x5B, 0x01]),
        "mov [di + 901], word 347"
    );

    // Register destinations never sign extend for mov.
    let instruction = decode_one(&[0xC7, 0xC0, 0xFF, 0x00]);
    assert_eq!(instruction.source, Operand::ImmediateWord(0x00FF));
}

#[test]
fn mov_accumulator_and_memory() {
    assert_eq!(text(&[0xA1, 0xFB, 0x09]), "mov ax, [2555]");
    assert_eq!(text(&[0xA0, 0x10, 0x00]), "mov al, [16]");
    assert_eq!(text(&[0xA3, 0x0F, 0x00]), "mov [15], ax");
    assert_eq!(text(&[0xA2, 0xFA, 0x09]), "mov [2554], al");
}

#[test]
fn mov_segment_registers() {
    assert_eq!(text(&[0x8E, 0xD0]), "mov ss, ax");
    assert_eq!(text(&[0x8C, 0xDB]), "mov bx, ds");
    assert_eq!(text(&[0x8E, 0x1E, 0x10, 0x00]), "mov ds, [16]");
    assert_eq!(text(&[0x8C, 0x47, 0x02]), "mov [bx + 2], es");

    let mut reader = ByteReader::new(&[0x8E, 0xE0]);
    assert_eq!(
        decode_instruction(&mut reader),
        Err(DecodeError::InvalidSegmentEncoding(0b100))
    );
}

#[test]
fn add_sub_cmp_register_forms() {
    assert_eq!(text(&[0x03, 0x18]), "add bx, [bx + si]");
    assert_eq!(text(&[0x01, 0xD8]), "add ax, bx");
    assert_eq!(text(&[0x00, 0x60, 0x04]), "add [bx + si + 4], ah");
    assert_eq!(text(&[0x2B, 0x18]), "sub bx, [bx + si]");
    assert_eq!(text(&[0x29, 0xD8]), "sub ax, bx");
    assert_eq!(text(&[0x3B, 0x18]), "cmp bx, [bx + si]");
    assert_eq!(text(&[0x38, 0xC4]), "cmp ah, al");
}

#[test]
fn add_sub_cmp_immediate_group() {
    assert_eq!(text(&[0x83, 0xC6, 0x02]), "add si, 2");
    assert_eq!(text(&[0x83, 0xEE, 0x02]), "sub si, 2");
    assert_eq!(text(&[0x83, 0xFE, 0x02]), "cmp si, 2");
    assert_eq!(text(&[0x80, 0x07, 0x22]), "add [bx], byte 34");
    assert_eq!(text(&[0x80, 0x3F, 0x22]), "cmp [bx], byte 34");
    assert_eq!(
        text(&[0x81, 0x06, 0xE2, 0x12, 0x1D, 0x00]),
        "add [4834], word 29"
    );
    assert_eq!(
        text(&[0x83, 0x82, 0xE8, 0x03, 0x1D]),
        "add [bp + si + 1000], word 29"
    );
    assert_eq!(text(&[0x81, 0xC4, 0x88, 0x01]), "add sp, 392");
}

#[test]
fn immediate_group_sign_extends_bytes() {
    let instruction = decode_one(&[0x83, 0xC1, 0xF4]);
    assert_eq!(instruction.operation, Operation::ADD);
    assert_eq!(instruction.destination, Operand::Register(Register::CX));
    assert_eq!(instruction.source, Operand::ImmediateWord(0xFFF4));
    assert_eq!(instruction.size, 3);

    // s=1 with a byte destination stays a byte.
    let instruction = decode_one(&[0x82, 0xE9, 0xF4]);
    assert_eq!(instruction.operation, Operation::SUB);
    assert_eq!(instruction.destination, Operand::Register(Register::CL));
    assert_eq!(instruction.source, Operand::ImmediateByte(0xF4));
}

#[test]
fn immediate_group_rejects_other_selectors() {
    for selector in [0b001, 0b010, 0b011, 0b100, 0b110] {
        let mrrm = 0b11_000_000 | (selector << 3);
        let bytes = [0x83, mrrm, 0x02];
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(
            decode_instruction(&mut reader),
            Err(DecodeError::InvalidGroupSelector(mrrm))
        );
    }
}

#[test]
fn add_sub_cmp_accumulator() {
    assert_eq!(text(&[0x05, 0xE8, 0x03]), "add ax, 1000");
    assert_eq!(text(&[0x04, 0xE2]), "add al, 226");
    assert_eq!(text(&[0x2D, 0xE8, 0x03]), "sub ax, 1000");
    assert_eq!(text(&[0x2C, 0x09]), "sub al, 9");
    assert_eq!(text(&[0x3D, 0xE8, 0x03]), "cmp ax, 1000");
    assert_eq!(text(&[0x3C, 0xE2]), "cmp al, 226");
}

#[test]
fn jumps() {
    let instruction = decode_one(&[0x75, 0x02]);
    assert_eq!(instruction, Instruction::jump(Operation::JNE, 2));
    assert_eq!(instruction.to_string(), "jne $+4");

    assert_eq!(text(&[0x74, 0xFE]), "je $+0");
    assert_eq!(text(&[0xE2, 0xFC]), "loop $-2");
    assert_eq!(text(&[0xE0, 0xF0]), "loopne $-14");
    assert_eq!(text(&[0xE3, 0x7F]), "jcxz $+129");
}

#[test]
fn every_jump_op_code() {
    use Operation::*;

    let expected = [
        (0x70, JO),
        (0x71, JNO),
        (0x72, JB),
        (0x73, JAE),
        (0x74, JE),
        (0x75, JNE),
        (0x76, JBE),
        (0x77, JA),
        (0x78, JS),
        (0x79, JNS),
        (0x7A, JP),
        (0x7B, JNP),
        (0x7C, JL),
        (0x7D, JGE),
        (0x7E, JLE),
        (0x7F, JG),
        (0xE0, LOOPNE),
        (0xE1, LOOPE),
        (0xE2, LOOP),
        (0xE3, JCXZ),
    ];

    for (op_code, operation) in expected {
        let instruction = decode_one(&[op_code, 0xFA]);
        assert_eq!(instruction.operation, operation);
        assert_eq!(instruction.destination, Operand::RelativeOffset(-6));
        assert!(instruction.source.is_none());
        assert_eq!(instruction.size, 2);
    }
}

#[test]
fn invalid_op_code() {
    let mut reader = ByteReader::new(&[0x90]);
    assert_eq!(
        decode_instruction(&mut reader),
        Err(DecodeError::InvalidOpCode {
            op_code: 0x90,
            position: 0
        })
    );

    // lea shares the mov prefix but is not decoded.
    assert_eq!(
        decode(&[0x89, 0xD8, 0x8D, 0x00]),
        Err(DecodeError::InvalidOpCode {
            op_code: 0x8D,
            position: 2
        })
    );
}

#[test]
fn truncated_instructions() {
    assert_eq!(
        decode(&[0xB8, 0x05]),
        Err(DecodeError::UnexpectedEndOfInput { position: 1 })
    );
    assert_eq!(
        decode(&[0x75]),
        Err(DecodeError::UnexpectedEndOfInput { position: 1 })
    );
    assert_eq!(
        decode(&[0x8B, 0x46]),
        Err(DecodeError::UnexpectedEndOfInput { position: 2 })
    );
    assert_eq!(
        decode(&[0x80, 0x07]),
        Err(DecodeError::UnexpectedEndOfInput { position: 2 })
    );
}

#[test]
fn decode_stream() {
    #[rustfmt::skip]
    let bytes = [
        0xB9, 0x03, 0x00,       // mov cx, 3
        0xBB, 0xE8, 0x03,       // mov bx, 1000
        0x83, 0xC3, 0x0A,       // add bx, 10
        0x83, 0xE9, 0x01,       // sub cx, 1
        0x75, 0xF8,             // jne $-6
    ];

    let instructions = decode(&bytes).unwrap();
    let listing: Vec<String> = instructions.iter().map(ToString::to_string).collect();

    assert_eq!(
        listing,
        ["mov cx, 3", "mov bx, 1000", "add bx, 10", "sub cx, 1", "jne $-6"]
    );
    assert_eq!(
        instructions.iter().map(|i| i.size).sum::<usize>(),
        bytes.len()
    );
}

#[test]
fn decode_empty() {
    assert_eq!(decode(&[]), Ok(vec![]));
}

#[test]
fn decoding_is_repeatable() {
    let bytes = [
        0x8B, 0x46, 0x05, 0x83, 0xC1, 0xF4, 0xA1, 0xFB, 0x09, 0x74, 0xFE,
    ];

    let first = decode(&bytes).unwrap();
    let second = decode(&bytes).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a debug level subscriber on this thread and return what it logged.
fn with_captured_log<R>(f: impl FnOnce() -> R) -> (R, String) {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);

    (result, log.contents())
}

#[test]
fn decoded_instructions_are_logged() {
    #[rustfmt::skip]
    let (instructions, log) = with_captured_log(|| decode(&[
        0xB9, 0x02, 0x00,       // mov cx, 2
        0x83, 0xE9, 0x01,       // sub cx, 1
    ]));

    assert_eq!(instructions.unwrap().len(), 2);
    assert!(log.contains("0000  mov cx, 2"), "{}", log);
    assert!(log.contains("0003  sub cx, 1"), "{}", log);
}

#[test]
fn decode_failure_is_logged() {
    let (result, log) = with_captured_log(|| decode(&[0x89, 0xD8, 0x90]));

    assert!(result.is_err());
    assert!(log.contains("0000  mov ax, bx"), "{}", log);
    assert!(log.contains("Decoding stopped after 1 instructions"), "{}", log);
}
