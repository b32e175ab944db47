use super::*;
use sim86_decoder::decode;
use std::sync::{Arc, Mutex};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn new_simulator(bytes: &[u8]) -> Simulator {
    init_tracing();
    Simulator::new(decode(bytes).unwrap())
}

fn run(bytes: &[u8]) -> Simulator {
    let mut simulator = new_simulator(bytes);
    simulator.run().unwrap();
    assert!(simulator.is_finished());
    simulator
}

#[test]
fn empty_stream_is_finished() {
    let mut simulator = new_simulator(&[]);
    assert!(simulator.is_finished());
    assert_eq!(simulator.step(), Ok(None));
    assert_eq!(simulator.state(), &State::default());
}

#[test]
fn mov_immediate_and_register() {
    #[rustfmt::skip]
    let simulator = run(&[
        0xB8, 0x01, 0x00,       // mov ax, 1
        0xBB, 0x02, 0x00,       // mov bx, 2
        0x89, 0xC1,             // mov cx, ax
        0x89, 0xDA,             // mov dx, bx
        0xBC, 0x05, 0x00,       // mov sp, 5
        0x89, 0xE7,             // mov di, sp
    ]);

    let state = simulator.state();
    assert_eq!(state.register(Register::AX), 1);
    assert_eq!(state.register(Register::BX), 2);
    assert_eq!(state.register(Register::CX), 1);
    assert_eq!(state.register(Register::DX), 2);
    assert_eq!(state.register(Register::SP), 5);
    assert_eq!(state.register(Register::DI), 5);
    assert_eq!(state.ip, 15);
    assert!(state.flags.is_empty());
}

#[test]
fn mov_half_registers() {
    #[rustfmt::skip]
    let simulator = run(&[
        0xB8, 0x22, 0x11,       // mov ax, 4386
        0xB4, 0xFF,             // mov ah, 255
        0x88, 0xE3,             // mov bl, ah
    ]);

    let state = simulator.state();
    assert_eq!(state.register(Register::AX), 0xFF22);
    assert_eq!(state.register(Register::BX), 0x00FF);
}

#[test]
fn mov_segment_registers() {
    #[rustfmt::skip]
    let simulator = run(&[
        0xB8, 0x00, 0x40,       // mov ax, 16384
        0x8E, 0xD0,             // mov ss, ax
        0x8C, 0xD3,             // mov bx, ss
    ]);

    let state = simulator.state();
    assert_eq!(state.register(Register::SS), 0x4000);
    assert_eq!(state.register(Register::BX), 0x4000);
}

#[test]
fn add_zero_sets_zero_flag() {
    #[rustfmt::skip]
    let simulator = run(&[
        0xB8, 0x00, 0x00,       // mov ax, 0
        0x05, 0x00, 0x00,       // add ax, 0
    ]);

    let state = simulator.state();
    assert_eq!(state.register(Register::AX), 0);
    assert!(state.flags.contains(Flags::ZERO));
    assert!(!state.flags.contains(Flags::SIGN));
}

#[test]
fn sub_below_zero_sets_sign_flag() {
    #[rustfmt::skip]
    let simulator = run(&[
        0xB8, 0x00, 0x00,       // mov ax, 0
        0x2D, 0x01, 0x00,       // sub ax, 1
    ]);

    let state = simulator.state();
    assert_eq!(state.register(Register::AX), 0xFFFF);
    assert!(state.flags.contains(Flags::SIGN));
    assert!(!state.flags.contains(Flags::ZERO));
}

#[test]
fn cmp_only_sets_flags() {
    #[rustfmt::skip]
    let simulator = run(&[
        0xBB, 0x05, 0x00,       // mov bx, 5
        0x83, 0xFB, 0x05,       // cmp bx, 5
    ]);

    let state = simulator.state();
    assert_eq!(state.register(Register::BX), 5);
    assert!(state.flags.contains(Flags::ZERO));
}

#[test]
fn byte_arithmetic_uses_byte_flags() {
    #[rustfmt::skip]
    let simulator = run(&[
        0xB8, 0x7F, 0x12,       // mov ax, 4735
        0x04, 0x01,             // add al, 1
    ]);

    let state = simulator.state();
    assert_eq!(state.register(Register::AL), 0x80);
    assert_eq!(state.register(Register::AH), 0x12);
    assert!(state.flags.contains(Flags::SIGN));
    assert!(!state.flags.contains(Flags::ZERO));
}

#[test]
fn steps_record_instruction_pointer() {
    let mut simulator = new_simulator(&[0xB9, 0x0C, 0x00, 0x83, 0xE9, 0x0C]);

    let step = simulator.step().unwrap().unwrap();
    assert_eq!(step.instruction.to_string(), "mov cx, 12");
    assert_eq!(step.ip_before, 0);
    assert_eq!(step.ip_after, 3);
    assert_eq!(step.state.register(Register::CX), 12);
    assert_eq!(step.to_string(), "mov cx, 12 ; ip: 0x0000 -> 0x0003");

    let step = simulator.step().unwrap().unwrap();
    assert_eq!(step.ip_before, 3);
    assert_eq!(step.ip_after, 6);
    assert!(step.state.flags.contains(Flags::ZERO));

    assert_eq!(simulator.step(), Ok(None));
    assert_eq!(simulator.cursor(), 2);
}

#[test]
fn loop_with_jne() {
    #[rustfmt::skip]
    let mut simulator = new_simulator(&[
        0xB9, 0x03, 0x00,       // mov cx, 3
        0xBB, 0xE8, 0x03,       // mov bx, 1000
        0x83, 0xC3, 0x0A,       // add bx, 10
        0x83, 0xE9, 0x01,       // sub cx, 1
        0x75, 0xF8,             // jne $-6
    ]);

    let mut ips = vec![];
    simulator.run_with(|step| ips.push(step.ip_after)).unwrap();

    assert_eq!(ips, [3, 6, 9, 12, 6, 9, 12, 6, 9, 12, 14]);

    let state = simulator.state();
    assert_eq!(state.register(Register::BX), 1030);
    assert_eq!(state.register(Register::CX), 0);
    assert_eq!(state.ip, 14);
    assert!(state.flags.contains(Flags::ZERO));
    assert_eq!(simulator.cursor(), 5);
}

#[test]
fn jne_forward_skips_instructions() {
    #[rustfmt::skip]
    let simulator = run(&[
        0x75, 0x03,             // jne $+5
        0xB8, 0x01, 0x00,       // mov ax, 1
        0xBB, 0x02, 0x00,       // mov bx, 2
    ]);

    let state = simulator.state();
    assert_eq!(state.register(Register::AX), 0);
    assert_eq!(state.register(Register::BX), 2);
    assert_eq!(state.ip, 8);
}

#[test]
fn jne_to_the_end_finishes() {
    let simulator = run(&[0x75, 0x03, 0xB8, 0x01, 0x00]);
    assert_eq!(simulator.state().register(Register::AX), 0);
    assert_eq!(simulator.state().ip, 5);
}

#[test]
fn jne_is_not_taken_when_zero_is_set() {
    #[rustfmt::skip]
    let simulator = run(&[
        0x83, 0xC0, 0x00,       // add ax, 0
        0x75, 0x7F,             // jne $+129
        0xBB, 0x02, 0x00,       // mov bx, 2
    ]);

    assert_eq!(simulator.state().register(Register::BX), 2);
}

#[test]
fn jne_by_zero_falls_through() {
    let simulator = run(&[0x75, 0x00, 0xBB, 0x02, 0x00]);
    assert_eq!(simulator.state().register(Register::BX), 2);
    assert_eq!(simulator.state().ip, 5);
}

#[test]
fn jne_backward_must_land_on_an_instruction() {
    #[rustfmt::skip]
    let mut simulator = new_simulator(&[
        0xB9, 0x03, 0x00,       // mov cx, 3
        0x83, 0xE9, 0x01,       // sub cx, 1
        0x75, 0xFC,             // jne $-2
    ]);

    assert_eq!(
        simulator.run(),
        Err(SimulateError::JumpOvershoot {
            offset: -4,
            landed: -5
        })
    );
    assert_eq!(simulator.state().register(Register::CX), 2);
}

#[test]
fn jne_forward_must_land_on_an_instruction() {
    let mut simulator = new_simulator(&[0x75, 0x02, 0xB8, 0x01, 0x00]);
    assert_eq!(
        simulator.run(),
        Err(SimulateError::JumpOvershoot {
            offset: 2,
            landed: 3
        })
    );
}

#[test]
fn jne_out_of_bounds() {
    let mut simulator = new_simulator(&[0xB9, 0x01, 0x00, 0x75, 0xF6]);
    assert_eq!(
        simulator.run(),
        Err(SimulateError::JumpOutOfBounds { offset: -10 })
    );

    let mut simulator = new_simulator(&[0x75, 0x05, 0xB8, 0x01, 0x00]);
    assert_eq!(
        simulator.run(),
        Err(SimulateError::JumpOutOfBounds { offset: 5 })
    );
}

#[test]
fn other_jumps_are_unimplemented() {
    let mut simulator = new_simulator(&[0x74, 0x00]);
    assert_eq!(
        simulator.run(),
        Err(SimulateError::Unimplemented(Operation::JE))
    );

    let mut simulator = new_simulator(&[0xE2, 0xFE]);
    assert_eq!(
        simulator.run(),
        Err(SimulateError::Unimplemented(Operation::LOOP))
    );
}

#[test]
fn memory_operands_are_unsupported() {
    let instructions = decode(&[0x8B, 0x46, 0x05]).unwrap();
    let source = instructions[0].source;
    assert!(source.is_memory());

    let mut simulator = Simulator::new(instructions);
    assert_eq!(
        simulator.run(),
        Err(SimulateError::UnsupportedOperand {
            operation: Operation::MOV,
            operand: source,
        })
    );

    let mut simulator = new_simulator(&[0x80, 0x07, 0x22]);
    assert!(matches!(
        simulator.run(),
        Err(SimulateError::UnsupportedOperand {
            operation: Operation::ADD,
            operand: Operand::EffectiveAddress(_),
        })
    ));
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
fn steps_and_jumps_are_logged() {
    #[rustfmt::skip]
    let instructions = decode(&[
        0xB9, 0x02, 0x00,       // mov cx, 2
        0x83, 0xE9, 0x01,       // sub cx, 1
        0x75, 0xFB,             // jne $-3
    ])
    .unwrap();

    let mut simulator = Simulator::new(instructions);
    let (result, log) = with_captured_log(|| simulator.run());

    assert_eq!(result, Ok(()));
    assert_eq!(simulator.state().register(Register::CX), 0);
    assert!(
        log.contains("jne $-3 ; ip: 0x0006 -> 0x0003"),
        "{}",
        log
    );
    assert!(
        log.contains("jump by -5 moves the cursor from 3 to 1"),
        "{}",
        log
    );
}
