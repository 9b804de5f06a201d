//! End-to-end machine behavior: cycle ordering, deferred memory, hooks and halt.

use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

use std::cell::RefCell;
use std::rc::Rc;

use vm_core::{
    encode_words, Condition, CoreKind, DecodedInstruction, HookError, HookKind, Machine, Opcode,
    RunState, VmConfig, Word, HOOK_CAPACITY,
};

fn load(vm: &mut Machine, program: &[DecodedInstruction]) {
    let words: Vec<Word> = program.iter().copied().map(DecodedInstruction::encode).collect();
    vm.load_image(&encode_words(&words));
}

fn machine(cores: usize, program: &[DecodedInstruction]) -> Machine {
    let mut vm = Machine::new(VmConfig::uniform(1, 128, cores, CoreKind::Multiply)).unwrap();
    load(&mut vm, program);
    vm
}

#[test]
fn halting_core_zero_blocks_core_one_forever() {
    let program = [
        DecodedInstruction::imm(Opcode::Halt, 0, 0, 0),
        DecodedInstruction::imm(Opcode::Add, 9, 0, 1),
    ];
    let mut vm = machine(2, &program);

    let outcome = vm.run(5);
    assert_eq!(outcome.cycles, 1);
    assert_eq!(outcome.run_state, RunState::Halted);
    assert_eq!(vm.registers().read(9), 0);

    assert_eq!(vm.run_cycle().turns, 0);
    assert_eq!(vm.registers().read(9), 0);
}

#[test]
fn load_is_visible_to_the_next_core() {
    let mut vm = machine(
        2,
        &[
            DecodedInstruction::imm(Opcode::Load, 5, 0, 64),
            DecodedInstruction::imm(Opcode::Add, 6, 5, 0),
        ],
    );
    vm.memory_mut().write(64, 0x1234);
    vm.registers_mut().write(5, 0x0777);

    vm.run_cycle();
    assert_eq!(vm.registers().read(5), 0x1234);
    assert_eq!(vm.registers().read(6), 0x1234);
    assert!(vm.scheduled().is_idle());
}

#[test]
fn load_by_last_core_lands_at_end_of_cycle() {
    let mut vm = machine(
        2,
        &[
            DecodedInstruction::imm(Opcode::Add, 6, 5, 0),
            DecodedInstruction::imm(Opcode::Load, 5, 0, 64),
        ],
    );
    vm.memory_mut().write(64, 0x4321);
    vm.registers_mut().write(5, 0x0777);

    vm.run_cycle();
    // Core 0 ran before the load was issued.
    assert_eq!(vm.registers().read(6), 0x0777);
    assert_eq!(vm.registers().read(5), 0x4321);
    assert!(vm.scheduled().is_idle());
}

#[test]
fn store_then_load_round_trips_through_memory() {
    let mut vm = machine(
        1,
        &[
            DecodedInstruction::imm(Opcode::Add, 1, 0, 0xBEE),
            DecodedInstruction::imm(Opcode::Store, 1, 0, 90),
            DecodedInstruction::imm(Opcode::Load, 2, 0, 90),
            DecodedInstruction::imm(Opcode::Halt, 0, 0, 0),
        ],
    );
    vm.run(10);
    assert_eq!(vm.memory().peek(90), 0xBEE);
    assert_eq!(vm.registers().read(2), 0xBEE);
}

#[test]
fn store_to_hooked_address_reaches_device_only() {
    let output = Rc::new(RefCell::new(Vec::new()));
    let mut vm = machine(
        1,
        &[
            DecodedInstruction::imm(Opcode::Add, 1, 0, 0x41),
            DecodedInstruction::imm(Opcode::Store, 1, 0, 100),
            DecodedInstruction::imm(Opcode::Halt, 0, 0, 0),
        ],
    );
    vm.memory_mut().write(100, 7);
    let sink = Rc::clone(&output);
    vm.add_write_hook(96, 8, move |value: Word, offset: u16| {
        sink.borrow_mut().push((value, offset));
    })
    .unwrap();

    vm.run(10);
    assert_eq!(*output.borrow(), vec![(0x41, 4)]);
    assert_eq!(vm.memory().peek(100), 7);
}

#[test]
fn load_from_hooked_address_reads_device() {
    let mut vm = machine(
        1,
        &[
            DecodedInstruction::imm(Opcode::Load, 3, 0, 0x50),
            DecodedInstruction::imm(Opcode::Halt, 0, 0, 0),
        ],
    );
    vm.add_read_hook(0x50, 0, |addr: u16| -> Word { Word::from(addr) + 1 })
        .unwrap();
    vm.run(10);
    assert_eq!(vm.registers().read(3), 0x51);
}

#[test]
fn hook_tables_are_bounded() {
    let mut vm = machine(1, &[]);
    for base in 0..HOOK_CAPACITY {
        let base = u16::try_from(base).unwrap();
        vm.add_read_hook(base, 0, |_: u16| -> Word { 0 }).unwrap();
    }
    assert_eq!(
        vm.add_read_hook(0, 0, |_: u16| -> Word { 0 }),
        Err(HookError::CapacityExceeded {
            kind: HookKind::Read,
            capacity: HOOK_CAPACITY
        })
    );
}

#[test]
fn counting_loop_terminates_through_flags() {
    // r1 counts down from 3; r2 counts iterations.
    let program = [
        DecodedInstruction::imm(Opcode::Add, 1, 0, 3),
        DecodedInstruction::imm(Opcode::Add, 2, 2, 1),
        DecodedInstruction::reg(Opcode::Sub, 1, 3, 1).with_mode(true),
        DecodedInstruction::imm(Opcode::Add, 3, 0, 1),
        DecodedInstruction::jump(Condition::NotZero, false, 0, 1),
        DecodedInstruction::imm(Opcode::Halt, 0, 0, 0),
    ];
    let mut vm = machine(1, &program);
    // Seed r3 with 1 so the first subtraction decrements.
    vm.registers_mut().write(3, 1);

    let outcome = vm.run(100);
    assert_eq!(outcome.run_state, RunState::Halted);
    assert_eq!(vm.registers().read(1), 0);
    assert_eq!(vm.registers().read(2), 3);
}

#[test]
fn multiply_gating_follows_roster_and_switch() {
    let program = [
        DecodedInstruction::imm(Opcode::Add, 1, 0, 6),
        DecodedInstruction::imm(Opcode::Mul, 2, 1, 7),
        DecodedInstruction::imm(Opcode::Mul, 3, 1, 7),
        DecodedInstruction::imm(Opcode::Mul, 4, 1, 7),
    ];
    let config = VmConfig {
        cores: vec![
            CoreKind::Multiply,
            CoreKind::Multiply,
            CoreKind::Standard,
            CoreKind::Basic,
        ],
        allow_standard_mul: false,
        ..VmConfig::uniform(1, 128, 0, CoreKind::Basic)
    };
    let mut vm = Machine::new(config).unwrap();
    load(&mut vm, &program);

    vm.run_cycle();
    assert_eq!(vm.registers().read(2), 42);
    assert_eq!(vm.registers().read(3), 0);
    assert_eq!(vm.registers().read(4), 0);
    assert_eq!(vm.ip(), 4);
}

#[test]
fn image_is_zero_padded_and_truncated() {
    let mut vm = Machine::new(VmConfig::uniform(1, 4, 1, CoreKind::Basic)).unwrap();
    let loaded = vm.load_image(&encode_words(&[1, 2, 3, 4, 5, 6]));
    assert_eq!(loaded, 4);
    assert_eq!(vm.memory().words(), &[1, 2, 3, 4]);

    let loaded = vm.load_image(&[0x78, 0x56]);
    assert_eq!(loaded, 1);
    assert_eq!(vm.memory().words(), &[0x5678, 0, 0, 0]);
}
