//! Prints "HI" through a write hook acting as a character output port,
//! followed by the fetch trace.

use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;
use tracing as _;

use std::cell::RefCell;
use std::rc::Rc;

use vm_core::{
    encode_words, CoreKind, DecodedInstruction, Decoder, Machine, Opcode, VmConfig, Word,
};

const PORT: u16 = 0x9F80;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let program: Vec<Word> = [
        DecodedInstruction::imm(Opcode::Add, 1, 0, u16::from(b'H')),
        DecodedInstruction::imm(Opcode::Store, 1, 0, PORT),
        DecodedInstruction::imm(Opcode::Add, 1, 0, u16::from(b'I')),
        DecodedInstruction::imm(Opcode::Store, 1, 0, PORT),
        DecodedInstruction::imm(Opcode::Halt, 0, 0, 0),
    ]
    .into_iter()
    .map(DecodedInstruction::encode)
    .collect();

    let config = VmConfig {
        tracing_enabled: true,
        trace_capacity: 64,
        ..VmConfig::uniform(64, 128, 2, CoreKind::Basic)
    };
    let mut vm = Machine::new(config)?;
    vm.load_image(&encode_words(&program));

    let output = Rc::new(RefCell::new(String::new()));
    let sink = Rc::clone(&output);
    vm.add_write_hook(PORT, 0, move |value: Word, _offset: u16| {
        if let Some(ch) = char::from_u32(value & 0xFF) {
            sink.borrow_mut().push(ch);
        }
    })?;

    let outcome = vm.run(1_000);
    println!("{}", output.borrow());
    println!("halted after {} cycles", outcome.cycles);

    if let Some(trace) = vm.trace() {
        for entry in trace.entries() {
            let instr = Decoder::decode(entry.instruction);
            println!(
                "{:04x}  {:08x}  {:<4} r{} {:#x} {:#x}",
                entry.address,
                entry.instruction,
                instr.opcode.mnemonic_with_mode(instr.mode),
                entry.destination,
                entry.primary,
                entry.secondary,
            );
        }
    }
    Ok(())
}
