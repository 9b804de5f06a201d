#![no_main]

use libfuzzer_sys::fuzz_target;
use vm_core::{CoreKind, Decoder, Machine, VmConfig, Word};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let cores = usize::from(data[0] % 8) + 1;
    let kind = CoreKind::from_u8(data[1] % 3).unwrap_or_default();
    let Ok(mut vm) = Machine::new(VmConfig::uniform(4, 64, cores, kind)) else {
        return;
    };
    vm.add_write_hook(0xF0, 4, |_: Word, _: u16| {}).ok();
    vm.add_read_hook(0xE0, 4, |addr: u16| Word::from(addr)).ok();

    let image = &data[2..];
    vm.load_image(image);
    for word in vm.memory().words().iter().take(16) {
        let _ = Decoder::decode(*word).encode();
    }

    vm.run(64);
    assert!(vm.scheduled().is_idle());
    assert_eq!(vm.registers().read(0), 0);
});
