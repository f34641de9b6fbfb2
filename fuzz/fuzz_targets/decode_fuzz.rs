#![no_main]
use libfuzzer_sys::fuzz_target;
use oxiqoi::qoi::decoder;

fuzz_target!(|data: &[u8]| {
    // Fuzz the decoder with arbitrary bytes.
    // The decoder must never panic — only return errors.
    let _ = decoder::decode(data);
});
