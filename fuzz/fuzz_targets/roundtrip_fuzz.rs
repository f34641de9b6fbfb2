#![no_main]
use libfuzzer_sys::fuzz_target;
use oxiqoi::qoi::{Image, decoder, encoder};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the channel count, the rest is pixel data.
    let channels = if data[0] & 1 == 0 { 3u8 } else { 4u8 };
    let payload = &data[1..];

    let width = payload.len() / channels as usize;
    if width == 0 {
        return;
    }
    let pixels = payload[..width * channels as usize].to_vec();

    let image = Image {
        width: width as u32,
        height: 1,
        channels,
        colorspace: 0,
        pixels,
    };

    // Encode and decode must roundtrip exactly.
    let bytes = encoder::encode(&image).unwrap();
    let decoded = decoder::decode(&bytes).unwrap();
    assert_eq!(decoded, image);
});
