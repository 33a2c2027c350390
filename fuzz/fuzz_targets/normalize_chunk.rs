#![no_main]

use linebreak::{Error, Format};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Control byte layout (data[0]):
    // bit 0: preceded_by_cr
    // bit 1: is_last_chunk
    // bit 2: undersize output buffer (exercise OutputBufferTooSmall)
    // bits 3-4: target format
    let control = data[0];
    let preceded_by_cr = (control & 0x01) != 0;
    let is_last_chunk = (control & 0x02) != 0;
    let undersize = (control & 0x04) != 0;
    let format = Format::ALL[usize::from((control >> 3) & 0x03) % Format::ALL.len()];
    let payload = &data[1..];

    let mut buf_len = format.max_output_size_for_chunk(payload.len());
    if undersize && buf_len > 0 {
        buf_len -= 1;
    }
    let mut out = vec![0u8; buf_len];
    match (
        format.normalize_chunk(payload, &mut out, preceded_by_cr, is_last_chunk),
        undersize && !payload.is_empty(),
    ) {
        (Ok(status), false) => {
            assert!(status.output_len() <= out.len());
            assert!(!(is_last_chunk && status.ended_with_cr()));
        }
        (Err(Error::OutputBufferTooSmall { .. }), true) => {
            // all good
        }
        (a, b) => {
            panic!("Unexpected result from normalize_chunk: ({a:?}, {b})");
        }
    }
});
