//! Minimal FLAC files built from raw bytes
//!
//! The stream is just the `fLaC` marker and a STREAMINFO block (44.1 kHz,
//! stereo, 16-bit, no frames), optionally followed by a PADDING block. That
//! is enough for tag I/O; it does not decode to audio.

use std::path::{Path, PathBuf};

const STREAMINFO: u8 = 0;
const PADDING: u8 = 1;
const LAST_BLOCK: u8 = 0x80;

fn block_header(block_type: u8, last: bool, len: usize) -> [u8; 4] {
    let flag = if last { LAST_BLOCK } else { 0 };
    [
        flag | block_type,
        (len >> 16) as u8,
        (len >> 8) as u8,
        len as u8,
    ]
}

fn streaminfo() -> Vec<u8> {
    let mut body = Vec::with_capacity(34);
    body.extend_from_slice(&4096u16.to_be_bytes()); // min block size
    body.extend_from_slice(&4096u16.to_be_bytes()); // max block size
    body.extend_from_slice(&[0, 0, 0]); // min frame size (unknown)
    body.extend_from_slice(&[0, 0, 0]); // max frame size (unknown)
    // 20-bit sample rate 44100, 3-bit channels-1 = 1, 5-bit bps-1 = 15,
    // 36-bit total samples = 0
    body.extend_from_slice(&[0x0A, 0xC4, 0x42, 0xF0, 0, 0, 0, 0]);
    body.extend_from_slice(&[0u8; 16]); // MD5
    body
}

/// Write a frame-less FLAC; `padding` bytes of PADDING follow STREAMINFO when non-zero
pub fn write_minimal_flac(path: &Path, padding: usize) -> anyhow::Result<PathBuf> {
    let info = streaminfo();

    let mut bytes = b"fLaC".to_vec();
    bytes.extend_from_slice(&block_header(STREAMINFO, padding == 0, info.len()));
    bytes.extend_from_slice(&info);
    if padding > 0 {
        bytes.extend_from_slice(&block_header(PADDING, true, padding));
        bytes.extend(std::iter::repeat(0u8).take(padding));
    }

    std::fs::write(path, bytes)?;
    Ok(path.to_path_buf())
}
