//! PNG export of a render target.
//!
//! Pixels go out as an uncompressed PNG: the zlib stream uses deflate
//! "stored" blocks only, so no compressor is needed.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::renderer::RenderTarget;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to write snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Largest payload of one stored deflate block.
const STORED_BLOCK_MAX: usize = 65_535;

const fn crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 { 0xEDB8_8320 ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

static CRC_TABLE: [u32; 256] = crc_table();

fn crc32(bytes: &[u8]) -> u32 {
    !bytes
        .iter()
        .fold(0xFFFF_FFFFu32, |crc, &b| CRC_TABLE[((crc ^ b as u32) & 0xFF) as usize] ^ (crc >> 8))
}

fn adler32(bytes: &[u8]) -> u32 {
    const MOD: u32 = 65_521;
    // Largest run that cannot overflow the u32 sums.
    const NMAX: usize = 5_552;
    let (mut a, mut b) = (1u32, 0u32);
    for run in bytes.chunks(NMAX) {
        for &byte in run {
            a += byte as u32;
            b += a;
        }
        a %= MOD;
        b %= MOD;
    }
    (b << 16) | a
}

/// Append `[len][type][data][crc]`.
fn push_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    let crc_from = out.len();
    out.extend_from_slice(kind);
    out.extend_from_slice(data);
    let crc = crc32(&out[crc_from..]);
    out.extend_from_slice(&crc.to_be_bytes());
}

/// Encode a render target as an 8-bit RGBA PNG.
pub fn encode_png(target: &RenderTarget) -> Vec<u8> {
    let (width, height) = (target.width(), target.height());
    let stride = width * 4;

    // Scanlines, each prefixed with filter type 0.
    let mut scanlines = Vec::with_capacity((stride + 1) * height);
    for row in target.pixels().chunks_exact(stride.max(1)).take(height) {
        scanlines.push(0);
        scanlines.extend_from_slice(row);
    }

    let mut zlib = Vec::with_capacity(scanlines.len() + scanlines.len() / STORED_BLOCK_MAX * 5 + 11);
    zlib.extend_from_slice(&[0x78, 0x01]);
    let mut blocks = scanlines.chunks(STORED_BLOCK_MAX).peekable();
    if blocks.peek().is_none() {
        zlib.extend_from_slice(&[0x01, 0x00, 0x00, 0xFF, 0xFF]);
    }
    while let Some(block) = blocks.next() {
        let last = blocks.peek().is_none();
        let len = block.len() as u16;
        zlib.push(u8::from(last));
        zlib.extend_from_slice(&len.to_le_bytes());
        zlib.extend_from_slice(&(!len).to_le_bytes());
        zlib.extend_from_slice(block);
    }
    zlib.extend_from_slice(&adler32(&scanlines).to_be_bytes());

    let mut ihdr = [0u8; 13];
    ihdr[0..4].copy_from_slice(&(width as u32).to_be_bytes());
    ihdr[4..8].copy_from_slice(&(height as u32).to_be_bytes());
    ihdr[8] = 8; // bit depth
    ihdr[9] = 6; // RGBA

    let mut png = Vec::with_capacity(PNG_SIGNATURE.len() + 25 + zlib.len() + 12 + 12);
    png.extend_from_slice(&PNG_SIGNATURE);
    push_chunk(&mut png, b"IHDR", &ihdr);
    push_chunk(&mut png, b"IDAT", &zlib);
    push_chunk(&mut png, b"IEND", &[]);
    png
}

/// Write the target to `path` as PNG.
pub fn save_png(target: &RenderTarget, path: &Path) -> Result<(), SnapshotError> {
    fs::write(path, encode_png(target)).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::render;
    use crate::state::Grid;

    fn read_u32(bytes: &[u8], at: usize) -> u32 {
        u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    #[test]
    fn test_crc32_known_value() {
        assert_eq!(crc32(b"IEND"), 0xAE42_6082);
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_adler32_known_value() {
        assert_eq!(adler32(b"Wikipedia"), 0x11E6_0398);
        assert_eq!(adler32(&[]), 1);
    }

    #[test]
    fn test_png_header() {
        let target = RenderTarget::new(7, 3);
        let png = encode_png(&target);
        assert_eq!(&png[..8], &PNG_SIGNATURE);
        assert_eq!(&png[12..16], b"IHDR");
        assert_eq!(read_u32(&png, 16), 7);
        assert_eq!(read_u32(&png, 20), 3);
        assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
    }

    #[test]
    fn test_png_carries_pixels_uncompressed() {
        let mut target = RenderTarget::new(4, 4);
        render(&Grid::filled(2, 2, 100.0), 2, &mut target).unwrap();
        let png = encode_png(&target);
        // IDAT payload: zlib header (2) + block header (5) + 4 scanlines of 1 + 16 bytes.
        let idat_at = 8 + 25;
        assert_eq!(&png[idat_at + 4..idat_at + 8], b"IDAT");
        assert_eq!(read_u32(&png, idat_at) as usize, 2 + 5 + 4 * 17 + 4);
        let first_pixel = idat_at + 8 + 2 + 5 + 1;
        assert_eq!(&png[first_pixel..first_pixel + 4], &[100, 20, 15, 255]);
    }

    #[test]
    fn test_png_splits_large_payload() {
        // 200 x 100 RGBA = 80100 scanline bytes -> two stored blocks
        let target = RenderTarget::new(200, 100);
        let png = encode_png(&target);
        let idat_len = read_u32(&png, 8 + 25) as usize;
        assert_eq!(idat_len, 2 + 2 * 5 + 100 * 801 + 4);
    }

    #[test]
    fn test_save_png_roundtrip_bytes() {
        let target = RenderTarget::new(3, 2);
        let path = std::env::temp_dir().join(format!("thermarium-snap-{}.png", std::process::id()));
        save_png(&target, &path).unwrap();
        let written = std::fs::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(written, encode_png(&target));
    }

    #[test]
    fn test_save_png_bad_path() {
        let target = RenderTarget::new(1, 1);
        let err = save_png(&target, Path::new("/nonexistent-dir/x/y.png")).unwrap_err();
        assert!(err.to_string().contains("y.png"));
    }
}
