//! Recognising HEIF containers, which the image decoder cannot open.

use std::io::Read;

/// Brands of the ISO base media file format that carry still images.
const HEIF_BRANDS: [&[u8; 4]; 8] = [b"heic", b"heix", b"heim", b"heis", b"hevc", b"hevx", b"mif1", b"msf1"];
/// Enough for the `ftyp` box of any real file.
const PROBE_LEN: u64 = 64;

/// Whether `reader` starts with an `ftyp` box naming a HEIF brand, either as
/// the major brand or as a compatible one.
pub(crate) fn is_heif(reader: impl Read) -> std::io::Result<bool> {
    let mut head = Vec::new();
    reader.take(PROBE_LEN).read_to_end(&mut head)?;
    if head.len() < 16 || &head[4..8] != b"ftyp" {
        return Ok(false);
    }
    let size = u32::from_be_bytes([head[0], head[1], head[2], head[3]]) as usize;
    let ftyp = &head[..size.clamp(16, head.len())];
    let major = &ftyp[8..12];
    // Compatible brands follow the major brand and minor version.
    let compatible = ftyp[16..].chunks_exact(4);
    Ok(std::iter::once(major).chain(compatible).any(|brand| HEIF_BRANDS.iter().any(|b| b.as_slice() == brand)))
}
