//! Executable header sniffing for the info report's "architecture" line.
//!
//! Recognizes ELF, thin Mach-O (32/64-bit, either byte order) and fat Mach-O
//! headers from the first bytes of a file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

const MAX_HEADER_BYTES: usize = 512;

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

const MH_MAGIC: u32 = 0xfeed_face;
const MH_CIGAM: u32 = 0xcefa_edfe;
const MH_MAGIC_64: u32 = 0xfeed_facf;
const MH_CIGAM_64: u32 = 0xcffa_edfe;
const FAT_MAGIC: u32 = 0xcafe_babe;
const FAT_CIGAM: u32 = 0xbeba_feca;

const CPU_ARCH_ABI64: u32 = 0x0100_0000;
const FAT_HEADER_LEN: usize = 8;
const FAT_ARCH_LEN: usize = 20;

/// Architectures named in the executable header of `path`; empty when the file
/// cannot be read or is not a recognized executable.
pub fn architectures(path: &Path) -> Vec<String> {
    let mut header = Vec::with_capacity(MAX_HEADER_BYTES);
    let read = File::open(path).and_then(|file| {
        file.take(MAX_HEADER_BYTES as u64).read_to_end(&mut header)
    });
    match read {
        Ok(_) => parse_header(&header),
        Err(_) => Vec::new(),
    }
}

pub(crate) fn parse_header(bytes: &[u8]) -> Vec<String> {
    if bytes.len() >= 20 && bytes[..4] == ELF_MAGIC {
        return parse_elf(bytes).into_iter().collect();
    }
    if bytes.len() < 12 {
        return Vec::new();
    }

    // thin Mach-O headers are written in the target's byte order, fat headers big-endian
    match (read_u32_le(bytes, 0), read_u32_be(bytes, 0)) {
        (MH_MAGIC | MH_MAGIC_64, _) => {
            vec![mach_name(read_u32_le(bytes, 4), read_u32_le(bytes, 8))]
        }
        (MH_CIGAM | MH_CIGAM_64, _) => {
            vec![mach_name(read_u32_be(bytes, 4), read_u32_be(bytes, 8))]
        }
        (_, FAT_MAGIC) => parse_fat(bytes, read_u32_be),
        (_, FAT_CIGAM) => parse_fat(bytes, read_u32_le),
        _ => Vec::new(),
    }
}

fn parse_elf(bytes: &[u8]) -> Option<String> {
    let machine = match bytes[5] {
        1 => u16::from_le_bytes([bytes[18], bytes[19]]),
        2 => u16::from_be_bytes([bytes[18], bytes[19]]),
        _ => return None,
    };
    let name = match machine {
        3 => "i386".to_string(),
        8 => "mips".to_string(),
        20 => "ppc".to_string(),
        21 => "ppc64".to_string(),
        40 => "arm".to_string(),
        62 => "x86_64".to_string(),
        183 => "arm64".to_string(),
        243 => "riscv".to_string(),
        other => format!("unknown (machine {other})"),
    };
    Some(name)
}

fn parse_fat(bytes: &[u8], read: fn(&[u8], usize) -> u32) -> Vec<String> {
    let max_fat = bytes.len().saturating_sub(FAT_HEADER_LEN) / FAT_ARCH_LEN;
    let count = (read(bytes, 4) as usize).min(max_fat);
    (0..count)
        .map(|i| {
            let offset = FAT_HEADER_LEN + i * FAT_ARCH_LEN;
            mach_name(read(bytes, offset), read(bytes, offset + 4))
        })
        .collect()
}

fn mach_name(cputype: u32, subtype: u32) -> String {
    let name = match cputype {
        7 => "i386",
        t if t == 7 | CPU_ARCH_ABI64 => "x86_64",
        12 => "arm",
        t if t == 12 | CPU_ARCH_ABI64 => "arm64",
        18 => "ppc",
        t if t == 18 | CPU_ARCH_ABI64 => "ppc64",
        _ => {
            return format!(
                "unknown (cputype {}, subtype {})",
                cputype as i32, subtype as i32
            )
        }
    };
    name.to_string()
}

fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

fn read_u32_be(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}
