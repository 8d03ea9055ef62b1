//! ROM Image Loader.
//!
//! This module loads boot ROM images into guest memory. It performs:
//! 1. **Reading:** Pulls a ROM file from disk into a byte buffer.
//! 2. **Section parsing:** Splits the image into length-prefixed sections; each
//!    length is a big-endian 32-bit word.
//! 3. **Placement:** Copies the boot section to the boot ROM window and the
//!    optional symbols section to the symbols window, faulting pages in as needed.
//!
//! Image layout:
//!
//! ```text
//! +--------+----------------+--------+-------------------+
//! | len BE | boot ROM bytes | len BE | symbol bytes      |
//! +--------+----------------+--------+-------------------+
//! ```
//!
//! An image that ends right after the boot section carries no symbols.

use std::fs;
use std::path::Path;

use crate::common::constants::{MIN_ROM_SIZE, PAGE_MASK};
use crate::common::error::Status;
use crate::config::LayoutConfig;
use crate::core::Cpu;
use crate::soc::registry::Region;

/// Size of a section length prefix in bytes.
const LENGTH_PREFIX: usize = 4;

/// Reads a ROM image from disk.
///
/// # Arguments
///
/// * `path` - Path to the image.
///
/// # Errors
///
/// Returns [`Status::IoError`] if the file cannot be read.
pub fn load_binary(path: impl AsRef<Path>) -> Result<Vec<u8>, Status> {
    let path = path.as_ref();
    fs::read(path).map_err(|error| {
        tracing::warn!(path = %path.display(), %error, "could not read ROM image");
        Status::IoError
    })
}

/// Cursor over the sections of a ROM image.
struct Sections<'a> {
    rest: &'a [u8],
}

impl<'a> Sections<'a> {
    const fn new(image: &'a [u8]) -> Self {
        Self { rest: image }
    }

    /// Splits off the next section.
    ///
    /// # Arguments
    ///
    /// * `window` - Largest section the destination can hold.
    ///
    /// # Returns
    ///
    /// `None` once the image is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Status::IoError`] for a truncated length word, a section
    /// larger than `window`, or a section longer than the data left.
    fn next_section(&mut self, window: u32) -> Result<Option<&'a [u8]>, Status> {
        if self.rest.is_empty() {
            return Ok(None);
        }
        let (prefix, rest) = self
            .rest
            .split_first_chunk::<LENGTH_PREFIX>()
            .ok_or(Status::IoError)?;
        let length = u32::from_be_bytes(*prefix);
        if length > window {
            tracing::warn!(length, window, "section overflows its window");
            return Err(Status::IoError);
        }
        let length = length as usize;
        if length > rest.len() {
            tracing::warn!(length, remaining = rest.len(), "section truncated");
            return Err(Status::IoError);
        }
        let (section, rest) = rest.split_at(length);
        self.rest = rest;
        Ok(Some(section))
    }
}

/// Copies one section into guest memory at `start`.
///
/// Words are assembled little-endian; a trailing partial word is written
/// byte by byte.
///
/// # Errors
///
/// Returns [`Status::InvalidPage`] if `start` is not page aligned or a
/// destination page cannot be faulted in.
fn place_section(cpu: &mut Cpu, start: u32, section: &[u8]) -> Result<(), Status> {
    if start & PAGE_MASK != 0 {
        tracing::warn!(start = format_args!("{start:#010x}"), "section starts off a page boundary");
        return Err(Status::InvalidPage);
    }
    let mut addr = start;
    let mut words = section.chunks_exact(4);
    for chunk in words.by_ref() {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        cpu.write_word(addr, word).map_err(|_| Status::InvalidPage)?;
        addr += 4;
    }
    cpu.write_bytes(addr, words.remainder())
        .map_err(|_| Status::InvalidPage)
}

/// Loads a ROM image into a machine.
///
/// # Arguments
///
/// * `cpu` - The machine to load into.
/// * `layout` - Where the boot and symbols sections go.
/// * `image` - The raw image.
///
/// # Returns
///
/// The region the boot section occupies.
///
/// # Errors
///
/// * [`Status::IoError`] for an image shorter than [`MIN_ROM_SIZE`] or a
///   malformed section.
/// * [`Status::InvalidPage`] if a section cannot be placed.
pub fn load_rom_image(
    cpu: &mut Cpu,
    layout: &LayoutConfig,
    image: &[u8],
) -> Result<Region, Status> {
    if image.len() < MIN_ROM_SIZE {
        tracing::warn!(size = image.len(), "ROM image too small");
        return Err(Status::IoError);
    }
    let mut sections = Sections::new(image);

    let boot = sections
        .next_section(layout.tape_addr - layout.boot_rom_addr)?
        .unwrap_or_default();
    place_section(cpu, layout.boot_rom_addr, boot)?;
    let boot_rom = Region {
        start: layout.boot_rom_addr,
        end: layout.boot_rom_addr + boot.len() as u32,
    };

    let symbols = sections.next_section(layout.max_symbols_size)?;
    if let Some(symbols) = symbols {
        place_section(cpu, layout.symbols_addr, symbols)?;
    }

    tracing::info!(
        boot_rom = boot.len(),
        symbols = symbols.map_or(0, <[u8]>::len),
        "ROM loaded"
    );
    Ok(boot_rom)
}
