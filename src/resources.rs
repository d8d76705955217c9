//! The rom abstraction handed to the chipset by the program loader.
//!
//! The core never touches the filesystem, whatever loads the rom bytes
//! (a file, an archive, a network fetch) lives on the host side.

/// Represents a single rom image with its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rom {
    /// The rom name
    name: String,
    /// The raw program bytes, loaded verbatim at the program start
    /// offset. There is no header.
    data: Box<[u8]>,
}

impl Rom {
    /// Will generate a new rom based of the given data
    pub fn new<D: Into<Box<[u8]>>>(name: &str, data: D) -> Self {
        Rom {
            name: name.to_string(),
            data: data.into(),
        }
    }

    /// Will return a slice of the program bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::Rom;

    #[test]
    fn test_rom_keeps_bytes_verbatim() {
        let bytes = [0x60, 0x05, 0xA0, 0x00, 0xD0, 0x05, 0x12, 0x04];
        let rom = Rom::new("draw-loop", &bytes[..]);
        assert_eq!(rom.name(), "draw-loop");
        assert_eq!(rom.data(), &bytes);
    }
}
