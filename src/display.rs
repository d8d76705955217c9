//! The monochrome 64x32 display buffer and its XOR blit.

use crate::definitions::display::{HEIGHT, WIDTH};

/// The pixel grid of the machine. The graphics of the Chip 8 are black and
/// white and the screen has a total of `2048` pixels `(64 x 32)`. It is
/// mutated only through the sprite blit and the explicit clear, everything
/// else gets a read-only snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayBuffer {
    /// row major pixel states, `pixels[y][x]`
    pixels: [[bool; WIDTH]; HEIGHT],
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self {
            pixels: [[false; WIDTH]; HEIGHT],
        }
    }
}

impl DisplayBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Will turn off every pixel, only the `00E0` opcode calls this.
    pub fn clear(&mut self) {
        self.pixels = [[false; WIDTH]; HEIGHT];
    }

    /// Will XOR-blit the given sprite rows at `(x, y)` and report whether
    /// any pixel flipped from on to off.
    ///
    /// Every sprite row is 8 pixels wide, the most significant bit is the
    /// leftmost pixel. Both coordinates wrap around the screen edges, on
    /// the starting position as well as on every single pixel, so a sprite
    /// hanging over the right edge continues at column zero.
    ///
    /// Mere overlap is not a collision, only an on pixel turning off is.
    pub fn blit(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        const SPRITE_WIDTH: usize = 8;

        let mut collision = false;
        for (row_offset, row) in sprite.iter().enumerate() {
            let py = (y + row_offset) % HEIGHT;
            for bit in 0..SPRITE_WIDTH {
                let mask = 0x80 >> bit;
                if row & mask == 0 {
                    continue;
                }

                let px = (x + bit) % WIDTH;
                let lit = self.pixels[py][px];
                if lit {
                    collision = true;
                }
                self.pixels[py][px] = !lit;
            }
        }
        collision
    }

    /// Read-only snapshot for the rendering collaborator.
    pub fn pixels(&self) -> &[[bool; WIDTH]; HEIGHT] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// counts the lit pixels of the whole buffer
    fn lit(display: &DisplayBuffer) -> usize {
        display
            .pixels()
            .iter()
            .flatten()
            .filter(|pixel| **pixel)
            .count()
    }

    #[test]
    fn test_blit_sets_pixels_without_collision() {
        let mut display = DisplayBuffer::new();
        // a 2 row full block
        let collision = display.blit(4, 2, &[0xFF, 0xFF]);

        assert!(!collision);
        assert_eq!(lit(&display), 16);
        assert!(display.pixels()[2][4]);
        assert!(display.pixels()[3][11]);
    }

    #[test]
    fn test_blit_twice_erases_and_collides() {
        let mut display = DisplayBuffer::new();
        assert!(!display.blit(0, 0, &[0xF0]));
        assert!(display.blit(0, 0, &[0xF0]));
        assert_eq!(lit(&display), 0);
    }

    #[test]
    fn test_overlap_without_turnoff_is_no_collision() {
        let mut display = DisplayBuffer::new();
        assert!(!display.blit(0, 0, &[0xF0]));
        // disjoint bits on the same row, pure overlap of the sprite area
        assert!(!display.blit(0, 0, &[0x0F]));
        assert_eq!(lit(&display), 8);
    }

    #[test]
    fn test_blit_wraps_around_both_edges() {
        let mut display = DisplayBuffer::new();
        // 2 rows of 8 pixels starting at the bottom right corner
        display.blit(WIDTH - 2, HEIGHT - 1, &[0xFF, 0xFF]);

        // right overhang lands at column zero
        assert!(display.pixels()[HEIGHT - 1][WIDTH - 1]);
        assert!(display.pixels()[HEIGHT - 1][0]);
        assert!(display.pixels()[HEIGHT - 1][5]);
        // bottom overhang lands at row zero
        assert!(display.pixels()[0][WIDTH - 2]);
        assert!(display.pixels()[0][3]);
    }

    #[test]
    fn test_clear_turns_everything_off() {
        let mut display = DisplayBuffer::new();
        display.blit(10, 10, &[0xFF; 15]);
        assert_ne!(lit(&display), 0);

        display.clear();
        assert_eq!(lit(&display), 0);
    }
}
