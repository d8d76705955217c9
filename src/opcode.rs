//! Opcode abstractions, functionality and constants.
use crate::ProcessError;

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first four bytes
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last four bytes
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF >> 12;

/// the mask for the last eight bytes
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF >> 8;

/// the mask for the last twelve bytes
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF >> 4;

/// the size of a single byte
const BYTE_SIZE: u16 = 0x8;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// this is an opcode extractor that will return the
    /// instruction family nibble `T` of any opcode
    fn t(&self) -> usize;

    /// this is an opcode extractor for the opcode type `TNNN`
    /// - `NNN` is an address
    fn nnn(&self) -> usize;

    /// this is an opcode extractor for the opcode type `TXNN`
    /// - `X` is a register index
    /// - `NN` is a constant
    fn xnn(&self) -> (usize, u8);

    /// this is an opcode extractor for the opcode type `TXYN`
    /// - `X` is a register index
    /// - `Y` is a register index
    /// - `N` is a 4-bit constant or opcode subtype
    fn xyn(&self) -> (usize, usize, usize);

    /// this is an opcode extractor for the opcode type `TXYT`
    /// - `X` is a register index
    /// - `Y` is a register index
    fn xy(&self) -> (usize, usize);

    /// this is an opcode extractor for the opcode type `TXTT`
    /// - `X` is a register index
    fn x(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    /// # Example
    /// ```rust
    /// # use chip8_core::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.t(), 0x1);
    /// ```
    fn t(&self) -> usize {
        ((self & OPCODE_MASK_F000) >> (3 * 4)) as usize
    }

    /// # Example
    /// ```rust
    /// # use chip8_core::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.nnn(), 0xEDA);
    /// ```
    fn nnn(&self) -> usize {
        (self & OPCODE_MASK_0FFF) as usize
    }

    /// # Example
    /// ```rust
    /// # use chip8_core::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.xnn(), (0xE, 0xDA));
    /// ```
    fn xnn(&self) -> (usize, u8) {
        let x = self.x();
        let nn = (self & OPCODE_MASK_00FF) as u8;
        (x, nn)
    }

    /// # Example
    /// ```rust
    /// # use chip8_core::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.xyn(), (0xE, 0xD, 0xA));
    /// ```
    fn xyn(&self) -> (usize, usize, usize) {
        let (x, y) = self.xy();
        let n = (self & OPCODE_MASK_000F) as usize;
        (x, y, n)
    }

    /// # Example
    /// ```rust
    /// # use chip8_core::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.xy(), (0xE, 0xD));
    /// ```
    fn xy(&self) -> (usize, usize) {
        let x = self.x();
        const MASK: u16 = OPCODE_MASK_00FF ^ OPCODE_MASK_000F;
        const NIBBLE: u16 = BYTE_SIZE / 2;
        let y = ((self & MASK) >> NIBBLE) as usize;
        (x, y)
    }

    /// # Example
    /// ```rust
    /// # use chip8_core::opcode::*;
    /// const BASE_OPCODE: Opcode = 0x1EDA;
    /// assert_eq!(BASE_OPCODE.x(), 0xE);
    /// ```
    fn x(&self) -> usize {
        ((self & OPCODE_MASK_0FFF & !OPCODE_MASK_00FF) >> BYTE_SIZE) as usize
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
/// Represents the program counter movements that a single
/// instruction can request.
pub enum ProgramCounterStep {
    /// Will not change the program counter, so the same instruction is
    /// fetched again on the next step (the key wait uses this)
    None,
    /// Will move the program counter to the following instruction
    Next,
    /// Will move the program counter over the following instruction
    Skip,
    /// Will move the program counter to the given location. The engine
    /// validates the target against the memory bounds when applying it.
    Jump(usize),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    ///
    /// # Example
    /// ```rust
    /// # use chip8_core::opcode::ProgramCounterStep;
    /// assert_eq!(ProgramCounterStep::Next, ProgramCounterStep::cond(false));
    /// assert_eq!(ProgramCounterStep::Skip, ProgramCounterStep::cond(true));
    /// ```
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }
}

/// Applies a [`ProgramCounterStep`](ProgramCounterStep) to the machine.
pub trait ProgramCounter {
    /// will move the program counter by the given step, or report the
    /// instruction that pushed it out of addressable memory
    fn apply(&mut self, step: ProgramCounterStep) -> Result<(), ProcessError>;
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents a command from the interpreter up to the host loop.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// If the presentation surface shall be cleared.
    Clear,
    /// A redraw command for the current display buffer.
    Draw,
}

/// These are the traits that have to be fulfilled for a working opcode
/// table.
///
/// This trait requires the implementation of the [`ProgramCounter`](ProgramCounter)
/// trait, as every executed instruction ends in a program counter movement.
pub trait ChipOpcodes: ProgramCounter {
    /// builds the unknown-opcode error with the current instruction context,
    /// used by [`calc`](ChipOpcodes::calc) and by the multiuse opcode bases
    /// for unassigned sub-codes
    fn invalid_opcode(&self, opcode: Opcode) -> ProcessError;

    /// will advance the program by a single instruction
    fn calc(&mut self, opcode: Opcode) -> Result<Operation, ProcessError> {
        let mut operation = Operation::None;
        let step_op = |(step, op)| {
            operation = op;
            step
        };

        let step = match opcode.t() {
            0x0 => self.zero(opcode).map(step_op),
            0x1 => self.one(opcode),
            0x2 => self.two(opcode),
            0x3 => self.three(opcode),
            0x4 => self.four(opcode),
            0x5 => self.five(opcode),
            0x6 => self.six(opcode),
            0x7 => self.seven(opcode),
            0x8 => self.eight(opcode),
            0x9 => self.nine(opcode),
            0xA => self.a(opcode),
            0xB => self.b(opcode),
            0xC => self.c(opcode),
            0xD => self.d(opcode).map(step_op),
            0xE => self.e(opcode),
            0xF => self.f(opcode),
            _ => Err(self.invalid_opcode(opcode)),
        }?;

        self.apply(step)?;
        Ok(operation)
    }

    /// A multiuse opcode base for type `0NNN`
    ///
    /// - `00E0` - Display  - `disp_clear()`        - Clears the screen.
    /// - `00EE` - Flow     - `return;`             - Returns from a subroutine.
    fn zero(&mut self, opcode: Opcode) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// - `1NNN` - Flow     - `goto NNN;`           - Jumps to address `NNN`.
    fn one(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// - `2NNN` - Flow     - `*(0xNNN)()`          - Calls subroutine at `NNN`.
    fn two(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// - `3XNN` - Cond     - `if(Vx==NN)`          - Skips the next instruction if `VX` equals `NN`.
    fn three(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// - `4XNN` - Cond     - `if(Vx!=NN)`          - Skips the next instruction if `VX` doesn't equal `NN`.
    fn four(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// - `5XY0` - Cond     - `if(Vx==Vy)`          - Skips the next instruction if `VX` equals `VY`.
    fn five(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// - `6XNN` - Const    - `Vx = NN`             - Sets `VX` to `NN`.
    fn six(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// - `7XNN` - Const    - `Vx += NN`            - Adds `NN` to `VX`, wrapping. (Carry flag is not changed)
    fn seven(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// A multiuse opcode base for type `8XYT` (T is a sub opcode)
    ///
    /// - `8XY0` - Assign   - `Vx=Vy`               - Sets `VX` to the value of `VY`.
    /// - `8XY1` - BitOp    - `Vx=Vx|Vy`            - Bitwise OR.
    /// - `8XY2` - BitOp    - `Vx=Vx&Vy`            - Bitwise AND.
    /// - `8XY3` - BitOp    - `Vx=Vx^Vy`            - Bitwise XOR.
    /// - `8XY4` - Math     - `Vx += Vy`            - `VF` is set to `1` when there's a carry, else `0`.
    /// - `8XY5` - Math     - `Vx -= Vy`            - `VF` is set to `1` when there is no borrow, else `0`.
    /// - `8XY6` - BitOp    - `Vx>>=1`              - Stores the pre-shift least significant bit in `VF`.
    /// - `8XY7` - Math     - `Vx=Vy-Vx`            - `VF` is set to `1` when there is no borrow, else `0`.
    /// - `8XYE` - BitOp    - `Vx<<=1`              - Stores the pre-shift most significant bit in `VF`.
    fn eight(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// - `9XY0` - Cond     - `if(Vx!=Vy)`          - Skips the next instruction if `VX` doesn't equal `VY`.
    fn nine(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// - `ANNN` - MEM      - `I = NNN`             - Sets `I` to the address `NNN`.
    fn a(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// - `BNNN` - Flow     - `PC=V0+NNN`           - Jumps to the address `NNN` plus `V0`.
    fn b(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// - `CXNN` - Rand     - `Vx=rand()&NN`        - Sets `VX` to a random byte ANDed with `NN`.
    fn c(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// - `DXYN` - Disp     - `draw(Vx,Vy,N)`       - XOR-blits the `N`-row sprite at `I` to `(VX, VY)`
    ///   with wraparound on both axes. `VF` is set to `1` if any pixel flipped from set to unset.
    fn d(&mut self, opcode: Opcode) -> Result<(ProgramCounterStep, Operation), ProcessError>;

    /// A multiuse opcode base for type `EXTT` (T is a sub opcode)
    ///
    /// - `EX9E` - KeyOp    - `if(key()==Vx)`       - Skips the next instruction if the key stored in `VX` is pressed.
    /// - `EXA1` - KeyOp    - `if(key()!=Vx)`       - Skips the next instruction if the key stored in `VX` isn't pressed.
    fn e(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;

    /// A multiuse opcode base for type `FXTT` (T is a sub opcode)
    ///
    /// - `FX07` - Timer    - `Vx = get_delay()`    - Sets `VX` to the value of the delay timer.
    /// - `FX0A` - KeyOp    - `Vx = get_key()`      - Blocks until a key is down, then stores its index. The
    ///   program counter is simply not advanced while no key is down, so the instruction is re-issued.
    /// - `FX15` - Timer    - `delay_timer(Vx)`     - Sets the delay timer to `VX`.
    /// - `FX18` - Sound    - `sound_timer(Vx)`     - Sets the sound timer to `VX`.
    /// - `FX1E` - MEM      - `I += Vx`             - Adds `VX` to `I`. `VF` is not affected.
    /// - `FX29` - MEM      - `I = sprite_addr[Vx]` - Sets `I` to the font glyph for the hex digit in `VX`.
    /// - `FX33` - BCD      - Stores the three decimal digits of `VX` at `I`, `I+1`, `I+2`.
    /// - `FX55` - MEM      - `reg_dump(Vx,&I)`     - Stores `V0` to `VX` in memory starting at `I`.
    /// - `FX65` - MEM      - `reg_load(Vx,&I)`     - Fills `V0` to `VX` from memory starting at `I`.
    fn f(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extractors() {
        let opcode: Opcode = 0x8ABC;
        assert_eq!(opcode.t(), 0x8);
        assert_eq!(opcode.x(), 0xA);
        assert_eq!(opcode.xy(), (0xA, 0xB));
        assert_eq!(opcode.xyn(), (0xA, 0xB, 0xC));
        assert_eq!(opcode.xnn(), (0xA, 0xBC));
        assert_eq!(opcode.nnn(), 0xABC);
    }

    #[test]
    fn test_cond_step() {
        assert_eq!(ProgramCounterStep::cond(true), ProgramCounterStep::Skip);
        assert_eq!(ProgramCounterStep::cond(false), ProgramCounterStep::Next);
    }
}
