use crate::{
    definitions::{cpu, display},
    error::ProcessError,
    opcode::{ChipOpcodes, Opcode, OpcodeTrait, Operation, ProgramCounterStep},
};

use super::ChipSet;

impl ChipOpcodes for ChipSet {
    fn invalid_opcode(&self, opcode: Opcode) -> ProcessError {
        ProcessError::UnknownOpcode {
            address: self.program_counter,
            opcode,
        }
    }

    fn zero(&mut self, opcode: Opcode) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        log::debug!("opcode {:#06X}", opcode);
        match opcode {
            0x00E0 => {
                // 00E0
                // clear display
                self.display.clear();
                Ok((ProgramCounterStep::Next, Operation::Clear))
            }
            0x00EE => {
                // 00EE
                // Return from sub routine => pop from stack
                let pc = self.pop_stack().map_err(|err| self.stack_error(err))?;
                log::debug!("returning to {:#06X}", pc);
                Ok((ProgramCounterStep::Jump(pc), Operation::None))
            }
            _ => Err(self.invalid_opcode(opcode)),
        }
    }

    fn one(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        // 1NNN
        // Jumps to address NNN.
        Ok(ProgramCounterStep::Jump(opcode.nnn()))
    }

    fn two(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        // 2NNN
        // Calls subroutine at NNN. The pushed return address is the
        // instruction just after the call site.
        let ret = self.program_counter + crate::definitions::memory::opcodes::SIZE;
        self.push_stack(ret).map_err(|err| self.stack_error(err))?;
        Ok(ProgramCounterStep::Jump(opcode.nnn()))
    }

    fn three(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        // 3XNN
        // Skips the next instruction if VX equals NN.
        let (x, nn) = opcode.xnn();
        Ok(ProgramCounterStep::cond(self.registers[x] == nn))
    }

    fn four(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        // 4XNN
        // Skips the next instruction if VX doesn't equal NN.
        let (x, nn) = opcode.xnn();
        Ok(ProgramCounterStep::cond(self.registers[x] != nn))
    }

    fn five(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        // 5XY0
        // Skips the next instruction if VX equals VY.
        match opcode.xyn() {
            (x, y, 0) => Ok(ProgramCounterStep::cond(
                self.registers[x] == self.registers[y],
            )),
            _ => Err(self.invalid_opcode(opcode)),
        }
    }

    fn six(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        // 6XNN
        // Sets VX to NN.
        let (x, nn) = opcode.xnn();
        self.registers[x] = nn;
        Ok(ProgramCounterStep::Next)
    }

    fn seven(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        // 7XNN
        // Adds NN to VX. (Carry flag is not changed)
        let (x, nn) = opcode.xnn();
        self.registers[x] = self.registers[x].wrapping_add(nn);
        Ok(ProgramCounterStep::Next)
    }

    fn eight(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        let (x, y, n) = opcode.xyn();
        match n {
            0x0 => {
                // 8XY0
                // Sets VX to the value of VY.
                self.registers[x] = self.registers[y];
            }
            0x1 => {
                // 8XY1
                // Sets VX to VX or VY. (Bitwise OR operation)
                self.registers[x] |= self.registers[y];
            }
            0x2 => {
                // 8XY2
                // Sets VX to VX and VY. (Bitwise AND operation)
                self.registers[x] &= self.registers[y];
            }
            0x3 => {
                // 8XY3
                // Sets VX to VX xor VY.
                self.registers[x] ^= self.registers[y];
            }
            0x4 => {
                // 8XY4
                // Adds VY to VX. VF is set to 1 when there's a carry, and
                // to 0 when there isn't.
                let (res, carry) = self.registers[x].overflowing_add(self.registers[y]);
                self.registers[x] = res;
                self.registers[cpu::register::LAST] = carry as u8;
            }
            0x5 => {
                // 8XY5
                // VY is subtracted from VX. VF is set to 1 when there is no
                // borrow, else 0.
                let no_borrow = self.registers[x] > self.registers[y];
                self.registers[x] = self.registers[x].wrapping_sub(self.registers[y]);
                self.registers[cpu::register::LAST] = no_borrow as u8;
            }
            0x6 => {
                // 8XY6
                // Stores the least significant bit of VX in VF and then
                // shifts VX to the right by 1.
                let flag = self.registers[x] & 0x1;
                self.registers[x] >>= 1;
                self.registers[cpu::register::LAST] = flag;
            }
            0x7 => {
                // 8XY7
                // Sets VX to VY minus VX. VF is set to 1 when there is no
                // borrow, else 0.
                let no_borrow = self.registers[y] > self.registers[x];
                self.registers[x] = self.registers[y].wrapping_sub(self.registers[x]);
                self.registers[cpu::register::LAST] = no_borrow as u8;
            }
            0xE => {
                // 8XYE
                // Stores the most significant bit of VX in VF and then
                // shifts VX to the left by 1.
                let flag = self.registers[x] >> 7;
                self.registers[x] <<= 1;
                self.registers[cpu::register::LAST] = flag;
            }
            _ => {
                return Err(self.invalid_opcode(opcode));
            }
        }
        Ok(ProgramCounterStep::Next)
    }

    fn nine(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        // 9XY0
        // Skips the next instruction if VX doesn't equal VY.
        match opcode.xyn() {
            (x, y, 0) => Ok(ProgramCounterStep::cond(
                self.registers[x] != self.registers[y],
            )),
            _ => Err(self.invalid_opcode(opcode)),
        }
    }

    fn a(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        // ANNN
        // Sets I to the address NNN.
        self.index_register = opcode.nnn();
        Ok(ProgramCounterStep::Next)
    }

    fn b(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        // BNNN
        // Jumps to the address NNN plus V0.
        let pointer = self.registers[0] as usize + opcode.nnn();
        Ok(ProgramCounterStep::Jump(pointer))
    }

    fn c(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        // CXNN
        // Sets VX to the result of a bitwise and operation on a random
        // number and NN.
        let (x, nn) = opcode.xnn();
        // using a fill bytes call here, as the trait RngCore does not
        // support random u8.
        let mut rand: [u8; 1] = [0];
        self.rng.fill_bytes(&mut rand);
        self.registers[x] = nn & rand[0];
        Ok(ProgramCounterStep::Next)
    }

    fn d(&mut self, opcode: Opcode) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        // DXYN
        // Draws the N-row sprite stored at I at coordinate (VX, VY). Every
        // set bit XORs the corresponding pixel, both axes wrap around the
        // screen. VF is set to 1 if any pixel flipped from set to unset.
        let (x, y, n) = opcode.xyn();

        let region = self.checked_region(self.index_register, n)?;

        let coord_x = self.registers[x] as usize;
        let coord_y = self.registers[y] as usize;

        // the blit operates on a disjoint borrow of ram
        let sprite = &self.memory[region];
        let collision = self.display.blit(coord_x, coord_y, sprite);
        self.registers[cpu::register::LAST] = collision as u8;

        Ok((ProgramCounterStep::Next, Operation::Draw))
    }

    fn e(&self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        let (x, nn) = opcode.xnn();
        let key = self.registers[x] as usize;
        let step = match nn {
            0x9E => {
                // EX9E
                // Skips the next instruction if the key stored in VX is
                // pressed.
                ProgramCounterStep::cond(self.keyboard.is_pressed(key))
            }
            0xA1 => {
                // EXA1
                // Skips the next instruction if the key stored in VX isn't
                // pressed.
                ProgramCounterStep::cond(!self.keyboard.is_pressed(key))
            }
            _ => {
                return Err(self.invalid_opcode(opcode));
            }
        };
        Ok(step)
    }

    fn f(&mut self, opcode: Opcode) -> Result<ProgramCounterStep, ProcessError> {
        let (x, nn) = opcode.xnn();
        let mut step = ProgramCounterStep::Next;
        match nn {
            0x07 => {
                // FX07
                // Sets VX to the value of the delay timer.
                self.registers[x] = self.timers.delay();
            }
            0x0A => {
                // FX0A
                // A key press is awaited, and then stored in VX. While no
                // key is down the program counter stays put, so this very
                // instruction is fetched and executed again on the next
                // step.
                match self.keyboard.first_pressed() {
                    Some(key) => self.registers[x] = key as u8,
                    None => step = ProgramCounterStep::None,
                }
            }
            0x15 => {
                // FX15
                // Sets the delay timer to VX.
                self.timers.set_delay(self.registers[x]);
            }
            0x18 => {
                // FX18
                // Sets the sound timer to VX.
                self.timers.set_sound(self.registers[x]);
            }
            0x1E => {
                // FX1E
                // Adds VX to I. VF is not affected.
                self.index_register += self.registers[x] as usize;
            }
            0x29 => {
                // FX29
                // Sets I to the location of the glyph for the hex digit in
                // VX. The font lives at the start of ram, 5 bytes a glyph.
                let val = self.registers[x] as usize;
                self.index_register =
                    display::fontset::LOCATION + display::fontset::CHAR_SIZE * val;
            }
            0x33 => {
                // FX33
                // Stores the binary-coded decimal representation of VX,
                // hundreds at I, tens at I+1, ones at I+2.
                let region = self.checked_region(self.index_register, 3)?;
                let i = region.start;
                let r = self.registers[x];

                self.memory[i] = r / 100;
                self.memory[i + 1] = r / 10 % 10;
                self.memory[i + 2] = r % 10;
            }
            0x55 => {
                // FX55
                // Stores V0 to VX (including VX) in memory starting at
                // address I. I itself is left unmodified.
                let region = self.checked_region(self.index_register, x + 1)?;
                self.memory[region].copy_from_slice(&self.registers[..=x]);
            }
            0x65 => {
                // FX65
                // Fills V0 to VX (including VX) with values from memory
                // starting at address I. I itself is left unmodified.
                let region = self.checked_region(self.index_register, x + 1)?;
                self.registers[..=x].copy_from_slice(&self.memory[region]);
            }
            _ => {
                return Err(self.invalid_opcode(opcode));
            }
        }
        Ok(step)
    }
}
