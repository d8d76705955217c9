use {
    crate::{
        definitions::{cpu, display, memory},
        devices::Keyboard,
        display::DisplayBuffer,
        error::{LoadError, ProcessError, StackError},
        opcode::{ChipOpcodes, Opcode, ProgramCounter, ProgramCounterStep},
        resources::Rom,
        timer::Timers,
    },
    rand::RngCore,
};

/// The outcome of a single step, everything the host loop has to act on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepOutput {
    /// The display buffer changed and shall be presented.
    pub render: bool,
    /// The screen was cleared, the presentation surface shall follow.
    pub clear: bool,
    /// The sound timer is on its last audible tick, a tone shall play.
    pub beep: bool,
}

/// The ChipSet struct represents the current state of the system, it
/// contains all the structures needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// name of the loaded rom
    pub(super) name: String,
    /// the currently executing instruction, all two bytes long and stored
    /// big-endian
    pub(super) opcode: Opcode,
    /// - `0x000-0x04F` - the built in `4x5` pixel font set (`0-F`)
    /// - `0x200-0xFFF` - Program ROM and work RAM
    pub(super) memory: [u8; memory::SIZE],
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles
    /// as a flag for some instructions; in an addition operation it is the
    /// carry flag, in subtraction the "no borrow" flag, in the draw
    /// instruction it is set upon pixel collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special register entry
    /// called index `I`
    pub(super) index_register: usize,
    /// The program counter has the address of the next instruction to be
    /// fetched from memory.
    pub(super) program_counter: usize,
    /// The stack is only used to store return addresses when subroutines
    /// are called, `16` levels of nesting at most. The pointer counts the
    /// live entries, pushing past the end and popping an empty stack are
    /// fatal conditions.
    pub(super) stack: [usize; cpu::stack::SIZE],
    pub(super) stack_pointer: usize,
    /// The delay and sound countdown pair, ticked once per step.
    pub(super) timers: Timers,
    /// The monochrome pixel grid, mutated by the draw and clear opcodes
    /// only.
    pub(super) display: DisplayBuffer,
    /// The keypad snapshot, written by the input collaborator between
    /// steps and read by the key opcodes.
    pub(super) keyboard: Keyboard,
    /// This stores the random number generator, used by the chipset.
    /// It is stored into the chipset, so as to enable simple swapping
    /// for a deterministic one under test.
    pub(super) rng: Box<dyn RngCore + Send>,
    /// When set every step logs the full state dump at trace level.
    pub(super) trace: bool,
}

impl ChipSet {
    /// will create a new chipset object with the given rom loaded
    pub fn new(rom: &Rom) -> Result<Self, LoadError> {
        Self::with_trace(rom, false)
    }

    /// will create a new chipset object that logs a state dump after
    /// every step
    pub fn with_trace(rom: &Rom, trace: bool) -> Result<Self, LoadError> {
        let mut chip = Self {
            name: String::new(),
            opcode: 0,
            memory: [0; memory::SIZE],
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER,
            stack: [0; cpu::stack::SIZE],
            stack_pointer: 0,
            timers: Timers::new(),
            display: DisplayBuffer::new(),
            keyboard: Keyboard::new(),
            rng: Box::new(rand::rngs::OsRng),
            trace,
        };
        chip.load(rom)?;
        Ok(chip)
    }

    /// Will reset the machine to its post-load state and copy the program
    /// image into ram at the program start offset.
    ///
    /// Fails without touching any state if the image does not fit into the
    /// program region.
    pub fn load(&mut self, rom: &Rom) -> Result<(), LoadError> {
        let data = rom.data();
        if data.len() > cpu::PROGRAM_SIZE {
            return Err(LoadError::RomTooLarge {
                len: data.len(),
                capacity: cpu::PROGRAM_SIZE,
            });
        }

        self.name = rom.name().to_string();
        self.opcode = 0;
        self.memory = [0; memory::SIZE];
        self.registers = [0; cpu::register::SIZE];
        self.index_register = 0;
        self.program_counter = cpu::PROGRAM_COUNTER;
        self.stack = [0; cpu::stack::SIZE];
        self.stack_pointer = 0;
        self.timers.reset();
        self.display.clear();
        self.keyboard = Keyboard::new();

        // the font glyphs live at the very beginning of ram
        self.memory[display::fontset::LOCATION
            ..(display::fontset::LOCATION + display::fontset::FONTSET.len())]
            .copy_from_slice(&display::fontset::FONTSET);

        self.memory[cpu::PROGRAM_COUNTER..(cpu::PROGRAM_COUNTER + data.len())]
            .copy_from_slice(data);

        Ok(())
    }

    /// will advance the machine by exactly one instruction
    pub fn step(&mut self) -> Result<StepOutput, ProcessError> {
        use crate::opcode::Operation;

        // both timers run at the instruction cadence, ticked before decode
        self.timers.tick();
        let beep = self.timers.beep();

        self.fetch()?;
        let operation = self.calc(self.opcode)?;

        if self.trace {
            log::trace!("{}", self);
        }

        Ok(StepOutput {
            render: operation == Operation::Draw,
            clear: operation == Operation::Clear,
            beep,
        })
    }

    /// will read the next opcode from memory into the opcode register
    pub(super) fn fetch(&mut self) -> Result<(), ProcessError> {
        let pointer = self.program_counter;
        if pointer + 1 >= memory::SIZE {
            return Err(ProcessError::MemoryOutOfBounds {
                address: pointer,
                opcode: self.opcode,
                pointer,
            });
        }
        self.opcode = Opcode::from_be_bytes([self.memory[pointer], self.memory[pointer + 1]]);
        Ok(())
    }

    /// Will write the keypad snapshot into the internal keyboard
    /// representation.
    pub fn set_keyboard(&mut self, keys: &[bool; crate::definitions::keyboard::SIZE]) {
        self.keyboard.set_keys(keys);
    }

    /// Will set the value of the given key
    pub fn set_key(&mut self, key: usize, to: bool) {
        self.keyboard.set_key(key, to)
    }

    /// Will get the current state of the keypad
    pub fn keyboard(&self) -> &[bool; crate::definitions::keyboard::SIZE] {
        self.keyboard.keys()
    }

    /// will return the sound timer
    pub fn sound_timer(&self) -> u8 {
        self.timers.sound()
    }

    /// will return the delay timer
    pub fn delay_timer(&self) -> u8 {
        self.timers.delay()
    }

    /// Will return an immutable snapshot of the current display state
    pub fn display(&self) -> &[[bool; display::WIDTH]; display::HEIGHT] {
        self.display.pixels()
    }

    /// Read-only introspection of the register file
    pub fn registers(&self) -> &[u8; cpu::register::SIZE] {
        &self.registers
    }

    /// Read-only introspection of the program counter
    pub fn program_counter(&self) -> usize {
        self.program_counter
    }

    /// Read-only introspection of the index register
    pub fn index_register(&self) -> usize {
        self.index_register
    }

    /// Read-only introspection of the live stack entries
    pub fn stack(&self) -> &[usize] {
        &self.stack[..self.stack_pointer]
    }

    /// The raw word of the last fetched instruction
    pub fn current_opcode(&self) -> Opcode {
        self.opcode
    }

    /// attaches the current instruction context to a stack fault
    pub(super) fn stack_error(&self, source: StackError) -> ProcessError {
        ProcessError::Stack {
            address: self.program_counter,
            opcode: self.opcode,
            source,
        }
    }

    /// attaches the current instruction context to an out of bounds access
    pub(super) fn out_of_bounds(&self, pointer: usize) -> ProcessError {
        ProcessError::MemoryOutOfBounds {
            address: self.program_counter,
            opcode: self.opcode,
            pointer,
        }
    }

    /// checks that `index .. index + len` stays inside of ram and maps the
    /// region to a usable range
    pub(super) fn checked_region(
        &self,
        index: usize,
        len: usize,
    ) -> Result<std::ops::Range<usize>, ProcessError> {
        let end = index + len;
        if end > memory::SIZE {
            Err(self.out_of_bounds(end - 1))
        } else {
            Ok(index..end)
        }
    }

    /// Will push the given pointer onto the stack
    pub(super) fn push_stack(&mut self, pointer: usize) -> Result<(), StackError> {
        if self.stack_pointer == self.stack.len() {
            Err(StackError::Overflow)
        } else {
            self.stack[self.stack_pointer] = pointer;
            self.stack_pointer += 1;
            Ok(())
        }
    }

    /// Will pop the last pushed pointer from the stack
    pub(super) fn pop_stack(&mut self) -> Result<usize, StackError> {
        if self.stack_pointer == 0 {
            Err(StackError::Underflow)
        } else {
            self.stack_pointer -= 1;
            Ok(self.stack[self.stack_pointer])
        }
    }
}

impl ProgramCounter for ChipSet {
    fn apply(&mut self, step: ProgramCounterStep) -> Result<(), ProcessError> {
        let next = match step {
            ProgramCounterStep::None => self.program_counter,
            ProgramCounterStep::Next => self.program_counter + memory::opcodes::SIZE,
            ProgramCounterStep::Skip => self.program_counter + 2 * memory::opcodes::SIZE,
            ProgramCounterStep::Jump(pointer) => pointer,
        };

        // the next fetch needs a full instruction worth of room
        if next + memory::opcodes::SIZE > memory::SIZE {
            return Err(self.out_of_bounds(next));
        }

        self.program_counter = next;
        Ok(())
    }
}
