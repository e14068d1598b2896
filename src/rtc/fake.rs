//! In-memory DS3231 register file for tests

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use super::ds3231::ADDRESS;

pub(crate) const REGISTER_COUNT: usize = 0x13;

pub(crate) type Registers = Rc<RefCell<[u8; REGISTER_COUNT]>>;

/// Answers like a DS3231 with auto-incrementing register pointer
pub(crate) struct FakeDs3231 {
    pub regs: Registers,
    present: bool,
    pointer: usize,
    /// Time the clock ticks over to after its time registers are first read
    next_time: Option<[u8; 7]>,
}

impl FakeDs3231 {
    /// A chip in its power-on state: control 0x1C, OSF set
    pub fn new() -> Self {
        let mut regs = [0u8; REGISTER_COUNT];
        regs[0x0E] = 0x1C;
        regs[0x0F] = 0x80;
        FakeDs3231 {
            regs: Rc::new(RefCell::new(regs)),
            present: true,
            pointer: 0,
            next_time: None,
        }
    }

    /// Nothing on the bus, every transaction is NACKed
    pub fn absent() -> Self {
        FakeDs3231 {
            present: false,
            ..Self::new()
        }
    }

    pub fn with_time(self, bcd: [u8; 7]) -> Self {
        self.regs.borrow_mut()[..7].copy_from_slice(&bcd);
        self
    }

    /// Tick to `bcd` right after the first read that starts at the seconds register
    pub fn with_tick(mut self, bcd: [u8; 7]) -> Self {
        self.next_time = Some(bcd);
        self
    }

    pub fn handle(&self) -> Registers {
        self.regs.clone()
    }
}

impl ErrorType for FakeDs3231 {
    type Error = ErrorKind;
}

impl I2c for FakeDs3231 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if !self.present || address != ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        let mut regs = self.regs.borrow_mut();
        for (index, op) in operations.iter_mut().enumerate() {
            match op {
                Operation::Write(bytes) => {
                    let mut payload = bytes.iter();
                    if index == 0 {
                        if let Some(reg) = payload.next() {
                            self.pointer = usize::from(*reg);
                        }
                    }
                    for b in payload {
                        regs[self.pointer % REGISTER_COUNT] = *b;
                        self.pointer += 1;
                    }
                }
                Operation::Read(buf) => {
                    let start = self.pointer;
                    for b in buf.iter_mut() {
                        *b = regs[self.pointer % REGISTER_COUNT];
                        self.pointer += 1;
                    }
                    if start == 0 {
                        if let Some(next) = self.next_time.take() {
                            regs[..7].copy_from_slice(&next);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
