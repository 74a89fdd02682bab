//! In-memory AT24C used by the unit tests.

use std::{cell::RefCell, rc::Rc};

use embedded_hal::{
    delay::DelayNs,
    i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation},
};

use super::DEFAULT_ADDRESS;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SimError {
    Nack(NoAcknowledgeSource),
    /// A NACK as i2c-bcm2835 reports it, EREMOTEIO with no kind attached.
    Remote,
    Bus,
}

impl i2c::Error for SimError {
    fn kind(&self) -> ErrorKind {
        match self {
            SimError::Nack(source) => ErrorKind::NoAcknowledge(*source),
            SimError::Remote => ErrorKind::Other,
            SimError::Bus => ErrorKind::Bus,
        }
    }
}

struct State {
    address: u8,
    memory: Vec<u8>,
    addr_width: usize,
    pointer: usize,
    busy_polls: usize,
    busy: usize,
    remote_nacks: bool,
    fail_after: Option<usize>,
    transactions: usize,
    writes: Vec<Vec<u8>>,
    delayed_ns: u64,
}

/// Clones share the same device, so one handle can be given to the driver
/// and another kept for inspection.
#[derive(Clone)]
pub struct SimEeprom(Rc<RefCell<State>>);

impl SimEeprom {
    /// An erased device of `capacity` bytes taking `addr_width` address bytes.
    pub fn new(capacity: usize, addr_width: usize) -> Self {
        assert!(capacity.is_power_of_two());
        SimEeprom(Rc::new(RefCell::new(State {
            address: DEFAULT_ADDRESS,
            memory: vec![0xFF; capacity],
            addr_width,
            pointer: 0,
            busy_polls: 0,
            busy: 0,
            remote_nacks: false,
            fail_after: None,
            transactions: 0,
            writes: Vec::new(),
            delayed_ns: 0,
        })))
    }

    /// NACK this many transactions after every data write.
    pub fn with_busy_polls(self, polls: usize) -> Self {
        self.0.borrow_mut().busy_polls = polls;
        self
    }

    /// Report NACKs as [`SimError::Remote`] instead of a NoAcknowledge kind.
    pub fn with_remote_nacks(self) -> Self {
        self.0.borrow_mut().remote_nacks = true;
        self
    }

    /// Only the next `count` transactions succeed, the rest fail with a bus error.
    pub fn fail_after(&self, count: usize) {
        let mut state = self.0.borrow_mut();
        state.fail_after = Some(state.transactions + count);
    }

    pub fn poke(&self, addr: usize, value: u8) {
        self.0.borrow_mut().memory[addr] = value;
    }

    pub fn peek(&self, addr: usize) -> u8 {
        self.0.borrow().memory[addr]
    }

    pub fn contents(&self) -> Vec<u8> {
        self.0.borrow().memory.clone()
    }

    pub fn transactions(&self) -> usize {
        self.0.borrow().transactions
    }

    /// Payloads of every write phase seen so far.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.0.borrow().writes.clone()
    }

    pub fn delayed_ms(&self) -> u64 {
        self.0.borrow().delayed_ns / 1_000_000
    }
}

impl State {
    fn write(&mut self, bytes: &[u8]) {
        self.writes.push(bytes.to_vec());
        if bytes.len() < self.addr_width {
            return;
        }
        let (addr, data) = bytes.split_at(self.addr_width);
        let mask = self.memory.len() - 1;
        let pointer = addr.iter().fold(0, |acc, b| (acc << 8) | usize::from(*b));
        self.pointer = pointer & mask;
        for byte in data {
            self.memory[self.pointer] = *byte;
            self.pointer = (self.pointer + 1) & mask;
        }
        if !data.is_empty() {
            self.busy = self.busy_polls;
        }
    }

    fn read(&mut self, buf: &mut [u8]) {
        let mask = self.memory.len() - 1;
        for slot in buf.iter_mut() {
            *slot = self.memory[self.pointer];
            self.pointer = (self.pointer + 1) & mask;
        }
    }
}

impl ErrorType for SimEeprom {
    type Error = SimError;
}

impl I2c for SimEeprom {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        state.transactions += 1;
        if matches!(state.fail_after, Some(limit) if state.transactions > limit) {
            return Err(SimError::Bus);
        }
        let nack = if state.remote_nacks {
            SimError::Remote
        } else {
            SimError::Nack(NoAcknowledgeSource::Address)
        };
        if address != state.address {
            return Err(nack);
        }
        if state.busy > 0 {
            state.busy -= 1;
            return Err(nack);
        }
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => state.write(bytes),
                Operation::Read(buf) => state.read(buf),
            }
        }
        Ok(())
    }
}

impl DelayNs for SimEeprom {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().delayed_ns += u64::from(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().delayed_ns += u64::from(ms) * 1_000_000;
    }
}
