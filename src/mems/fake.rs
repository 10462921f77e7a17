//! Recording stand-in for the physical memory device.

use std::cell::{Cell, RefCell};
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use super::PhysicalMemory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Open(PathBuf),
    Map { len: usize, phys: u64 },
    Store { addr: usize, value: u32 },
    Unmap { addr: usize, len: usize },
    Close,
}

type OpLog = Rc<RefCell<Vec<Op>>>;

pub struct FakeChannel {
    log: OpLog,
}

impl Drop for FakeChannel {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Op::Close);
    }
}

#[derive(Default)]
pub struct FakeMemory {
    base: usize,
    log: OpLog,
    fail_open: Cell<bool>,
    fail_map: Cell<bool>,
}

impl FakeMemory {
    pub fn with_base(base: usize) -> Self {
        Self {
            base,
            ..Default::default()
        }
    }

    pub fn fail_open(&self, fail: bool) {
        self.fail_open.set(fail);
    }

    pub fn fail_map(&self, fail: bool) {
        self.fail_map.set(fail);
    }

    pub fn ops(&self) -> Vec<Op> {
        self.log.borrow().clone()
    }

    pub fn stores(&self) -> Vec<(usize, u32)> {
        self.log
            .borrow()
            .iter()
            .filter_map(|op| match op {
                Op::Store { addr, value } => Some((*addr, *value)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
        self.log.borrow().iter().filter(|op| pred(op)).count()
    }

    pub fn live_mappings(&self) -> usize {
        let maps = self.count(|op| matches!(op, Op::Map { .. }));
        let unmaps = self.count(|op| matches!(op, Op::Unmap { .. }));
        maps - unmaps
    }

    pub fn open_channels(&self) -> usize {
        let opens = self.count(|op| matches!(op, Op::Open(_)));
        let closes = self.count(|op| matches!(op, Op::Close));
        opens - closes
    }
}

impl PhysicalMemory for FakeMemory {
    type Channel = FakeChannel;

    fn open(&self, path: &Path) -> io::Result<FakeChannel> {
        if self.fail_open.get() {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        self.log.borrow_mut().push(Op::Open(path.to_path_buf()));
        Ok(FakeChannel {
            log: Rc::clone(&self.log),
        })
    }

    fn map(&self, _channel: &FakeChannel, len: usize, phys: u64) -> io::Result<usize> {
        if self.fail_map.get() {
            return Err(io::Error::other("simulated MAP_FAILED"));
        }
        self.log.borrow_mut().push(Op::Map { len, phys });
        Ok(self.base)
    }

    unsafe fn store_u32(&self, addr: usize, value: u32) {
        self.log.borrow_mut().push(Op::Store { addr, value });
    }

    fn unmap(&self, addr: usize, len: usize) -> io::Result<()> {
        self.log.borrow_mut().push(Op::Unmap { addr, len });
        Ok(())
    }
}
