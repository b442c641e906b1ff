use std::{collections::HashMap, fmt};

use log::debug;

pub mod bitmap;

use bitmap::FrameBitmap;

#[derive(Debug, PartialEq)]
pub enum MemoryError {
    OutOfMemory,
    UnknownBlock,
    OutOfBounds,
}

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::OutOfMemory => write!(f, "out of memory"),
            MemoryError::UnknownBlock => write!(f, "block is not allocated"),
            MemoryError::OutOfBounds => write!(f, "access past the end of the block"),
        }
    }
}

impl std::error::Error for MemoryError {}

/// Handle to a block of simulated physical memory.
///
/// The serial is unique for the lifetime of the memory that issued it, so two live blocks
/// never compare equal, even zero-length ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    serial: u64,
    base: usize,
    len: usize,
}

impl Address {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Simulated physical offset of the first byte.
    pub fn base(&self) -> usize {
        self.base
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{:#08x}+{}", self.serial, self.base, self.len)
    }
}

/// Snapshot of how much of a memory is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    pub total: usize,
    pub available: usize,
}

impl MemoryUsage {
    pub fn used(&self) -> usize {
        self.total - self.available
    }

    pub fn percent_used(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.used() as f64 * 100.0 / self.total as f64
    }
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total {:.2} KB, available {:.2} KB, {:.1}% used",
            self.total as f64 / 1024.0,
            self.available as f64 / 1024.0,
            self.percent_used()
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Block {
    frame: usize,
    frames: usize,
}

/// A fixed-capacity byte arena carved into `FRAME_SIZE` frames.
pub struct PhysicalMemory<const FRAME_SIZE: usize, const CAPACITY: usize> {
    buffer: Vec<u8>,
    frames: FrameBitmap<FRAME_SIZE, CAPACITY>,
    blocks: HashMap<u64, Block>,
    next_serial: u64,
}

impl<const FRAME_SIZE: usize, const CAPACITY: usize> PhysicalMemory<FRAME_SIZE, CAPACITY> {
    pub fn create() -> Self {
        assert!(FRAME_SIZE > 0, "Frame size must not be zero");
        assert_eq!(
            CAPACITY % FRAME_SIZE,
            0,
            "Capacity must be a multiply of FrameSize"
        );
        Self {
            buffer: vec![0; CAPACITY],
            frames: FrameBitmap::new(),
            blocks: HashMap::new(),
            next_serial: 1,
        }
    }

    fn frames_for(len: usize) -> usize {
        len / FRAME_SIZE + if len % FRAME_SIZE == 0 { 0 } else { 1 }
    }

    /// Allocates a block of `len` bytes. Its contents are whatever the frames held before.
    pub fn allocate(&mut self, len: usize) -> Result<Address, MemoryError> {
        let frames = Self::frames_for(len);
        let frame = if frames == 0 {
            0
        } else {
            self.frames
                .allocate(frames)
                .ok_or(MemoryError::OutOfMemory)?
        };
        let serial = self.next_serial;
        self.next_serial += 1;
        self.blocks.insert(serial, Block { frame, frames });
        let address = Address {
            serial,
            base: frame * FRAME_SIZE,
            len,
        };
        debug!("Allocated {} frame(s) for block {}", frames, address);
        Ok(address)
    }

    pub fn free(&mut self, address: Address) -> Result<(), MemoryError> {
        let block = self
            .blocks
            .remove(&address.serial)
            .ok_or(MemoryError::UnknownBlock)?;
        self.frames.deallocate(block.frame, block.frames);
        debug!("Freed {} frame(s) of block {}", block.frames, address);
        Ok(())
    }

    fn check_address(&self, address: &Address) -> Result<(), MemoryError> {
        match self.blocks.get(&address.serial) {
            Some(block) if block.frame * FRAME_SIZE == address.base => Ok(()),
            _ => Err(MemoryError::UnknownBlock),
        }
    }

    pub fn read(&self, address: Address) -> Result<&[u8], MemoryError> {
        self.check_address(&address)?;
        Ok(&self.buffer[address.base..address.base + address.len])
    }

    pub fn write(
        &mut self,
        address: Address,
        offset: usize,
        bytes: &[u8],
    ) -> Result<(), MemoryError> {
        self.check_address(&address)?;
        let end = offset
            .checked_add(bytes.len())
            .ok_or(MemoryError::OutOfBounds)?;
        if end > address.len {
            return Err(MemoryError::OutOfBounds);
        }
        self.buffer[address.base + offset..address.base + end].copy_from_slice(bytes);
        Ok(())
    }

    pub fn fill(&mut self, address: Address, byte: u8) -> Result<(), MemoryError> {
        self.check_address(&address)?;
        self.buffer[address.base..address.base + address.len].fill(byte);
        Ok(())
    }

    /// Copies the contents of `src` into `dst` of another memory, up to the shorter length.
    pub fn copy_into<const F: usize, const C: usize>(
        &self,
        src: Address,
        target: &mut PhysicalMemory<F, C>,
        dst: Address,
    ) -> Result<usize, MemoryError> {
        let bytes = self.read(src)?;
        let n = bytes.len().min(dst.len());
        target.write(dst, 0, &bytes[..n])?;
        Ok(n)
    }

    pub fn free_frames(&self) -> usize {
        self.frames.free_frames()
    }

    pub fn used_bytes(&self) -> usize {
        (FrameBitmap::<FRAME_SIZE, CAPACITY>::frames() - self.free_frames()) * FRAME_SIZE
    }

    pub fn capacity(&self) -> usize {
        CAPACITY
    }

    pub fn usage(&self) -> MemoryUsage {
        MemoryUsage {
            total: self.capacity(),
            available: self.free_frames() * FRAME_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create() {
        let mem = PhysicalMemory::<512, 4096>::create();
        assert_eq!(mem.free_frames(), 8);
        assert_eq!(mem.used_bytes(), 0);
    }

    #[test]
    #[should_panic]
    fn test_create_invalid_capacity() {
        let _ = PhysicalMemory::<512, 1000>::create();
    }

    #[test]
    fn test_read_write() {
        let mut mem = PhysicalMemory::<512, 4096>::create();
        let block = mem.allocate(600).unwrap();
        assert_eq!(mem.free_frames(), 6);
        mem.write(block, 0, &[0x12, 0x34]).unwrap();
        mem.write(block, 598, &[0x56, 0x78]).unwrap();
        let bytes = mem.read(block).unwrap();
        assert_eq!(bytes.len(), 600);
        assert_eq!(&bytes[0..2], &[0x12, 0x34]);
        assert_eq!(&bytes[598..600], &[0x56, 0x78]);
    }

    #[test]
    fn test_write_out_of_bounds() {
        let mut mem = PhysicalMemory::<512, 4096>::create();
        let block = mem.allocate(16).unwrap();
        assert_eq!(mem.write(block, 15, &[1, 2]), Err(MemoryError::OutOfBounds));
        assert_eq!(
            mem.write(block, usize::MAX, &[1]),
            Err(MemoryError::OutOfBounds)
        );
    }

    #[test]
    fn test_out_of_memory() {
        let mut mem = PhysicalMemory::<512, 2048>::create();
        let a = mem.allocate(1024).unwrap();
        let _b = mem.allocate(1024).unwrap();
        assert_eq!(mem.allocate(1), Err(MemoryError::OutOfMemory));
        mem.free(a).unwrap();
        assert!(mem.allocate(1024).is_ok());
    }

    #[test]
    fn test_double_free() {
        let mut mem = PhysicalMemory::<512, 2048>::create();
        let a = mem.allocate(100).unwrap();
        mem.free(a).unwrap();
        assert_eq!(mem.free(a), Err(MemoryError::UnknownBlock));
        assert_eq!(mem.read(a), Err(MemoryError::UnknownBlock));
    }

    #[test]
    fn test_zero_length_blocks_are_distinct() {
        let mut mem = PhysicalMemory::<512, 2048>::create();
        let a = mem.allocate(0).unwrap();
        let b = mem.allocate(0).unwrap();
        assert_ne!(a, b);
        assert!(a.is_empty());
        assert_eq!(mem.read(a).unwrap(), &[] as &[u8]);
        assert_eq!(mem.free_frames(), 4);
        mem.free(a).unwrap();
        mem.free(b).unwrap();
    }

    #[test]
    fn test_copy_between_memories() {
        let mut main = PhysicalMemory::<512, 4096>::create();
        let mut swap = PhysicalMemory::<256, 4096>::create();
        let src = main.allocate(1024).unwrap();
        main.fill(src, 0xAA).unwrap();
        let dst = swap.allocate(1024).unwrap();
        assert_eq!(main.copy_into(src, &mut swap, dst).unwrap(), 1024);
        assert!(swap.read(dst).unwrap().iter().all(|b| *b == 0xAA));
    }

    #[test]
    fn test_usage() {
        let mut mem = PhysicalMemory::<512, 4096>::create();
        assert_eq!(mem.usage().percent_used(), 0.0);
        let block = mem.allocate(1000).unwrap();
        let usage = mem.usage();
        assert_eq!(usage.total, 4096);
        assert_eq!(usage.available, 3072);
        assert_eq!(usage.used(), 1024);
        assert_eq!(usage.percent_used(), 25.0);
        assert_eq!(usage.to_string(), "total 4.00 KB, available 3.00 KB, 25.0% used");
        mem.free(block).unwrap();
        assert_eq!(mem.usage().available, 4096);
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut mem = PhysicalMemory::<512, 512>::create();
        let a = mem.allocate(512).unwrap();
        mem.free(a).unwrap();
        let b = mem.allocate(512).unwrap();
        assert_eq!(a.base(), b.base());
        assert_ne!(a, b);
        assert_eq!(mem.fill(a, 1), Err(MemoryError::UnknownBlock));
    }
}
