//! A fixed-size table of memory resources (pages, segments or swappable processes) whose
//! backing blocks live in a simulated physical memory, plus an optional simulated swap area.
mod entry;
mod error;
mod iter;

use std::fmt;

use log::{debug, info};
use memory::PhysicalMemory;

pub use entry::{ResourceEntry, Residency};
pub use memory::{Address, MemoryUsage};
pub use error::ResourceError;
pub use iter::ResourceTableIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Every entry has the same fixed size.
    Paging { page_size: usize },
    Segmentation,
    /// Entries can be moved to and from the swap area.
    Swapping,
}

impl TableKind {
    /// What a single entry is called in the trace.
    pub fn noun(&self) -> &'static str {
        match self {
            TableKind::Paging { .. } => "Page",
            TableKind::Segmentation => "Segment",
            TableKind::Swapping => "Process",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Paging { page_size } => write!(f, "paging ({} byte pages)", page_size),
            TableKind::Segmentation => write!(f, "segmentation"),
            TableKind::Swapping => write!(f, "swapping"),
        }
    }
}

pub struct ResourceTable<
    const FRAME_SIZE: usize,
    const MEMORY_CAPACITY: usize,
    const SWAP_CAPACITY: usize,
> {
    kind: TableKind,
    entries: Vec<ResourceEntry>,
    memory: PhysicalMemory<FRAME_SIZE, MEMORY_CAPACITY>,
    swap: Option<PhysicalMemory<FRAME_SIZE, SWAP_CAPACITY>>,
}

impl<const FRAME_SIZE: usize, const MEMORY_CAPACITY: usize, const SWAP_CAPACITY: usize>
    ResourceTable<FRAME_SIZE, MEMORY_CAPACITY, SWAP_CAPACITY>
{
    /// Creates a table of `capacity` empty entries with ids `0..capacity`.
    pub fn init(kind: TableKind, capacity: u32) -> Self {
        let entries = (0..capacity).map(ResourceEntry::empty).collect();
        let swap = match kind {
            TableKind::Swapping => Some(PhysicalMemory::create()),
            _ => None,
        };
        info!("Initialized {} table with {} entries", kind, capacity);
        Self {
            kind,
            entries,
            memory: PhysicalMemory::create(),
            swap,
        }
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn capacity(&self) -> u32 {
        self.entries.len() as u32
    }

    fn index(&self, id: u32) -> Result<usize, ResourceError> {
        if (id as usize) < self.entries.len() {
            Ok(id as usize)
        } else {
            Err(ResourceError::InvalidId(id))
        }
    }

    pub fn entry(&self, id: u32) -> Result<&ResourceEntry, ResourceError> {
        let index = self.index(id)?;
        Ok(&self.entries[index])
    }

    pub fn iter(&self) -> ResourceTableIterator<'_> {
        ResourceTableIterator::new(&self.entries)
    }

    /// Binds a fresh block of `size` bytes to entry `id`. The block is not zeroed.
    ///
    /// A swap copy left over from an earlier swap-out is stale once the entry is loaded
    /// again, so it is dropped after the new block has been bound.
    pub fn load(&mut self, id: u32, size: usize) -> Result<Address, ResourceError> {
        let index = self.index(id)?;
        if let TableKind::Paging { page_size } = self.kind {
            if size != page_size {
                return Err(ResourceError::InvalidSize {
                    expected: page_size,
                    got: size,
                });
            }
        }
        let entry = &mut self.entries[index];
        if entry.primary.is_some() {
            return Err(ResourceError::AlreadyResident(id));
        }
        let address = self.memory.allocate(size).map_err(|err| {
            debug!("Cannot load {} {}: {}", self.kind.noun(), id, err);
            ResourceError::from(err)
        })?;
        entry.primary = Some(address);
        entry.set_size(size);
        if let Some(stale) = entry.secondary.take() {
            if let Some(swap) = self.swap.as_mut() {
                swap.free(stale)?;
            }
        }
        info!(
            "{} {} loaded ({} bytes) at {}",
            self.kind.noun(),
            id,
            size,
            address
        );
        Ok(address)
    }

    pub fn release(&mut self, id: u32) -> Result<(), ResourceError> {
        let index = self.index(id)?;
        let entry = &mut self.entries[index];
        let address = entry.primary.ok_or(ResourceError::NotResident)?;
        self.memory.free(address)?;
        entry.primary = None;
        // Swap-in needs the size of a retained swap copy.
        if entry.secondary.is_none() {
            entry.set_size(0);
        }
        info!("{} {} released from {}", self.kind.noun(), id, address);
        Ok(())
    }

    /// Moves the resident contents of entry `id` into a swap slot of the entry's size.
    ///
    /// Nothing changes on failure: the primary block is only freed once the copy is complete.
    pub fn swap_out(&mut self, id: u32) -> Result<(), ResourceError> {
        let index = self.index(id)?;
        let swap = self
            .swap
            .as_mut()
            .ok_or(ResourceError::Unsupported(self.kind))?;
        let entry = &mut self.entries[index];
        let primary = entry.primary.ok_or(ResourceError::NotResident)?;
        let slot = swap.allocate(entry.size()).map_err(|err| {
            debug!("Cannot swap out {} {}: {}", self.kind.noun(), id, err);
            ResourceError::from(err)
        })?;
        if let Err(err) = self.memory.copy_into(primary, &mut *swap, slot) {
            swap.free(slot)?;
            return Err(err.into());
        }
        if let Some(old) = entry.secondary.replace(slot) {
            swap.free(old)?;
        }
        self.memory.free(primary)?;
        entry.primary = None;
        info!(
            "{} {} moved to the swap area at {}",
            self.kind.noun(),
            id,
            slot
        );
        Ok(())
    }

    /// Brings entry `id` back from its swap copy into a fresh block and returns it.
    ///
    /// The swap copy is kept, so repeated swap-ins reproduce the same contents. A block that
    /// was already resident is replaced.
    pub fn swap_in(&mut self, id: u32) -> Result<Address, ResourceError> {
        let index = self.index(id)?;
        let swap = self
            .swap
            .as_ref()
            .ok_or(ResourceError::Unsupported(self.kind))?;
        let entry = &mut self.entries[index];
        let secondary = entry.secondary.ok_or(ResourceError::NotSwapped)?;
        let address = self.memory.allocate(entry.size()).map_err(|err| {
            debug!("Cannot swap in {} {}: {}", self.kind.noun(), id, err);
            ResourceError::from(err)
        })?;
        if let Err(err) = swap.copy_into(secondary, &mut self.memory, address) {
            self.memory.free(address)?;
            return Err(err.into());
        }
        if let Some(old) = entry.primary.replace(address) {
            self.memory.free(old)?;
        }
        info!(
            "{} {} moved to memory at {} from the swap area",
            self.kind.noun(),
            id,
            address
        );
        Ok(address)
    }

    /// Frees the swap copy of entry `id`.
    pub fn discard(&mut self, id: u32) -> Result<(), ResourceError> {
        let index = self.index(id)?;
        let swap = self
            .swap
            .as_mut()
            .ok_or(ResourceError::Unsupported(self.kind))?;
        let entry = &mut self.entries[index];
        let slot = entry.secondary.ok_or(ResourceError::NotSwapped)?;
        swap.free(slot)?;
        entry.secondary = None;
        if entry.primary.is_none() {
            entry.set_size(0);
        }
        info!("{} {} swap area freed", self.kind.noun(), id);
        Ok(())
    }

    pub fn read(&self, id: u32) -> Result<&[u8], ResourceError> {
        let entry = self.entry(id)?;
        let address = entry.primary.ok_or(ResourceError::NotResident)?;
        Ok(self.memory.read(address)?)
    }

    pub fn write(&mut self, id: u32, offset: usize, bytes: &[u8]) -> Result<(), ResourceError> {
        let index = self.index(id)?;
        let address = self.entries[index]
            .primary
            .ok_or(ResourceError::NotResident)?;
        Ok(self.memory.write(address, offset, bytes)?)
    }

    pub fn fill(&mut self, id: u32, byte: u8) -> Result<(), ResourceError> {
        let index = self.index(id)?;
        let address = self.entries[index]
            .primary
            .ok_or(ResourceError::NotResident)?;
        Ok(self.memory.fill(address, byte)?)
    }

    pub fn memory_free_frames(&self) -> usize {
        self.memory.free_frames()
    }

    pub fn memory_used_bytes(&self) -> usize {
        self.memory.used_bytes()
    }

    pub fn swap_free_frames(&self) -> Option<usize> {
        self.swap.as_ref().map(|swap| swap.free_frames())
    }

    pub fn swap_used_bytes(&self) -> Option<usize> {
        self.swap.as_ref().map(|swap| swap.used_bytes())
    }

    pub fn memory_usage(&self) -> MemoryUsage {
        self.memory.usage()
    }

    pub fn swap_usage(&self) -> Option<MemoryUsage> {
        self.swap.as_ref().map(|swap| swap.usage())
    }
}
