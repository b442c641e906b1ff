use memory::Address;

/// Where an entry's contents currently live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residency {
    Empty,
    Resident,
    Swapped,
    /// Back in memory after a swap-in; the swap copy is retained.
    ResidentWithSwapCopy,
}

/// One row of the resource table: a page, a segment or a swappable process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceEntry {
    id: u32,
    size: usize,
    pub(crate) primary: Option<Address>,
    pub(crate) secondary: Option<Address>,
}

impl ResourceEntry {
    pub(crate) fn empty(id: u32) -> Self {
        ResourceEntry {
            id,
            size: 0,
            primary: None,
            secondary: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn set_size(&mut self, size: usize) {
        self.size = size;
    }

    pub fn primary(&self) -> Option<Address> {
        self.primary
    }

    pub fn secondary(&self) -> Option<Address> {
        self.secondary
    }

    pub fn is_resident(&self) -> bool {
        self.primary.is_some()
    }

    pub fn is_swapped(&self) -> bool {
        self.secondary.is_some()
    }

    pub fn residency(&self) -> Residency {
        match (self.primary, self.secondary) {
            (None, None) => Residency::Empty,
            (Some(_), None) => Residency::Resident,
            (None, Some(_)) => Residency::Swapped,
            (Some(_), Some(_)) => Residency::ResidentWithSwapCopy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_entry() {
        let entry = ResourceEntry::empty(3);
        assert_eq!(entry.id(), 3);
        assert_eq!(entry.size(), 0);
        assert!(!entry.is_resident());
        assert!(!entry.is_swapped());
        assert_eq!(entry.residency(), Residency::Empty);
    }
}
