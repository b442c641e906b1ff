use super::ResourceEntry;

pub struct ResourceTableIterator<'a> {
    current: usize,
    entries: &'a [ResourceEntry],
}

impl<'a> ResourceTableIterator<'a> {
    pub(crate) fn new(entries: &'a [ResourceEntry]) -> Self {
        Self {
            current: 0,
            entries,
        }
    }
}

impl<'a> Iterator for ResourceTableIterator<'a> {
    type Item = &'a ResourceEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.current)?;
        self.current += 1;
        Some(entry)
    }
}
