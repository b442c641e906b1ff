/// Free-frame bitmap, one bit per frame of physical memory.
#[derive(Debug)]
pub struct FrameBitmap<const FRAME_SIZE: usize, const CAPACITY: usize> {
    bitmap: Vec<u8>,
}

impl<const FRAME_SIZE: usize, const CAPACITY: usize> FrameBitmap<FRAME_SIZE, CAPACITY> {
    /// How many frames the memory holds
    pub fn frames() -> usize {
        CAPACITY / FRAME_SIZE
    }

    /// How many bytes are required to store the bitmap
    pub fn size() -> usize {
        Self::frames() / 8 + if Self::frames() % 8 == 0 { 0 } else { 1 }
    }

    pub fn new() -> Self {
        let mut bitmap = Vec::new();
        bitmap.resize(Self::size(), 0);
        FrameBitmap { bitmap }
    }

    fn is_used(&self, frame: usize) -> bool {
        self.bitmap[frame / 8] & (1 << (frame % 8)) != 0
    }

    fn mark(&mut self, frame: usize) {
        self.bitmap[frame / 8] |= 1 << (frame % 8);
    }

    fn unmark(&mut self, frame: usize) {
        self.bitmap[frame / 8] &= !(1 << (frame % 8));
    }

    /// First fit: marks the lowest run of `count` free frames and returns its first frame.
    pub fn allocate(&mut self, count: usize) -> Option<usize> {
        if count == 0 || count > Self::frames() {
            return None;
        }
        let mut run_start = 0;
        let mut run_len = 0;
        for frame in 0..Self::frames() {
            if self.is_used(frame) {
                run_len = 0;
                run_start = frame + 1;
                continue;
            }
            run_len += 1;
            if run_len == count {
                for f in run_start..run_start + count {
                    self.mark(f);
                }
                return Some(run_start);
            }
        }
        log::debug!("No free frames");
        None
    }

    pub fn deallocate(&mut self, start: usize, count: usize) {
        for frame in start..start + count {
            self.unmark(frame);
        }
    }

    pub fn free_frames(&self) -> usize {
        (0..Self::frames()).filter(|f| !self.is_used(*f)).count()
    }
}
