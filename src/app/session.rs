/// Per-process bookkeeping owned by the shell; starts fresh with every run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub records_saved: usize,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more saved record and return the new total.
    pub fn record_saved(&mut self) -> usize {
        self.records_saved += 1;
        self.records_saved
    }
}
