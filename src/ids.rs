/// Monotonic id generator scoped to one session or panel builder.
///
/// Instances are injected wherever generated ids are needed, so two
/// sessions never share counter state.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    prefix: String,
    next: u64,
}

impl IdAllocator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    pub fn allocate(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new("nav-")
    }
}
