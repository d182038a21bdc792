//! Skip and limit

/// Skip/limit window applied after sorting. A limit of zero is unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    skip: usize,
    limit: usize,
}

impl Window {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    pub fn skip(&self) -> usize {
        self.skip
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drops the first `skip` entries (clamped) then keeps at most `limit`
    pub fn apply<E>(&self, entries: &mut Vec<E>) {
        let skip = self.skip.min(entries.len());
        entries.drain(..skip);
        if self.limit > 0 {
            entries.truncate(self.limit);
        }
    }
}
