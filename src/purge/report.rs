use std::fmt;

/// Outcome of one purge pass (statuses or favourites)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub pages: usize,
    pub examined: usize,
    /// Younger than the cutoff
    pub retained: usize,
    /// Old enough but pinned
    pub protected: usize,
    pub removed: usize,
    /// Ids that would have been removed (dry run only)
    pub planned: Vec<u64>,
    pub failed: Vec<u64>,
}

impl PurgeReport {
    /// Items the retention rules selected, whatever happened to them
    pub fn selected(&self) -> usize {
        self.removed + self.planned.len() + self.failed.len()
    }
}

impl fmt::Display for PurgeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} removed, {} would be removed, {} failed, {} retained, {} pinned ({} examined on {} pages)",
            self.removed,
            self.planned.len(),
            self.failed.len(),
            self.retained,
            self.protected,
            self.examined,
            self.pages
        )
    }
}
