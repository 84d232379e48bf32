use std::collections::HashMap;

use crate::model::DirectoryRecord;
use crate::names::NameKey;

/// Directory records grouped by normalized name.
///
/// Candidates for a key keep the order of the records passed to `build`.
#[derive(Debug, Default)]
pub struct NameIndex {
    by_name: HashMap<NameKey, Vec<DirectoryRecord>>,
}

impl NameIndex {
    pub fn build(records: &[DirectoryRecord]) -> Self {
        let mut by_name: HashMap<NameKey, Vec<DirectoryRecord>> = HashMap::new();
        for rec in records {
            by_name
                .entry(NameKey::new(&rec.first_name, &rec.last_name))
                .or_default()
                .push(rec.clone());
        }
        Self { by_name }
    }

    pub fn candidates(&self, key: &NameKey) -> &[DirectoryRecord] {
        self.by_name.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Names shared by more than one directory record.
    pub fn duplicate_names(&self) -> usize {
        self.by_name.values().filter(|v| v.len() > 1).count()
    }
}
