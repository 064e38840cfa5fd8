use std::collections::BTreeMap;

/// Bijection between class directory names and labels `0..N`.
///
/// Labels follow the lexicographic order of the names, so the same set of
/// directories always produces the same map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassLabelMap {
    names: Vec<String>,
    labels: BTreeMap<String, usize>,
}

impl ClassLabelMap {
    /// Build a map from class names in any order. Duplicate names collapse.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        let labels = names
            .iter()
            .enumerate()
            .map(|(label, name)| (name.clone(), label))
            .collect();
        Self { names, labels }
    }

    /// Label assigned to `name`, if it is a known class.
    pub fn label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Class name for `label`, if it is in range.
    pub fn class_name(&self, label: usize) -> Option<&str> {
        self.names.get(label).map(String::as_str)
    }

    /// Class names sorted by label.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(name, label)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.names
            .iter()
            .enumerate()
            .map(|(label, name)| (name.as_str(), label))
    }
}
