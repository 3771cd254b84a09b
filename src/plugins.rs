use std::collections::HashSet;

/// Snapshot of the plugin names currently active in the host's load order.
///
/// Lookup is ASCII case-insensitive. Plugin files live on case-insensitive
/// file systems and hosts do not normalize the casing they report, so
/// `ikhair.esp` and `IKHair.esp` are the same plugin.
#[derive(Debug, Clone, Default)]
pub struct ActivePluginSet {
    names: HashSet<String>,
}

impl ActivePluginSet {
    /// Build a set from whatever plugin names the host reports.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ActivePluginSet {
            names: names
                .into_iter()
                .map(|name| name.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, plugin: &str) -> bool {
        self.names.contains(&plugin.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ActivePluginSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ActivePluginSet::new(iter)
    }
}
