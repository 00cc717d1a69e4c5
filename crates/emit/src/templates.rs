//! Template source abstraction. The embedded-filesystem primary
//! loader is an external collaborator outside this crate's scope; callers
//! supply whichever backing store they have — an in-memory map in tests, a
//! directory on disk in a real run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub trait TemplateSource {
    /// Returns the raw template text registered at `name`, or `None` if no
    /// template is registered there.
    fn load(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplates {
    templates: BTreeMap<String, String>,
}

impl InMemoryTemplates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, body: impl Into<String>) -> Self {
        self.templates.insert(name.into(), body.into());
        self
    }
}

impl TemplateSource for InMemoryTemplates {
    fn load(&self, name: &str) -> Option<String> {
        self.templates.get(name).cloned()
    }
}

#[derive(Debug, Clone)]
pub struct DiskTemplates {
    root: PathBuf,
}

impl DiskTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TemplateSource for DiskTemplates {
    fn load(&self, name: &str) -> Option<String> {
        fs::read_to_string(Path::new(&self.root).join(name)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_source_returns_registered_template() {
        let source = InMemoryTemplates::new().with("service.py.hbs", "class {{name}}:");
        assert_eq!(source.load("service.py.hbs").as_deref(), Some("class {{name}}:"));
    }

    #[test]
    fn missing_template_returns_none() {
        let source = InMemoryTemplates::new();
        assert!(source.load("absent.hbs").is_none());
    }

    #[test]
    fn disk_source_reads_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.hbs"), "hello").unwrap();
        let source = DiskTemplates::new(dir.path());
        assert_eq!(source.load("a.hbs").as_deref(), Some("hello"));
    }
}
