//! Template registry.
//!
//! An explicit, shareable registry object. Reads clone the template out so
//! callers never hold the lock across a prompt build or network call.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::generation::types::Template;

/// Thread-safe registry of output templates, keyed by template id.
#[derive(Debug)]
pub struct TemplateRegistry {
    inner: RwLock<HashMap<String, Template>>,
}

impl TemplateRegistry {
    /// Empty registry, mainly for tests.
    pub fn empty() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Registry seeded with the built-in worksheet templates.
    pub fn with_defaults() -> Self {
        let registry = Self::empty();
        registry.insert(Template::new(
            "WorksheetTemplate",
            "Worksheet - 5 Questions",
            "Worksheet with 5 questions and an answer key",
            vec![
                "worksheetTitle".to_string(),
                "instructions".to_string(),
                "question1".to_string(),
                "question2".to_string(),
                "question3".to_string(),
                "question4".to_string(),
                "question5".to_string(),
                "answer1".to_string(),
                "answer2".to_string(),
                "answer3".to_string(),
                "answer4".to_string(),
                "answer5".to_string(),
            ],
        ));
        registry.insert(Template::new(
            "ThreeQuestionTemplate",
            "Worksheet - 3 Questions",
            "Worksheet with 3 questions and an answer key",
            vec![
                "worksheetTitle".to_string(),
                "instructions".to_string(),
                "question1".to_string(),
                "question2".to_string(),
                "question3".to_string(),
                "answer1".to_string(),
                "answer2".to_string(),
                "answer3".to_string(),
            ],
        ));
        registry
    }

    /// Look up a template by id. Absence is `None`, never an error.
    pub fn get(&self, id: &str) -> Option<Template> {
        let guard = self.inner.read().expect("lock poisoned");
        guard.get(id).cloned()
    }

    /// All registered templates, sorted by id for stable catalog output.
    pub fn all(&self) -> Vec<Template> {
        let guard = self.inner.read().expect("lock poisoned");
        let mut templates: Vec<Template> = guard.values().cloned().collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    /// Insert or overwrite, keyed by `template.id`.
    pub fn insert(&self, template: Template) {
        let mut guard = self.inner.write().expect("lock poisoned");
        guard.insert(template.id.clone(), template);
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").is_empty()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
