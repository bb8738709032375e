use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::question_template::{QuestionKind, QuestionTemplate};

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn find_matching(
        &self,
        kind: QuestionKind,
        difficulty: &str,
        language: &str,
    ) -> Result<Vec<Arc<QuestionTemplate>>>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTemplateStore {
    templates: Vec<Arc<QuestionTemplate>>,
}

impl InMemoryTemplateStore {
    pub fn new(templates: Vec<QuestionTemplate>) -> Self {
        Self {
            templates: templates.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn find_matching(
        &self,
        kind: QuestionKind,
        difficulty: &str,
        language: &str,
    ) -> Result<Vec<Arc<QuestionTemplate>>> {
        Ok(self
            .templates
            .iter()
            .filter(|t| t.matches(kind, difficulty, language))
            .cloned()
            .collect())
    }
}
