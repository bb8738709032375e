use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Concrete parameter values keyed by name. Sorted keys keep the JSON
/// serialization canonical, which fingerprinting relies on.
pub type ParamSet = BTreeMap<String, JsonValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    Coding,
    CodeOutput,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Coding => "coding",
            QuestionKind::CodeOutput => "code-output",
        }
    }
}

impl TryFrom<String> for QuestionKind {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "coding" => Ok(QuestionKind::Coding),
            "code-output" => Ok(QuestionKind::CodeOutput),
            other => Err(format!("unknown question kind `{}`", other)),
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ParameterRule {
    Range {
        min: i64,
        max: i64,
        #[serde(default = "default_step")]
        step: i64,
    },
    List {
        values: Vec<JsonValue>,
    },
    #[serde(skip)]
    Custom(CustomGenerator),
}

fn default_step() -> i64 {
    1
}

impl ParameterRule {
    pub fn range(min: i64, max: i64) -> Self {
        ParameterRule::Range { min, max, step: 1 }
    }

    pub fn stepped(min: i64, max: i64, step: i64) -> Self {
        ParameterRule::Range { min, max, step }
    }

    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<JsonValue>,
    {
        ParameterRule::List {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn custom<F>(generate: F) -> Self
    where
        F: Fn() -> anyhow::Result<JsonValue> + Send + Sync + 'static,
    {
        ParameterRule::Custom(CustomGenerator(Arc::new(generate)))
    }
}

impl fmt::Debug for ParameterRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterRule::Range { min, max, step } => f
                .debug_struct("Range")
                .field("min", min)
                .field("max", max)
                .field("step", step)
                .finish(),
            ParameterRule::List { values } => {
                f.debug_struct("List").field("values", values).finish()
            }
            ParameterRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Caller-supplied zero-argument value producer.
#[derive(Clone)]
pub struct CustomGenerator(Arc<dyn Fn() -> anyhow::Result<JsonValue> + Send + Sync>);

impl CustomGenerator {
    pub fn generate(&self) -> anyhow::Result<JsonValue> {
        (self.0)()
    }
}

/// Template-specific answer logic: the correct answer, optional choices and
/// the explanation shown after submission.
pub trait AnswerComposer: Send + Sync + fmt::Debug {
    fn correct_answer(&self, params: &ParamSet) -> Result<String>;

    fn choices(
        &self,
        _params: &ParamSet,
        _correct_answer: &str,
        _rng: &mut dyn RngCore,
    ) -> Result<Option<Vec<String>>> {
        Ok(None)
    }

    fn explanation(&self, _params: &ParamSet, correct_answer: &str) -> String {
        format!("The expected answer is {}.", correct_answer)
    }
}

#[derive(Debug, Clone)]
pub struct QuestionTemplate {
    pub id: String,
    pub kind: QuestionKind,
    pub difficulty: String,
    pub language: String,
    pub prompt_template: String,
    pub code_template: Option<String>,
    pub parameters: BTreeMap<String, ParameterRule>,
    pub composer: Arc<dyn AnswerComposer>,
    pub time_limit_seconds: Option<u32>,
}

impl QuestionTemplate {
    pub fn new(
        id: impl Into<String>,
        kind: QuestionKind,
        difficulty: impl Into<String>,
        language: impl Into<String>,
        prompt_template: impl Into<String>,
        composer: impl AnswerComposer + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            difficulty: difficulty.into(),
            language: language.into(),
            prompt_template: prompt_template.into(),
            code_template: None,
            parameters: BTreeMap::new(),
            composer: Arc::new(composer),
            time_limit_seconds: None,
        }
    }

    pub fn with_code(mut self, code_template: impl Into<String>) -> Self {
        self.code_template = Some(code_template.into());
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, rule: ParameterRule) -> Self {
        self.parameters.insert(name.into(), rule);
        self
    }

    pub fn with_time_limit(mut self, seconds: u32) -> Self {
        self.time_limit_seconds = Some(seconds);
        self
    }

    pub fn matches(&self, kind: QuestionKind, difficulty: &str, language: &str) -> bool {
        self.kind == kind && self.difficulty == difficulty && self.language == language
    }
}
