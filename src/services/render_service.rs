use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::Value as JsonValue;

use crate::models::question_template::ParamSet;

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("token pattern is valid"))
}

/// Substitutes `{{name}}` tokens with parameter values. Tokens without a
/// matching parameter render as the empty string; each one is logged.
pub fn render(template: &str, params: &ParamSet) -> String {
    render_with(template, params, |token| {
        tracing::warn!(token, "template token has no matching parameter, rendering blank");
    })
}

/// Same substitution as [`render`], reporting every missing token to
/// `on_missing` instead of logging it.
pub fn render_with<F>(template: &str, params: &ParamSet, mut on_missing: F) -> String
where
    F: FnMut(&str),
{
    token_pattern()
        .replace_all(template, |caps: &Captures| {
            let token = &caps[1];
            match params.get(token) {
                Some(value) => display_value(value),
                None => {
                    on_missing(token);
                    String::new()
                }
            }
        })
        .into_owned()
}

/// Plain display form of a parameter value as it appears inside prompts.
pub fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(","),
        JsonValue::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params() -> ParamSet {
        let mut p = ParamSet::new();
        p.insert("a".into(), json!(4));
        p.insert("b".into(), json!(7));
        p.insert("name".into(), json!("total"));
        p.insert("nums".into(), json!([1, 2, 3]));
        p
    }

    #[test]
    fn substitutes_tokens() {
        let out = render("const {{name}} = {{a}} + {{ b }};", &params());
        assert_eq!(out, "const total = 4 + 7;");
    }

    #[test]
    fn arrays_render_comma_joined() {
        assert_eq!(render("[{{nums}}]", &params()), "[1,2,3]");
    }

    #[test]
    fn missing_tokens_render_blank_and_are_reported() {
        let mut missing = Vec::new();
        let out = render_with("x = {{a}}{{ghost}};", &params(), |t| missing.push(t.to_string()));
        assert_eq!(out, "x = 4;");
        assert_eq!(missing, vec!["ghost".to_string()]);
    }

    #[test]
    fn text_without_tokens_is_untouched() {
        let text = "function f() { return {a: 1}; }";
        assert_eq!(render(text, &params()), text);
        assert_eq!(render(&render(text, &params()), &params()), text);
    }

    #[test]
    fn rendering_is_repeatable() {
        let template = "{{a}}-{{b}}-{{missing}}";
        assert_eq!(render(template, &params()), render(template, &params()));
    }
}
