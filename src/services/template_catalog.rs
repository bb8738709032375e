//! Built-in question templates served when no external template source is
//! configured.

use rand::RngCore;

use crate::error::{Error, Result};
use crate::models::question_template::{
    AnswerComposer, ParamSet, ParameterRule, QuestionKind, QuestionTemplate,
};
use crate::services::choice_service::{compose_choices, numeric_fillers, DEFAULT_CHOICE_COUNT};

fn param_i64(params: &ParamSet, name: &str) -> Result<i64> {
    params
        .get(name)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| Error::InvalidRule(format!("parameter `{}` is missing or not an integer", name)))
}

fn param_str<'a>(params: &'a ParamSet, name: &str) -> Result<&'a str> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::InvalidRule(format!("parameter `{}` is missing or not a string", name)))
}

fn numeric_choices(
    correct_answer: &str,
    candidates: &[i64],
    rng: &mut dyn RngCore,
) -> Result<Option<Vec<String>>> {
    Ok(Some(compose_choices(
        correct_answer,
        candidates.iter().map(|c| c.to_string()),
        DEFAULT_CHOICE_COUNT,
        numeric_fillers(),
        rng,
    )))
}

#[derive(Debug)]
pub struct SumOutput;

impl AnswerComposer for SumOutput {
    fn correct_answer(&self, params: &ParamSet) -> Result<String> {
        Ok((param_i64(params, "a")? + param_i64(params, "b")?).to_string())
    }

    fn choices(
        &self,
        params: &ParamSet,
        correct_answer: &str,
        rng: &mut dyn RngCore,
    ) -> Result<Option<Vec<String>>> {
        let (a, b) = (param_i64(params, "a")?, param_i64(params, "b")?);
        numeric_choices(correct_answer, &[a + b, a + b + 1, a + b - 1, a * b, (a - b).abs()], rng)
    }

    fn explanation(&self, params: &ParamSet, correct_answer: &str) -> String {
        let a = params.get("a").cloned().unwrap_or_default();
        let b = params.get("b").cloned().unwrap_or_default();
        format!(
            "Both operands are numbers, so `+` performs addition: {} + {} = {}.",
            a, b, correct_answer
        )
    }
}

#[derive(Debug)]
pub struct RangeLoopSum;

impl AnswerComposer for RangeLoopSum {
    fn correct_answer(&self, params: &ParamSet) -> Result<String> {
        let (start, end) = (param_i64(params, "start")?, param_i64(params, "end")?);
        Ok((start..end).sum::<i64>().to_string())
    }

    fn choices(
        &self,
        params: &ParamSet,
        correct_answer: &str,
        rng: &mut dyn RngCore,
    ) -> Result<Option<Vec<String>>> {
        let (start, end) = (param_i64(params, "start")?, param_i64(params, "end")?);
        let exclusive: i64 = (start..end).sum();
        numeric_choices(
            correct_answer,
            &[
                (start..=end).sum(),
                ((start + 1)..end).sum(),
                exclusive - (end - 1),
                exclusive + 1,
            ],
            rng,
        )
    }

    fn explanation(&self, params: &ParamSet, correct_answer: &str) -> String {
        let start = params.get("start").cloned().unwrap_or_default();
        let end = params.get("end").cloned().unwrap_or_default();
        format!(
            "range({}, {}) stops before {}, so the loop adds {} through {} - 1 for a total of {}.",
            start, end, end, start, end, correct_answer
        )
    }
}

#[derive(Debug)]
pub struct RepeatLength;

impl AnswerComposer for RepeatLength {
    fn correct_answer(&self, params: &ParamSet) -> Result<String> {
        let word = param_str(params, "word")?;
        let times = param_i64(params, "times")?;
        Ok((word.chars().count() as i64 * times).to_string())
    }

    fn choices(
        &self,
        params: &ParamSet,
        correct_answer: &str,
        rng: &mut dyn RngCore,
    ) -> Result<Option<Vec<String>>> {
        let len = param_str(params, "word")?.chars().count() as i64;
        let times = param_i64(params, "times")?;
        numeric_choices(
            correct_answer,
            &[len * times, len + times, len, times, len * (times + 1)],
            rng,
        )
    }

    fn explanation(&self, params: &ParamSet, correct_answer: &str) -> String {
        let word = params.get("word").and_then(|v| v.as_str()).unwrap_or_default();
        let times = params.get("times").cloned().unwrap_or_default();
        format!(
            "Multiplying a string repeats it: \"{}\" * {} has {} characters.",
            word, times, correct_answer
        )
    }
}

#[derive(Debug)]
pub struct TwoSum;

impl TwoSum {
    fn solve(params: &ParamSet) -> Result<Option<(usize, usize)>> {
        let nums = ["v1", "v2", "v3", "v4"]
            .iter()
            .map(|name| param_i64(params, name))
            .collect::<Result<Vec<_>>>()?;
        let target = param_i64(params, "target")?;
        for i in 0..nums.len() {
            for j in (i + 1)..nums.len() {
                if nums[i] + nums[j] == target {
                    return Ok(Some((i, j)));
                }
            }
        }
        Ok(None)
    }
}

impl AnswerComposer for TwoSum {
    fn correct_answer(&self, params: &ParamSet) -> Result<String> {
        Ok(match Self::solve(params)? {
            Some((i, j)) => format!("[{},{}]", i, j),
            None => "[]".to_string(),
        })
    }

    fn explanation(&self, params: &ParamSet, correct_answer: &str) -> String {
        match Self::solve(params) {
            Ok(Some((i, j))) => format!(
                "Scanning pairs in order, indices {} and {} are the first whose values add up to the target, giving {}.",
                i, j, correct_answer
            ),
            _ => "No pair of values adds up to the target, so the expected result is an empty array.".to_string(),
        }
    }
}

pub fn builtin_templates() -> Vec<QuestionTemplate> {
    vec![
        QuestionTemplate::new(
            "code-output-sum",
            QuestionKind::CodeOutput,
            "easy",
            "javascript",
            "What does the following snippet print when executed?",
            SumOutput,
        )
        .with_code("const result = {{a}} + {{b}};\nconsole.log(result);")
        .with_param("a", ParameterRule::range(1, 9))
        .with_param("b", ParameterRule::range(1, 9))
        .with_time_limit(240),
        QuestionTemplate::new(
            "code-output-string-repeat",
            QuestionKind::CodeOutput,
            "easy",
            "python",
            "What does the following snippet print?",
            RepeatLength,
        )
        .with_code("word = \"{{word}}\"\nprint(len(word * {{times}}))")
        .with_param("word", ParameterRule::list(["ab", "code", "loop", "py", "stack"]))
        .with_param("times", ParameterRule::range(2, 5)),
        QuestionTemplate::new(
            "code-output-loop-sum",
            QuestionKind::CodeOutput,
            "medium",
            "python",
            "What value of `total` is printed after the loop finishes?",
            RangeLoopSum,
        )
        .with_code("total = 0\nfor i in range({{start}}, {{end}}):\n    total += i\nprint(total)")
        .with_param("start", ParameterRule::range(0, 5))
        .with_param("end", ParameterRule::stepped(6, 14, 2)),
        QuestionTemplate::new(
            "coding-two-sum",
            QuestionKind::Coding,
            "medium",
            "javascript",
            "Given an array of integers nums = [{{v1}}, {{v2}}, {{v3}}, {{v4}}] and target = {{target}}, return the indices of the two numbers such that they add up to target.",
            TwoSum,
        )
        .with_param("v1", ParameterRule::range(2, 20))
        .with_param("v2", ParameterRule::range(2, 20))
        .with_param("v3", ParameterRule::range(2, 20))
        .with_param("v4", ParameterRule::range(2, 20))
        .with_param("target", ParameterRule::list([10, 15, 20, 25, 30]))
        .with_time_limit(1200),
    ]
}
