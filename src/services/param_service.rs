use std::collections::BTreeMap;

use rand::Rng;
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::models::question_template::{ParamSet, ParameterRule};

/// Draws one concrete value for a generation rule.
pub fn generate_value<R>(rule: &ParameterRule, rng: &mut R) -> Result<JsonValue>
where
    R: Rng + ?Sized,
{
    match rule {
        ParameterRule::Range { min, max, step } => {
            let (min, max, step) = (*min, *max, *step);
            if step <= 0 {
                return Err(Error::InvalidRule(format!(
                    "range step must be positive, got {}",
                    step
                )));
            }
            if max < min {
                return Err(Error::InvalidRule(format!(
                    "range max {} is below min {}",
                    max, min
                )));
            }
            let width = max.checked_sub(min).ok_or_else(|| {
                Error::InvalidRule(format!("range [{}, {}] is too wide", min, max))
            })?;
            let span = width / step;
            let offset = rng.gen_range(0..=span);
            // offset * step <= width, so this cannot overflow
            Ok(JsonValue::from(min + offset * step))
        }
        ParameterRule::List { values } => {
            if values.is_empty() {
                return Err(Error::InvalidRule(
                    "list rule requires at least one value".to_string(),
                ));
            }
            let index = rng.gen_range(0..values.len());
            Ok(values[index].clone())
        }
        ParameterRule::Custom(generator) => generator.generate().map_err(Error::Generator),
    }
}

/// Generates a value for every declared parameter. Fields are independent.
pub fn generate_params<R>(rules: &BTreeMap<String, ParameterRule>, rng: &mut R) -> Result<ParamSet>
where
    R: Rng + ?Sized,
{
    rules
        .iter()
        .map(|(name, rule)| Ok((name.clone(), generate_value(rule, rng)?)))
        .collect()
}
