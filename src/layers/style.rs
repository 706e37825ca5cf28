//! Typed builders for the paint expressions the demos use.
//!
//! Only `step` gets a builder: it drives both choropleth colouring and the
//! legend panel. Everything else is passed through as raw style JSON.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// `["step", ["get", property], base, t1, v1, t2, v2, ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepExpression {
    pub property: String,
    pub base: Value,
    /// Ascending thresholds with the output used from that threshold upward
    pub stops: Vec<(f64, Value)>,
}

/// One row of a legend panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub output: Value,
}

impl StepExpression {
    pub fn new(property: impl Into<String>, base: impl Into<Value>) -> Self {
        Self {
            property: property.into(),
            base: base.into(),
            stops: Vec::new(),
        }
    }

    pub fn stop(mut self, threshold: f64, output: impl Into<Value>) -> Self {
        self.stops.push((threshold, output.into()));
        self
    }

    pub fn to_expression(&self) -> Value {
        let mut expression = vec![json!("step"), json!(["get", self.property]), self.base.clone()];
        for (threshold, output) in &self.stops {
            expression.push(json!(threshold));
            expression.push(output.clone());
        }
        Value::Array(expression)
    }

    /// Parses the `step` form produced by [`to_expression`](Self::to_expression)
    pub fn from_expression(expression: &Value) -> Option<Self> {
        let parts = expression.as_array()?;
        if parts.first()?.as_str()? != "step" {
            return None;
        }
        let property = match parts.get(1)?.as_array()?.as_slice() {
            [get, property] if get == "get" => property.as_str()?.to_string(),
            _ => return None,
        };

        let mut step = Self::new(property, parts.get(2)?.clone());
        for pair in parts[3..].chunks(2) {
            match pair {
                [threshold, output] => step.stops.push((threshold.as_f64()?, output.clone())),
                _ => return None,
            }
        }
        Some(step)
    }

    /// Output selected for an input value
    pub fn evaluate(&self, input: f64) -> &Value {
        self.stops
            .iter()
            .take_while(|(threshold, _)| input >= *threshold)
            .last()
            .map_or(&self.base, |(_, output)| output)
    }

    /// Legend rows, lowest band first
    pub fn legend(&self) -> Vec<LegendEntry> {
        let mut entries = Vec::with_capacity(self.stops.len() + 1);
        let mut lower: Option<f64> = None;
        let mut output = &self.base;

        for (threshold, next) in &self.stops {
            let label = match lower {
                None => format!("< {}", threshold),
                Some(lower) => format!("{} - {}", lower, threshold),
            };
            entries.push(LegendEntry {
                label,
                output: output.clone(),
            });
            lower = Some(*threshold);
            output = next;
        }

        let label = match lower {
            Some(lower) => format!("{}+", lower),
            None => "all".to_string(),
        };
        entries.push(LegendEntry {
            label,
            output: output.clone(),
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_colors() -> StepExpression {
        StepExpression::new("value", "#888888")
            .stop(1000.0, "red")
            .stop(10000.0, "pink")
            .stop(50000.0, "blue")
            .stop(100000.0, "green")
    }

    #[test]
    fn test_expression_shape() {
        let expression = StepExpression::new("price", "#51bbd6")
            .stop(100.0, "#f1f075")
            .to_expression();
        assert_eq!(
            expression,
            json!(["step", ["get", "price"], "#51bbd6", 100.0, "#f1f075"])
        );
    }

    #[test]
    fn test_evaluate_picks_band() {
        let colors = state_colors();
        assert_eq!(colors.evaluate(10.0), "#888888");
        assert_eq!(colors.evaluate(1000.0), "red");
        assert_eq!(colors.evaluate(12000.0), "pink");
        assert_eq!(colors.evaluate(250000.0), "green");
    }

    #[test]
    fn test_parse_back_expression() {
        let colors = state_colors();
        assert_eq!(StepExpression::from_expression(&colors.to_expression()), Some(colors));
        assert!(StepExpression::from_expression(&json!(["interpolate", ["linear"]])).is_none());
        assert!(StepExpression::from_expression(&json!(["step", ["get", "value"], "red", 10])).is_none());
    }

    #[test]
    fn test_legend_rows() {
        let legend = state_colors().legend();
        assert_eq!(legend.len(), 5);
        assert_eq!(legend[0].label, "< 1000");
        assert_eq!(legend[1].label, "1000 - 10000");
        assert_eq!(legend[4].label, "100000+");
        assert_eq!(legend[4].output, "green");
    }
}
