// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Extraction of bounding boxes from free-text model replies.

use crate::models::bbox::NormalizedBox;
use anyhow::Result;
use regex::Regex;

/// `[a, b, c, d]` with non-negative decimals and any surrounding whitespace.
const BOX_PATTERN: &str =
    r"\[\s*([\d.]+)\s*,\s*([\d.]+)\s*,\s*([\d.]+)\s*,\s*([\d.]+)\s*\]";

/// Finds bracketed 4-number groups in model output.
///
/// Values are passed through without range checks; a model that answers
/// in pixels produces boxes outside [0, 1].
#[derive(Debug, Clone)]
pub struct ResponseParser {
    pattern: Regex,
}

impl ResponseParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(BOX_PATTERN)?,
        })
    }

    /// All boxes in `text`, in order of appearance.
    pub fn parse(&self, text: &str) -> Vec<NormalizedBox> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| {
                let mut values = [0.0; 4];
                for (slot, value) in values.iter_mut().enumerate() {
                    match caps[slot + 1].parse::<f64>() {
                        Ok(v) => *value = v,
                        Err(_) => {
                            log::debug!("Skipping unparseable group {}", &caps[0]);
                            return None;
                        }
                    }
                }
                Some(NormalizedBox::from(values))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ResponseParser {
        ResponseParser::new().unwrap()
    }

    #[test]
    fn test_parses_groups_in_order() {
        let boxes = parser().parse("[0.1, 0.2, 0.3, 0.4], [0.5,0.6,0.7,0.8]");
        assert_eq!(
            boxes,
            vec![
                NormalizedBox::new(0.1, 0.2, 0.3, 0.4),
                NormalizedBox::new(0.5, 0.6, 0.7, 0.8),
            ]
        );
    }

    #[test]
    fn test_no_groups_yields_empty() {
        assert!(parser().parse("I could not find any objects.").is_empty());
        assert!(parser().parse("").is_empty());
    }

    #[test]
    fn test_skips_group_missing_a_number() {
        let boxes = parser().parse("[0.1, 0.2, 0.3] and [0.2, 0.3, 0.4, 0.5]");
        assert_eq!(boxes, vec![NormalizedBox::new(0.2, 0.3, 0.4, 0.5)]);
    }

    #[test]
    fn test_tolerates_whitespace_and_prose() {
        let text = "Here you go:\n[ 0.05 ,0.1,\n 0.95,  1 ]\nThat's the dog.";
        assert_eq!(parser().parse(text), vec![NormalizedBox::new(0.05, 0.1, 0.95, 1.0)]);
    }

    #[test]
    fn test_out_of_range_values_pass_through() {
        let boxes = parser().parse("[12, 40.5, 300, 2.0]");
        assert_eq!(boxes, vec![NormalizedBox::new(12.0, 40.5, 300.0, 2.0)]);
    }

    #[test]
    fn test_skips_negative_and_unparseable_numbers() {
        let boxes = parser().parse("[-0.1, 0.2, 0.3, 0.4] [1.2.3, 0, 0, 0] [0, 0, 1, 1]");
        assert_eq!(boxes, vec![NormalizedBox::new(0.0, 0.0, 1.0, 1.0)]);
    }
}
