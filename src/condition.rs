//! Expected-value conditions guarding a put.
//!
//! Generated key attributes are guarded with "must not exist" so a fresh key
//! can never overwrite an existing item. Callers can layer their own
//! conditions on top; [`merge_conditions`] decides whether the two sets can
//! be combined.

use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::{BTreeMap, HashMap};

use crate::error::ValidationError;
use crate::keys::Item;

/// Boolean operator joining the expectations of a [`ConditionSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionalOperator {
    /// Every expectation must hold
    #[default]
    And,
    /// At least one expectation must hold
    Or,
}

impl ConditionalOperator {
    fn keyword(self) -> &'static str {
        match self {
            ConditionalOperator::And => " AND ",
            ConditionalOperator::Or => " OR ",
        }
    }
}

/// Expectation on a single attribute of the stored item
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedValue {
    /// The attribute must be absent (or the item must not exist)
    NotExists,
    /// The attribute must exist and equal the value
    Equals(AttributeValue),
}

impl ExpectedValue {
    /// Evaluate against the current item, `None` meaning no item is stored
    ///
    /// Numbers compare by value, so `N("1")` equals `N("1.0")`.
    pub fn matches(&self, current: Option<&AttributeValue>) -> bool {
        match self {
            ExpectedValue::NotExists => current.is_none(),
            ExpectedValue::Equals(expected) => current.is_some_and(|c| same_value(c, expected)),
        }
    }
}

/// Attribute equality as the service sees it: numbers by value, the rest exactly
pub(crate) fn same_value(a: &AttributeValue, b: &AttributeValue) -> bool {
    match (a, b) {
        (AttributeValue::N(a), AttributeValue::N(b)) => normalize_number(a) == normalize_number(b),
        _ => a == b,
    }
}

/// Canonical text of a number: `-1.50e2`, `-150` and `-150.0` all become `-15e1`
///
/// Text that does not parse as a number is returned unchanged.
pub(crate) fn normalize_number(number: &str) -> String {
    let trimmed = number.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (mantissa, mut exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => match exponent.parse::<i64>() {
            Ok(exponent) => (mantissa, exponent),
            Err(_) => return number.to_string(),
        },
        None => (unsigned, 0),
    };

    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if integer.len() + fraction.len() == 0 || !all_digits(integer) || !all_digits(fraction) {
        return number.to_string();
    }

    let digits = format!("{integer}{fraction}");
    exponent -= fraction.len() as i64;

    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return "0".to_string();
    }
    let trimmed_digits = significant.trim_end_matches('0');
    exponent += (significant.len() - trimmed_digits.len()) as i64;

    let sign = if negative { "-" } else { "" };
    format!("{sign}{trimmed_digits}e{exponent}")
}

/// Expectations keyed by attribute name, joined by one operator
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionSet {
    /// Operator joining the expectations
    pub operator: ConditionalOperator,
    /// Expectation per attribute
    pub expected: BTreeMap<String, ExpectedValue>,
}

impl ConditionSet {
    /// Empty set joined by `operator`
    pub fn new(operator: ConditionalOperator) -> Self {
        Self {
            operator,
            expected: BTreeMap::new(),
        }
    }

    /// Empty AND set
    pub fn and() -> Self {
        Self::new(ConditionalOperator::And)
    }

    /// Empty OR set
    pub fn or() -> Self {
        Self::new(ConditionalOperator::Or)
    }

    /// Replace the operator
    pub fn with_operator(mut self, operator: ConditionalOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Add or replace the expectation for `attribute`
    pub fn expect(mut self, attribute: impl Into<String>, expected: ExpectedValue) -> Self {
        let _ = self.expected.insert(attribute.into(), expected);
        self
    }

    /// Require `attribute` to be absent
    pub fn not_exists(self, attribute: impl Into<String>) -> Self {
        self.expect(attribute, ExpectedValue::NotExists)
    }

    /// Require `attribute` to equal `value`
    pub fn equals(self, attribute: impl Into<String>, value: AttributeValue) -> Self {
        self.expect(attribute, ExpectedValue::Equals(value))
    }

    /// True when no expectation is set
    pub fn is_empty(&self) -> bool {
        self.expected.is_empty()
    }

    /// Evaluate the set against the stored item, `None` meaning absent
    ///
    /// An empty set always holds.
    pub fn evaluate(&self, current: Option<&Item>) -> bool {
        if self.expected.is_empty() {
            return true;
        }

        let mut outcomes = self.expected.iter().map(|(attribute, expected)| {
            expected.matches(current.and_then(|item| item.get(attribute)))
        });

        match self.operator {
            ConditionalOperator::And => outcomes.all(|holds| holds),
            ConditionalOperator::Or => outcomes.any(|holds| holds),
        }
    }

    /// Render as a DynamoDB condition expression
    ///
    /// Every attribute name goes through a `#cN` placeholder and every value
    /// through `:cN`, so reserved words such as `key` are safe to use.
    pub fn to_expression(&self) -> ConditionExpression {
        let mut expression = ConditionExpression::default();
        let mut clauses = Vec::with_capacity(self.expected.len());

        for (index, (attribute, expected)) in self.expected.iter().enumerate() {
            let name = format!("#c{index}");
            let _ = expression.names.insert(name.clone(), attribute.clone());

            match expected {
                ExpectedValue::NotExists => clauses.push(format!("attribute_not_exists({name})")),
                ExpectedValue::Equals(value) => {
                    let placeholder = format!(":c{index}");
                    clauses.push(format!("{name} = {placeholder}"));
                    let _ = expression.values.insert(placeholder, value.clone());
                }
            }
        }

        expression.expression = clauses.join(self.operator.keyword());
        expression
    }
}

/// A rendered condition expression with its placeholders
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionExpression {
    /// Expression text
    pub expression: String,
    /// `#cN` placeholder to attribute name
    pub names: HashMap<String, String>,
    /// `:cN` placeholder to value
    pub values: HashMap<String, AttributeValue>,
}

/// Combine the guard on generated attributes with caller conditions
///
/// - no generated attributes and no caller set: `None`, the put is unconditional
/// - caller AND set: merged by attribute name, caller entries win
/// - caller OR set: used as given, but only if it names every generated
///   attribute; otherwise the combination is rejected before any request
pub fn merge_conditions(
    generated: &[&str],
    caller: Option<&ConditionSet>,
) -> Result<Option<ConditionSet>, ValidationError> {
    let implicit = generated
        .iter()
        .fold(ConditionSet::and(), |set, attribute| set.not_exists(*attribute));

    let Some(caller) = caller else {
        return Ok((!implicit.is_empty()).then_some(implicit));
    };

    match caller.operator {
        ConditionalOperator::And => {
            let mut merged = implicit;
            merged.expected.extend(
                caller
                    .expected
                    .iter()
                    .map(|(attribute, expected)| (attribute.clone(), expected.clone())),
            );
            Ok((!merged.is_empty()).then_some(merged))
        }
        ConditionalOperator::Or => {
            let uncovered: Vec<String> = implicit
                .expected
                .keys()
                .filter(|attribute| !caller.expected.contains_key(*attribute))
                .cloned()
                .collect();

            if !uncovered.is_empty() {
                return Err(ValidationError::IncompatibleConditions { uncovered });
            }

            Ok((!caller.is_empty()).then(|| caller.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> AttributeValue {
        AttributeValue::S(value.to_string())
    }

    fn stored(pairs: &[(&str, &str)]) -> Item {
        pairs.iter().map(|(k, v)| (k.to_string(), s(v))).collect()
    }

    #[test]
    fn test_implicit_guard_only() {
        let merged = merge_conditions(&["key", "rangeKey"], None)
            .unwrap()
            .unwrap();

        assert_eq!(merged.operator, ConditionalOperator::And);
        assert_eq!(merged.expected.len(), 2);
        assert_eq!(merged.expected["key"], ExpectedValue::NotExists);
    }

    #[test]
    fn test_nothing_generated_is_unconditional() {
        assert_eq!(merge_conditions(&[], None), Ok(None));
        assert_eq!(merge_conditions(&[], Some(&ConditionSet::and())), Ok(None));
    }

    #[test]
    fn test_and_merge_adds_and_replaces() {
        let caller = ConditionSet::and()
            .not_exists("otherAttribute")
            .equals("key", s("k1"));

        let merged = merge_conditions(&["key", "rangeKey"], Some(&caller))
            .unwrap()
            .unwrap();

        assert_eq!(merged.operator, ConditionalOperator::And);
        assert_eq!(merged.expected.len(), 3);
        assert_eq!(merged.expected["key"], ExpectedValue::Equals(s("k1")));
        assert_eq!(merged.expected["rangeKey"], ExpectedValue::NotExists);
        assert_eq!(merged.expected["otherAttribute"], ExpectedValue::NotExists);
    }

    #[test]
    fn test_partial_or_rejected() {
        let caller = ConditionSet::or().not_exists("otherAttribute").not_exists("key");

        let err = merge_conditions(&["key", "rangeKey"], Some(&caller)).unwrap_err();

        assert_eq!(
            err,
            ValidationError::IncompatibleConditions {
                uncovered: vec!["rangeKey".to_string()]
            }
        );
    }

    #[test]
    fn test_covering_or_replaces_guard() {
        let caller = ConditionSet::or()
            .not_exists("otherAttribute")
            .not_exists("key")
            .not_exists("rangeKey");

        let merged = merge_conditions(&["key", "rangeKey"], Some(&caller))
            .unwrap()
            .unwrap();

        assert_eq!(merged, caller);
    }

    #[test]
    fn test_or_without_generated_keys_is_passed_through() {
        let caller = ConditionSet::or().equals("status", s("draft"));

        assert_eq!(merge_conditions(&[], Some(&caller)), Ok(Some(caller.clone())));
    }

    #[test]
    fn test_evaluate_against_absent_item() {
        let guard = ConditionSet::and().not_exists("key").not_exists("rangeKey");
        assert!(guard.evaluate(None));

        let equals = ConditionSet::or()
            .equals("key", s("non-existent-value"))
            .equals("rangeKey", s("non-existent-value"));
        assert!(!equals.evaluate(None));
    }

    #[test]
    fn test_evaluate_against_stored_item() {
        let item = stored(&[("key", "k"), ("rangeKey", "r"), ("status", "draft")]);

        let guard = ConditionSet::and().not_exists("key").not_exists("rangeKey");
        assert!(!guard.evaluate(Some(&item)));

        let or = ConditionSet::or()
            .not_exists("key")
            .equals("status", s("draft"));
        assert!(or.evaluate(Some(&item)));

        let and = ConditionSet::and()
            .equals("key", s("k"))
            .equals("status", s("published"));
        assert!(!and.evaluate(Some(&item)));

        assert!(ConditionSet::or().evaluate(Some(&item)));
    }

    #[test]
    fn test_normalize_number() {
        assert_eq!(normalize_number("150"), "15e1");
        assert_eq!(normalize_number("150.00"), "15e1");
        assert_eq!(normalize_number("1.5E2"), "15e1");
        assert_eq!(normalize_number("-0.015"), "-15e-3");
        assert_eq!(normalize_number("+7"), "7e0");
        assert_eq!(normalize_number("0.000"), "0");
        assert_eq!(normalize_number("-0"), "0");
        assert_eq!(normalize_number("abc"), "abc");
        assert_eq!(normalize_number("1e"), "1e");
    }

    #[test]
    fn test_numbers_match_by_value() {
        let item: Item = [("count".to_string(), AttributeValue::N("10".into()))]
            .into_iter()
            .collect();

        let equals = ConditionSet::and().equals("count", AttributeValue::N("1.0e1".into()));
        assert!(equals.evaluate(Some(&item)));

        let differs = ConditionSet::and().equals("count", AttributeValue::N("10.5".into()));
        assert!(!differs.evaluate(Some(&item)));

        // A string never equals a number with the same text
        let text = ConditionSet::and().equals("count", s("10"));
        assert!(!text.evaluate(Some(&item)));
    }

    #[test]
    fn test_to_expression() {
        let rendered = ConditionSet::or()
            .not_exists("key")
            .equals("otherAttribute", s("blah"))
            .to_expression();

        // BTreeMap ordering: "key" < "otherAttribute"
        assert_eq!(
            rendered.expression,
            "attribute_not_exists(#c0) OR #c1 = :c1"
        );
        assert_eq!(rendered.names["#c0"], "key");
        assert_eq!(rendered.names["#c1"], "otherAttribute");
        assert_eq!(rendered.values.len(), 1);
        assert_eq!(rendered.values[":c1"], s("blah"));
    }

    #[test]
    fn test_to_expression_and() {
        let rendered = ConditionSet::and()
            .not_exists("key")
            .not_exists("rangeKey")
            .to_expression();

        assert_eq!(
            rendered.expression,
            "attribute_not_exists(#c0) AND attribute_not_exists(#c1)"
        );
        assert!(rendered.values.is_empty());
    }
}
