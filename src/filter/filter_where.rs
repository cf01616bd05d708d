use super::error::FilterError;
use super::types::{Condition, FieldValue, FilterOp, FilterValue, FilterWhereInfo, Filterable};

pub struct FilterWhere {
    param_values: Vec<FilterValue>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Render conditions joined with AND; returns the clause and its parameters
    pub fn generate(
        conditions: &[Condition],
        starting_param_index: usize,
    ) -> Result<(String, Vec<FilterValue>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        let clause = filter_where.build_all(conditions, " AND ")?;
        Ok((clause, filter_where.param_values))
    }

    pub fn validate(condition: &Condition) -> Result<(), FilterError> {
        match condition {
            Condition::Field(info) => {
                validate_column(&info.column)?;
                match (info.operator, &info.data) {
                    (FilterOp::In, FilterValue::List(_)) => Ok(()),
                    (FilterOp::In, _) => Err(FilterError::InvalidOperatorData(format!(
                        "IN on `{}` requires a list",
                        info.column
                    ))),
                    (FilterOp::ILike, FilterValue::Text(_)) => Ok(()),
                    (FilterOp::ILike, _) => Err(FilterError::InvalidOperatorData(format!(
                        "ILIKE on `{}` requires text",
                        info.column
                    ))),
                    (_, FilterValue::List(_)) => Err(FilterError::InvalidOperatorData(format!(
                        "list value is only valid with IN on `{}`",
                        info.column
                    ))),
                    (FilterOp::Contains, FilterValue::Null) => Err(FilterError::InvalidOperatorData(
                        format!("array containment on `{}` requires a value", info.column),
                    )),
                    _ => Ok(()),
                }
            }
            Condition::And(parts) | Condition::Or(parts) => {
                parts.iter().try_for_each(Self::validate)
            }
        }
    }

    fn build_all(&mut self, conditions: &[Condition], joiner: &str) -> Result<String, FilterError> {
        let mut parts = Vec::with_capacity(conditions.len());
        for condition in conditions {
            parts.push(self.build(condition)?);
        }
        if parts.is_empty() {
            return Ok("1=1".to_string());
        }
        Ok(parts.join(joiner))
    }

    fn build(&mut self, condition: &Condition) -> Result<String, FilterError> {
        match condition {
            Condition::Field(info) => self.build_sql_condition(info),
            Condition::And(parts) => {
                if parts.is_empty() {
                    return Ok("1=1".to_string());
                }
                Ok(format!("({})", self.build_all(parts, " AND ")?))
            }
            Condition::Or(parts) => {
                if parts.is_empty() {
                    return Ok("1=0".to_string());
                }
                Ok(format!("({})", self.build_all(parts, " OR ")?))
            }
        }
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let quoted_column = format!("\"{}\"", condition.column);
        match condition.operator {
            FilterOp::Eq => match &condition.data {
                FilterValue::Null => Ok(format!("{} IS NULL", quoted_column)),
                data => Ok(format!("{} = {}", quoted_column, self.param(data.clone()))),
            },
            FilterOp::ILike => match &condition.data {
                FilterValue::Text(term) => {
                    let pattern = format!("%{}%", escape_like(term));
                    Ok(format!("{} ILIKE {}", quoted_column, self.param(FilterValue::Text(pattern))))
                }
                _ => Err(FilterError::InvalidOperatorData("ILIKE requires text".to_string())),
            },
            FilterOp::In => match &condition.data {
                FilterValue::List(values) => {
                    if values.is_empty() {
                        return Ok("1=0".to_string());
                    }
                    let params: Vec<String> = values.iter().map(|v| self.param(v.clone())).collect();
                    Ok(format!("{} IN ({})", quoted_column, params.join(", ")))
                }
                _ => Err(FilterError::InvalidOperatorData("IN requires a list".to_string())),
            },
            FilterOp::Contains => Ok(format!(
                "{} = ANY({})",
                self.param(condition.data.clone()),
                quoted_column
            )),
        }
    }

    fn param(&mut self, value: FilterValue) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }

    /// Evaluate a condition against a record held in memory
    pub fn matches<T: Filterable + ?Sized>(condition: &Condition, record: &T) -> bool {
        match condition {
            Condition::Field(info) => Self::matches_field(info, record),
            Condition::And(parts) => parts.iter().all(|c| Self::matches(c, record)),
            Condition::Or(parts) => parts.iter().any(|c| Self::matches(c, record)),
        }
    }

    fn matches_field<T: Filterable + ?Sized>(info: &FilterWhereInfo, record: &T) -> bool {
        let field = record.field(&info.column);
        match info.operator {
            FilterOp::Eq => value_equals(&field, &info.data),
            FilterOp::ILike => match (&field, &info.data) {
                (FieldValue::Text(Some(haystack)), FilterValue::Text(needle)) => {
                    haystack.to_lowercase().contains(&needle.to_lowercase())
                }
                _ => false,
            },
            FilterOp::In => match &info.data {
                FilterValue::List(values) => values.iter().any(|v| value_equals(&field, v)),
                _ => false,
            },
            FilterOp::Contains => match (&field, &info.data) {
                (FieldValue::UuidList(ids), FilterValue::Uuid(id)) => ids.contains(id),
                _ => false,
            },
        }
    }
}

fn value_equals(field: &FieldValue<'_>, value: &FilterValue) -> bool {
    match (field, value) {
        (FieldValue::Uuid(a), FilterValue::Uuid(b)) => a.as_ref() == Some(b),
        (FieldValue::Uuid(a), FilterValue::Null) => a.is_none(),
        (FieldValue::Text(a), FilterValue::Text(b)) => *a == Some(b.as_str()),
        (FieldValue::Text(a), FilterValue::Null) => a.is_none(),
        (FieldValue::Missing, FilterValue::Null) => true,
        _ => false,
    }
}

/// Escape LIKE wildcards so a search term is matched literally
fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub(crate) fn validate_column(column: &str) -> Result<(), FilterError> {
    let mut chars = column.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !valid_start || !column.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FilterError::InvalidColumn(format!(
            "Invalid column name format: {}",
            column
        )));
    }
    Ok(())
}
