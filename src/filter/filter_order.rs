use std::cmp::Ordering;

use super::error::FilterError;
use super::filter_where::validate_column;
use super::types::{FilterOrderInfo, Filterable, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parse an order spec such as `"updated_at desc, name"`
    pub fn validate_and_parse(spec: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in spec.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let mut it = trimmed.split_whitespace();
            if let Some(col) = it.next() {
                validate_column(col)?;
                let dir = it.next().unwrap_or("asc");
                let sort = if dir.eq_ignore_ascii_case("desc") {
                    SortDirection::Desc
                } else {
                    SortDirection::Asc
                };
                out.push(FilterOrderInfo { column: col.to_string(), sort });
            }
        }
        Ok(out)
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("\"{}\" {}", i.column, i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }

    /// Comparator equivalent to the generated ORDER BY
    pub fn compare<T: Filterable>(infos: &[FilterOrderInfo], a: &T, b: &T) -> Ordering {
        for info in infos {
            let ord = a.field(&info.column).sort_cmp(&b.field(&info.column));
            let ord = match info.sort {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}
