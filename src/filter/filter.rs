use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::{validate_column, FilterWhere};
use super::types::{
    Condition, FilterOp, FilterOrderInfo, FilterValue, FilterWhereInfo, Filterable, SqlResult,
};

/// Compound query over one table. Renders to parameterised SQL for Postgres and
/// evaluates directly against records for the in-memory store.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    table_name: String,
    conditions: Vec<Condition>,
    order_data: Vec<FilterOrderInfo>,
}

impl Filter {
    pub fn new(table_name: impl Into<String>) -> Result<Self, FilterError> {
        let table_name = table_name.into();
        Self::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            conditions: vec![],
            order_data: vec![],
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn where_condition(mut self, condition: Condition) -> Result<Self, FilterError> {
        FilterWhere::validate(&condition)?;
        self.conditions.push(condition);
        Ok(self)
    }

    pub fn where_field(
        self,
        column: &str,
        operator: FilterOp,
        data: impl Into<FilterValue>,
    ) -> Result<Self, FilterError> {
        self.where_condition(field(column, operator, data))
    }

    pub fn where_eq(self, column: &str, data: impl Into<FilterValue>) -> Result<Self, FilterError> {
        self.where_field(column, FilterOp::Eq, data)
    }

    pub fn order(mut self, spec: &str) -> Result<Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(spec)?;
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        let order_clause = FilterOrder::generate(&self.order_data);

        let query = [
            "SELECT *".to_string(),
            format!("FROM \"{}\"", self.table_name),
            format!("WHERE {}", where_result.query),
            order_clause,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        Ok(SqlResult { query, params: where_result.params })
    }

    pub fn to_where_sql(&self) -> Result<SqlResult, FilterError> {
        let (query, params) = FilterWhere::generate(&self.conditions, 0)?;
        Ok(SqlResult { query, params })
    }

    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let where_result = self.to_where_sql()?;
        Ok(SqlResult {
            query: format!(
                "SELECT COUNT(*) AS count FROM \"{}\" WHERE {}",
                self.table_name, where_result.query
            ),
            params: where_result.params,
        })
    }

    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        self.conditions.iter().all(|c| FilterWhere::matches(c, record))
    }

    /// Filter and sort a set of in-memory records
    pub fn apply<T: Filterable + Clone>(&self, records: impl IntoIterator<Item = T>) -> Vec<T> {
        let mut out: Vec<T> = records.into_iter().filter(|r| self.matches(r)).collect();
        out.sort_by(|a, b| FilterOrder::compare(&self.order_data, a, b));
        out
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        if name.is_empty() {
            return Err(FilterError::InvalidTableName("Table name cannot be empty".to_string()));
        }
        validate_column(name)
            .map_err(|_| FilterError::InvalidTableName(format!("Invalid table name format: {}", name)))
    }
}

/// Shorthand for a single-column condition
pub fn field(column: &str, operator: FilterOp, data: impl Into<FilterValue>) -> Condition {
    Condition::Field(FilterWhereInfo {
        column: column.to_string(),
        operator,
        data: data.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::FieldValue;
    use uuid::Uuid;

    #[derive(Clone, Debug)]
    struct Row {
        owner: Uuid,
        name: String,
    }

    impl Filterable for Row {
        fn field(&self, column: &str) -> FieldValue<'_> {
            match column {
                "user_id" => FieldValue::Uuid(Some(self.owner)),
                "name" => FieldValue::Text(Some(&self.name)),
                _ => FieldValue::Missing,
            }
        }
    }

    #[test]
    fn renders_select_with_order() {
        let owner = Uuid::new_v4();
        let sql = Filter::new("folders")
            .unwrap()
            .where_eq("user_id", owner)
            .unwrap()
            .order("name asc")
            .unwrap()
            .to_sql()
            .unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"folders\" WHERE \"user_id\" = $1 ORDER BY \"name\" ASC"
        );
        assert_eq!(sql.params, vec![FilterValue::Uuid(owner)]);
    }

    #[test]
    fn count_sql_without_conditions() {
        let sql = Filter::new("tags").unwrap().to_count_sql().unwrap();
        assert_eq!(sql.query, "SELECT COUNT(*) AS count FROM \"tags\" WHERE 1=1");
    }

    #[test]
    fn apply_filters_and_sorts_in_memory() {
        let owner = Uuid::new_v4();
        let rows = vec![
            Row { owner, name: "b".into() },
            Row { owner: Uuid::new_v4(), name: "a".into() },
            Row { owner, name: "a".into() },
        ];
        let filter = Filter::new("folders")
            .unwrap()
            .where_eq("user_id", owner)
            .unwrap()
            .order("name")
            .unwrap();
        let out = filter.apply(rows);
        let names: Vec<&str> = out.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn rejects_bad_table_name() {
        assert!(matches!(
            Filter::new("notes; DROP"),
            Err(FilterError::InvalidTableName(_))
        ));
    }
}
