use sqlx::{self, postgres::PgArguments, FromRow, PgPool, Row};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, FilterValue, SqlResult};

/// Executes a [`Filter`] against Postgres, binding its typed parameters
pub struct QueryBuilder<T> {
    filter: Filter,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
{
    pub fn new(filter: Filter) -> Self {
        Self {
            filter,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_all(self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let sql_result = self.sql_result()?;
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let rows = q.fetch_all(pool).await?;
        Ok(rows)
    }

    pub async fn select_optional(self, pool: &PgPool) -> Result<Option<T>, DatabaseError> {
        let sql_result = self.sql_result()?;
        let mut q = sqlx::query_as::<_, T>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let row = q.fetch_optional(pool).await?;
        Ok(row)
    }

    pub async fn count(self, pool: &PgPool) -> Result<i64, DatabaseError> {
        let sql_result = self.filter.to_count_sql().map_err(query_error)?;
        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    /// DELETE every row the filter matches; returns the number removed
    pub async fn delete(self, pool: &PgPool) -> Result<u64, DatabaseError> {
        let where_result = self.filter.to_where_sql().map_err(query_error)?;
        let sql = format!(
            "DELETE FROM \"{}\" WHERE {}",
            self.filter.table_name(),
            where_result.query
        );
        let mut q = sqlx::query(&sql);
        for p in where_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let result = q.execute(pool).await?;
        Ok(result.rows_affected())
    }

    fn sql_result(&self) -> Result<SqlResult, DatabaseError> {
        self.filter.to_sql().map_err(query_error)
    }
}

fn query_error(err: crate::filter::FilterError) -> DatabaseError {
    DatabaseError::Sqlx(sqlx::Error::Protocol(format!("invalid filter: {}", err)))
}

pub(crate) fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &FilterValue,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        FilterValue::Null => q.bind(None::<Uuid>),
        FilterValue::Uuid(id) => q.bind(*id),
        FilterValue::Text(s) => q.bind(s.clone()),
        // Lists are expanded into individual placeholders by FilterWhere
        FilterValue::List(_) => q,
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &FilterValue,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        FilterValue::Null => q.bind(None::<Uuid>),
        FilterValue::Uuid(id) => q.bind(*id),
        FilterValue::Text(s) => q.bind(s.clone()),
        FilterValue::List(_) => q,
    }
}
