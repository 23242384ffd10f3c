// @file: maanulth_reporting/src/connectors/bcgw.rs
// @description: Oracle connection to the BC Geographic Warehouse, exposed as a Warehouse.
// @author: LAS.

use crate::core::errors::{ReportError, ReportResult};
use crate::core::interfaces::Warehouse;
use crate::core::models::{Table, Value};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, info};
use oracle::sql_type::OracleType;
use oracle::{Connection, Row};
use std::sync::Arc;


//
// CONNECTION PARAMETERS
//

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Keep the password out of debug output.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}


//
// WAREHOUSE IMPLEMENTATION
//

pub struct BcgwWarehouse {
    connection: Arc<Connection>,
    connect_string: String,
    username: String,
}

impl BcgwWarehouse {
    pub async fn connect(credentials: Credentials, connect_string: &str) -> ReportResult<Self> {
        let target = connect_string.to_string();
        let username = credentials.username.clone();

        // #1. Oracle client calls block; keep them off the runtime threads
        let connection = tokio::task::spawn_blocking(move || {
            Connection::connect(&credentials.username, &credentials.password, &target)
        })
        .await
        .map_err(|e| ReportError::Connection(e.to_string()))?
        .map_err(|e| ReportError::Connection(e.to_string()))?;

        info!("Successfully connected to the database ({}@{})", username, connect_string);

        Ok(Self {
            connection: Arc::new(connection),
            connect_string: connect_string.to_string(),
            username,
        })
    }

    pub async fn close(self) -> ReportResult<()> {
        let connection = self.connection;
        tokio::task::spawn_blocking(move || connection.close())
            .await
            .map_err(|e| ReportError::Connection(e.to_string()))?
            .map_err(|e| ReportError::Connection(e.to_string()))?;
        info!("Database connection closed");
        Ok(())
    }
}

#[async_trait]
impl Warehouse for BcgwWarehouse {
    async fn fetch(&self, sql: &str) -> ReportResult<Table> {
        let connection = self.connection.clone();
        let query = sql.to_string();

        tokio::task::spawn_blocking(move || run_query(&connection, &query))
            .await
            .map_err(|e| ReportError::Query { query: summarize(sql), message: e.to_string() })?
    }

    fn describe(&self) -> String {
        format!("{}@{}", self.username, self.connect_string)
    }
}


//
// INTERNAL HELPERS
//

fn run_query(connection: &Connection, sql: &str) -> ReportResult<Table> {
    let query_error = |e: oracle::Error| ReportError::Query { query: summarize(sql), message: e.to_string() };

    let result_set = connection.query(sql, &[]).map_err(query_error)?;
    let column_types: Vec<OracleType> = result_set.column_info().iter()
        .map(|c| c.oracle_type().clone())
        .collect();
    let mut table = Table::new(result_set.column_info().iter().map(|c| c.name().to_string()));

    for row in result_set {
        let row = row.map_err(query_error)?;
        let mut values = Vec::with_capacity(column_types.len());
        for (idx, oracle_type) in column_types.iter().enumerate() {
            values.push(read_cell(&row, idx, oracle_type).map_err(query_error)?);
        }
        table.push_row(values)?;
    }

    debug!("Query returned {} rows", table.len());
    Ok(table)
}

fn read_cell(row: &Row, idx: usize, oracle_type: &OracleType) -> oracle::Result<Value> {
    let value = match oracle_type {
        OracleType::Number(precision, 0) if *precision > 0 => row.get::<usize, Option<i64>>(idx)?.into(),
        OracleType::Number(_, _)
        | OracleType::Float(_)
        | OracleType::BinaryFloat
        | OracleType::BinaryDouble => row.get::<usize, Option<f64>>(idx)?.into(),
        OracleType::Date
        | OracleType::Timestamp(_)
        | OracleType::TimestampTZ(_)
        | OracleType::TimestampLTZ(_) => match row.get::<usize, Option<NaiveDateTime>>(idx)? {
            Some(dt) => Value::DateTime(dt),
            None => Value::Null,
        },
        _ => row.get::<usize, Option<String>>(idx)?.into(),
    };
    Ok(value)
}

// First line of a query, for error messages.
fn summarize(sql: &str) -> String {
    sql.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .chars()
        .take(80)
        .collect()
}
