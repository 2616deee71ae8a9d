//! BigQuery REST client.
//!
//! Issues synchronous `jobs.query` requests with named parameters and
//! decodes the positional row format (`rows[].f[].v` zipped against
//! `schema.fields[].name`) into name-keyed [`Row`]s.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{WarehouseConfig, WarehouseError, retry};

/// Per-request timeout hint sent to the warehouse, in milliseconds.
const QUERY_TIMEOUT_MS: u64 = 30_000;

/// Upper bound on rows fetched per query. Pagination is intentionally not
/// implemented; a `pageToken` in the response is logged and the partial
/// result returned.
const MAX_RESULTS: u64 = 10_000;

/// A named query parameter.
#[derive(Debug, Clone, Serialize)]
pub struct QueryParameter {
    name: String,
    #[serde(rename = "parameterType")]
    parameter_type: ParameterType,
    #[serde(rename = "parameterValue")]
    parameter_value: ParameterValue,
}

#[derive(Debug, Clone, Serialize)]
struct ParameterType {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct ParameterValue {
    value: String,
}

impl QueryParameter {
    fn new(name: &str, kind: &'static str, value: String) -> Self {
        Self {
            name: name.to_string(),
            parameter_type: ParameterType { kind },
            parameter_value: ParameterValue { value },
        }
    }

    /// A `STRING` parameter.
    #[must_use]
    pub fn string(name: &str, value: &str) -> Self {
        Self::new(name, "STRING", value.to_string())
    }

    /// A `FLOAT64` parameter.
    #[must_use]
    pub fn float(name: &str, value: f64) -> Self {
        Self::new(name, "FLOAT64", value.to_string())
    }

    /// An `INT64` parameter.
    #[must_use]
    pub fn int(name: &str, value: i64) -> Self {
        Self::new(name, "INT64", value.to_string())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    query: &'a str,
    use_legacy_sql: bool,
    timeout_ms: u64,
    max_results: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    query_parameters: Vec<QueryParameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameter_mode: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    schema: Option<TableSchema>,
    #[serde(default)]
    rows: Option<Vec<TableRow>>,
    #[serde(default)]
    job_complete: Option<bool>,
    #[serde(default)]
    page_token: Option<String>,
}

#[derive(Deserialize)]
struct TableSchema {
    fields: Vec<FieldSchema>,
}

#[derive(Deserialize)]
struct FieldSchema {
    name: String,
}

#[derive(Deserialize)]
struct TableRow {
    f: Vec<Cell>,
}

#[derive(Deserialize)]
struct Cell {
    #[serde(default)]
    v: serde_json::Value,
}

/// A decoded result row: column name to raw cell text.
///
/// The warehouse serializes every scalar as a string; typed accessors parse
/// on demand and `require_*` variants fail with the column named.
#[derive(Debug, Clone, Default)]
pub struct Row {
    values: BTreeMap<String, Option<String>>,
}

impl Row {
    /// Builds a row from explicit column/value pairs. Test seam.
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, Option<&str>)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.map(ToString::to_string)))
                .collect(),
        }
    }

    /// Raw text of a column, if present and non-null.
    #[must_use]
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(Option::as_deref)
    }

    /// Column parsed as `f64`, if present and parseable.
    #[must_use]
    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get_str(column).and_then(|s| s.parse().ok())
    }

    /// Column parsed as `u64`, truncating a trailing fraction if the
    /// warehouse serialized an integer column as a float.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn get_u64(&self, column: &str) -> Option<u64> {
        let s = self.get_str(column)?;
        s.parse::<u64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u64))
    }

    /// Column parsed as `u32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn get_u32(&self, column: &str) -> Option<u32> {
        self.get_u64(column).map(|v| v.min(u64::from(u32::MAX)) as u32)
    }

    /// Column parsed as `bool` (`true`/`false` as sent by the warehouse).
    #[must_use]
    pub fn get_bool(&self, column: &str) -> Option<bool> {
        self.get_str(column).and_then(|s| s.parse().ok())
    }

    fn missing(column: &str) -> WarehouseError {
        WarehouseError::Decode {
            column: column.to_string(),
            reason: "missing or null".to_string(),
        }
    }

    /// Raw text of a required column.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::Decode`] if the column is missing or null.
    pub fn require_str(&self, column: &str) -> Result<&str, WarehouseError> {
        self.get_str(column).ok_or_else(|| Self::missing(column))
    }

    /// Required column parsed as `f64`.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::Decode`] if missing, null, or unparseable.
    pub fn require_f64(&self, column: &str) -> Result<f64, WarehouseError> {
        self.get_f64(column).ok_or_else(|| Self::missing(column))
    }

    /// Required column parsed as `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::Decode`] if missing, null, or unparseable.
    pub fn require_u64(&self, column: &str) -> Result<u64, WarehouseError> {
        self.get_u64(column).ok_or_else(|| Self::missing(column))
    }

    /// Required column parsed as `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError::Decode`] if missing, null, or unparseable.
    pub fn require_u32(&self, column: &str) -> Result<u32, WarehouseError> {
        self.get_u32(column).ok_or_else(|| Self::missing(column))
    }
}

fn cell_to_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn decode_rows(response: QueryResponse) -> Result<Vec<Row>, WarehouseError> {
    if response.job_complete == Some(false) {
        return Err(WarehouseError::Incomplete);
    }
    if response.page_token.is_some() {
        log::warn!("Query result exceeds {MAX_RESULTS} rows; returning the first page only");
    }

    let Some(schema) = response.schema else {
        return Ok(Vec::new());
    };
    let names: Vec<String> = schema.fields.into_iter().map(|f| f.name).collect();

    Ok(response
        .rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| Row {
            values: names
                .iter()
                .cloned()
                .zip(row.f.into_iter().map(|cell| cell_to_text(cell.v)))
                .collect(),
        })
        .collect())
}

/// Thin client for the BigQuery `jobs.query` endpoint.
pub struct BigQueryClient {
    http: reqwest::Client,
    config: WarehouseConfig,
}

impl BigQueryClient {
    /// Creates a client for the given configuration.
    #[must_use]
    pub fn new(config: WarehouseConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Fully-qualified table reference for SQL interpolation.
    #[must_use]
    pub fn table(&self, name: &str) -> String {
        format!(
            "`{}.{}.{}`",
            self.config.project_id, self.config.dataset, name
        )
    }

    /// Runs a SQL query with named parameters and returns the decoded rows.
    ///
    /// # Errors
    ///
    /// Returns [`WarehouseError`] if the request fails, the warehouse
    /// reports an error, or the job does not complete in time.
    pub async fn query(
        &self,
        sql: &str,
        params: Vec<QueryParameter>,
    ) -> Result<Vec<Row>, WarehouseError> {
        let url = format!(
            "{}/bigquery/v2/projects/{}/queries",
            self.config.endpoint, self.config.project_id
        );
        let request = QueryRequest {
            query: sql,
            use_legacy_sql: false,
            timeout_ms: QUERY_TIMEOUT_MS,
            max_results: MAX_RESULTS,
            parameter_mode: if params.is_empty() { None } else { Some("NAMED") },
            query_parameters: params,
        };
        let body = serde_json::to_value(&request)?;

        log::debug!("Running warehouse query: {sql}");
        let json = retry::send_json(|| {
            self.http
                .post(&url)
                .bearer_auth(&self.config.access_token)
                .json(&body)
        })
        .await?;

        let response: QueryResponse = serde_json::from_value(json)?;
        decode_rows(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_positional_rows_by_schema_order() {
        let response: QueryResponse = serde_json::from_str(
            r#"{
                "jobComplete": true,
                "schema": {"fields": [{"name": "station"}, {"name": "daily_flow"}]},
                "rows": [
                    {"f": [{"v": "Union Square"}, {"v": "42000"}]},
                    {"f": [{"v": "Riverside"}, {"v": null}]}
                ]
            }"#,
        )
        .unwrap();

        let rows = decode_rows(response).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_str("station"), Some("Union Square"));
        assert_eq!(rows[0].get_u64("daily_flow"), Some(42_000));
        assert_eq!(rows[1].get_str("daily_flow"), None);
    }

    #[test]
    fn empty_result_has_no_rows() {
        let response: QueryResponse =
            serde_json::from_str(r#"{"jobComplete": true}"#).unwrap();
        assert!(decode_rows(response).unwrap().is_empty());
    }

    #[test]
    fn incomplete_job_is_an_error() {
        let response: QueryResponse =
            serde_json::from_str(r#"{"jobComplete": false}"#).unwrap();
        assert!(matches!(
            decode_rows(response),
            Err(WarehouseError::Incomplete)
        ));
    }

    #[test]
    fn u64_accepts_float_serialized_integers() {
        let row = Row::from_pairs(&[("count", Some("12.0"))]);
        assert_eq!(row.get_u64("count"), Some(12));
    }

    #[test]
    fn require_names_the_missing_column() {
        let row = Row::from_pairs(&[("present", Some("1"))]);
        let err = row.require_f64("absent").unwrap_err();
        match err {
            WarehouseError::Decode { column, .. } => assert_eq!(column, "absent"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
