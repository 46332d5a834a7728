//! Fixtures shared by the integration tests

use metalcloud::ClientSettings;
use serde_json::{Value, json};
use tableformatter::{Column, Table};
use wiremock::ResponseTemplate;

pub const API_KEY: &str = "12:test-key";
pub const USER: &str = "ops@example.com";

pub fn settings(endpoint: &str) -> ClientSettings {
    ClientSettings {
        endpoint: format!("{}/api", endpoint),
        api_key: API_KEY.to_string(),
        user: USER.to_string(),
    }
}

/// Successful JSON-RPC answer carrying `result`
pub fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "result": result,
        "id": 1
    }))
}

/// JSON-RPC error answer
pub fn rpc_error(code: i64, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "error": {"code": code, "message": message},
        "id": 1
    }))
}

/// Table of `rows` records over one column of every kind
pub fn mixed_table(rows: usize) -> Table {
    let mut table = Table::new(vec![
        Column::int("ID", 4),
        Column::string("NAME", 10),
        Column::float("LOAD", 5),
        Column::bool("ACTIVE", 6),
        Column::date("CREATED", 10),
    ]);
    for i in 0..rows {
        let id = i64::try_from(i).unwrap_or(i64::MAX);
        table
            .push_row(vec![
                id.into(),
                format!("node, \"{}\"", i).into(),
                (id as f64 / 4.0).into(),
                (i % 2 == 0).into(),
                tableformatter::Value::timestamp("2024-02-29T12:00:00Z"),
            ])
            .unwrap_or_else(|e| panic!("fixture row rejected: {e}"));
    }
    table
}
