//! Likert CLI
//!
//! Reads one JSON request per line from stdin and writes one JSON response
//! per line to stdout. Logs go to stderr.
//!
//! Methods:
//! - analyze: Run one analysis over selected variables
//! - analyze_groups: Run one analysis per variable group (explicit or detected)
//! - detect_groups: Detect question groups from `_fulltext` columns
//! - list_analyses: List available analyses
//! - ping: Liveness check

use likert::{
    detect_question_groups, list_analyses, AnalysisKind, AnalysisRequest, DataTable, Engine,
    EngineConfig, VariableGroup,
};
use likert_core::StatsError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::env;
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info, warn, Level};

const SERVER_NAME: &str = "likert";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");
const ENV_LOG: &str = "LIKERT_LOG";

const METHODS: [&str; 5] = ["analyze", "analyze_groups", "detect_groups", "list_analyses", "ping"];

#[derive(Debug, Deserialize)]
struct Request {
    #[serde(default)]
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct Response {
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<StatsError>,
}

impl Response {
    fn from_result(id: Option<JsonValue>, result: Result<JsonValue, StatsError>) -> Self {
        match result {
            Ok(r) => Self { id, result: Some(r), error: None },
            Err(e) => Self { id, result: None, error: Some(e) },
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeParams {
    table: DataTable,
    analysis: String,
    variables: Vec<String>,
    #[serde(default)]
    group_by: Option<String>,
    /// Per-request override of the process configuration
    #[serde(default)]
    config: Option<EngineConfig>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeGroupsParams {
    table: DataTable,
    analysis: String,
    #[serde(default)]
    groups: Option<Vec<VariableGroup>>,
    #[serde(default)]
    config: Option<EngineConfig>,
}

#[derive(Debug, Deserialize)]
struct DetectGroupsParams {
    table: DataTable,
}

/// Log level from `LIKERT_LOG`, defaulting to info
fn log_level() -> Level {
    env::var(ENV_LOG)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(Level::INFO)
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(log_level())
        .with_target(false)
        .init();

    let config = match EngineConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(code = %e.code, "invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    let engine = Engine::new(config);

    info!(version = SERVER_VERSION, "{} started", SERVER_NAME);
    debug!(?config, "engine configuration");

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("end of input");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "received request");

                let response = handle_line(&engine, line);
                if let Err(e) = write_response(&response) {
                    error!("error writing response: {}", e);
                    break;
                }
            }
            Err(e) => {
                error!("error reading input: {}", e);
                break;
            }
        }
    }

    info!("shutting down");
}

fn write_response(response: &Response) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, response)?;
    writeln!(stdout)?;
    stdout.flush()
}

/// Parse and answer one request line
fn handle_line(engine: &Engine, line: &str) -> Response {
    match serde_json::from_str::<Request>(line) {
        Ok(request) => {
            debug!(method = %request.method, "processing");
            handle_request(engine, &request)
        }
        Err(e) => {
            warn!("error parsing request: {}", e);
            Response::from_result(None, Err(StatsError::parse_error(e.to_string())))
        }
    }
}

fn handle_request(engine: &Engine, request: &Request) -> Response {
    let result = match request.method.as_str() {
        "ping" => Ok(json!({ "name": SERVER_NAME, "version": SERVER_VERSION })),
        "list_analyses" => Ok(list_analyses()),
        "detect_groups" => handle_detect_groups(&request.params),
        "analyze" => handle_analyze(engine, &request.params),
        "analyze_groups" => handle_analyze_groups(engine, &request.params),
        other => Err(StatsError::validation(format!("unknown method '{}'", other))
            .with_suggestion(format!("Available methods: {}", METHODS.join(", ")))),
    };

    if let Err(e) = &result {
        debug!(method = %request.method, code = %e.code, "request failed");
    }
    Response::from_result(request.id.clone(), result)
}

fn params<T: DeserializeOwned>(params: &Option<JsonValue>) -> Result<T, StatsError> {
    let value = params
        .clone()
        .ok_or_else(|| StatsError::validation("missing params"))?;
    serde_json::from_value(value).map_err(|e| StatsError::parse_error(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<JsonValue, StatsError> {
    serde_json::to_value(value).map_err(|e| StatsError::internal(e.to_string()))
}

/// The process engine, or one built from the request's config override
fn engine_for(engine: &Engine, config: Option<EngineConfig>) -> Engine {
    config.map(Engine::new).unwrap_or_else(|| engine.clone())
}

fn handle_analyze(engine: &Engine, raw: &Option<JsonValue>) -> Result<JsonValue, StatsError> {
    let p: AnalyzeParams = params(raw)?;
    let kind: AnalysisKind = p.analysis.parse()?;

    let mut request = AnalysisRequest::new(kind, p.variables);
    request.group_by = p.group_by;

    let result = engine_for(engine, p.config).run(&p.table, &request)?;
    to_json(&result)
}

fn handle_analyze_groups(engine: &Engine, raw: &Option<JsonValue>) -> Result<JsonValue, StatsError> {
    let p: AnalyzeGroupsParams = params(raw)?;
    let kind: AnalysisKind = p.analysis.parse()?;
    let engine = engine_for(engine, p.config);

    let report = match p.groups {
        Some(groups) => engine.run_groups(&p.table, kind, &groups),
        None => engine.run_detected(&p.table, kind),
    };
    info!(
        analysis = kind.as_str(),
        succeeded = report.succeeded(),
        failed = report.failed(),
        "batch finished"
    );
    to_json(&report)
}

fn handle_detect_groups(raw: &Option<JsonValue>) -> Result<JsonValue, StatsError> {
    let p: DetectGroupsParams = params(raw)?;
    let groups = detect_question_groups(&p.table);
    Ok(json!({ "groups": to_json(&groups)? }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use likert_core::codes;

    fn table() -> JsonValue {
        json!([
            {"q1": 4, "q2": 5, "q3": "4", "g": "a", "q1_fulltext": "x (Quality) [one]", "q2_fulltext": "x (Quality) [two]"},
            {"q1": 3, "q2": 3, "q3": 4, "g": "b"},
            {"q1": 5, "q2": 5, "q3": 5, "g": "a"},
            {"q1": 2, "q2": 3, "q3": 2, "g": "b"},
            {"q1": 4, "q2": 4, "q3": 3, "g": "a"},
            {"q1": 1, "q2": 2, "q3": "", "g": "b"}
        ])
    }

    fn call(method: &str, params: JsonValue) -> JsonValue {
        let line = json!({"id": 7, "method": method, "params": params}).to_string();
        serde_json::to_value(handle_line(&Engine::default(), &line)).unwrap()
    }

    #[test]
    fn test_ping() {
        let response = call("ping", JsonValue::Null);
        assert_eq!(response["id"], 7);
        assert_eq!(response["result"]["name"], "likert");
    }

    #[test]
    fn test_malformed_line() {
        let response = serde_json::to_value(handle_line(&Engine::default(), "{not json")).unwrap();
        assert_eq!(response["error"]["code"], codes::PARSE_ERROR);
        assert!(response["id"].is_null());
    }

    #[test]
    fn test_unknown_method() {
        let response = call("explode", json!({}));
        assert_eq!(response["error"]["code"], codes::VALIDATION);
        assert!(response.get("result").is_none());
    }

    #[test]
    fn test_analyze_cronbach() {
        let response = call(
            "analyze",
            json!({"table": table(), "analysis": "cronbach", "variables": ["q1", "q2", "q3"]}),
        );
        assert_eq!(response["result"]["analysis"], "cronbach");
        assert!(response["result"]["result"]["alpha"].as_f64().unwrap() > 0.8);
    }

    #[test]
    fn test_analyze_unknown_analysis_suggests() {
        let response = call(
            "analyze",
            json!({"table": table(), "analysis": "anvoa", "variables": ["q1", "q2"]}),
        );
        assert_eq!(response["error"]["code"], codes::UNKNOWN_ANALYSIS);
        assert_eq!(response["error"]["suggestion"], "Did you mean 'anova'?");
    }

    #[test]
    fn test_analyze_t_test_group_by() {
        let response = call(
            "analyze",
            json!({"table": table(), "analysis": "t_test", "variables": ["q1"], "group_by": "g"}),
        );
        assert_eq!(response["result"]["result"]["group1"], "a");
        assert_eq!(response["result"]["result"]["n1"], 3);
    }

    #[test]
    fn test_analyze_missing_params() {
        let response = call("analyze", JsonValue::Null);
        assert!(response["error"]["code"] == codes::VALIDATION || response["error"]["code"] == codes::PARSE_ERROR);
    }

    #[test]
    fn test_detect_and_analyze_groups() {
        let response = call("detect_groups", json!({"table": table()}));
        let groups = response["result"]["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["id"], "QUA");

        let response = call("analyze_groups", json!({"table": table(), "analysis": "correlation"}));
        let outcomes = response["result"]["outcomes"].as_array().unwrap();
        assert_eq!(outcomes[0]["group"], "QUA");
        assert_eq!(response["result"]["analysis"], "correlation_matrix");
        assert_eq!(outcomes[0]["result"]["analysis"], "correlation_matrix");
        assert_eq!(outcomes[0]["result"]["result"]["variables"], json!(["q1", "q2"]));
    }

    #[test]
    fn test_analyze_groups_explicit_with_config() {
        let response = call(
            "analyze_groups",
            json!({
                "table": table(),
                "analysis": "factor",
                "groups": [{"id": "ALL", "name": "all", "english_name": "All",
                            "questions": [{"id": "q1", "text": ""}, {"id": "q2", "text": ""}]}],
                "config": {"min_cases_per_variable": 10}
            }),
        );
        let outcome = &response["result"]["outcomes"][0];
        assert_eq!(outcome["error"]["code"], codes::INSUFFICIENT_DATA);
        assert_eq!(outcome["error"]["context"]["group"], "ALL");
    }

    #[test]
    fn test_list_analyses() {
        let response = call("list_analyses", JsonValue::Null);
        assert_eq!(response["result"]["analyses"].as_array().unwrap().len(), 9);
    }
}
