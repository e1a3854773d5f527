//! Text and calculator endpoints. Neither requires authentication.

use axum::Json;
use serde::Deserialize;
use serde_json::{Value, json};

use super::extract::{ValidJson, ValidPath, ValidQuery};
use super::{
    AggregateResponse, ApiError, EvaluateRequest, OperationInfo, TextRequest, TextResponse,
};
use crate::services::calculator::{self, CalcError, CompoundInterest, Evaluation};
use crate::services::text::{self, TextAnalysis, TextError, TextOperation};

impl From<TextError> for ApiError {
    fn from(err: TextError) -> Self {
        match err {
            TextError::Empty => ApiError::validation(err.to_string()),
            TextError::UnknownOperation(op) => ApiError::not_found("Text operation", op),
        }
    }
}

impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        ApiError::validation(err.to_string())
    }
}

// ============================================================================
// Text
// ============================================================================

/// POST /api/text/{operation}
pub async fn transform_text(
    ValidPath(operation): ValidPath<String>,
    ValidJson(payload): ValidJson<TextRequest>,
) -> Result<Json<TextResponse>, ApiError> {
    let op = TextOperation::from_slug(&operation)?;
    let result = op.apply(&payload.text)?;

    Ok(Json(TextResponse {
        result,
        original: payload.text,
        operation: op.name(),
    }))
}

/// POST /api/text/word-count
pub async fn word_count(ValidJson(payload): ValidJson<TextRequest>) -> Result<Json<TextAnalysis>, ApiError> {
    Ok(Json(text::analyze(&payload.text)?))
}

/// GET /api/text/operations
pub async fn text_operations() -> Json<Value> {
    let mut operations: Vec<OperationInfo> = TextOperation::ALL
        .iter()
        .map(|op| OperationInfo {
            name: op.name(),
            description: op.description(),
        })
        .collect();
    operations.push(OperationInfo {
        name: "word_count",
        description: "Analyze text statistics",
    });

    Json(json!({ "operations": operations }))
}

// ============================================================================
// Calculator
// ============================================================================

/// POST /api/calc/evaluate
pub async fn evaluate(ValidJson(payload): ValidJson<EvaluateRequest>) -> Result<Json<Evaluation>, ApiError> {
    Ok(Json(calculator::evaluate(&payload.expression)?))
}

/// POST /api/calc/add
pub async fn add(ValidJson(values): ValidJson<Vec<f64>>) -> Result<Json<AggregateResponse>, ApiError> {
    let result = calculator::sum(&values)?;
    Ok(Json(AggregateResponse {
        operation: "addition",
        steps: vec![format!("Sum of {values:?} = {result}")],
        values,
        result,
    }))
}

/// POST /api/calc/multiply
pub async fn multiply(ValidJson(values): ValidJson<Vec<f64>>) -> Result<Json<AggregateResponse>, ApiError> {
    let result = calculator::product(&values)?;
    Ok(Json(AggregateResponse {
        operation: "multiplication",
        steps: vec![format!("Product of {values:?} = {result}")],
        values,
        result,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SqrtQuery {
    pub value: f64,
}

/// POST /api/calc/advanced/sqrt?value=
pub async fn sqrt(ValidQuery(q): ValidQuery<SqrtQuery>) -> Result<Json<Value>, ApiError> {
    let result = calculator::sqrt(q.value)?;
    Ok(Json(json!({
        "operation": "square_root",
        "input": q.value,
        "result": result,
        "steps": [format!("√{} = {}", q.value, result)],
    })))
}

#[derive(Debug, Deserialize)]
pub struct PowerQuery {
    pub base: f64,
    pub exponent: f64,
}

/// POST /api/calc/advanced/power?base=&exponent=
pub async fn power(ValidQuery(q): ValidQuery<PowerQuery>) -> Json<Value> {
    let result = calculator::power(q.base, q.exponent);
    Json(json!({
        "operation": "power",
        "base": q.base,
        "exponent": q.exponent,
        "result": result,
        "steps": [format!("{}^{} = {}", q.base, q.exponent, result)],
    }))
}

#[derive(Debug, Deserialize)]
pub struct PercentageQuery {
    pub part: f64,
    pub whole: f64,
}

/// POST /api/calc/advanced/percentage?part=&whole=
pub async fn percentage(ValidQuery(q): ValidQuery<PercentageQuery>) -> Result<Json<Value>, ApiError> {
    let result = calculator::percentage(q.part, q.whole)?;
    Ok(Json(json!({
        "operation": "percentage",
        "part": q.part,
        "whole": q.whole,
        "result": result,
        "steps": [format!("({} / {}) × 100 = {}%", q.part, q.whole, result)],
    })))
}

/// GET /api/calc/factorial/{n}
pub async fn factorial(ValidPath(n): ValidPath<u32>) -> Result<Json<Value>, ApiError> {
    let result = calculator::factorial(n)?;
    Ok(Json(json!({ "input": n, "result": result })))
}

/// GET /api/calc/compound-interest/{principal}/{rate}/{time}
pub async fn compound_interest(
    ValidPath((principal, rate, time)): ValidPath<(f64, f64, f64)>,
) -> Json<CompoundInterest> {
    Json(calculator::compound_interest(principal, rate, time))
}

/// GET /api/calc/operations
pub async fn calc_operations() -> Json<Value> {
    Json(json!({
        "basic_operations": [
            {"name": "evaluate", "description": "Evaluate mathematical expression"},
            {"name": "add", "description": "Add numbers"},
            {"name": "multiply", "description": "Multiply numbers"}
        ],
        "advanced_operations": [
            {"name": "square_root", "description": "Calculate square root"},
            {"name": "power", "description": "Calculate power"},
            {"name": "percentage", "description": "Calculate percentage"},
            {"name": "factorial", "description": "Calculate factorial (n <= 50)"},
            {"name": "compound_interest", "description": "Calculate compound interest"}
        ]
    }))
}
