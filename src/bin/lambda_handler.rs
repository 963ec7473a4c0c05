//! AWS Lambda handler for property ROI calculations
//!
//! Accepts `RoiInputs` as the JSON request body and returns the full
//! `CalculatedMetrics`, projections included.
//!
//! Supports Lambda Function URLs and API Gateway HTTP APIs (payload v2).

use aws_lambda_events::apigw::{ApiGatewayV2httpRequest, ApiGatewayV2httpResponse};
use aws_lambda_events::encodings::Body;
use aws_lambda_events::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use aws_lambda_events::http::{HeaderMap, HeaderValue};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::Serialize;

use property_roi::{calculate_roi, RoiInputs};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// CORS headers sent with every response, preflight included
fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("POST, OPTIONS"));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    headers
}

fn json_headers() -> HeaderMap {
    let mut headers = cors_headers();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn error_response(status: i64, message: String) -> ApiGatewayV2httpResponse {
    let body = serde_json::to_string(&ErrorBody { error: message })
        .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
    ApiGatewayV2httpResponse {
        status_code: status,
        headers: json_headers(),
        body: Some(Body::Text(body)),
        ..Default::default()
    }
}

fn json_response(body: String) -> ApiGatewayV2httpResponse {
    ApiGatewayV2httpResponse {
        status_code: 200,
        headers: json_headers(),
        body: Some(Body::Text(body)),
        ..Default::default()
    }
}

/// Answer to a CORS preflight
fn preflight_response() -> ApiGatewayV2httpResponse {
    ApiGatewayV2httpResponse {
        status_code: 200,
        headers: cors_headers(),
        body: Some(Body::Empty),
        ..Default::default()
    }
}

/// Turn a request body into a response. Bad input is a 400, never a panic.
fn respond(body: Option<&str>) -> ApiGatewayV2httpResponse {
    let body = body.unwrap_or("{}");

    let inputs: RoiInputs = match serde_json::from_str(body) {
        Ok(inputs) => inputs,
        Err(e) => {
            warn!("rejecting request: {}", e);
            return error_response(400, format!("Invalid JSON: {}", e));
        }
    };

    let metrics = match calculate_roi(&inputs) {
        Ok(metrics) => metrics,
        Err(e) => {
            warn!("rejecting request: {}", e);
            return error_response(400, e.to_string());
        }
    };

    match serde_json::to_string(&metrics) {
        Ok(json) => json_response(json),
        Err(e) => error_response(500, format!("Failed to encode result: {}", e)),
    }
}

/// Lambda handler function
async fn handler(
    event: LambdaEvent<ApiGatewayV2httpRequest>,
) -> Result<ApiGatewayV2httpResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    if request.request_context.http.method.as_str() == "OPTIONS" {
        return Ok(preflight_response());
    }

    if request.is_base64_encoded {
        let message = "Binary request bodies are not supported".to_string();
        return Ok(error_response(400, message));
    }

    let response = respond(request.body.as_deref());
    info!(
        "request {} answered {} in {} ms",
        event.context.request_id,
        response.status_code,
        start.elapsed().as_millis()
    );

    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
