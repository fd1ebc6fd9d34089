use axum::{Json, response::Html};
use serde_json::{Map, Value, json};

const SWAGGER_UI_VERSION: &str = "5";

/// OpenAPI description of the JSON API.
pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "AI Site Search",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/api/search": {
                "post": {
                    "summary": "Answer a question using only pages from one site",
                    "operationId": "api_search",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/SearchRequest" }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Answer with optional citations",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/SearchResponse" }
                                }
                            }
                        },
                        "400": error_response("Site normalizes to an empty domain", "detail"),
                        "422": error_response("Request body is not a valid search request", "detail"),
                        "500": error_response("The answering API failed", "error"),
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "SearchRequest": {
                    "type": "object",
                    "required": ["site", "question"],
                    "properties": {
                        "site": { "type": "string" },
                        "question": { "type": "string" }
                    }
                },
                "Citation": {
                    "type": "object",
                    "required": ["index", "url"],
                    "properties": {
                        "index": { "type": "integer", "minimum": 0 },
                        "url": { "type": "string" }
                    }
                },
                "SearchResponse": {
                    "type": "object",
                    "required": ["answer"],
                    "properties": {
                        "answer": { "type": "string" },
                        "citations": {
                            "anyOf": [
                                { "type": "array", "items": { "$ref": "#/components/schemas/Citation" } },
                                { "type": "null" }
                            ]
                        }
                    }
                }
            }
        }
    })
}

fn error_response(description: &str, field: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(field.to_string(), json!({ "type": "string" }));
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "required": [field],
                    "properties": properties
                }
            }
        }
    })
}

pub async fn openapi_handler() -> Json<Value> {
    Json(openapi_document())
}

pub async fn docs_handler() -> Html<String> {
    Html(format!(
        r##"<!DOCTYPE html>
<html>
<head>
<title>AI Site Search - Swagger UI</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@{v}/swagger-ui.css">
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@{v}/swagger-ui-bundle.js"></script>
<script>
SwaggerUIBundle({{ url: "/openapi.json", dom_id: "#swagger-ui" }});
</script>
</body>
</html>"##,
        v = SWAGGER_UI_VERSION
    ))
}
