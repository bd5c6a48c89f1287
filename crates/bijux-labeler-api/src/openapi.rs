// SPDX-License-Identifier: Apache-2.0

use crate::error_mapping::API_ERROR_SCHEMA_REF;
use crate::errors::ApiErrorCode;
use serde_json::{json, Value};

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": API_ERROR_SCHEMA_REF}}}
    })
}

fn json_body(required: &[&str]) -> Value {
    let properties: serde_json::Map<String, Value> = required
        .iter()
        .map(|name| ((*name).to_string(), json!({"type": "string"})))
        .collect();
    json!({
        "required": true,
        "content": {"application/json": {"schema": {
            "type": "object",
            "required": required,
            "properties": properties
        }}}
    })
}

fn project_param() -> Value {
    json!({"name": "projectName", "in": "path", "required": true, "schema": {"type": "string"}})
}

fn path_query_param() -> Value {
    json!({"name": "path", "in": "query", "required": true, "schema": {"type": "string"}})
}

#[must_use]
pub fn openapi_spec() -> Value {
    let error_codes: Vec<&str> = ApiErrorCode::ALL.iter().map(|c| c.as_str()).collect();
    json!({
      "openapi": "3.0.3",
      "info": {
        "title": "bijux-labeler API",
        "version": "v1"
      },
      "paths": {
        "/": {
          "get": {"responses": {"200": {"description": "project list page", "content": {"text/html": {}}}}}
        },
        "/delete": {
          "delete": {
            "requestBody": json_body(&["projectName", "labelName", "imageName"]),
            "responses": {
              "200": {"description": "image deleted"},
              "400": error_response("invalid name"),
              "404": error_response("image not found")
            }
          }
        },
        "/directory": {
          "get": {
            "parameters": [path_query_param()],
            "responses": {
              "200": {"description": "direct children of the directory"},
              "400": error_response("invalid path"),
              "404": error_response("directory not found")
            }
          }
        },
        "/healthz": {
          "get": {"responses": {"200": {"description": "ok"}}}
        },
        "/images": {
          "get": {
            "parameters": [path_query_param()],
            "responses": {
              "200": {"description": "raw image bytes"},
              "400": error_response("invalid path"),
              "404": error_response("file not found")
            }
          }
        },
        "/label/create": {
          "post": {
            "requestBody": json_body(&["projectName", "labelName"]),
            "responses": {
              "200": {"description": "label created"},
              "400": error_response("invalid name"),
              "404": error_response("project not found"),
              "409": error_response("label already exists")
            }
          }
        },
        "/label/delete": {
          "delete": {
            "requestBody": json_body(&["projectName", "labelName"]),
            "responses": {
              "200": {"description": "label and its images deleted"},
              "404": error_response("label not found")
            }
          }
        },
        "/mkdir": {
          "post": {
            "requestBody": json_body(&["path", "name"]),
            "responses": {
              "200": {"description": "directory created"},
              "400": error_response("invalid path or name"),
              "409": error_response("directory already exists")
            }
          }
        },
        "/move": {
          "put": {
            "requestBody": json_body(&["projectName", "imageName", "sourceLabel", "targetLabel"]),
            "responses": {
              "200": {"description": "image moved"},
              "404": error_response("image or label not found"),
              "409": error_response("destination name taken")
            }
          }
        },
        "/openapi.json": {
          "get": {"responses": {"200": {"description": "this document"}}}
        },
        "/project/create": {
          "post": {
            "requestBody": json_body(&["projectName"]),
            "responses": {
              "200": {"description": "project created"},
              "400": error_response("invalid name"),
              "409": error_response("project already exists")
            }
          }
        },
        "/project/{projectName}": {
          "get": {
            "parameters": [project_param()],
            "responses": {
              "200": {"description": "project detail page", "content": {"text/html": {}}},
              "404": error_response("project not found")
            }
          }
        },
        "/project/{projectName}/images": {
          "get": {
            "parameters": [project_param()],
            "responses": {
              "200": {"description": "images across all labels"},
              "404": error_response("project not found")
            }
          }
        },
        "/project/{projectName}/labels": {
          "get": {
            "parameters": [project_param()],
            "responses": {
              "200": {"description": "labels with image counts"},
              "404": error_response("project not found")
            }
          }
        },
        "/project/{projectName}/thumbnail": {
          "get": {
            "parameters": [project_param()],
            "responses": {
              "200": {"description": "representative image or null"},
              "404": error_response("project not found")
            }
          }
        },
        "/rename": {
          "put": {
            "requestBody": json_body(&["oldPath", "newPath"]),
            "responses": {
              "200": {"description": "path renamed"},
              "404": error_response("source not found"),
              "409": error_response("destination exists")
            }
          }
        },
        "/rmdir": {
          "delete": {
            "requestBody": json_body(&["path"]),
            "responses": {
              "200": {"description": "directory removed"},
              "400": error_response("invalid path"),
              "404": error_response("directory not found")
            }
          }
        },
        "/upload": {
          "post": {
            "requestBody": {
              "required": true,
              "content": {"multipart/form-data": {"schema": {
                "type": "object",
                "required": ["path", "files"],
                "properties": {
                  "path": {"type": "string", "description": "projects/<project>/<label>"},
                  "files": {"type": "array", "items": {"type": "string", "format": "binary"}}
                }
              }}}
            },
            "responses": {
              "200": {"description": "files stored"},
              "404": error_response("label not found"),
              "409": error_response("file name taken"),
              "413": error_response("too many files or body too large")
            }
          }
        }
      },
      "components": {
        "schemas": {
          "ApiError": {
            "type": "object",
            "required": ["code", "message", "details", "request_id"],
            "additionalProperties": false,
            "properties": {
              "code": {"$ref": "#/components/schemas/ApiErrorCode"},
              "message": {"type": "string"},
              "details": {"type": "object"},
              "request_id": {"type": "string"}
            }
          },
          "ApiErrorCode": {
            "type": "string",
            "enum": error_codes
          }
        }
      }
    })
}

/// The document as written to disk: pretty JSON with a trailing newline.
pub fn render_openapi() -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(&openapi_spec())?;
    text.push('\n');
    Ok(text)
}

/// Differences between a committed document and the current one, one line
/// each: `+ path` for undocumented routes, `- path` for stale ones, and a
/// single `~` line when only operation bodies differ. Empty when in sync.
pub fn openapi_drift(committed: &str) -> Result<Vec<String>, String> {
    let committed: Value =
        serde_json::from_str(committed).map_err(|e| format!("committed document: {e}"))?;
    let current = openapi_spec();
    if committed == current {
        return Ok(Vec::new());
    }
    let paths = |doc: &Value| -> Vec<String> {
        doc["paths"]
            .as_object()
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    };
    let (old, new) = (paths(&committed), paths(&current));
    let mut drift: Vec<String> = new
        .iter()
        .filter(|p| !old.contains(p))
        .map(|p| format!("+ {p}"))
        .chain(old.iter().filter(|p| !new.contains(p)).map(|p| format!("- {p}")))
        .collect();
    if drift.is_empty() {
        drift.push("~ operations or components changed".to_string());
    }
    Ok(drift)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_document_is_in_sync_with_itself() {
        let text = render_openapi().expect("render");
        assert!(text.ends_with("}\n"));
        assert_eq!(openapi_drift(&text).expect("drift"), Vec::<String>::new());
    }

    #[test]
    fn drift_names_added_and_removed_paths() {
        let mut stale = openapi_spec();
        let paths = stale["paths"].as_object_mut().expect("paths");
        paths.remove("/upload");
        paths.insert("/legacy".to_string(), json!({}));
        let drift = openapi_drift(&stale.to_string()).expect("drift");
        assert_eq!(drift, vec!["+ /upload", "- /legacy"]);

        let mut retitled = openapi_spec();
        retitled["info"]["title"] = json!("old title");
        let drift = openapi_drift(&retitled.to_string()).expect("drift");
        assert_eq!(drift, vec!["~ operations or components changed"]);

        assert!(openapi_drift("not json").is_err());
    }
}
