//! Address space service endpoints.
//!
//! Each endpoint decodes a batch of typed items, runs the matching service
//! and returns one result per item in input order:
//!
//! - `POST /nodes`      AddNodes
//! - `POST /references` AddReferences
//! - `POST /read`       Read
//! - `POST /write`      Write
//! - `POST /browse`     Browse
//!
//! An empty batch is rejected with 400. Item failures are reported as
//! status codes inside a 200 response.

use addrspace_core::{
    AddNodesItem, AddNodesResult, AddReferencesItem, BrowseDescription, BrowseResult, DataValue,
    ReadValueId, StatusCode, WriteValue,
};
use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of `POST /nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddNodesRequest {
    pub nodes_to_add: Vec<AddNodesItem>,
}

/// Body of `POST /references`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddReferencesRequest {
    pub references_to_add: Vec<AddReferencesItem>,
}

/// Body of `POST /read`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadRequest {
    pub nodes_to_read: Vec<ReadValueId>,
}

/// Body of `POST /write`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteRequest {
    pub nodes_to_write: Vec<WriteValue>,
}

/// Body of `POST /browse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowseRequest {
    pub nodes_to_browse: Vec<BrowseDescription>,
}

/// Per-item results, in request order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceResponse<T> {
    pub results: Vec<T>,
}

impl<T> From<Vec<T>> for ServiceResponse<T> {
    fn from(results: Vec<T>) -> Self {
        Self { results }
    }
}

fn require_items<T>(items: &[T], field: &str) -> ApiResult<()> {
    if items.is_empty() {
        return Err(ApiError::nothing_to_do(field));
    }
    Ok(())
}

fn count_bad(statuses: impl IntoIterator<Item = StatusCode>) -> usize {
    statuses.into_iter().filter(|s| s.is_bad()).count()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /nodes - Create nodes.
async fn add_nodes(
    State(state): State<AppState>,
    Json(request): Json<AddNodesRequest>,
) -> ApiResult<Json<ServiceResponse<AddNodesResult>>> {
    require_items(&request.nodes_to_add, "nodes_to_add")?;
    let results = state.space().add_nodes(&request.nodes_to_add)?;

    tracing::debug!(
        items = results.len(),
        failed = count_bad(results.iter().map(|r| r.status)),
        "AddNodes completed"
    );
    Ok(Json(results.into()))
}

/// POST /references - Append references to their source nodes.
async fn add_references(
    State(state): State<AppState>,
    Json(request): Json<AddReferencesRequest>,
) -> ApiResult<Json<ServiceResponse<StatusCode>>> {
    require_items(&request.references_to_add, "references_to_add")?;
    let results = state.space().add_references(&request.references_to_add)?;

    tracing::debug!(
        items = results.len(),
        failed = count_bad(results.iter().copied()),
        "AddReferences completed"
    );
    Ok(Json(results.into()))
}

/// POST /read - Read attribute values.
async fn read(
    State(state): State<AppState>,
    Json(request): Json<ReadRequest>,
) -> ApiResult<Json<ServiceResponse<DataValue>>> {
    require_items(&request.nodes_to_read, "nodes_to_read")?;
    let results = state.space().read(&request.nodes_to_read)?;

    tracing::debug!(
        items = results.len(),
        failed = count_bad(results.iter().map(|v| v.status)),
        "Read completed"
    );
    Ok(Json(results.into()))
}

/// POST /write - Write attribute values.
async fn write(
    State(state): State<AppState>,
    Json(request): Json<WriteRequest>,
) -> ApiResult<Json<ServiceResponse<StatusCode>>> {
    require_items(&request.nodes_to_write, "nodes_to_write")?;
    let results = state.space().write(&request.nodes_to_write)?;

    tracing::debug!(
        items = results.len(),
        failed = count_bad(results.iter().copied()),
        "Write completed"
    );
    Ok(Json(results.into()))
}

/// POST /browse - List filtered references of nodes.
async fn browse(
    State(state): State<AppState>,
    Json(request): Json<BrowseRequest>,
) -> ApiResult<Json<ServiceResponse<BrowseResult>>> {
    require_items(&request.nodes_to_browse, "nodes_to_browse")?;
    let results = state.space().browse(&request.nodes_to_browse)?;

    tracing::debug!(
        items = results.len(),
        references = results.iter().map(|r| r.references.len()).sum::<usize>(),
        "Browse completed"
    );
    Ok(Json(results.into()))
}

/// Build service routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/nodes", post(add_nodes))
        .route("/references", post(add_references))
        .route("/read", post(read))
        .route("/write", post(write))
        .route("/browse", post(browse))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use addrspace_core::ids::{objects, reference_types};
    use addrspace_core::{AttributeId, NodeClass, NodeId, QualifiedName, Variant};
    use addrspace_store::SharedAddressSpace;

    fn state() -> AppState {
        AppState::new(SharedAddressSpace::new())
    }

    async fn seed(state: &AppState) {
        let request = AddNodesRequest {
            nodes_to_add: vec![
                AddNodesItem::new(
                    objects::OBJECTS_FOLDER,
                    QualifiedName::new(0, "Objects"),
                    NodeClass::Object,
                ),
                AddNodesItem::new(
                    NodeId::string(2, "Level"),
                    QualifiedName::new(2, "Level"),
                    NodeClass::Variable,
                )
                .with_parent(objects::OBJECTS_FOLDER, reference_types::HAS_COMPONENT)
                .with_attributes(
                    addrspace_core::NodeAttributes::default().with_value(Variant::Double(0.5)),
                ),
            ],
        };
        let Json(response) = add_nodes(State(state.clone()), Json(request)).await.unwrap();
        assert!(response.results.iter().all(|r| r.status == StatusCode::GOOD));
    }

    #[tokio::test]
    async fn test_empty_batch_is_bad_request() {
        let err = read(State(state()), Json(ReadRequest { nodes_to_read: vec![] }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let state = state();
        seed(&state).await;
        let level = NodeId::string(2, "Level");

        let Json(written) = write(
            State(state.clone()),
            Json(WriteRequest {
                nodes_to_write: vec![
                    WriteValue::new(level.clone(), AttributeId::Value, Variant::Double(0.75)),
                    WriteValue::new(NodeId::string(2, "Nope"), AttributeId::Value, Variant::Double(1.0)),
                ],
            }),
        )
        .await
        .unwrap();
        assert_eq!(
            written.results,
            vec![StatusCode::GOOD, StatusCode::BAD_NODE_ID_UNKNOWN]
        );

        let Json(values) = read(
            State(state),
            Json(ReadRequest {
                nodes_to_read: vec![ReadValueId::new(level, AttributeId::Value)],
            }),
        )
        .await
        .unwrap();
        assert_eq!(values.results[0].value, Variant::Double(0.75));
    }

    #[tokio::test]
    async fn test_references_and_browse() {
        let state = state();
        seed(&state).await;

        let Json(added) = add_references(
            State(state.clone()),
            Json(AddReferencesRequest {
                references_to_add: vec![AddReferencesItem::forward(
                    NodeId::string(2, "Missing"),
                    reference_types::ORGANIZES,
                    objects::OBJECTS_FOLDER,
                    NodeClass::Object,
                )],
            }),
        )
        .await
        .unwrap();
        assert_eq!(added.results, vec![StatusCode::BAD_SOURCE_NODE_ID_INVALID]);

        let Json(browsed) = browse(
            State(state),
            Json(BrowseRequest {
                nodes_to_browse: vec![BrowseDescription::new(objects::OBJECTS_FOLDER)],
            }),
        )
        .await
        .unwrap();
        assert_eq!(browsed.results[0].references.len(), 1);
        assert_eq!(
            browsed.results[0].references[0].node_id,
            NodeId::string(2, "Level")
        );
    }

    #[test]
    fn test_request_json_shape() {
        let request: ReadRequest = serde_json::from_value(serde_json::json!({
            "nodes_to_read": [{"node_id": "ns=2;s=Level", "attribute_id": 13}]
        }))
        .unwrap();
        assert_eq!(request.nodes_to_read[0].node_id, NodeId::string(2, "Level"));
        assert_eq!(request.nodes_to_read[0].attribute_id, AttributeId::Value);
    }
}
