//! 変更操作ディスパッチャ
//!
//! 名前空間の検証、オブジェクトストアへのput/delete、一括削除の結果集約、
//! 監査ログの記録を行う。

use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::audit::AuditLogger;
use crate::classifier::classify;
use crate::common::error::{GatewayError, GatewayResult};
use crate::common::protocol::{DeleteResponse, KeyError, WriteResponse};
use crate::common::types::{is_in_namespace, MutationKind};
use crate::normalizer::{CallerIdentity, DeleteRequest, WriteRequest};
use crate::storage::{ObjectStore, CACHE_CONTROL_NO_CACHE};

/// Applies catalog mutations against one bucket
#[derive(Clone)]
pub struct MutationDispatcher {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    audit: AuditLogger,
}

impl std::fmt::Debug for MutationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationDispatcher")
            .field("bucket", &self.bucket)
            .field("audit", &self.audit)
            .finish()
    }
}

impl MutationDispatcher {
    /// Dispatcher writing into `bucket` of `store`
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>, audit: AuditLogger) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            audit,
        }
    }

    /// Destination bucket
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Writes one document.
    ///
    /// The key must lie inside the catalog namespace; otherwise the store is
    /// never called. A store failure is returned as-is and nothing is audited.
    pub async fn write(
        &self,
        request: &WriteRequest,
        identity: &CallerIdentity,
    ) -> GatewayResult<WriteResponse> {
        if !is_in_namespace(&request.key) {
            warn!(key = %request.key, "Rejected write outside catalog namespace");
            return Err(GatewayError::namespace(&request.key));
        }

        // serde_jsonは非ASCII文字をエスケープしない
        let body = serde_json::to_vec(&request.body)
            .map_err(|e| GatewayError::Input(format!("body is not serializable: {e}")))?;

        if let Err(e) = self
            .store
            .put_object(
                &self.bucket,
                &request.key,
                body,
                &request.content_type,
                CACHE_CONTROL_NO_CACHE,
            )
            .await
        {
            error!("put_object failed for {}/{}: {}", self.bucket, request.key, e);
            return Err(e.into());
        }
        info!("Uploaded to {}/{}", self.bucket, request.key);

        self.audit
            .record(
                classify(MutationKind::Write, Some(&request.key)),
                &identity.user_id,
                &identity.user_email,
                &request.key,
                Some(json!({
                    "key": request.key,
                    "contentType": request.content_type,
                })),
            )
            .await;

        Ok(WriteResponse {
            ok: true,
            key: request.key.clone(),
            bucket: self.bucket.clone(),
        })
    }

    /// Deletes a batch of keys.
    ///
    /// Every key is checked against the namespace before any deletion; one
    /// violation rejects the whole batch. After that each key is attempted
    /// exactly once and independently, so earlier successes stand when a
    /// later key fails.
    pub async fn delete(
        &self,
        request: &DeleteRequest,
        identity: &CallerIdentity,
    ) -> GatewayResult<DeleteResponse> {
        if let Some(key) = request.keys.iter().find(|k| !is_in_namespace(k)) {
            warn!(key = %key, "Rejected delete batch outside catalog namespace");
            return Err(GatewayError::namespace(key));
        }

        let mut deleted = Vec::with_capacity(request.keys.len());
        let mut errors = Vec::new();

        for key in &request.keys {
            match self.store.delete_object(&self.bucket, key).await {
                Ok(()) => {
                    info!("Deleted {}/{}", self.bucket, key);
                    self.audit
                        .record(
                            classify(MutationKind::Delete, Some(key)),
                            &identity.user_id,
                            &identity.user_email,
                            key,
                            Some(json!({ "key": key })),
                        )
                        .await;
                    deleted.push(key.clone());
                }
                Err(e) => {
                    warn!("delete failed for {}: {}", key, e);
                    errors.push(KeyError {
                        key: key.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(DeleteResponse::new(deleted, errors))
    }
}
