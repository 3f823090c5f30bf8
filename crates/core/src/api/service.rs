//! Workbase API facade
//!
//! Every domain operation runs the same pipeline: governance for declared
//! mutations, then the remote gateway, then (for settings-class operations
//! only) the local fallback when the remote fails with anything but
//! `Unauthorized`.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use workbase_domain::{
    ActionDescriptor, ApiError, Durability, EntityKind, GovernanceSignal, HttpMethod,
    LoginCredentials, RequestBody, RequestDescriptor, ResponsePayload, RiskLevel, Session,
    Signal,
};

use super::operations::{self as ops, Fallback, Operation, SETTINGS_ORIGIN};
use crate::gateway_ports::RemoteGateway;
use crate::governance::GovernancePolicy;
use crate::session::CredentialStore;
use crate::settings::LocalSettingsFallback;
use crate::signals::SignalSink;

const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";
const HEALTH_PATH: &str = "/health";
const FEATURE_FLAGS_PATH: &str = "/settings/feature-flags";
const NOTIFICATION_CONFIG_PATH: &str = "/settings/notifications";
const AI_CONFIG_PATH: &str = "/settings/ai";
const API_KEYS_PATH: &str = "/settings/api-keys";
const WEBHOOKS_PATH: &str = "/settings/webhooks";

/// Domain facade over the remote gateway
pub struct WorkbaseApi {
    gateway: Arc<dyn RemoteGateway>,
    credentials: Arc<CredentialStore>,
    governance: GovernancePolicy,
    signals: Arc<dyn SignalSink>,
    fallback: LocalSettingsFallback,
}

impl WorkbaseApi {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        credentials: Arc<CredentialStore>,
        governance: GovernancePolicy,
        signals: Arc<dyn SignalSink>,
        fallback: LocalSettingsFallback,
    ) -> Self {
        Self { gateway, credentials, governance, signals, fallback }
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Authenticate and store the issued token at `durability`.
    ///
    /// Accepts `token` or `accessToken` in the response, and adopts
    /// `tenantId` when present.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        durability: Durability,
    ) -> Result<Session, ApiError> {
        let request = RequestDescriptor::post(LOGIN_PATH)
            .json(json!({"email": credentials.email, "password": credentials.password}))
            .build();
        let body = self.dispatch(&ops::LOGIN, "auth", request).await?.into_json();
        let body = body.unwrap_or(Value::Null);

        let token = body
            .get("token")
            .or_else(|| body.get("accessToken"))
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::Unauthorized("login response did not include a token".into()))?;

        self.credentials.set_token(token, durability)?;
        if let Some(tenant_id) = body.get("tenantId").and_then(Value::as_str) {
            self.credentials.set_tenant_id(Some(tenant_id))?;
        }

        let session = self.credentials.session();
        info!(tenant_id = ?session.tenant_id, durability = %durability, "Logged in");
        Ok(session)
    }

    /// Notify the remote (best effort) and clear the session.
    ///
    /// Returns the session that was active.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Session {
        if self.credentials.session().is_authenticated() {
            let request = RequestDescriptor::post(LOGOUT_PATH).build();
            if let Err(err) = self.dispatch(&ops::LOGOUT, "auth", request).await {
                debug!(error = %err, "Remote logout failed, clearing locally");
            }
        }
        self.credentials.logout()
    }

    /// Change the tenant scope; sentinel values unset it.
    pub fn switch_tenant(&self, tenant_id: Option<&str>) -> Result<(), ApiError> {
        self.credentials.set_tenant_id(tenant_id)?;
        info!(tenant_id = ?self.credentials.get_tenant_id(), "Tenant switched");
        Ok(())
    }

    pub fn current_session(&self) -> Session {
        self.credentials.session()
    }

    /// `true` when the remote answers `/health` with success, `false` on a
    /// failing status. Transport-level failures propagate.
    pub async fn health_check(&self) -> Result<bool, ApiError> {
        let request = RequestDescriptor::get(HEALTH_PATH).build();
        match self.dispatch(&ops::HEALTH_CHECK, "system", request).await {
            Ok(_) => Ok(true),
            Err(ApiError::Remote { status, .. }) => {
                debug!(status, "Health check reported failure");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    // ------------------------------------------------------------------
    // Entities
    // ------------------------------------------------------------------

    pub async fn list_entities(
        &self,
        kind: EntityKind,
        query: &[(&str, &str)],
    ) -> Result<ResponsePayload, ApiError> {
        let request = query
            .iter()
            .fold(RequestDescriptor::get(kind.collection_path()), |builder, (key, value)| {
                builder.query(*key, *value)
            })
            .build();
        self.dispatch(&ops::LIST_ENTITIES, kind.origin(), request).await
    }

    pub async fn get_entity(&self, kind: EntityKind, id: &str) -> Result<ResponsePayload, ApiError> {
        let request = RequestDescriptor::get(kind.item_path(id)).build();
        self.dispatch(&ops::GET_ENTITY, kind.origin(), request).await
    }

    /// Create (`id == None`) or replace an entity.
    pub async fn save_entity(
        &self,
        kind: EntityKind,
        id: Option<&str>,
        payload: Value,
    ) -> Result<ResponsePayload, ApiError> {
        let (operation, builder) = match id {
            Some(id) => (&ops::UPDATE_ENTITY, RequestDescriptor::put(kind.item_path(id))),
            None => (&ops::CREATE_ENTITY, RequestDescriptor::post(kind.collection_path())),
        };
        self.dispatch(operation, kind.origin(), builder.json(payload).build()).await
    }

    pub async fn delete_entity(&self, kind: EntityKind, id: &str) -> Result<ResponsePayload, ApiError> {
        let request = RequestDescriptor::delete(kind.item_path(id)).build();
        self.dispatch(&ops::DELETE_ENTITY, kind.origin(), request).await
    }

    /// Upload a binary attachment (CV, payslip, contract) to an entity.
    pub async fn upload_attachment(
        &self,
        kind: EntityKind,
        id: &str,
        bytes: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<ResponsePayload, ApiError> {
        let request =
            RequestDescriptor::post(kind.attachments_path(id)).binary(bytes, content_type).build();
        self.dispatch(&ops::UPLOAD_ATTACHMENT, kind.origin(), request).await
    }

    pub async fn download_attachment(
        &self,
        kind: EntityKind,
        id: &str,
        attachment_id: &str,
    ) -> Result<ResponsePayload, ApiError> {
        let request = RequestDescriptor::get(kind.attachment_path(id, attachment_id)).build();
        self.dispatch(&ops::DOWNLOAD_ATTACHMENT, kind.origin(), request).await
    }

    /// Submit a payroll run for disbursement.
    pub async fn submit_payroll_run(&self, run_id: &str) -> Result<ResponsePayload, ApiError> {
        let kind = EntityKind::PayrollRuns;
        let request = RequestDescriptor::post(format!("{}/submit", kind.item_path(run_id))).build();
        self.dispatch(&ops::SUBMIT_PAYROLL_RUN, kind.origin(), request).await
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub async fn get_feature_flags(&self) -> Result<Value, ApiError> {
        self.read_settings(&ops::GET_FEATURE_FLAGS, FEATURE_FLAGS_PATH).await
    }

    pub async fn update_feature_flags(&self, flags: Value) -> Result<Value, ApiError> {
        self.write_settings(&ops::UPDATE_FEATURE_FLAGS, HttpMethod::Put, FEATURE_FLAGS_PATH, flags)
            .await
    }

    pub async fn get_notification_config(&self) -> Result<Value, ApiError> {
        self.read_settings(&ops::GET_NOTIFICATION_CONFIG, NOTIFICATION_CONFIG_PATH).await
    }

    pub async fn update_notification_config(&self, config: Value) -> Result<Value, ApiError> {
        self.write_settings(
            &ops::UPDATE_NOTIFICATION_CONFIG,
            HttpMethod::Put,
            NOTIFICATION_CONFIG_PATH,
            config,
        )
        .await
    }

    pub async fn get_ai_config(&self) -> Result<Value, ApiError> {
        self.read_settings(&ops::GET_AI_CONFIG, AI_CONFIG_PATH).await
    }

    pub async fn update_ai_config(&self, config: Value) -> Result<Value, ApiError> {
        self.write_settings(&ops::UPDATE_AI_CONFIG, HttpMethod::Put, AI_CONFIG_PATH, config).await
    }

    pub async fn list_api_keys(&self) -> Result<Value, ApiError> {
        self.read_settings(&ops::LIST_API_KEYS, API_KEYS_PATH).await
    }

    pub async fn create_api_key(&self, request: Value) -> Result<Value, ApiError> {
        self.write_settings(&ops::CREATE_API_KEY, HttpMethod::Post, API_KEYS_PATH, request).await
    }

    pub async fn list_webhooks(&self) -> Result<Value, ApiError> {
        self.read_settings(&ops::LIST_WEBHOOKS, WEBHOOKS_PATH).await
    }

    pub async fn create_webhook(&self, webhook: Value) -> Result<Value, ApiError> {
        self.write_settings(&ops::CREATE_WEBHOOK, HttpMethod::Post, WEBHOOKS_PATH, webhook).await
    }

    async fn read_settings(&self, operation: &Operation, path: &str) -> Result<Value, ApiError> {
        let request = RequestDescriptor::get(path).build();
        let payload = self.dispatch(operation, SETTINGS_ORIGIN, request).await?;
        Ok(payload.into_json().unwrap_or(Value::Null))
    }

    async fn write_settings(
        &self,
        operation: &Operation,
        method: HttpMethod,
        path: &str,
        payload: Value,
    ) -> Result<Value, ApiError> {
        let request = RequestDescriptor::builder(method, path).json(payload).build();
        let payload = self.dispatch(operation, SETTINGS_ORIGIN, request).await?;
        Ok(payload.into_json().unwrap_or(Value::Null))
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    #[instrument(skip(self, request), fields(operation = operation.name, path = request.path()))]
    async fn dispatch(
        &self,
        operation: &Operation,
        origin: &str,
        request: RequestDescriptor,
    ) -> Result<ResponsePayload, ApiError> {
        if let Some(risk) = operation.risk {
            self.authorize(operation, origin, risk)?;
        }

        let local_record = match (operation.fallback.stores_payload(), request.body()) {
            (true, RequestBody::Json(value)) => Some(value.clone()),
            _ => None,
        };

        let err = match self.gateway.execute(request).await {
            Ok(payload) => return Ok(payload),
            Err(err) => err,
        };

        // Only remote-path failures degrade to local storage. Admission
        // rejections and local faults reach the caller unchanged, as does 401.
        if !err.is_retryable() {
            return Err(err);
        }

        match operation.fallback {
            Fallback::None => Err(err),
            Fallback::Read(class) => {
                warn!(class = %class, error = %err, "Remote settings read failed, serving local record");
                Ok(ResponsePayload::Json(self.fallback.load_or_default(class)))
            }
            Fallback::Write(class) => {
                let record = local_record.unwrap_or(Value::Null);
                if let Err(storage_err) = self.fallback.store(class, &record) {
                    error!(class = %class, error = %storage_err, "Local settings write failed");
                    return Err(err);
                }
                warn!(class = %class, error = %err, "Remote settings write failed, stored locally");
                Ok(ResponsePayload::Json(record))
            }
            Fallback::Append(class) => {
                let record = local_record.unwrap_or_else(|| json!({}));
                match self.fallback.append(class, record) {
                    Ok(stored) => {
                        warn!(class = %class, error = %err, "Remote registry write failed, stored locally");
                        Ok(ResponsePayload::Json(stored))
                    }
                    Err(storage_err) => {
                        error!(class = %class, error = %storage_err, "Local registry append failed");
                        Err(err)
                    }
                }
            }
        }
    }

    /// Run governance for a mutation; a denial is intercepted, signalled and
    /// turned into [`ApiError::GovernanceBlocked`].
    fn authorize(&self, operation: &Operation, origin: &str, risk: RiskLevel) -> Result<(), ApiError> {
        let action = ActionDescriptor::mutation(operation.name, origin, risk);
        let decision = self.governance.evaluate(&action);
        if decision.allowed {
            debug!(action = operation.name, origin, risk = %risk, "Governance allowed mutation");
            return Ok(());
        }

        let decision = decision.intercept();
        error!(
            action = operation.name,
            origin,
            risk = %risk,
            reason = %decision.reason,
            "Governance intercepted mutation"
        );
        self.signals.publish(Signal::GovernanceIngested(GovernanceSignal {
            id: Uuid::new_v4(),
            origin: origin.to_owned(),
            action: operation.name.to_owned(),
            message: decision.reason.clone(),
            risk: RiskLevel::Critical,
            intercepted: decision.intercepted,
            emitted_at: Utc::now(),
        }));

        Err(ApiError::GovernanceBlocked { reason: decision.reason, remediation: decision.remediation })
    }
}

impl std::fmt::Debug for WorkbaseApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkbaseApi")
            .field("credentials", &self.credentials)
            .field("governance", &self.governance)
            .finish_non_exhaustive()
    }
}
