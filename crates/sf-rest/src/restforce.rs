//! Resource convenience methods.
//!
//! [`RestforceClient`] formats paths and parameters for common Salesforce
//! resources and sends them through [`SalesforceRestClient::request`], so
//! every call gets token injection and refresh-on-401.

use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use restforce_auth::OAuthProvider;
use restforce_client::security::{soql, url as url_security};
use restforce_client::{RequestMethod, RequestOptions, Response, Transport};

use crate::client::SalesforceRestClient;
use crate::describe::{DescribeSObjectResult, PicklistValue};
use crate::error::{Error, ErrorKind, Result};
use crate::query::{CreateResult, QueryResult};

/// Typed access to the common Salesforce REST resources.
///
/// # Example
///
/// ```rust,ignore
/// use restforce_rest::RestforceClient;
///
/// let restforce = RestforceClient::new(client);
///
/// let accounts = restforce
///     .query::<serde_json::Value>("SELECT Id, Name FROM Account")
///     .await?;
///
/// let id = restforce
///     .create("Account", &serde_json::json!({"Name": "New Account"}))
///     .await?;
/// restforce.destroy("Account", &id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestforceClient<T, P> {
    client: SalesforceRestClient<T, P>,
}

impl<T: Transport, P: OAuthProvider> RestforceClient<T, P> {
    /// Wrap an authenticated client.
    pub fn new(client: SalesforceRestClient<T, P>) -> Self {
        Self { client }
    }

    /// Get the underlying authenticated client.
    pub fn inner(&self) -> &SalesforceRestClient<T, P> {
        &self.client
    }

    /// Org limits (`limits`).
    #[instrument(skip(self))]
    pub async fn limits(&self) -> Result<serde_json::Value> {
        self.get_json("limits").await
    }

    /// Identity of the authenticated user, read from the resource owner URL.
    #[instrument(skip(self))]
    pub async fn user_info(&self) -> Result<serde_json::Value> {
        let url = self.client.resource_owner_url();
        if url.is_empty() {
            return Err(Error::new(ErrorKind::InvalidInput(
                "No resource owner URL configured".to_string(),
            )));
        }
        self.get_json(url).await
    }

    /// Run a SOQL query. Deleted and archived records are excluded.
    #[instrument(skip(self))]
    pub async fn query<R: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<R>> {
        let path = format!("query?{}", encode_params(&[("q", soql)])?);
        self.get_json(&path).await
    }

    /// Run a SOQL query including deleted and archived records.
    #[instrument(skip(self))]
    pub async fn query_all<R: DeserializeOwned>(&self, soql: &str) -> Result<QueryResult<R>> {
        let path = format!("queryAll?{}", encode_params(&[("q", soql)])?);
        self.get_json(&path).await
    }

    /// Get the query plan for a SOQL query.
    #[instrument(skip(self))]
    pub async fn explain(&self, soql: &str) -> Result<serde_json::Value> {
        let path = format!("query?{}", encode_params(&[("explain", soql)])?);
        self.get_json(&path).await
    }

    /// Get a record by ID, with optional extra query parameters such as
    /// `("fields", "Id,Name")`.
    #[instrument(skip(self))]
    pub async fn find<R: DeserializeOwned>(
        &self,
        sobject: &str,
        id: &str,
        params: &[(&str, &str)],
    ) -> Result<R> {
        check_sobject(sobject)?;
        check_id(id)?;

        let mut path = format!("sobjects/{}/{}", sobject, id);
        if !params.is_empty() {
            path.push('?');
            path.push_str(&encode_params(params)?);
        }
        self.get_json(&path).await
    }

    /// Get detailed metadata for an SObject.
    #[instrument(skip(self))]
    pub async fn describe(&self, sobject: &str) -> Result<DescribeSObjectResult> {
        check_sobject(sobject)?;
        self.get_json(&format!("sobjects/{}/describe", sobject))
            .await
    }

    /// Picklist values of `field` on `sobject`.
    ///
    /// A field missing from the describe result yields an empty list.
    #[instrument(skip(self))]
    pub async fn picklist_values(&self, sobject: &str, field: &str) -> Result<Vec<PicklistValue>> {
        if !soql::is_safe_field_name(field) {
            return Err(Error::new(ErrorKind::InvalidInput(format!(
                "Invalid field name: {}",
                field
            ))));
        }

        let describe = self.describe(sobject).await?;
        Ok(describe
            .field(field)
            .map(|f| f.picklist_values.clone())
            .unwrap_or_default())
    }

    /// Create a record and return its ID.
    #[instrument(skip(self, record))]
    pub async fn create<R: Serialize>(&self, sobject: &str, record: &R) -> Result<String> {
        check_sobject(sobject)?;

        let options = RequestOptions::new().json_value(serde_json::to_value(record)?);
        let response = self
            .client
            .request(RequestMethod::Post, &format!("sobjects/{}", sobject), options)
            .await?;
        expect_status(&response, 201)?;

        let result: CreateResult = serde_json::from_slice(response.body())?;
        if result.success {
            Ok(result.id)
        } else {
            let errors: Vec<String> = result.errors.iter().map(|e| e.message.clone()).collect();
            Err(Error::new(ErrorKind::Salesforce {
                status: response.status(),
                error_code: "CREATE_FAILED".to_string(),
                message: errors.join("; "),
            }))
        }
    }

    /// Update fields of a record.
    #[instrument(skip(self, record))]
    pub async fn update<R: Serialize>(&self, sobject: &str, id: &str, record: &R) -> Result<()> {
        check_sobject(sobject)?;
        check_id(id)?;

        let options = RequestOptions::new().json_value(serde_json::to_value(record)?);
        let response = self
            .client
            .request(
                RequestMethod::Patch,
                &format!("sobjects/{}/{}", sobject, id),
                options,
            )
            .await?;
        expect_status(&response, 204)
    }

    /// Delete a record.
    #[instrument(skip(self))]
    pub async fn destroy(&self, sobject: &str, id: &str) -> Result<()> {
        check_sobject(sobject)?;
        check_id(id)?;

        let response = self
            .client
            .request(
                RequestMethod::Delete,
                &format!("sobjects/{}/{}", sobject, id),
                RequestOptions::new(),
            )
            .await?;
        expect_status(&response, 204)
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let response = self
            .client
            .request(RequestMethod::Get, path, RequestOptions::new())
            .await?;

        if !response.is_success() {
            return Err(salesforce_error(&response));
        }
        Ok(serde_json::from_slice(response.body())?)
    }
}

fn check_sobject(sobject: &str) -> Result<()> {
    if soql::is_safe_sobject_name(sobject) {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::InvalidInput(format!(
            "Invalid SObject name: {}",
            sobject
        ))))
    }
}

fn check_id(id: &str) -> Result<()> {
    if url_security::is_valid_salesforce_id(id) {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::InvalidInput(
            "Invalid Salesforce ID format".to_string(),
        )))
    }
}

fn expect_status(response: &Response, expected: u16) -> Result<()> {
    if response.status() == expected {
        Ok(())
    } else {
        Err(salesforce_error(response))
    }
}

fn salesforce_error(response: &Response) -> Error {
    let detail = response.salesforce_error();
    Error::new(ErrorKind::Salesforce {
        status: response.status(),
        error_code: detail.error_code,
        message: detail.message,
    })
}

/// Form-encode query parameters (spaces become `+`).
fn encode_params(params: &[(&str, &str)]) -> Result<String> {
    serde_urlencoded::to_string(params).map_err(|e| {
        Error::with_source(ErrorKind::InvalidInput(e.to_string()), e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::*;
    use std::sync::Arc;
    use std::time::Duration;

    use restforce_client::RetryConfig;

    type TestFacade = RestforceClient<Arc<ScriptedTransport>, Arc<CountingProvider>>;

    fn facade(transport: &Arc<ScriptedTransport>) -> TestFacade {
        let client = SalesforceRestClient::builder(
            transport.clone(),
            Arc::new(CountingProvider::new()),
            initial_token(),
        )
        .api_version("v37.0")
        .resource_owner_url("https://login.salesforce.com/id/00Dxx0000001gPL/005xx000001Sv6A")
        .retry_config(RetryConfig::default().with_base_delay(Duration::ZERO))
        .build()
        .unwrap();
        RestforceClient::new(client)
    }

    const BASE: &str = "myInstanceUrl/services/data/v37.0";

    #[tokio::test]
    async fn test_limits() {
        let transport = Arc::new(ScriptedTransport::responding(
            200,
            r#"{"DailyApiRequests": {"Max": 15000, "Remaining": 14998}}"#,
        ));
        let limits = facade(&transport).limits().await.unwrap();

        assert_eq!(limits["DailyApiRequests"]["Max"], 15000);
        let sent = transport.sent();
        assert_eq!(sent[0].method, RequestMethod::Get);
        assert_eq!(sent[0].url, format!("{}/limits", BASE));
    }

    #[tokio::test]
    async fn test_user_info_uses_resource_owner_url() {
        let transport = Arc::new(ScriptedTransport::responding(
            200,
            r#"{"user_id": "005xx000001Sv6A"}"#,
        ));
        let info = facade(&transport).user_info().await.unwrap();

        assert_eq!(info["user_id"], "005xx000001Sv6A");
        assert_eq!(
            transport.sent()[0].url,
            "https://login.salesforce.com/id/00Dxx0000001gPL/005xx000001Sv6A"
        );
    }

    #[tokio::test]
    async fn test_query_form_encodes_soql() {
        let transport = Arc::new(ScriptedTransport::responding(
            200,
            r#"{"totalSize": 1, "done": true, "records": [{"Id": "001xx000003DGb2AAG"}]}"#,
        ));
        let result = facade(&transport)
            .query::<serde_json::Value>("SELECT Id FROM Account WHERE Name = 'A&B'")
            .await
            .unwrap();

        assert_eq!(result.total_size, 1);
        assert_eq!(
            transport.sent()[0].url,
            format!(
                "{}/query?q=SELECT+Id+FROM+Account+WHERE+Name+%3D+%27A%26B%27",
                BASE
            )
        );
    }

    #[tokio::test]
    async fn test_query_all_and_explain_paths() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(Response::from_status(
                200,
                r#"{"totalSize": 0, "done": true, "records": []}"#,
            )),
            Ok(Response::from_status(200, r#"{"plans": []}"#)),
        ]));
        let restforce = facade(&transport);

        restforce
            .query_all::<serde_json::Value>("SELECT Id FROM Task")
            .await
            .unwrap();
        restforce.explain("SELECT Id FROM Task").await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].url, format!("{}/queryAll?q=SELECT+Id+FROM+Task", BASE));
        assert_eq!(sent[1].url, format!("{}/query?explain=SELECT+Id+FROM+Task", BASE));
    }

    #[tokio::test]
    async fn test_find_with_params() {
        let transport = Arc::new(ScriptedTransport::responding(
            200,
            r#"{"Id": "001xx000003DGb2AAG", "Name": "Acme"}"#,
        ));
        let record: serde_json::Value = facade(&transport)
            .find("Account", "001xx000003DGb2AAG", &[("fields", "Id,Name")])
            .await
            .unwrap();

        assert_eq!(record["Name"], "Acme");
        assert_eq!(
            transport.sent()[0].url,
            format!("{}/sobjects/Account/001xx000003DGb2AAG?fields=Id%2CName", BASE)
        );
    }

    #[tokio::test]
    async fn test_find_without_params_has_no_query_string() {
        let transport = Arc::new(ScriptedTransport::responding(200, "{}"));
        let _: serde_json::Value = facade(&transport)
            .find("Account", "001xx000003DGb2", &[])
            .await
            .unwrap();

        assert_eq!(
            transport.sent()[0].url,
            format!("{}/sobjects/Account/001xx000003DGb2", BASE)
        );
    }

    #[tokio::test]
    async fn test_find_not_found_is_salesforce_error() {
        let transport = Arc::new(ScriptedTransport::responding(
            404,
            r#"[{"errorCode": "NOT_FOUND", "message": "The requested resource does not exist"}]"#,
        ));
        let err = facade(&transport)
            .find::<serde_json::Value>("Account", "001xx000003DGb2AAG", &[])
            .await
            .unwrap_err();

        match err.kind {
            ErrorKind::Salesforce {
                status,
                error_code,
                ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(error_code, "NOT_FOUND");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_picklist_values() {
        let describe = r#"{
            "name": "Account",
            "fields": [
                {"name": "Industry", "type": "picklist", "picklistValues": [
                    {"value": "Banking", "label": "Banking"},
                    {"value": "Energy", "label": "Energy"}
                ]}
            ]
        }"#;

        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(Response::from_status(200, describe)),
            Ok(Response::from_status(200, describe)),
        ]));
        let restforce = facade(&transport);

        let values = restforce.picklist_values("Account", "Industry").await.unwrap();
        let names: Vec<&str> = values.iter().map(|v| v.value.as_str()).collect();
        assert_eq!(names, vec!["Banking", "Energy"]);

        let missing = restforce.picklist_values("Account", "Rating").await.unwrap();
        assert!(missing.is_empty());

        assert_eq!(
            transport.sent()[0].url,
            format!("{}/sobjects/Account/describe", BASE)
        );
    }

    #[tokio::test]
    async fn test_create_returns_id() {
        let transport = Arc::new(ScriptedTransport::responding(
            201,
            r#"{"id": "001xx000003DGb2AAG", "success": true, "errors": []}"#,
        ));
        let id = facade(&transport)
            .create("Account", &serde_json::json!({"Name": "Acme"}))
            .await
            .unwrap();

        assert_eq!(id, "001xx000003DGb2AAG");
        let sent = transport.sent();
        assert_eq!(sent[0].method, RequestMethod::Post);
        assert_eq!(sent[0].url, format!("{}/sobjects/Account", BASE));
        assert_eq!(
            sent[0].options.body,
            Some(restforce_client::RequestBody::Json(
                serde_json::json!({"Name": "Acme"})
            ))
        );
        assert_eq!(sent[0].options.header_value("Authorization"), Some("Bearer token-0"));
    }

    #[tokio::test]
    async fn test_create_rejection() {
        let transport = Arc::new(ScriptedTransport::responding(
            400,
            r#"[{"errorCode": "REQUIRED_FIELD_MISSING", "message": "Required fields are missing: [Name]", "fields": ["Name"]}]"#,
        ));
        let err = facade(&transport)
            .create("Account", &serde_json::json!({}))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("REQUIRED_FIELD_MISSING"));
    }

    #[tokio::test]
    async fn test_update_and_destroy_expect_no_content() {
        let transport = Arc::new(ScriptedTransport::statuses(&[204, 204, 200]));
        let restforce = facade(&transport);

        restforce
            .update("Account", "001xx000003DGb2AAG", &serde_json::json!({"Name": "B"}))
            .await
            .unwrap();
        restforce.destroy("Account", "001xx000003DGb2AAG").await.unwrap();
        let err = restforce
            .destroy("Account", "001xx000003DGb2AAG")
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Salesforce { status: 200, .. }));

        let sent = transport.sent();
        assert_eq!(sent[0].method, RequestMethod::Patch);
        assert_eq!(sent[0].url, format!("{}/sobjects/Account/001xx000003DGb2AAG", BASE));
        assert_eq!(sent[1].method, RequestMethod::Delete);
    }

    #[tokio::test]
    async fn test_invalid_input_sends_nothing() {
        let transport = Arc::new(ScriptedTransport::statuses(&[]));
        let restforce = facade(&transport);

        let err = restforce.describe("Account' OR '1'='1").await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidInput(_)));

        let err = restforce.destroy("Account", "../../etc").await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidInput(_)));

        let err = restforce
            .picklist_values("Account", "Name; DROP")
            .await
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidInput(_)));

        assert_eq!(transport.send_count(), 0);
    }

    #[tokio::test]
    async fn test_facade_calls_are_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            Ok(Response::from_status(401, "")),
            Ok(Response::from_status(200, r#"{"DailyApiRequests": {}}"#)),
        ]));
        facade(&transport).limits().await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[1].url,
            "https://instance1.example.com/services/data/v37.0/limits"
        );
    }
}
