//! The PuppetDB query connection.
//!
//! A [`QueryConnection`] runs each query through the same linear lifecycle:
//!
//! 1. **Build**: merge options, apply any `extract` projection, build the
//!    request URI.
//! 2. **Transmit**: issue a single `GET` through the injected or factory-made
//!    [`HttpClient`].
//! 3. **Validate**: a non-2xx status becomes [`QueryError::Execution`].
//! 4. **Decode**: the body is parsed as JSON; failure is [`QueryError::Decode`].
//!
//! Calls are independent. The connection holds no mutable state, so one
//! instance may serve concurrent queries.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    extract, ConnectionTarget, Endpoint, HttpClient, QueryError, QueryExpression, QueryLogger,
    QueryOptionsArg, QueryRequest, QueryVersion, TransportFactory,
};

/// Headers sent with every query.
const ACCEPT_JSON: [(&str, &str); 1] = [("Accept", "application/json")];

/// Client for the PuppetDB query API of one service.
#[derive(Clone)]
pub struct QueryConnection {
    target: ConnectionTarget,
    transports: Arc<dyn TransportFactory>,
    logger: Arc<dyn QueryLogger>,
}

impl QueryConnection {
    /// Creates a connection to `target`.
    ///
    /// `transports` is consulted only for calls that do not inject their own
    /// [`HttpClient`].
    pub fn new(
        target: ConnectionTarget,
        transports: Arc<dyn TransportFactory>,
        logger: Arc<dyn QueryLogger>,
    ) -> Self {
        Self {
            target,
            transports,
            logger,
        }
    }

    /// Returns the service this connection targets.
    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    /// Queries `endpoint` using the default API version (`v4`).
    ///
    /// See [`QueryConnection::query_version`].
    pub async fn query(
        &self,
        endpoint: &Endpoint,
        query: Option<&QueryExpression>,
        options: impl Into<QueryOptionsArg>,
    ) -> Result<Value, QueryError> {
        self.query_version(endpoint, query, options, &QueryVersion::default())
            .await
    }

    /// Queries `endpoint` under API `version` and returns the decoded body.
    ///
    /// `options` may be [`crate::QueryOptions`] or, deprecated, a bare
    /// `Arc<dyn HttpClient>`.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Transport`] if no response could be obtained.
    /// - [`QueryError::Execution`] for a non-success status.
    /// - [`QueryError::Decode`] if a success body is not JSON.
    pub async fn query_version(
        &self,
        endpoint: &Endpoint,
        query: Option<&QueryExpression>,
        options: impl Into<QueryOptionsArg>,
        version: &QueryVersion,
    ) -> Result<Value, QueryError> {
        let options = options.into().resolve(self.logger.as_ref());

        let query: Option<Cow<'_, QueryExpression>> = match options.active_extract() {
            Some(fields) => Some(Cow::Owned(extract(fields, query))),
            None => query.map(Cow::Borrowed),
        };

        let http: Arc<dyn HttpClient> = match &options.http {
            Some(http) => Arc::clone(http),
            None => self.transports.transport(&self.target)?,
        };

        let request = QueryRequest::build(
            &self.target,
            endpoint,
            version,
            query.as_deref(),
            options.source(),
        );

        self.logger.debug(&format!("PuppetDB uri: {}", request.uri()));
        self.logger
            .debug(&format!("PuppetDB query: {}", request.serialized_query()));

        let response = http.get(request.uri(), &ACCEPT_JSON).await?;
        if !response.is_success() {
            return Err(QueryError::Execution {
                status: response.status,
                message: response.message,
                query: request.serialized_query().to_string(),
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }
}

impl std::fmt::Debug for QueryConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryConnection")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::{ExtractSpec, HttpResponse, QueryOptions, QuerySource};

    /// Records every request and answers with a canned response.
    struct StubHttp {
        response: HttpResponse,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl StubHttp {
        fn new(status: u16, message: &str, body: &str) -> Arc<Self> {
            Arc::new(Self {
                response: HttpResponse::new(status, message, body),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn uris(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|(uri, _)| uri.clone())
                .collect()
        }
    }

    #[async_trait]
    impl HttpClient for StubHttp {
        async fn get(
            &self,
            uri: &str,
            headers: &[(&str, &str)],
        ) -> Result<HttpResponse, QueryError> {
            let headers = headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            self.requests
                .lock()
                .unwrap()
                .push((uri.to_string(), headers));
            Ok(self.response.clone())
        }
    }

    /// Factory that hands out one shared stub and counts calls.
    struct StubFactory {
        http: Arc<StubHttp>,
        targets: Mutex<Vec<ConnectionTarget>>,
    }

    impl TransportFactory for StubFactory {
        fn transport(&self, target: &ConnectionTarget) -> Result<Arc<dyn HttpClient>, QueryError> {
            self.targets.lock().unwrap().push(target.clone());
            Ok(self.http.clone())
        }
    }

    /// Factory that must not be reached.
    struct NoFactory;

    impl TransportFactory for NoFactory {
        fn transport(&self, _: &ConnectionTarget) -> Result<Arc<dyn HttpClient>, QueryError> {
            Err(QueryError::transport("no transport factory configured"))
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        debug: Mutex<Vec<String>>,
        deprecations: Mutex<Vec<String>>,
    }

    impl QueryLogger for RecordingLogger {
        fn debug(&self, message: &str) {
            self.debug.lock().unwrap().push(message.to_string());
        }
        fn deprecation_warning(&self, message: &str) {
            self.deprecations.lock().unwrap().push(message.to_string());
        }
        fn warning(&self, _: &str) {}
    }

    fn connection(logger: Arc<RecordingLogger>) -> QueryConnection {
        QueryConnection::new(
            ConnectionTarget::new("localhost", 8080, false),
            Arc::new(NoFactory),
            logger,
        )
    }

    #[tokio::test]
    async fn injected_transport_returns_decoded_body() {
        let http = StubHttp::new(200, "OK", r#"[{"certname":"x"}]"#);
        let conn = connection(Arc::default());

        let result = conn
            .query(
                &Endpoint::nodes(),
                None,
                QueryOptions::default().with_http(http.clone()),
            )
            .await
            .unwrap();

        assert_eq!(result, json!([{"certname": "x"}]));
        assert_eq!(
            http.uris(),
            vec!["http://localhost:8080/pdb/query/v4/nodes".to_string()]
        );
        let headers = http.requests.lock().unwrap()[0].1.clone();
        assert_eq!(
            headers,
            vec![("Accept".to_string(), "application/json".to_string())]
        );
    }

    #[tokio::test]
    async fn failure_status_is_an_execution_error() {
        let http = StubHttp::new(500, "Internal Error", "boom");
        let conn = connection(Arc::default());
        let query = QueryExpression::new(json!(["=", "certname", "x"]));

        let err = conn
            .query(
                &Endpoint::nodes(),
                Some(&query),
                QueryOptions::default().with_http(http),
            )
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("Internal Error"));
        assert!(text.contains(r#"["=","certname","x"]"#));
    }

    #[tokio::test]
    async fn invalid_json_on_success_is_a_decode_error() {
        let http = StubHttp::new(200, "OK", "<html>not json</html>");
        let conn = connection(Arc::default());

        let err = conn
            .query(&Endpoint::facts(), None, QueryOptions::default().with_http(http))
            .await
            .unwrap_err();

        assert!(matches!(err, QueryError::Decode { .. }));
    }

    #[tokio::test]
    async fn extract_option_rewrites_the_outgoing_query() {
        let http = StubHttp::new(200, "OK", "[]");
        let logger = Arc::new(RecordingLogger::default());
        let conn = connection(logger.clone());
        let query = QueryExpression::new(json!(["=", "certname", "x"]));

        conn.query(
            &Endpoint::nodes(),
            Some(&query),
            QueryOptions::default()
                .with_http(http.clone())
                .with_extract(ExtractSpec::new(["certname", "deactivated"]))
                .with_source(QuerySource::Face),
        )
        .await
        .unwrap();

        let expected = r#"["extract",["certname","deactivated"],["=","certname","x"]]"#;
        assert_eq!(
            http.uris(),
            vec![format!(
                "http://localhost:8080/pdb/query/v4/nodes?query={}",
                expected.replace('"', "%22")
            )]
        );
        assert!(logger
            .debug
            .lock()
            .unwrap()
            .contains(&format!("PuppetDB query: {expected}")));
    }

    #[tokio::test]
    async fn function_source_percent_encodes_the_query() {
        let http = StubHttp::new(200, "OK", "[]");
        let conn = connection(Arc::default());
        let query = QueryExpression::new(json!(["=", "certname", "x"]));

        conn.query(
            &Endpoint::nodes(),
            Some(&query),
            QueryOptions::default()
                .with_http(http.clone())
                .with_source(QuerySource::Function),
        )
        .await
        .unwrap();

        assert_eq!(
            http.uris(),
            vec![
                "http://localhost:8080/pdb/query/v4/nodes?query=%5B%22%3D%22%2C%22certname%22%2C%22x%22%5D"
                    .to_string()
            ]
        );
    }

    #[tokio::test]
    async fn legacy_transport_argument_behaves_like_http_option() {
        let logger = Arc::new(RecordingLogger::default());
        let conn = connection(logger.clone());

        let legacy_http = StubHttp::new(200, "OK", r#"[{"certname":"x"}]"#);
        let legacy: Arc<dyn HttpClient> = legacy_http.clone();
        let legacy_result = conn.query(&Endpoint::nodes(), None, legacy).await.unwrap();

        let modern_http = StubHttp::new(200, "OK", r#"[{"certname":"x"}]"#);
        let modern_result = conn
            .query(
                &Endpoint::nodes(),
                None,
                QueryOptions::default().with_http(modern_http.clone()),
            )
            .await
            .unwrap();

        assert_eq!(legacy_result, modern_result);
        assert_eq!(legacy_http.uris(), modern_http.uris());
        assert_eq!(logger.deprecations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn factory_is_used_only_without_injected_transport() {
        let http = StubHttp::new(200, "OK", "[]");
        let factory = Arc::new(StubFactory {
            http: http.clone(),
            targets: Mutex::new(Vec::new()),
        });
        let target = ConnectionTarget::new("puppetdb.example.com", 8081, true);
        let conn = QueryConnection::new(
            target.clone(),
            factory.clone(),
            Arc::new(RecordingLogger::default()),
        );

        conn.query_version(
            &Endpoint::resources(),
            None,
            QueryOptions::default(),
            &QueryVersion::new("v5"),
        )
        .await
        .unwrap();

        assert_eq!(*factory.targets.lock().unwrap(), vec![target]);
        assert_eq!(
            http.uris(),
            vec!["https://puppetdb.example.com:8081/pdb/query/v5/resources".to_string()]
        );

        let injected = StubHttp::new(200, "OK", "[]");
        conn.query(
            &Endpoint::nodes(),
            None,
            QueryOptions::default().with_http(injected),
        )
        .await
        .unwrap();
        assert_eq!(factory.targets.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn uri_and_query_are_logged_before_the_request() {
        let http = StubHttp::new(503, "Service Unavailable", "");
        let logger = Arc::new(RecordingLogger::default());
        let conn = connection(logger.clone());

        let _ = conn
            .query(&Endpoint::nodes(), None, QueryOptions::default().with_http(http))
            .await;

        assert_eq!(
            *logger.debug.lock().unwrap(),
            vec![
                "PuppetDB uri: http://localhost:8080/pdb/query/v4/nodes".to_string(),
                "PuppetDB query: null".to_string(),
            ]
        );
    }
}
