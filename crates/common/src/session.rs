//! Session and cursor derivation
//!
//! No session store exists: the client echoes `testRunnerSession` and
//! `testIndex` back on every request and the state is rebuilt from them.

use chrono::Utc;
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::types::SessionState;

pub const TAGS_PARAM: &str = "tags";
pub const SESSION_PARAM: &str = "testRunnerSession";
pub const INDEX_PARAM: &str = "testIndex";
pub const ENV_PARAM: &str = "env";
pub const REPORTER_URL_PARAM: &str = "reporterUrl";

/// Decoded query string parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
}

impl QueryParams {
    /// Parse a raw `a=1&b=2` query string. The last occurrence of a key wins.
    pub fn parse(query: &str) -> Self {
        let params = url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();
        Self { params }
    }

    /// Parse the query part of a request URL or path.
    pub fn from_url(url: &str) -> Self {
        match url.split_once('?') {
            Some((_, query)) => Self::parse(query),
            None => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get), but empty values count as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            params: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Defaults applied when the client omits a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDefaults {
    /// `env` used when the request carries none; `None` leaves it unset
    pub env: Option<String>,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            env: Some("prod".to_string()),
        }
    }
}

pub struct SessionCursor;

impl SessionCursor {
    /// Rebuild the session state for one request, minting a session id when
    /// the client has none yet.
    pub fn resolve(
        params: &QueryParams,
        reporter_base_url: &str,
        defaults: &SessionDefaults,
    ) -> Result<SessionState> {
        let test_runner_session = match params.get_non_empty(SESSION_PARAM) {
            Some(session) => session.to_string(),
            None => mint_session_id(),
        };

        let test_index = match params.get_non_empty(INDEX_PARAM) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| Error::InvalidParameter {
                name: INDEX_PARAM.to_string(),
                reason: format!("{:?} is not a non-negative integer: {}", raw, e),
            })?,
            None => 0,
        };

        let env = params
            .get_non_empty(ENV_PARAM)
            .map(str::to_string)
            .or_else(|| defaults.env.clone());

        let reporter_url = format!(
            "{}?{}={}&{}={}",
            reporter_base_url, SESSION_PARAM, test_runner_session, INDEX_PARAM, test_index
        );

        let extra = params
            .iter()
            .filter(|(k, _)| ![SESSION_PARAM, INDEX_PARAM, ENV_PARAM, REPORTER_URL_PARAM].contains(k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Ok(SessionState {
            test_runner_session,
            test_index,
            env,
            reporter_url,
            extra,
        })
    }
}

/// Current Unix time in milliseconds, as the client will echo it.
fn mint_session_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORTER: &str = "http://reporter.local/report";

    #[test]
    fn test_parse_query() {
        let params = QueryParams::parse("tags=Smoke%2C%20header&lang=en&lang=fr&empty=");
        assert_eq!(params.get("tags"), Some("Smoke, header"));
        assert_eq!(params.get("lang"), Some("fr"));
        assert_eq!(params.get("empty"), Some(""));
        assert_eq!(params.get_non_empty("empty"), None);
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_from_url() {
        let params = QueryParams::from_url("http://my-url.com/tests?data1=4&data2=5");
        assert_eq!(params.get("data1"), Some("4"));
        assert_eq!(params.get("data2"), Some("5"));
        assert_eq!(QueryParams::from_url("/tests"), QueryParams::default());
    }

    #[test]
    fn test_echoes_existing_session() {
        let params = QueryParams::parse("testRunnerSession=abc123&testIndex=4");
        let state = SessionCursor::resolve(&params, REPORTER, &SessionDefaults::default()).unwrap();

        assert_eq!(state.test_runner_session, "abc123");
        assert_eq!(state.test_index, 4);
        assert_eq!(
            state.reporter_url,
            "http://reporter.local/report?testRunnerSession=abc123&testIndex=4"
        );
    }

    #[test]
    fn test_mints_session_and_defaults_index() {
        let state =
            SessionCursor::resolve(&QueryParams::default(), REPORTER, &SessionDefaults::default())
                .unwrap();

        assert_eq!(state.test_index, 0);
        assert!(state.test_runner_session.parse::<i64>().unwrap() > 0);
        assert_eq!(
            state.reporter_url,
            format!(
                "{}?testRunnerSession={}&testIndex=0",
                REPORTER, state.test_runner_session
            )
        );
    }

    #[test]
    fn test_env_default_is_configurable() {
        let params = QueryParams::default();

        let state = SessionCursor::resolve(&params, REPORTER, &SessionDefaults::default()).unwrap();
        assert_eq!(state.env.as_deref(), Some("prod"));

        let state = SessionCursor::resolve(&params, REPORTER, &SessionDefaults { env: None }).unwrap();
        assert_eq!(state.env, None);

        let params = QueryParams::parse("env=staging");
        let state = SessionCursor::resolve(&params, REPORTER, &SessionDefaults::default()).unwrap();
        assert_eq!(state.env.as_deref(), Some("staging"));
    }

    #[test]
    fn test_invalid_index_is_rejected() {
        for raw in ["abc", "-1", "1.5"] {
            let params = QueryParams::parse(&format!("testIndex={}", raw));
            let err = SessionCursor::resolve(&params, REPORTER, &SessionDefaults::default())
                .unwrap_err();
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn test_pass_through_params_kept_as_extra() {
        let params = QueryParams::parse("tags=smoke&lang=en&testIndex=1&reporterUrl=http://evil");
        let state = SessionCursor::resolve(&params, REPORTER, &SessionDefaults::default()).unwrap();

        assert_eq!(state.extra.get("lang").map(String::as_str), Some("en"));
        assert_eq!(state.extra.get("tags").map(String::as_str), Some("smoke"));
        assert!(!state.extra.contains_key("testIndex"));
        assert!(state.reporter_url.starts_with(REPORTER));
    }
}
