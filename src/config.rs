//! Runtime configuration for the analyzer.
//!
//! Settings can come from an optional YAML document and are then overridden by
//! command-line flags or environment variables. Only read-only network
//! settings live here; they are shared by every fetcher of an invocation.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{self, Error};

/// Public GitHub REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Network settings used by the production transport.
///
/// # Examples
///
/// ```
/// use gh_insight::AnalyzerConfig;
///
/// let config = AnalyzerConfig::from_yaml("api_url: https://ghe.example.com/api/v3\n",)?;
/// assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
/// assert!(config.token.is_none());
/// # Ok::<(), gh_insight::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize,)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig
{
    /// API root that routes are appended to.
    #[serde(default = "default_api_url", alias = "api-url", alias = "apiUrl")]
    pub api_url: String,

    /// Optional static token sent with every request.
    #[serde(default)]
    pub token: Option<String,>,
}

impl Default for AnalyzerConfig
{
    fn default() -> Self
    {
        Self {
            api_url: default_api_url(), token: None,
        }
    }
}

fn default_api_url() -> String
{
    DEFAULT_API_URL.to_owned()
}

impl AnalyzerConfig
{
    /// Loads settings from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read, [`Error::Parse`]
    /// for malformed YAML and [`Error::Validation`] for invalid values.
    pub fn load(path: &Path,) -> Result<Self, Error,>
    {
        let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
        Self::from_yaml(&contents,)
    }

    /// Parses settings from a YAML string. An empty document yields the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Parse`] and [`Error::Validation`].
    pub fn from_yaml(contents: &str,) -> Result<Self, Error,>
    {
        let config = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(contents,)?
        };
        config.validated()
    }

    /// Applies overrides, ignoring blank values.
    pub fn with_overrides(mut self, api_url: Option<&str,>, token: Option<&str,>,) -> Self
    {
        if let Some(url,) = api_url.map(str::trim,).filter(|value| !value.is_empty(),) {
            url.clone_into(&mut self.api_url,);
        }
        if let Some(token,) = token.map(str::trim,).filter(|value| !value.is_empty(),) {
            self.token = Some(token.to_owned(),);
        }
        self
    }

    /// Checks the invariants of the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the API URL is blank or does not
    /// use an http(s) scheme, or when the token is blank.
    pub fn validated(self,) -> Result<Self, Error,>
    {
        let url = self.api_url.trim();
        if url.is_empty() {
            return Err(Error::validation("api_url cannot be empty",),);
        }
        if !(url.starts_with("https://",) || url.starts_with("http://",)) {
            return Err(Error::validation(format!("api_url must use http or https: '{url}'"),),);
        }
        if self.token.as_deref().is_some_and(|token| token.trim().is_empty(),) {
            return Err(Error::validation("token cannot be blank",),);
        }

        Ok(Self {
            api_url: url.trim_end_matches('/',).to_owned(),
            token:   self.token,
        },)
    }
}

#[cfg(test)]
mod tests
{
    use std::fs;

    use tempfile::tempdir;

    use super::{AnalyzerConfig, DEFAULT_API_URL};
    use crate::Error;

    #[test]
    fn empty_document_uses_defaults()
    {
        let config = AnalyzerConfig::from_yaml("  \n",).expect("defaults",);
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn trailing_slash_is_trimmed_from_api_url()
    {
        let config =
            AnalyzerConfig::from_yaml("api-url: https://example.test/api/\ntoken: abc\n",)
                .expect("valid",);
        assert_eq!(config.api_url, "https://example.test/api");
        assert_eq!(config.token.as_deref(), Some("abc"));
    }

    #[test]
    fn rejects_non_http_scheme()
    {
        let error = AnalyzerConfig::from_yaml("api_url: ftp://example.test\n",)
            .expect_err("ftp must be rejected",);
        match error {
            Error::Validation {
                message,
            } => assert!(message.starts_with("api_url must use http or https")),
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_fields()
    {
        let error = AnalyzerConfig::from_yaml("retries: 3\n",).expect_err("unknown field",);
        assert!(matches!(error, Error::Parse { .. }));
    }

    #[test]
    fn overrides_replace_values_and_ignore_blanks()
    {
        let config = AnalyzerConfig::default()
            .with_overrides(Some("http://localhost:8080",), Some("  ",),)
            .validated()
            .expect("valid",);
        assert_eq!(config.api_url, "http://localhost:8080");
        assert!(config.token.is_none());
    }

    #[test]
    fn load_reads_yaml_files()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let path = temp.path().join("gh-insight.yaml",);
        fs::write(&path, "token: secret\n",).expect("failed to write config",);

        let config = AnalyzerConfig::load(&path,).expect("valid config",);
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn load_reports_missing_files()
    {
        let temp = tempdir().expect("failed to create tempdir",);
        let error = AnalyzerConfig::load(&temp.path().join("missing.yaml",),)
            .expect_err("missing file",);
        assert!(matches!(error, Error::Io { .. }));
    }
}
