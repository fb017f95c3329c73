use crate::{
    config::date_locale::DateLocaleConfig,
    data::ResourceId,
    error::{
        BadEnvVarSnafu, ElevesResult, InvalidBackendUrlSnafu, ParseUploadLimitSnafu,
        UnaddressableIdSnafu,
    },
};
use dotenvy::var;
use reqwest::Url;
use snafu::{OptionExt, ResultExt};
use std::sync::Arc;

pub mod date_locale;

const DEFAULT_LOCALE: &str = "fr-FR";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    backend_config: Arc<BackendConfig>,
    date_locale_config: Arc<DateLocaleConfig>,
    max_upload_bytes: usize,
}

impl RuntimeConfiguration {
    pub fn new() -> ElevesResult<Self> {
        let max_upload_bytes = match var("ELEVES_MAX_UPLOAD_BYTES") {
            Ok(limit) => limit.parse().context(ParseUploadLimitSnafu)?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let locale = var("ELEVES_LOCALE").unwrap_or_else(|_| DEFAULT_LOCALE.to_string());
        let date_locale_config = match var("ELEVES_TIMEZONE") {
            Ok(tz) => DateLocaleConfig::new(tz, locale)?,
            Err(_) => DateLocaleConfig::with_system_timezone(locale)?,
        };

        Ok(Self::from_parts(
            BackendConfig::new()?,
            date_locale_config,
            max_upload_bytes,
        ))
    }

    pub fn from_parts(
        backend_config: BackendConfig,
        date_locale_config: DateLocaleConfig,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            backend_config: Arc::new(backend_config),
            date_locale_config: Arc::new(date_locale_config),
            max_upload_bytes,
        }
    }

    pub fn backend_config(&self) -> Arc<BackendConfig> {
        self.backend_config.clone()
    }

    pub fn date_locale_config(&self) -> Arc<DateLocaleConfig> {
        self.date_locale_config.clone()
    }

    pub const fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

#[derive(Debug)]
pub struct BackendConfig {
    base_url: String,
}

impl BackendConfig {
    pub fn new() -> ElevesResult<Self> {
        let name = "ELEVES_BACKEND_URL";
        Self::from_base_url(var(name).context(BadEnvVarSnafu { name })?)
    }

    pub fn from_base_url(base_url: String) -> ElevesResult<Self> {
        let usable = Url::parse(&base_url).is_ok_and(|url| {
            matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base()
        });
        snafu::ensure!(usable, InvalidBackendUrlSnafu { provided: base_url });

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    ///`path` must start with a `/`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// `path` followed by `id` as exactly one percent-encoded segment.
    pub fn endpoint_with_id(&self, path: &str, id: &ResourceId) -> ElevesResult<Url> {
        let id = id.to_string();
        //pushing these would silently drop or climb a segment
        snafu::ensure!(id != "." && id != "..", UnaddressableIdSnafu { id });

        let mut url = Url::parse(&self.endpoint(path))
            .ok()
            .context(InvalidBackendUrlSnafu {
                provided: self.base_url.as_str(),
            })?;
        url.path_segments_mut()
            .ok()
            .context(InvalidBackendUrlSnafu {
                provided: self.base_url.as_str(),
            })?
            .push(&id);

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_doubled_slash() {
        let config = BackendConfig::from_base_url("http://localhost:3000/".to_string()).unwrap();
        assert_eq!(
            config.endpoint("/api/getpicture"),
            "http://localhost:3000/api/getpicture"
        );
    }

    #[test]
    fn backend_url_needs_a_scheme() {
        assert!(BackendConfig::from_base_url("localhost:3000".to_string()).is_err());
        assert!(BackendConfig::from_base_url("mailto:admin@ecole.fr".to_string()).is_err());
    }

    #[test]
    fn ids_stay_inside_their_segment() {
        let config = BackendConfig::from_base_url("http://localhost:3000".to_string()).unwrap();

        let url = config
            .endpoint_with_id("/api/deletefile", &ResourceId::Number(12))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/deletefile/12");

        let url = config
            .endpoint_with_id(
                "/api/deletefile",
                &ResourceId::Text("../../api/getpicture?x=2#y".into()),
            )
            .unwrap();
        assert_eq!(url.path(), "/api/deletefile/..%2F..%2Fapi%2Fgetpicture%3Fx=2%23y");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn dot_segments_are_refused() {
        let config = BackendConfig::from_base_url("http://localhost:3000".to_string()).unwrap();
        for id in [".", ".."] {
            assert!(
                config
                    .endpoint_with_id("/api/deletefile", &ResourceId::Text(id.into()))
                    .is_err()
            );
        }
    }
}
