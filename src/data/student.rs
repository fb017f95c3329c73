use crate::{
    config::date_locale::DateLocaliser,
    data::{Genre, ResourceId},
    error::{B64Snafu, ElevesResult},
};
use base64::{Engine, prelude::BASE64_STANDARD};
use serde::{Deserialize, Deserializer};
use snafu::ResultExt;

/// One element of `GET /api/getpicture`.
///
/// Only `id` is required. The display fields take whatever scalar the backend sent, and
/// `null` or a missing key reads as empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStudentRecord {
    pub id: ResourceId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub nom: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub prenom: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub birth_date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ecole_origine: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub genre: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub inscription: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub telephone: String,
    #[serde(default)]
    pub class_id: Option<ResourceId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub mime_type: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub file_data: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Text(text)) => text,
        Some(Scalar::Integer(n)) => n.to_string(),
        Some(Scalar::Float(n)) => n.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct StudentRecord {
    pub id: ResourceId,
    pub nom: String,
    pub prenom: String,
    pub birth_date: String,
    pub ecole_origine: String,
    pub genre: Genre,
    pub inscription: String,
    pub telephone: String,
    pub class_id: Option<ResourceId>,
    pub photo: InlinePhoto,
}

impl StudentRecord {
    pub fn from_raw(raw: RawStudentRecord, dates: &DateLocaliser<'_>) -> Self {
        let RawStudentRecord {
            id,
            nom,
            prenom,
            birth_date,
            ecole_origine,
            genre,
            inscription,
            telephone,
            class_id,
            mime_type,
            file_data,
        } = raw;

        let birth_date = match dates.localise_raw_date(&birth_date) {
            Ok(Some(localised)) => localised,
            Ok(None) => {
                warn!(%id, ?birth_date, "Unparseable birth date, showing it as-is");
                birth_date
            }
            Err(e) => {
                warn!(%id, ?e, "Unable to localise birth date, showing it as-is");
                birth_date
            }
        };

        Self {
            id,
            nom,
            prenom,
            birth_date,
            ecole_origine,
            genre: Genre::from(genre),
            inscription,
            telephone,
            class_id,
            photo: InlinePhoto::new(&mime_type, &file_data),
        }
    }

    ///`nom prenom`, the way the name search sees it
    pub fn full_name(&self) -> String {
        format!("{} {}", self.nom, self.prenom)
    }
}

/// A photo kept as the `data:` URI the table displays.
#[derive(Debug, Clone)]
pub struct InlinePhoto {
    data_uri: String,
    mime_len: usize,
}

impl InlinePhoto {
    const PREFIX: &'static str = "data:";
    const SEPARATOR: &'static str = ";base64,";

    pub fn new(mime_type: &str, base64_data: &str) -> Self {
        Self {
            data_uri: format!(
                "{}{mime_type}{}{base64_data}",
                Self::PREFIX,
                Self::SEPARATOR
            ),
            mime_len: mime_type.len(),
        }
    }

    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }

    pub fn mime_type(&self) -> &str {
        &self.data_uri[Self::PREFIX.len()..Self::PREFIX.len() + self.mime_len]
    }

    fn base64_data(&self) -> &str {
        &self.data_uri[Self::PREFIX.len() + self.mime_len + Self::SEPARATOR.len()..]
    }

    pub fn decode(&self) -> ElevesResult<Vec<u8>> {
        BASE64_STANDARD
            .decode(self.base64_data())
            .context(B64Snafu)
    }
}
