use crate::error::{ElevesResult, MultipartSnafu};
use axum::extract::Multipart;
use bitflags::bitflags;
use snafu::ResultExt;

bitflags! {
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub struct MissingFields: u16 {
        const NOM =           0b0000_0000_0000_0001;
        const PRENOM =        0b0000_0000_0000_0010;
        const BIRTH_DATE =    0b0000_0000_0000_0100;
        const ECOLE_ORIGINE = 0b0000_0000_0000_1000;
        const GENRE =         0b0000_0000_0001_0000;
        const INSCRIPTION =   0b0000_0000_0010_0000;
        const TELEPHONE =     0b0000_0000_0100_0000;
        const CLASS =         0b0000_0000_1000_0000;
        const IMAGE =         0b0000_0001_0000_0000;
    }
}

impl MissingFields {
    pub fn as_nice_list(&self) -> impl Iterator<Item = &'static str> {
        self.iter().filter_map(|x| match x {
            Self::NOM => Some("Nom"),
            Self::PRENOM => Some("Prénom"),
            Self::BIRTH_DATE => Some("Date de Naissance"),
            Self::ECOLE_ORIGINE => Some("École d'origine"),
            Self::GENRE => Some("Genre"),
            Self::INSCRIPTION => Some("Numéro d'inscription"),
            Self::TELEPHONE => Some("Téléphone"),
            Self::CLASS => Some("Classe"),
            Self::IMAGE => Some("Image"),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SelectedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedImage {
    const FALLBACK_CONTENT_TYPE: &'static str = "application/octet-stream";

    /// Browsers send an empty, nameless part when no file was picked; that is no image at all.
    pub fn new(file_name: Option<&str>, content_type: Option<&str>, bytes: Vec<u8>) -> Option<Self> {
        let file_name = file_name.unwrap_or_default();
        if file_name.is_empty() && bytes.is_empty() {
            return None;
        }

        let content_type = match content_type {
            Some(content_type)
                if !content_type.is_empty() && content_type != Self::FALLBACK_CONTENT_TYPE =>
            {
                content_type.to_string()
            }
            _ => infer::get(&bytes).map_or_else(
                || Self::FALLBACK_CONTENT_TYPE.to_string(),
                |kind| kind.mime_type().to_string(),
            ),
        };

        Some(Self {
            file_name: file_name.to_string(),
            content_type,
            bytes,
        })
    }
}

/// Everything the add form holds, exactly as typed.
///
/// Field names match the multipart names the backend expects.
#[derive(Debug, Clone, Default)]
pub struct NewStudentForm {
    pub nom: String,
    pub prenom: String,
    pub birth_date: String,
    pub ecole_origine: String,
    pub genre: String,
    pub inscription: String,
    pub telephone: String,
    pub class_id: String,
    pub image: Option<SelectedImage>,
}

#[derive(Debug, Clone)]
pub struct ValidatedNewStudent {
    pub nom: String,
    pub prenom: String,
    pub birth_date: String,
    pub ecole_origine: String,
    pub genre: String,
    pub inscription: String,
    pub telephone: String,
    pub class_id: String,
    pub image: SelectedImage,
}

impl NewStudentForm {
    pub async fn from_multipart(mut multipart: Multipart) -> ElevesResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.context(MultipartSnafu)? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            if name == "image" {
                let file_name = field.file_name().map(ToString::to_string);
                let content_type = field.content_type().map(ToString::to_string);
                let bytes = field.bytes().await.context(MultipartSnafu)?;
                form.image = SelectedImage::new(
                    file_name.as_deref(),
                    content_type.as_deref(),
                    bytes.to_vec(),
                );
                continue;
            }

            let slot = match name.as_str() {
                "nom" => &mut form.nom,
                "prenom" => &mut form.prenom,
                "birthDate" => &mut form.birth_date,
                "ecoleOrigine" => &mut form.ecole_origine,
                "genre" => &mut form.genre,
                "inscription" => &mut form.inscription,
                "telephone" => &mut form.telephone,
                "classId" => &mut form.class_id,
                _ => {
                    trace!(?name, "Ignoring unknown multipart field");
                    continue;
                }
            };
            *slot = field.text().await.context(MultipartSnafu)?;
        }

        Ok(form)
    }

    /// The typed values, for re-rendering the form; the browser never refills a file input.
    #[must_use]
    pub fn without_image(&self) -> Self {
        Self {
            image: None,
            ..self.clone()
        }
    }

    pub fn missing_fields(&self) -> MissingFields {
        let mut missing = MissingFields::empty();
        for (value, flag) in [
            (&self.nom, MissingFields::NOM),
            (&self.prenom, MissingFields::PRENOM),
            (&self.birth_date, MissingFields::BIRTH_DATE),
            (&self.ecole_origine, MissingFields::ECOLE_ORIGINE),
            (&self.genre, MissingFields::GENRE),
            (&self.inscription, MissingFields::INSCRIPTION),
            (&self.telephone, MissingFields::TELEPHONE),
            (&self.class_id, MissingFields::CLASS),
        ] {
            if value.is_empty() {
                missing |= flag;
            }
        }
        if self.image.is_none() {
            missing |= MissingFields::IMAGE;
        }
        missing
    }

    /// Presence only: a field holding just whitespace counts as filled in.
    pub fn validate(self) -> Result<ValidatedNewStudent, (Self, MissingFields)> {
        let missing = self.missing_fields();

        match self {
            Self {
                nom,
                prenom,
                birth_date,
                ecole_origine,
                genre,
                inscription,
                telephone,
                class_id,
                image: Some(image),
            } if missing.is_empty() => Ok(ValidatedNewStudent {
                nom,
                prenom,
                birth_date,
                ecole_origine,
                genre,
                inscription,
                telephone,
                class_id,
                image,
            }),
            form => Err((form, missing)),
        }
    }
}
