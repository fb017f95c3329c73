//! The student backend's HTTP API.
//!
//! Paths, methods and payload shapes here are fixed by the backend.

use crate::{
    config::BackendConfig,
    data::{
        ResourceId, class::ClassInfo, new_student::ValidatedNewStudent,
        student::RawStudentRecord,
    },
    error::{
        BackendBodySnafu, BackendUnreachableSnafu, BadContentTypeSnafu, BuildHttpClientSnafu,
        ElevesError, ElevesResult,
    },
};
use reqwest::{
    Client, Response,
    multipart::{Form, Part},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use snafu::ResultExt;
use std::sync::Arc;

const STUDENTS_PATH: &str = "/api/getpicture";
const CLASSES_PATH: &str = "/api/classes/getclasses";
const UPLOAD_PATH: &str = "/api/upload";
const DELETE_PATH: &str = "/api/deletefile";

#[derive(Deserialize)]
struct UploadSuccess {
    url: String,
}

#[derive(Deserialize)]
struct BackendFailure {
    message: Option<String>,
}

#[derive(Clone, Debug)]
pub struct StudentBackend {
    client: Client,
    config: Arc<BackendConfig>,
}

impl StudentBackend {
    pub fn new(config: Arc<BackendConfig>) -> ElevesResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("eleves/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(BuildHttpClientSnafu)?;
        Ok(Self { client, config })
    }

    /// Rows that don't decode are logged and skipped, so one bad record can't hide the rest.
    pub async fn get_students(&self) -> ElevesResult<Vec<RawStudentRecord>> {
        let rows: Vec<Value> = self.get_json(STUDENTS_PATH).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(student) => Some(student),
                Err(e) => {
                    warn!(?e, "Skipping a student record that doesn't decode");
                    None
                }
            })
            .collect())
    }

    pub async fn get_classes(&self) -> ElevesResult<Vec<ClassInfo>> {
        self.get_json(CLASSES_PATH).await
    }

    /// Sends one multipart `POST`, returning the URL the backend stored the photo at.
    pub async fn upload(&self, student: ValidatedNewStudent) -> ElevesResult<String> {
        let endpoint = self.config.endpoint(UPLOAD_PATH);
        let form = multipart_form(student)?;

        let rsp = self
            .client
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .context(BackendUnreachableSnafu {
                endpoint: endpoint.as_str(),
            })?;
        let rsp = ensure_success(rsp, &endpoint).await?;

        let UploadSuccess { url } = rsp
            .json()
            .await
            .context(BackendBodySnafu { endpoint })?;
        Ok(url)
    }

    /// The success body, if any, is ignored.
    pub async fn delete(&self, id: &ResourceId) -> ElevesResult<()> {
        let endpoint = self.config.endpoint_with_id(DELETE_PATH, id)?;

        let rsp = self
            .client
            .delete(endpoint.clone())
            .send()
            .await
            .context(BackendUnreachableSnafu {
                endpoint: endpoint.as_str(),
            })?;
        ensure_success(rsp, endpoint.as_str()).await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ElevesResult<T> {
        let endpoint = self.config.endpoint(path);

        let rsp = self
            .client
            .get(&endpoint)
            .send()
            .await
            .context(BackendUnreachableSnafu {
                endpoint: endpoint.as_str(),
            })?;
        let rsp = ensure_success(rsp, &endpoint).await?;

        rsp.json().await.context(BackendBodySnafu { endpoint })
    }
}

/// Non-success responses become [`ElevesError::BackendRejected`], carrying the backend's
/// `message` when the body has one.
async fn ensure_success(rsp: Response, endpoint: &str) -> ElevesResult<Response> {
    let status = rsp.status();
    if status.is_success() {
        return Ok(rsp);
    }

    let message = rsp
        .json::<BackendFailure>()
        .await
        .ok()
        .and_then(|failure| failure.message);

    Err(ElevesError::BackendRejected {
        endpoint: endpoint.to_string(),
        status,
        message,
    })
}

fn multipart_form(
    ValidatedNewStudent {
        nom,
        prenom,
        birth_date,
        ecole_origine,
        genre,
        inscription,
        telephone,
        class_id,
        image,
    }: ValidatedNewStudent,
) -> ElevesResult<Form> {
    let image_part = Part::bytes(image.bytes)
        .file_name(image.file_name)
        .mime_str(&image.content_type)
        .context(BadContentTypeSnafu {
            content_type: image.content_type.as_str(),
        })?;

    Ok(Form::new()
        .part("image", image_part)
        .text("nom", nom)
        .text("prenom", prenom)
        .text("birthDate", birth_date)
        .text("ecoleOrigine", ecole_origine)
        .text("genre", genre)
        .text("inscription", inscription)
        .text("telephone", telephone)
        .text("classId", class_id))
}
