use crate::{
    backend::StudentBackend,
    config::RuntimeConfiguration,
    data::student::StudentRecord,
    error::ElevesResult,
    store::RecordStore,
};
use maud::{DOCTYPE, Markup, html};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Clone, Debug)]
pub struct ElevesState {
    config: RuntimeConfiguration,
    backend: StudentBackend,
    store: Arc<RwLock<RecordStore>>,
}

impl ElevesState {
    pub fn new(config: RuntimeConfiguration) -> ElevesResult<Self> {
        let backend = StudentBackend::new(config.backend_config())?;

        Ok(Self {
            config,
            backend,
            store: Arc::new(RwLock::new(RecordStore::default())),
        })
    }

    #[allow(clippy::unused_self)] //in case self is ever needed :)
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="fr" {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Gestion des élèves" }
                }
                body class="flex flex-col items-center justify-center min-h-screen bg-gray-100 p-6" {
                    (markup)
                }
            }
        }
    }

    pub const fn config(&self) -> &RuntimeConfiguration {
        &self.config
    }

    pub const fn backend(&self) -> &StudentBackend {
        &self.backend
    }

    pub async fn store(&self) -> RwLockReadGuard<'_, RecordStore> {
        self.store.read().await
    }

    pub async fn store_mut(&self) -> RwLockWriteGuard<'_, RecordStore> {
        self.store.write().await
    }

    /// Re-fetches every record; on failure the current list stays as it was.
    ///
    /// Returns how many records are now loaded.
    pub async fn refresh_students(&self) -> ElevesResult<usize> {
        let raw = self.backend.get_students().await?;
        let students: Vec<_> = {
            let dates = self.config.date_locale_config();
            let localiser = dates.localiser()?;
            raw.into_iter()
                .map(|raw| StudentRecord::from_raw(raw, &localiser))
                .collect()
        };

        let count = students.len();
        self.store_mut().await.replace_students(students);
        Ok(count)
    }

    /// Re-fetches the class list; on failure the current list stays as it was.
    pub async fn refresh_classes(&self) -> ElevesResult<usize> {
        let classes = self.backend.get_classes().await?;
        let count = classes.len();
        self.store_mut().await.replace_classes(classes);
        Ok(count)
    }

    /// What opening the page does: both lists, failures only logged.
    pub async fn refresh_all(&self) {
        let (students, classes) = tokio::join!(self.refresh_students(), self.refresh_classes());

        match students {
            Ok(count) => info!(count, "Loaded students"),
            Err(e) => error!(?e, "Erreur lors de la récupération des images"),
        }
        match classes {
            Ok(count) => info!(count, "Loaded classes"),
            Err(e) => error!(?e, "Erreur lors de la récupération des classes"),
        }
    }
}
