use crate::data::{Genre, student::StudentRecord};
use serde::Deserialize;

/// The three search inputs above the table, as the browser sends them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StudentFilterQuery {
    pub search_inscription: String,
    pub search_nom_prenom: String,
    pub search_genre: String,
}

#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
    inscription: String,
    nom_prenom: String,
    genre: Option<Genre>,
}

impl From<&StudentFilterQuery> for StudentFilter {
    fn from(query: &StudentFilterQuery) -> Self {
        Self {
            inscription: query.search_inscription.to_lowercase(),
            nom_prenom: query.search_nom_prenom.to_lowercase(),
            genre: if query.search_genre.is_empty() {
                None
            } else {
                Some(Genre::from(query.search_genre.clone()))
            },
        }
    }
}

impl StudentFilter {
    pub fn matches(&self, student: &StudentRecord) -> bool {
        let matches_inscription = student
            .inscription
            .to_lowercase()
            .contains(&self.inscription);
        let matches_nom_prenom = student
            .full_name()
            .to_lowercase()
            .contains(&self.nom_prenom);
        let matches_genre = self.genre.as_ref().is_none_or(|genre| &student.genre == genre);

        matches_inscription && matches_nom_prenom && matches_genre
    }

    pub fn apply<'a>(&self, students: &'a [StudentRecord]) -> Vec<&'a StudentRecord> {
        students
            .iter()
            .filter(|student| self.matches(student))
            .collect()
    }
}
