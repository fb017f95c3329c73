use crate::data::{
    ResourceId,
    class::{ClassInfo, class_name},
    filter::StudentFilter,
    student::StudentRecord,
};

/// The lists the page renders from.
///
/// Each fetch replaces a list wholesale. The one local edit is dropping a record after the backend
/// deleted it.
#[derive(Debug, Default)]
pub struct RecordStore {
    students: Vec<StudentRecord>,
    classes: Vec<ClassInfo>,
}

impl RecordStore {
    pub fn replace_students(&mut self, students: Vec<StudentRecord>) {
        self.students = students;
    }

    pub fn replace_classes(&mut self, classes: Vec<ClassInfo>) {
        self.classes = classes;
    }

    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn classes(&self) -> &[ClassInfo] {
        &self.classes
    }

    pub fn filtered(&self, filter: &StudentFilter) -> Vec<&StudentRecord> {
        filter.apply(&self.students)
    }

    pub fn find_student(&self, id: &ResourceId) -> Option<&StudentRecord> {
        self.students.iter().find(|student| &student.id == id)
    }

    pub fn class_name_of(&self, student: &StudentRecord) -> &str {
        class_name(&self.classes, student.class_id.as_ref())
    }

    ///returns how many records went
    pub fn remove_student(&mut self, id: &ResourceId) -> usize {
        let before = self.students.len();
        self.students.retain(|student| &student.id != id);
        before - self.students.len()
    }
}
