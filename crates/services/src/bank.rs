use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use lesson_core::model::{Lesson, LessonDraft, LessonId};

use crate::error::BankError;

/// Listing entry for a lesson in a bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonListing {
    pub id: LessonId,
    pub title: String,
    pub skill_name: String,
    pub question_count: usize,
}

impl LessonListing {
    #[must_use]
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id().clone(),
            title: lesson.title().to_string(),
            skill_name: lesson.skill_name().to_string(),
            question_count: lesson.len(),
        }
    }
}

/// Supplies ordered question lists to lesson sessions.
pub trait QuestionBank: Send + Sync {
    /// Fetch a lesson by ID.
    ///
    /// # Errors
    ///
    /// Returns `BankError::NotFound` if no lesson has this id.
    fn lesson(&self, id: &LessonId) -> Result<Lesson, BankError>;

    /// All lessons, ordered by id.
    fn lessons(&self) -> Vec<LessonListing>;
}

//
// ─── IN MEMORY ─────────────────────────────────────────────────────────────────
//

/// Question bank over lessons handed in by the caller.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionBank {
    lessons: BTreeMap<LessonId, Lesson>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bank from a list of lessons.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Duplicate` if two lessons share an id.
    pub fn from_lessons(lessons: impl IntoIterator<Item = Lesson>) -> Result<Self, BankError> {
        let mut bank = Self::new();
        for lesson in lessons {
            bank.insert(lesson)?;
        }
        Ok(bank)
    }

    /// # Errors
    ///
    /// Returns `BankError::Duplicate` if the id is already taken.
    pub fn insert(&mut self, lesson: Lesson) -> Result<(), BankError> {
        if self.lessons.contains_key(lesson.id()) {
            return Err(BankError::Duplicate(lesson.id().clone()));
        }
        self.lessons.insert(lesson.id().clone(), lesson);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

impl QuestionBank for InMemoryQuestionBank {
    fn lesson(&self, id: &LessonId) -> Result<Lesson, BankError> {
        self.lessons
            .get(id)
            .cloned()
            .ok_or_else(|| BankError::NotFound(id.clone()))
    }

    fn lessons(&self) -> Vec<LessonListing> {
        self.lessons.values().map(LessonListing::from_lesson).collect()
    }
}

//
// ─── JSON FILES ────────────────────────────────────────────────────────────────
//

/// Question bank loaded from JSON lesson files.
///
/// Everything is read and validated up front; lookups never touch the disk.
#[derive(Debug, Clone)]
pub struct JsonQuestionBank {
    inner: InMemoryQuestionBank,
}

impl JsonQuestionBank {
    /// Loads a single `.json` file, or every `.json` file in a directory
    /// (in file name order).
    ///
    /// # Errors
    ///
    /// Returns `BankError` for unreadable files, malformed JSON, invalid
    /// lessons, or duplicate lesson ids across files.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let root = path.as_ref().to_path_buf();
        let io = |source| BankError::Io {
            path: root.clone(),
            source,
        };

        let files = if fs::metadata(&root).map_err(io)?.is_dir() {
            let mut files = Vec::new();
            for entry in fs::read_dir(&root).map_err(io)? {
                let path = entry.map_err(io)?.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    files.push(path);
                }
            }
            files.sort();
            files
        } else {
            vec![root.clone()]
        };

        let mut inner = InMemoryQuestionBank::new();
        for file in &files {
            for lesson in read_lesson_file(file)? {
                inner.insert(lesson)?;
            }
        }
        debug!(path = %root.display(), files = files.len(), lessons = inner.len(), "loaded lesson bank");

        Ok(Self { inner })
    }
}

fn read_lesson_file(path: &Path) -> Result<Vec<Lesson>, BankError> {
    let raw = fs::read_to_string(path).map_err(|source| BankError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parse = |source| BankError::Parse {
        path: path.to_path_buf(),
        source,
    };
    // A file holds one lesson object or an array of them.
    let drafts: Vec<LessonDraft> = if raw.trim_start().starts_with('[') {
        serde_json::from_str(&raw).map_err(parse)?
    } else {
        vec![serde_json::from_str(&raw).map_err(parse)?]
    };

    drafts
        .into_iter()
        .map(|draft| {
            draft.validate().map_err(|source| BankError::Invalid {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}

impl QuestionBank for JsonQuestionBank {
    fn lesson(&self, id: &LessonId) -> Result<Lesson, BankError> {
        self.inner.lesson(id)
    }

    fn lessons(&self) -> Vec<LessonListing> {
        self.inner.lessons()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const LESSON: &str = r#"{
        "id": "1",
        "title": "Net Force Basics",
        "skill": "Forces",
        "questions": [
            {
                "id": "q1",
                "type": "mcq",
                "question": "Which of these is a contact force?",
                "options": ["Gravity", "Magnetic force", "Friction", "Electric force"],
                "correct": 2,
                "explanation": "Friction occurs when surfaces touch.",
                "hint": "Contact forces require touching."
            }
        ]
    }"#;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn in_memory_rejects_duplicates() {
        let lesson = serde_json::from_str::<LessonDraft>(LESSON)
            .unwrap()
            .validate()
            .unwrap();

        let err = InMemoryQuestionBank::from_lessons([lesson.clone(), lesson]).unwrap_err();
        assert!(matches!(err, BankError::Duplicate(id) if id.as_str() == "1"));
    }

    #[test]
    fn missing_lesson_is_not_found() {
        let bank = InMemoryQuestionBank::new();
        let err = bank.lesson(&LessonId::new("nope").unwrap()).unwrap_err();
        assert!(matches!(err, BankError::NotFound(_)));
    }

    #[test]
    fn loads_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "forces.json", LESSON);

        let bank = JsonQuestionBank::load(&path).unwrap();
        let listing = bank.lessons();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].title, "Net Force Basics");
        assert_eq!(listing[0].skill_name, "Forces");
        assert_eq!(listing[0].question_count, 1);
    }

    #[test]
    fn loads_directory_and_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", LESSON);
        write(
            dir.path(),
            "b.json",
            &format!("[{}]", LESSON.replace(r#""id": "1""#, r#""id": "2""#)),
        );
        write(dir.path(), "notes.txt", "not json");

        let bank = JsonQuestionBank::load(dir.path()).unwrap();
        let ids: Vec<_> = bank.lessons().into_iter().map(|l| l.id.to_string()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn duplicate_ids_across_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", LESSON);
        write(dir.path(), "b.json", LESSON);
        assert!(matches!(
            JsonQuestionBank::load(dir.path()).unwrap_err(),
            BankError::Duplicate(_)
        ));
    }

    #[test]
    fn malformed_and_invalid_files_report_path() {
        let dir = tempfile::tempdir().unwrap();
        let bad = write(dir.path(), "bad.json", "{ nope");
        assert!(matches!(
            JsonQuestionBank::load(&bad).unwrap_err(),
            BankError::Parse { path, .. } if path == bad
        ));

        let invalid = write(
            dir.path(),
            "invalid.json",
            &LESSON.replace(r#""correct": 2"#, r#""correct": 7"#),
        );
        assert!(matches!(
            JsonQuestionBank::load(&invalid).unwrap_err(),
            BankError::Invalid { .. }
        ));
    }

    #[test]
    fn parse_errors_keep_line_and_column() {
        let dir = tempfile::tempdir().unwrap();
        let object = write(dir.path(), "object.json", "{\n  \"id\": \"1\",\n  \"title\": 7\n}");
        let array = write(dir.path(), "array.json", "  [\n  { \"id\": 1 }\n]");

        for file in [object, array] {
            let BankError::Parse { source, .. } = JsonQuestionBank::load(&file).unwrap_err() else {
                panic!("expected a parse error for {}", file.display());
            };
            assert!(source.line() > 1, "{source}");
            assert!(!source.to_string().contains("did not match any variant"));
        }
    }

    #[test]
    fn missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonQuestionBank::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, BankError::Io { .. }));
    }
}
