use lesson_core::model::{Lesson, LessonDraft, LessonError, QuestionDraft, QuestionKind};

pub const DEMO_LESSON_ID: &str = "1";

fn mcq(id: &str, prompt: &str, options: &[&str], correct: usize, explanation: &str, hint: &str) -> QuestionDraft {
    QuestionDraft {
        id: id.to_string(),
        kind: QuestionKind::MultipleChoice,
        prompt: prompt.to_string(),
        options: options.iter().map(|o| (*o).to_string()).collect(),
        correct,
        explanation: explanation.to_string(),
        hint: hint.to_string(),
    }
}

/// Built-in "Net Force Basics" lesson used when no lesson files are given.
///
/// # Errors
///
/// Returns `LessonError` only if the built-in data is broken.
pub fn net_force_basics() -> Result<Lesson, LessonError> {
    LessonDraft {
        id: DEMO_LESSON_ID.to_string(),
        title: "Net Force Basics".to_string(),
        skill_name: "Forces".to_string(),
        questions: vec![
            mcq(
                "q1",
                "What happens when forces are balanced on an object?",
                &[
                    "The object accelerates",
                    "The object remains at rest or moves at constant velocity",
                    "The object moves in circles",
                    "The object falls down",
                ],
                1,
                "When forces are balanced (net force = 0), an object will remain at rest if it was at rest, or continue moving at constant velocity if it was moving.",
                "Think about Newton's First Law - what happens when there's no net force?",
            ),
            mcq(
                "q2",
                "If a 10N force pushes right and a 6N force pushes left, what is the net force?",
                &["16N right", "4N right", "4N left", "16N left"],
                1,
                "Net force = 10N - 6N = 4N in the direction of the larger force (right).",
                "Subtract the smaller force from the larger force.",
            ),
            mcq(
                "q3",
                "Which of these is a contact force?",
                &["Gravity", "Magnetic force", "Friction", "Electric force"],
                2,
                "Friction is a contact force because it occurs when two surfaces are in direct contact.",
                "Contact forces require objects to be touching each other.",
            ),
        ],
    }
    .validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_lesson_is_valid() {
        let lesson = net_force_basics().unwrap();
        assert_eq!(lesson.id().as_str(), DEMO_LESSON_ID);
        assert_eq!(lesson.len(), 3);
        assert_eq!(lesson.questions()[2].correct().letter(), 'C');
    }
}
