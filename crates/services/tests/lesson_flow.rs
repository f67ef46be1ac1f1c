use std::sync::Arc;

use lesson_core::model::{
    Lesson, LessonId, OptionIndex, QuestionDraft, QuestionKind, SessionSettings,
};
use lesson_core::session::{Intent, IntentError};
use lesson_core::time::fixed_now;
use lesson_core::Notification;
use services::{Clock, InMemoryQuestionBank, LessonRunner};

fn question(id: &str, prompt: &str, options: &[&str], correct: usize) -> QuestionDraft {
    QuestionDraft {
        id: id.to_string(),
        kind: QuestionKind::MultipleChoice,
        prompt: prompt.to_string(),
        options: options.iter().map(|o| (*o).to_string()).collect(),
        correct,
        explanation: format!("{id} explanation"),
        hint: format!("{id} hint"),
    }
}

fn net_force_lesson() -> Lesson {
    let questions = vec![
        question(
            "q1",
            "What happens when forces are balanced on an object?",
            &[
                "The object accelerates",
                "The object remains at rest or moves at constant velocity",
                "The object moves in circles",
                "The object falls down",
            ],
            1,
        ),
        question(
            "q2",
            "If a 10N force pushes right and a 6N force pushes left, what is the net force?",
            &["16N right", "4N right", "4N left", "16N left"],
            1,
        ),
        question(
            "q3",
            "Which of these is a contact force?",
            &["Gravity", "Magnetic force", "Friction", "Electric force"],
            2,
        ),
    ]
    .into_iter()
    .map(|q| q.validate().unwrap())
    .collect();

    Lesson::new(LessonId::new("1").unwrap(), "Net Force Basics", "Forces", questions).unwrap()
}

fn single_question_lesson() -> Lesson {
    let q = question("solo", "2 + 2?", &["3", "4"], 1).validate().unwrap();
    Lesson::new(LessonId::new("solo").unwrap(), "Warmup", "Math", vec![q]).unwrap()
}

fn runner() -> LessonRunner {
    let bank =
        InMemoryQuestionBank::from_lessons([net_force_lesson(), single_question_lesson()]).unwrap();
    LessonRunner::new(Clock::fixed(fixed_now()), Arc::new(bank))
}

fn pick(option: usize) -> Intent {
    Intent::Select(OptionIndex::new(option))
}

#[test]
fn mixed_answers_across_three_questions() {
    let runner = runner();
    let mut session = runner.start_lesson(&LessonId::new("1").unwrap()).unwrap();
    let mut toasts: Vec<Notification> = Vec::new();

    for (option, last) in [(1, false), (0, false), (2, true)] {
        runner.dispatch(&mut session, pick(option), &mut toasts).unwrap();
        runner.dispatch(&mut session, Intent::Submit, &mut toasts).unwrap();
        let snap = runner.dispatch(&mut session, Intent::Advance, &mut toasts).unwrap();
        assert_eq!(snap.is_complete, last);
    }

    assert_eq!(session.score(), 20);
    assert_eq!(session.hearts(), 4);
    assert!(session.is_complete());
    assert_eq!(
        toasts.last(),
        Some(&Notification::LessonComplete { final_score: 20 })
    );

    let summary = runner.summary(&session).unwrap();
    assert_eq!(summary.final_score(), 20);
    assert_eq!(summary.correct(), 2);
    assert_eq!(summary.incorrect(), 1);
    assert_eq!(summary.hints_used(), 0);
    assert_eq!(summary.hearts_remaining(), 4);
}

#[test]
fn hints_at_one_heart_cost_nothing() {
    let runner = runner().with_settings(SessionSettings::with_starting_hearts(1).unwrap());
    let mut session = runner.start_lesson(&LessonId::new("solo").unwrap()).unwrap();
    let mut toasts: Vec<Notification> = Vec::new();

    runner.dispatch(&mut session, Intent::Hint, &mut toasts).unwrap();
    let snap = runner.dispatch(&mut session, Intent::Hint, &mut toasts).unwrap();
    assert_eq!(snap.hearts, 1);
    assert_eq!(snap.hint.as_deref(), Some("solo hint"));

    runner.dispatch(&mut session, pick(1), &mut toasts).unwrap();
    let snap = runner.dispatch(&mut session, Intent::Submit, &mut toasts).unwrap();
    assert_eq!(snap.score, 10);
    assert_eq!(snap.hearts, 1);
    assert_eq!(toasts, [Notification::AnswerCorrect { xp: 10 }]);
}

#[test]
fn advance_without_submit_is_rejected() {
    let runner = runner();
    let mut session = runner.start_lesson(&LessonId::new("1").unwrap()).unwrap();
    let mut toasts: Vec<Notification> = Vec::new();

    runner.dispatch(&mut session, pick(0), &mut toasts).unwrap();
    let err = runner
        .dispatch(&mut session, Intent::Advance, &mut toasts)
        .unwrap_err();

    assert_eq!(err, IntentError::NotRevealed);
    assert_eq!(session.current_index(), 0);
    assert!(!session.is_revealed());
    assert_eq!(session.selected_answer(), Some(OptionIndex::new(0)));
    assert!(toasts.is_empty());
}

#[test]
fn score_and_hearts_are_monotonic_through_a_lesson() {
    let runner = runner();
    let mut session = runner.start_lesson(&LessonId::new("1").unwrap()).unwrap();
    let mut toasts: Vec<Notification> = Vec::new();
    let mut last_score = session.score();
    let mut last_hearts = session.hearts();

    let script = [
        Intent::Hint,
        Intent::Hint,
        Intent::Submit,
        pick(3),
        Intent::Submit,
        Intent::Submit,
        Intent::Advance,
        pick(1),
        Intent::Submit,
        Intent::Advance,
        Intent::Hint,
        pick(2),
        Intent::Submit,
        Intent::Hint,
        Intent::Advance,
    ];

    for intent in script {
        let _ = runner.dispatch(&mut session, intent, &mut toasts);
        assert!(session.score() >= last_score);
        assert!(session.hearts() <= last_hearts);
        if session.is_revealed() {
            assert!(session.selected_answer().is_some());
        }
        last_score = session.score();
        last_hearts = session.hearts();
    }

    assert!(session.is_complete());
    // Two hints (one per question) and one wrong answer.
    assert_eq!(session.hearts(), 2);
    assert_eq!(session.score(), 20);
    assert_eq!(runner.summary(&session).unwrap().hints_used(), 2);
}
