use std::io::{self, BufRead, Write};

use lesson_core::model::{LessonId, LessonSummary, OptionIndex, SessionSettings};
use lesson_core::session::{Intent, OptionState, SessionSnapshot};
use lesson_core::{Notification, Tone};
use services::{LessonListing, LessonRunner, LoggingSink};

const PROGRESS_WIDTH: usize = 20;

/// Line typed by the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Pick(OptionIndex),
    Submit,
    Hint,
    Continue,
    /// Empty line: submit, or continue once revealed.
    Primary,
    Help,
    Quit,
}

#[must_use]
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "" => Some(Command::Primary),
        "s" | "submit" => Some(Command::Submit),
        "h" | "hint" => Some(Command::Hint),
        "n" | "next" | "continue" | "complete" => Some(Command::Continue),
        "?" | "help" => Some(Command::Help),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => OptionIndex::from_label(line).map(Command::Pick),
    }
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "  a-z or 1-9  choose an option")?;
    writeln!(out, "  s           submit your answer")?;
    writeln!(out, "  h           show the hint (costs a heart)")?;
    writeln!(out, "  n           continue to the next question")?;
    writeln!(out, "  <enter>     submit, or continue after an answer")?;
    writeln!(out, "  q           exit the lesson (progress is not saved)")
}

pub fn render_toast(notification: &Notification, out: &mut impl Write) -> io::Result<()> {
    let mark = match notification.tone() {
        Tone::Success => '+',
        Tone::Error => '!',
    };
    writeln!(out, "[{mark}] {}", notification.message())
}

fn hearts_bar(snap: &SessionSnapshot) -> String {
    let max = snap.max_hearts.min(SessionSettings::MAX_STARTING_HEARTS);
    let max = usize::try_from(max).unwrap_or(0);
    let filled = usize::try_from(snap.hearts.max(0)).unwrap_or(0).min(max);
    format!("{}{}", "♥".repeat(filled), "♡".repeat(max - filled))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * PROGRESS_WIDTH as f64).round() as usize;
    let filled = filled.min(PROGRESS_WIDTH);
    format!(
        "[{}{}] {percent:.0}%",
        "#".repeat(filled),
        "-".repeat(PROGRESS_WIDTH - filled)
    )
}

pub fn render(snap: &SessionSnapshot, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}  Question {} of {}",
        snap.lesson_title, snap.question_number, snap.total_questions
    )?;
    writeln!(
        out,
        "{}  {}  {} XP",
        progress_bar(snap.progress_percent),
        hearts_bar(snap),
        snap.score
    )?;
    writeln!(out)?;
    writeln!(out, "{}", snap.prompt)?;
    writeln!(out)?;

    for option in &snap.options {
        let (lead, tail) = match option.state {
            OptionState::Idle | OptionState::Muted => (' ', ""),
            OptionState::Selected => ('>', ""),
            OptionState::Correct => (' ', "  ✓"),
            OptionState::Incorrect => ('>', "  ✗"),
        };
        writeln!(out, " {lead}({}) {}{tail}", option.letter, option.text)?;
    }

    if let Some(hint) = &snap.hint {
        writeln!(out)?;
        writeln!(out, "Hint: {hint}")?;
    }
    if let Some(explanation) = &snap.explanation {
        writeln!(out)?;
        writeln!(out, "Explanation: {explanation}")?;
    }

    let mut actions = Vec::new();
    if !snap.revealed {
        actions.push("[letter] choose".to_string());
    }
    if snap.can_submit {
        actions.push("[s] Submit".to_string());
    }
    if snap.can_hint {
        actions.push("[h] Hint".to_string());
    }
    if snap.can_advance {
        actions.push(format!("[n] {}", snap.continue_label));
    }
    actions.push("[q] Exit".to_string());
    writeln!(out)?;
    writeln!(out, "{}", actions.join("  "))
}

pub fn render_summary(summary: &LessonSummary, out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Lesson summary")?;
    writeln!(
        out,
        "  correct       {}/{} ({:.0}%)",
        summary.correct(),
        summary.total_questions(),
        summary.accuracy_percent()
    )?;
    writeln!(out, "  hints used    {}", summary.hints_used())?;
    writeln!(out, "  hearts left   {}", summary.hearts_remaining())?;
    writeln!(out, "  final score   {} XP", summary.final_score())
}

pub fn render_listing(lessons: &[LessonListing], out: &mut impl Write) -> io::Result<()> {
    if lessons.is_empty() {
        return writeln!(out, "No lessons found.");
    }
    for lesson in lessons {
        writeln!(
            out,
            "{:<8} {:<32} {:<16} {} questions",
            lesson.id.as_str(),
            lesson.title,
            lesson.skill_name,
            lesson.question_count
        )?;
    }
    Ok(())
}

/// Runs one lesson against line-based input.
///
/// Returns the summary when the lesson is completed, or `None` when the learner
/// exits or input ends first.
///
/// # Errors
///
/// Returns an error if the lesson cannot be started or I/O fails.
pub fn run_lesson(
    runner: &LessonRunner,
    lesson_id: &LessonId,
    input: impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<Option<LessonSummary>> {
    let mut session = runner.start_lesson(lesson_id)?;
    let mut sink = LoggingSink::new(Vec::<Notification>::new());
    render(&session.snapshot(), out)?;

    for line in input.lines() {
        let line = line?;
        let Some(command) = parse_command(&line) else {
            writeln!(out, "Unknown command. Type ? for help.")?;
            continue;
        };

        let intent = match command {
            Command::Pick(option) => Intent::Select(option),
            Command::Submit => Intent::Submit,
            Command::Hint => Intent::Hint,
            Command::Continue => Intent::Advance,
            Command::Primary if session.is_revealed() => Intent::Advance,
            Command::Primary => Intent::Submit,
            Command::Help => {
                print_help(out)?;
                continue;
            }
            Command::Quit => {
                writeln!(out, "Lesson exited. Progress was not saved.")?;
                return Ok(None);
            }
        };

        // Rejected intents change nothing; the controls shown already reflect
        // what is allowed.
        let Ok(snap) = runner.dispatch(&mut session, intent, &mut sink) else {
            continue;
        };

        for toast in sink.inner_mut().drain(..) {
            render_toast(&toast, out)?;
        }
        if snap.is_complete {
            let summary = runner.summary(&session)?;
            render_summary(&summary, out)?;
            return Ok(Some(summary));
        }
        render(&snap, out)?;
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lesson_core::time::fixed_now;
    use services::{Clock, InMemoryQuestionBank};

    use crate::demo::{DEMO_LESSON_ID, net_force_basics};

    fn runner() -> LessonRunner {
        let bank = InMemoryQuestionBank::from_lessons([net_force_basics().unwrap()]).unwrap();
        LessonRunner::new(Clock::fixed(fixed_now()), Arc::new(bank))
    }

    fn demo_id() -> LessonId {
        LessonId::new(DEMO_LESSON_ID).unwrap()
    }

    #[test]
    fn parses_commands_and_option_labels() {
        assert_eq!(parse_command("s"), Some(Command::Submit));
        assert_eq!(parse_command(" Hint "), Some(Command::Hint));
        assert_eq!(parse_command(""), Some(Command::Primary));
        assert_eq!(parse_command("b"), Some(Command::Pick(OptionIndex::new(1))));
        assert_eq!(parse_command("C"), Some(Command::Pick(OptionIndex::new(2))));
        assert_eq!(parse_command("4"), Some(Command::Pick(OptionIndex::new(3))));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("what"), None);
    }

    #[test]
    fn render_marks_selection_and_hearts() {
        let r = runner();
        let mut session = r.start_lesson(&demo_id()).unwrap();
        let snap = r
            .dispatch(&mut session, Intent::Select(OptionIndex::new(1)), &mut Vec::new())
            .unwrap();

        let mut out = Vec::new();
        render(&snap, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Net Force Basics  Question 1 of 3"));
        assert!(text.contains("♥♥♥♥♥  0 XP"));
        assert!(text.contains(" >(B) The object remains at rest"));
        assert!(text.contains("[s] Submit"));
    }

    #[test]
    fn hearts_bar_width_is_bounded() {
        let r = runner();
        let mut snap = r.start_lesson(&demo_id()).unwrap().snapshot();
        snap.max_hearts = u32::MAX;
        snap.hearts = i32::MAX;

        let cap = usize::try_from(SessionSettings::MAX_STARTING_HEARTS).unwrap();
        assert_eq!(hearts_bar(&snap).chars().count(), cap);
    }

    #[test]
    fn scripted_lesson_completes_with_summary() {
        let input = "b\ns\nn\na\ns\nn\nc\n\n\n";
        let mut out = Vec::new();
        let summary = run_lesson(&runner(), &demo_id(), input.as_bytes(), &mut out)
            .unwrap()
            .unwrap();

        assert_eq!(summary.final_score(), 20);
        assert_eq!(summary.hearts_remaining(), 4);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[+] Correct! +10 XP"));
        assert!(text.contains("[!] Not quite right. Try again!"));
        assert!(text.contains("[+] Lesson complete! Final score: 20 XP"));
        assert!(text.contains("final score   20 XP"));
    }

    #[test]
    fn quitting_abandons_the_lesson() {
        let mut out = Vec::new();
        let result = run_lesson(&runner(), &demo_id(), "b\nq\n".as_bytes(), &mut out).unwrap();
        assert!(result.is_none());
        assert!(String::from_utf8(out).unwrap().contains("Progress was not saved"));
    }

    #[test]
    fn rejected_intents_are_silent() {
        let mut out = Vec::new();
        run_lesson(&runner(), &demo_id(), "n\ns\n".as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("[!]"));
        assert!(!text.contains("[+]"));
    }
}
