use std::collections::HashSet;

use drill_core::WeaknessKind;
use drill_core::model::{Operator, SessionSnapshot};
use drill_core::time::fixed_clock;
use services::{NextAction, SessionEvent, SessionLoopService, SessionResponse};

#[test]
fn full_drill_runs_to_completion_with_report() {
    let loop_svc = SessionLoopService::new(fixed_clock()).with_seed(Some(2024));
    let mut session = loop_svc.create_session();

    let SessionResponse::Question(mut question) =
        loop_svc.dispatch(&mut session, SessionEvent::Start).unwrap()
    else {
        panic!("start should return a question");
    };

    let mut seen = HashSet::new();
    let mut level_ups = Vec::new();
    let mut answered = 0;

    loop {
        assert!(question.correct_answer() <= 100);
        if question.operator() == Operator::Sub {
            assert!(question.operand1() > question.operand2());
        }
        seen.insert(question.display_text().to_string());

        // Miss every subtraction on purpose.
        let input = match question.operator() {
            Operator::Add => question.correct_answer().to_string(),
            Operator::Sub => "-1".to_string(),
        };
        let SessionResponse::Answered(result) = loop_svc
            .dispatch(&mut session, SessionEvent::SubmitAnswer(input))
            .unwrap()
        else {
            panic!("submit should return an answer result");
        };
        answered += 1;

        match result.next {
            NextAction::NextQuestion(next) => question = next,
            NextAction::LevelUp { level, question: next } => {
                level_ups.push(level);
                question = next;
            }
            NextAction::SessionComplete => break,
        }
    }

    assert_eq!(answered, 200);
    assert_eq!(level_ups, (2..=20).collect::<Vec<_>>());
    assert_eq!(seen.len(), 200);

    let progress = session.progress();
    assert!(progress.is_complete);
    assert_eq!(progress.answered, 200);

    let report = session.report().unwrap();
    let subtractions = session
        .history()
        .iter()
        .filter(|a| a.question.operator() == Operator::Sub)
        .count();
    assert!(subtractions >= 50);
    assert_eq!(report.review.len(), subtractions);
    assert_eq!(
        report.result.final_score as usize,
        (200 - subtractions) * 10
    );
    assert!(report.weaknesses.iter().any(|e| e.kind
        == WeaknessKind::Subtraction {
            errors: subtractions
        }));
    assert!(
        !report
            .weaknesses
            .iter()
            .any(|e| matches!(e.kind, WeaknessKind::Addition { .. } | WeaknessKind::Carry { .. }))
    );
}

#[test]
fn restart_mid_session_starts_clean() {
    let loop_svc = SessionLoopService::new(fixed_clock()).with_seed(Some(5));
    let mut session = loop_svc.create_session();
    loop_svc.dispatch(&mut session, SessionEvent::Start).unwrap();
    for _ in 0..12 {
        loop_svc
            .dispatch(&mut session, SessionEvent::SubmitAnswer("0".into()))
            .unwrap();
    }
    assert_eq!(session.snapshot().level, 2);

    loop_svc.dispatch(&mut session, SessionEvent::Restart).unwrap();
    assert_eq!(
        session.snapshot(),
        SessionSnapshot {
            level: 1,
            question_index: 1,
            score: 0
        }
    );
    assert!(session.wrong_answers().is_empty());
    assert_eq!(session.used_question_count(), 1);
}

#[test]
fn abandoned_session_still_reports() {
    let loop_svc = SessionLoopService::new(fixed_clock()).with_seed(Some(9));
    let mut session = loop_svc.create_session();
    loop_svc.dispatch(&mut session, SessionEvent::Start).unwrap();
    let answer = session.current_question().unwrap().correct_answer();
    loop_svc
        .dispatch(&mut session, SessionEvent::SubmitAnswer(format!(" {answer} ")))
        .unwrap();

    let SessionResponse::Ended(result) =
        loop_svc.dispatch(&mut session, SessionEvent::End).unwrap()
    else {
        panic!("end should return a result");
    };
    assert_eq!(result.final_score, 10);
    assert_eq!(result.accuracy_percent, 100);
    assert_eq!(result.elapsed_seconds, 0);
}
