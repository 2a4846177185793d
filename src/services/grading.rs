//! Quiz grading. Pure: the same questions and answers always produce the
//! same outcome; persistence of the result is the caller's concern.

use crate::db::models::QuizQuestion;
use crate::names;

pub struct GradedQuestion {
    pub question: String,
    pub question_ar: Option<String>,
    pub user_answer: Option<String>,
    pub is_correct: bool,
    pub explanation: Option<String>,
    pub explanation_ar: Option<String>,
}

pub struct QuizOutcome {
    pub score: i64,
    pub total_points: i64,
    pub percentage: i64,
    pub passed: bool,
    pub results: Vec<GradedQuestion>,
}

/// Grade a positional answer list against the quiz questions.
///
/// Answers match by index; a missing or null answer is incorrect. For
/// multiple-choice questions the submitted text must equal the text of the
/// option flagged correct (a question with no such option grades as
/// incorrect). Every other question type compares against `correct_answer`.
/// An empty quiz (zero total points) grades as 0%.
pub fn grade(questions: &[QuizQuestion], answers: &[Option<String>], passing_score: i64) -> QuizOutcome {
    let mut score = 0;
    let mut total_points = 0;
    let mut results = Vec::with_capacity(questions.len());

    for (index, question) in questions.iter().enumerate() {
        total_points += question.points;
        let user_answer = answers.get(index).cloned().flatten();

        let is_correct = match user_answer.as_deref() {
            None => false,
            Some(answer) => {
                if question.question_type == names::MULTIPLE_CHOICE {
                    question
                        .options
                        .iter()
                        .find(|opt| opt.is_correct)
                        .is_some_and(|opt| opt.text == answer)
                } else {
                    question.correct_answer.as_deref() == Some(answer)
                }
            }
        };

        if is_correct {
            score += question.points;
        }

        results.push(GradedQuestion {
            question: question.question.clone(),
            question_ar: question.question_ar.clone(),
            user_answer,
            is_correct,
            explanation: question.explanation.clone(),
            explanation_ar: question.explanation_ar.clone(),
        });
    }

    let percentage = if total_points > 0 {
        ((score as f64 / total_points as f64) * 100.0).round() as i64
    } else {
        0
    };
    let passed = percentage >= passing_score;

    QuizOutcome {
        score,
        total_points,
        percentage,
        passed,
        results,
    }
}
