//! Seed data for `--offline`, served by the in-process backend.

use quiz_api::{ApiError, InMemoryQuizApi, QuizFixture};
use quiz_core::Clock;
use quiz_core::model::{OptionId, Question, QuestionId, Quiz, QuizId, QuizOption};

/// `(question, [options], index of the correct option)`
type Seed<'a> = (&'a str, [&'a str; 3], usize);

const RUST: &[Seed<'static>] = &[
    (
        "Which keyword moves a closure's captures by value?",
        ["ref", "move", "static"],
        1,
    ),
    (
        "What does `?` do on an `Err` value?",
        ["panics", "returns it early", "ignores it"],
        1,
    ),
    (
        "Which trait allows `{}` formatting?",
        ["Debug", "Display", "ToOwned"],
        1,
    ),
    (
        "How many mutable borrows of a value may coexist?",
        ["one", "two", "unlimited"],
        0,
    ),
];

const GEOGRAPHY: &[Seed<'static>] = &[
    ("Capital of Canada?", ["Toronto", "Ottawa", "Vancouver"], 1),
    ("Longest river in Africa?", ["Nile", "Congo", "Niger"], 0),
    ("Which country has the most islands?", ["Greece", "Sweden", "Japan"], 1),
];

fn fixture(id: u64, title: &str, seeds: &[Seed<'_>]) -> Result<QuizFixture, ApiError> {
    let mut questions = Vec::with_capacity(seeds.len());
    let mut key = Vec::with_capacity(seeds.len());
    for (n, (text, options, correct)) in (1_u64..).zip(seeds) {
        let question_id = QuestionId::new(id * 100 + n);
        let options: Vec<QuizOption> = (1_u64..)
            .zip(options)
            .map(|(o, label)| QuizOption::new(OptionId::new(question_id.value() * 10 + o), *label))
            .collect();
        key.push((question_id, options[*correct].id));
        questions.push(
            Question::new(question_id, *text, options).map_err(quiz_core::Error::from)?,
        );
    }
    let quiz = Quiz::new(QuizId::new(id), title, questions).map_err(quiz_core::Error::from)?;
    Ok(key
        .into_iter()
        .fold(QuizFixture::new(quiz), |f, (q, o)| f.with_correct(q, o)))
}

/// An in-process backend with two public quizzes.
///
/// # Errors
///
/// Returns `ApiError` if the seed data is rejected.
pub fn backend(clock: Clock) -> Result<InMemoryQuizApi, ApiError> {
    let api = InMemoryQuizApi::new(clock);
    api.insert_quiz(
        fixture(1, "Rust fundamentals", RUST)?
            .with_category("Programming")
            .with_description("Ownership, errors and traits."),
    )?;
    api.insert_quiz(fixture(2, "World geography", GEOGRAPHY)?.with_category("Geography"))?;
    Ok(api)
}
