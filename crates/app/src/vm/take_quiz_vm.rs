use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use quiz_core::model::{OptionId, QuestionId, QuizId, QuizResult};
use services::{
    Clock, FinishError, NavigationError, QuestionState, SessionController, SubmitError,
};

use super::time_fmt::format_elapsed;

//
// ─── INTENTS ───────────────────────────────────────────────────────────────────
//

/// One line of user input while taking a quiz. Numbers are one-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TakeQuizIntent {
    Next,
    Previous,
    Goto(usize),
    Select(usize),
    Submit,
    Finish,
    Help,
    Quit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntentParseError {
    #[error("type a command, or `h` for help")]
    Empty,
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{0}` is not a number")]
    BadNumber(String),
}

impl FromStr for TakeQuizIntent {
    type Err = IntentParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(IntentParseError::Empty);
        };
        let number = |raw: Option<&str>| {
            let raw = raw.unwrap_or_default();
            raw.parse::<usize>()
                .map_err(|_| IntentParseError::BadNumber(raw.to_owned()))
        };

        match head.to_ascii_lowercase().as_str() {
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" | "previous" => Ok(Self::Previous),
            "g" | "go" => number(words.next()).map(Self::Goto),
            "s" | "submit" => Ok(Self::Submit),
            "f" | "finish" => Ok(Self::Finish),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" => Ok(Self::Quit),
            other if other.chars().all(|c| c.is_ascii_digit()) => {
                number(Some(other)).map(Self::Select)
            }
            other => Err(IntentParseError::Unknown(other.to_owned())),
        }
    }
}

pub const HELP: &str = "\
  <number>   choose an option
  s          submit the chosen option
  n / p      next / previous question (n submits a chosen option first)
  g <number> jump to a question
  f          finish the quiz
  q          abandon the quiz";

//
// ─── VIEW MODEL ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error)]
pub enum TakeQuizError {
    #[error("no quiz in progress")]
    NoSession,
    #[error("choose an option first")]
    NothingSelected,
    #[error("there is no option {0}")]
    NoSuchOption(usize),
    #[error("there is no question {0}")]
    NoSuchQuestion(usize),
    #[error("this question is already answered")]
    Locked,
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error(transparent)]
    Finish(#[from] FinishError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TakeQuizOutcome {
    /// Redraw; `feedback` is the verdict if an answer was submitted on the way.
    Continue { feedback: Option<bool> },
    /// Unanswered questions remain; finishing again confirms.
    ConfirmFinish {
        unanswered: usize,
        feedback: Option<bool>,
    },
    Finished {
        result: QuizResult,
        feedback: Option<bool>,
    },
    Help,
    Quit,
}

/// Stages the chosen option client-side until it is submitted.
pub struct TakeQuizVm {
    controller: Arc<SessionController>,
    clock: Clock,
    quiz_id: QuizId,
    staged: Option<OptionId>,
    confirm_finish: bool,
}

impl TakeQuizVm {
    #[must_use]
    pub fn new(controller: Arc<SessionController>, clock: Clock, quiz_id: QuizId) -> Self {
        Self {
            controller,
            clock,
            quiz_id,
            staged: None,
            confirm_finish: false,
        }
    }

    #[must_use]
    pub fn staged(&self) -> Option<OptionId> {
        self.staged
    }

    /// # Errors
    ///
    /// Returns `TakeQuizError` for rejected input or failed controller operations;
    /// the session stays usable after any of them.
    pub async fn handle(
        &mut self,
        intent: TakeQuizIntent,
    ) -> Result<TakeQuizOutcome, TakeQuizError> {
        if intent != TakeQuizIntent::Finish {
            self.confirm_finish = false;
        }

        match intent {
            TakeQuizIntent::Next => {
                let feedback = self.submit_staged().await?;
                self.controller.next_question();
                self.staged = None;
                Ok(TakeQuizOutcome::Continue { feedback })
            }
            TakeQuizIntent::Previous => {
                self.controller.previous_question();
                self.staged = None;
                Ok(TakeQuizOutcome::Continue { feedback: None })
            }
            TakeQuizIntent::Goto(number) => {
                let index = number
                    .checked_sub(1)
                    .ok_or(TakeQuizError::NoSuchQuestion(number))?;
                self.controller.go_to_question(index)?;
                self.staged = None;
                Ok(TakeQuizOutcome::Continue { feedback: None })
            }
            TakeQuizIntent::Select(number) => {
                self.select(number)?;
                Ok(TakeQuizOutcome::Continue { feedback: None })
            }
            TakeQuizIntent::Submit => {
                let feedback = self
                    .submit_staged()
                    .await?
                    .ok_or(TakeQuizError::NothingSelected)?;
                Ok(TakeQuizOutcome::Continue {
                    feedback: Some(feedback),
                })
            }
            TakeQuizIntent::Finish => self.finish().await,
            TakeQuizIntent::Help => Ok(TakeQuizOutcome::Help),
            TakeQuizIntent::Quit => {
                self.controller.reset_session();
                Ok(TakeQuizOutcome::Quit)
            }
        }
    }

    fn current_question_id(&self) -> Result<(QuestionId, bool), TakeQuizError> {
        self.controller.store().read(|state| {
            let projector = state.projector();
            let question = projector
                .current_question()
                .ok_or(TakeQuizError::NoSession)?;
            Ok((question.id(), projector.answer_for(question.id()).is_some()))
        })
    }

    fn select(&mut self, number: usize) -> Result<(), TakeQuizError> {
        let option = self.controller.store().read(|state| {
            let projector = state.projector();
            let question = projector
                .current_question()
                .ok_or(TakeQuizError::NoSession)?;
            if projector.answer_for(question.id()).is_some() {
                return Err(TakeQuizError::Locked);
            }
            number
                .checked_sub(1)
                .and_then(|i| question.options().get(i))
                .map(|o| o.id)
                .ok_or(TakeQuizError::NoSuchOption(number))
        })?;
        self.staged = Some(option);
        Ok(())
    }

    /// Submits the staged option for the current question, if there is one.
    async fn submit_staged(&mut self) -> Result<Option<bool>, TakeQuizError> {
        let Some(option) = self.staged else {
            return Ok(None);
        };
        let (question_id, answered) = self.current_question_id()?;
        if answered {
            self.staged = None;
            return Ok(None);
        }
        let outcome = self.controller.submit_answer(question_id, option).await?;
        self.staged = None;
        Ok(Some(outcome.is_correct))
    }

    async fn finish(&mut self) -> Result<TakeQuizOutcome, TakeQuizError> {
        let feedback = self.submit_staged().await?;
        let unanswered = self
            .controller
            .store()
            .read(|state| state.projector().unanswered_count());
        if unanswered > 0 && !self.confirm_finish {
            self.confirm_finish = true;
            return Ok(TakeQuizOutcome::ConfirmFinish {
                unanswered,
                feedback,
            });
        }
        self.confirm_finish = false;
        let result = self.controller.finish_session(self.quiz_id).await?;
        Ok(TakeQuizOutcome::Finished { result, feedback })
    }

    /// Text for the current question, with a navigation grid and the options.
    #[must_use]
    pub fn render(&self) -> String {
        let snapshot = self.controller.snapshot();
        let Some(session) = snapshot.session() else {
            return "No quiz in progress.".to_owned();
        };
        let projector = snapshot.projector();
        let progress = projector.progress();
        let mut out = String::new();

        let _ = writeln!(
            out,
            "{}  |  question {} of {}  |  {} answered  |  {}",
            session.title(),
            progress.position,
            progress.total,
            progress.answered,
            format_elapsed(projector.elapsed(&self.clock)),
        );

        let grid: Vec<String> = projector
            .question_states()
            .iter()
            .enumerate()
            .map(|(i, state)| {
                let mark = match state {
                    QuestionState::Current => '>',
                    QuestionState::Answered => 'x',
                    QuestionState::Unanswered => ' ',
                };
                format!("{}[{mark}]", i + 1)
            })
            .collect();
        let _ = writeln!(out, "{}", grid.join(" "));

        if let Some(question) = projector.current_question() {
            let answer = projector.answer_for(question.id());
            let _ = writeln!(out, "\n{}", question.text());
            for (i, option) in question.options().iter().enumerate() {
                let marker = match answer {
                    Some(record) if record.selected_option_id == option.id => "(your answer)",
                    None if self.staged == Some(option.id) => "(chosen)",
                    _ => "",
                };
                let _ = writeln!(out, "  {}) {} {marker}", i + 1, option.text);
            }
            if projector.is_pending(question.id()) {
                let _ = writeln!(out, "  submitting...");
            }
        }
        out.trim_end().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_api::{InMemoryQuizApi, QuizFixture};
    use quiz_core::model::{Question, Quiz, QuizOption};
    use quiz_core::time::fixed_clock;
    use services::SessionStore;

    const QUIZ: QuizId = QuizId::new(3);

    async fn vm() -> TakeQuizVm {
        let questions = (1..=3)
            .map(|n| {
                Question::new(
                    QuestionId::new(n),
                    format!("Question {n}?"),
                    vec![
                        QuizOption::new(OptionId::new(n * 10), "yes"),
                        QuizOption::new(OptionId::new(n * 10 + 1), "no"),
                    ],
                )
                .unwrap()
            })
            .collect();
        let quiz = Quiz::new(QUIZ, "Basics", questions).unwrap();
        let fixture = (1..=3).fold(QuizFixture::new(quiz), |f, n| {
            f.with_correct(QuestionId::new(n), OptionId::new(n * 10))
        });
        let api = InMemoryQuizApi::new(fixed_clock());
        api.insert_quiz(fixture).unwrap();

        let controller = Arc::new(SessionController::new(
            fixed_clock(),
            Arc::new(api),
            SessionStore::new(),
        ));
        controller.start_session(QUIZ).await.unwrap();
        TakeQuizVm::new(controller, fixed_clock(), QUIZ)
    }

    #[test]
    fn parses_commands() {
        assert_eq!("n".parse(), Ok(TakeQuizIntent::Next));
        assert_eq!(" Prev ".parse(), Ok(TakeQuizIntent::Previous));
        assert_eq!("g 3".parse(), Ok(TakeQuizIntent::Goto(3)));
        assert_eq!("2".parse(), Ok(TakeQuizIntent::Select(2)));
        assert_eq!(
            "g x".parse::<TakeQuizIntent>(),
            Err(IntentParseError::BadNumber("x".into()))
        );
        assert_eq!(
            "".parse::<TakeQuizIntent>(),
            Err(IntentParseError::Empty)
        );
        assert_eq!(
            "jump".parse::<TakeQuizIntent>(),
            Err(IntentParseError::Unknown("jump".into()))
        );
    }

    #[tokio::test]
    async fn submit_requires_a_choice() {
        let mut vm = vm().await;
        let err = vm.handle(TakeQuizIntent::Submit).await.unwrap_err();
        assert!(matches!(err, TakeQuizError::NothingSelected));

        vm.handle(TakeQuizIntent::Select(1)).await.unwrap();
        assert_eq!(vm.staged(), Some(OptionId::new(10)));
        let outcome = vm.handle(TakeQuizIntent::Submit).await.unwrap();
        assert_eq!(
            outcome,
            TakeQuizOutcome::Continue {
                feedback: Some(true)
            }
        );
        assert!(vm.staged().is_none());

        let locked = vm.handle(TakeQuizIntent::Select(2)).await.unwrap_err();
        assert!(matches!(locked, TakeQuizError::Locked));
    }

    #[tokio::test]
    async fn next_submits_the_staged_choice() {
        let mut vm = vm().await;
        vm.handle(TakeQuizIntent::Select(2)).await.unwrap();
        let outcome = vm.handle(TakeQuizIntent::Next).await.unwrap();

        assert_eq!(
            outcome,
            TakeQuizOutcome::Continue {
                feedback: Some(false)
            }
        );
        let rendered = vm.render();
        assert!(rendered.contains("question 2 of 3"));
        assert!(rendered.contains("1[x] 2[>] 3[ ]"));
    }

    #[tokio::test]
    async fn finish_asks_for_confirmation_while_questions_are_open() {
        let mut vm = vm().await;
        vm.handle(TakeQuizIntent::Select(1)).await.unwrap();

        let first = vm.handle(TakeQuizIntent::Finish).await.unwrap();
        assert_eq!(
            first,
            TakeQuizOutcome::ConfirmFinish {
                unanswered: 2,
                feedback: Some(true)
            }
        );

        let TakeQuizOutcome::Finished { result, feedback } =
            vm.handle(TakeQuizIntent::Finish).await.unwrap()
        else {
            panic!("expected a result");
        };
        assert_eq!(feedback, None);
        assert_eq!(result.correct_answers(), 1);
        assert_eq!(vm.render(), "No quiz in progress.");
    }

    #[tokio::test]
    async fn other_input_cancels_confirmation() {
        let mut vm = vm().await;
        vm.handle(TakeQuizIntent::Select(1)).await.unwrap();
        vm.handle(TakeQuizIntent::Finish).await.unwrap();
        vm.handle(TakeQuizIntent::Next).await.unwrap();

        let again = vm.handle(TakeQuizIntent::Finish).await.unwrap();
        assert_eq!(
            again,
            TakeQuizOutcome::ConfirmFinish {
                unanswered: 2,
                feedback: None
            }
        );
    }

    #[tokio::test]
    async fn finish_reports_the_verdict_of_the_last_staged_answer() {
        let mut vm = vm().await;
        for _ in 0..2 {
            vm.handle(TakeQuizIntent::Select(1)).await.unwrap();
            vm.handle(TakeQuizIntent::Next).await.unwrap();
        }
        vm.handle(TakeQuizIntent::Select(2)).await.unwrap();

        let TakeQuizOutcome::Finished { result, feedback } =
            vm.handle(TakeQuizIntent::Finish).await.unwrap()
        else {
            panic!("expected a result without confirmation");
        };
        assert_eq!(feedback, Some(false));
        assert_eq!(result.correct_answers(), 2);
        assert_eq!(result.total_questions(), 3);
    }

    #[tokio::test]
    async fn out_of_range_input_is_reported() {
        let mut vm = vm().await;
        assert!(matches!(
            vm.handle(TakeQuizIntent::Goto(0)).await,
            Err(TakeQuizError::NoSuchQuestion(0))
        ));
        assert!(matches!(
            vm.handle(TakeQuizIntent::Goto(9)).await,
            Err(TakeQuizError::Navigation(NavigationError::IndexOutOfRange {
                index: 8,
                len: 3
            }))
        ));
        assert!(matches!(
            vm.handle(TakeQuizIntent::Select(5)).await,
            Err(TakeQuizError::NoSuchOption(5))
        ));
    }

    #[tokio::test]
    async fn quit_abandons_the_session() {
        let mut vm = vm().await;
        assert_eq!(
            vm.handle(TakeQuizIntent::Quit).await.unwrap(),
            TakeQuizOutcome::Quit
        );
        assert!(vm.controller.snapshot().session().is_none());
    }
}
