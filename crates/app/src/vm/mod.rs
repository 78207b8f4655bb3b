mod catalog_vm;
mod results_vm;
mod take_quiz_vm;
mod time_fmt;

pub use catalog_vm::{render_catalog, render_dashboard};
pub use results_vm::{render_history, render_result};
pub use take_quiz_vm::{HELP, TakeQuizIntent, TakeQuizOutcome, TakeQuizVm};
