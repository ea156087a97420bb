//! Quiz repository documents as they are stored.
//!
//! Every text field may be missing (or `null`) in a stored document. The
//! placeholders are filled in while decoding, so the rest of the crate only
//! ever sees resolved values.

use serde::Deserialize;

pub const NO_QUESTION: &str = "No question found";
pub const NO_OPTION: &str = "No option text";
pub const NO_ANSWER: &str = "No answer provided";

/// One stored repository: a title and its questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RecordJson")]
pub struct QuizRecord {
    pub title: Option<String>,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "QuestionJson", rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<QuizOption>,
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "OptionJson")]
pub struct QuizOption {
    pub option: String,
}

#[derive(Deserialize)]
struct RecordJson {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    questions: Option<Vec<Question>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionJson {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    options: Option<Vec<QuizOption>>,
    #[serde(default)]
    correct_answer: Option<String>,
}

#[derive(Deserialize)]
struct OptionJson {
    #[serde(default)]
    option: Option<String>,
}

impl From<RecordJson> for QuizRecord {
    fn from(json: RecordJson) -> Self {
        QuizRecord {
            title: json.title,
            questions: json.questions.unwrap_or_default(),
        }
    }
}

impl From<QuestionJson> for Question {
    fn from(json: QuestionJson) -> Self {
        Question {
            question: json.question.unwrap_or_else(|| NO_QUESTION.to_owned()),
            options: json.options.unwrap_or_default(),
            correct_answer: json.correct_answer.unwrap_or_else(|| NO_ANSWER.to_owned()),
        }
    }
}

impl From<OptionJson> for QuizOption {
    fn from(json: OptionJson) -> Self {
        QuizOption {
            option: json.option.unwrap_or_else(|| NO_OPTION.to_owned()),
        }
    }
}

impl Question {
    pub fn new(question: &str, options: &[&str], correct_answer: &str) -> Self {
        Question {
            question: question.to_owned(),
            options: options.iter().map(|o| QuizOption::new(o)).collect(),
            correct_answer: correct_answer.to_owned(),
        }
    }
}

impl QuizOption {
    pub fn new(option: &str) -> Self {
        QuizOption {
            option: option.to_owned(),
        }
    }
}
