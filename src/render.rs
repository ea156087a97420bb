//! LaTeX answer sheet generation.

use std::borrow::Cow;
use std::time::Instant;

use log::debug;

use crate::error::Result;
use crate::record::QuizRecord;

const PREAMBLE: &str = r"\documentclass{article}
\usepackage{enumitem}
\begin{document}

\section*{Quiz}

\begin{enumerate}
";

const POSTAMBLE: &str = r"\end{enumerate}
\end{document}
";

/// Whether stored text is escaped before it is placed in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapeMode {
    #[default]
    Escape,
    /// Text is copied verbatim; reserved characters reach LaTeX untouched.
    Raw,
}

impl EscapeMode {
    pub fn apply(self, text: &str) -> Cow<'_, str> {
        match self {
            EscapeMode::Escape => escape_latex(text),
            EscapeMode::Raw => Cow::Borrowed(text),
        }
    }
}

/// Builds one document, a record at a time.
///
/// The preamble is written on construction and the postamble by
/// [`LatexDocument::finish`], so records can be pushed straight off a store
/// cursor without collecting them first.
pub struct LatexDocument {
    out: String,
    escape: EscapeMode,
    questions: usize,
}

impl LatexDocument {
    pub fn new(escape: EscapeMode) -> Self {
        LatexDocument {
            out: String::from(PREAMBLE),
            escape,
            questions: 0,
        }
    }

    pub fn push_record(&mut self, record: &QuizRecord) {
        for question in &record.questions {
            self.out.push_str(&format!(
                "  \\item {}\n",
                self.escape.apply(&question.question)
            ));
            self.out.push_str("  \\begin{enumerate}[label=(\\alph*)]\n");
            for option in &question.options {
                self.out.push_str(&format!(
                    "    \\item {}\n",
                    self.escape.apply(&option.option)
                ));
            }
            self.out.push_str("  \\end{enumerate}\n");
            self.out.push_str(&format!(
                "  \\textbf{{Answer:}} {}\n\n",
                self.escape.apply(&question.correct_answer)
            ));
            self.questions += 1;
        }
    }

    /// Number of questions written so far.
    pub fn question_count(&self) -> usize {
        self.questions
    }

    pub fn finish(mut self) -> String {
        self.out.push_str(POSTAMBLE);
        self.out
    }
}

pub fn render(records: &[QuizRecord], escape: EscapeMode) -> String {
    let mut document = LatexDocument::new(escape);
    for record in records {
        document.push_record(record);
    }
    document.finish()
}

/// Renders a fallible record stream; the first error aborts the document.
pub fn render_records<I>(records: I, escape: EscapeMode) -> Result<String>
where
    I: IntoIterator<Item = Result<QuizRecord>>,
{
    let now = Instant::now();
    let mut document = LatexDocument::new(escape);
    let mut count = 0usize;
    for record in records {
        document.push_record(&record?);
        count += 1;
    }
    debug!(
        "[Render] {} records, {} questions in {} ms.",
        count,
        document.question_count(),
        now.elapsed().as_millis()
    );
    Ok(document.finish())
}

/// Escapes the characters LaTeX reserves in running text.
///
/// A leading `[` (after any whitespace) is braced as well, since text
/// placed after `\item` would otherwise be read as the item's label.
pub fn escape_latex(text: &str) -> Cow<'_, str> {
    const RESERVED: &[char] = &['\\', '{', '}', '$', '&', '#', '^', '_', '%', '~'];
    let body = text.trim_start();
    let label_like = body.starts_with('[');
    if !text.contains(RESERVED) && !label_like {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    let rest = if label_like {
        escaped.push_str(&text[..text.len() - body.len()]);
        escaped.push_str("{[}");
        &body[1..]
    } else {
        text
    };
    for c in rest.chars() {
        match c {
            '\\' => escaped.push_str(r"\textbackslash{}"),
            '^' => escaped.push_str(r"\textasciicircum{}"),
            '~' => escaped.push_str(r"\textasciitilde{}"),
            '{' | '}' | '$' | '&' | '#' | '_' | '%' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
