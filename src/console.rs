//! Interactive question/answer loop.

use crate::display::{Report, answer_text};
use crate::evaluator::Evaluator;
use crate::question::Question;
use std::io::{self, BufRead, Write};

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

/// Run the console loop until the user quits or input ends.
///
/// Reads questions from `input`, prints each answer and its evaluation to
/// `output`, then asks whether to continue.
pub async fn run_console<R, W>(evaluator: &Evaluator, input: R, mut output: W) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();

    writeln!(output, "Q&A Evaluator - LLM-as-a-Judge")?;
    writeln!(output, "Using model: {}", evaluator.model())?;
    writeln!(output, "Type 'quit' to exit")?;

    loop {
        write!(output, "\nEnter your question: ")?;
        output.flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let text = line.trim();

        if QUIT_WORDS.contains(&text.to_lowercase().as_str()) {
            break;
        }
        let Ok(question) = Question::new(text) else {
            continue;
        };

        writeln!(output, "\nGenerating answer...")?;
        let answer = evaluator.get_answer(&question).await;

        let rule = "-".repeat(50);
        writeln!(output, "\nAnswer:")?;
        writeln!(output, "{}", rule)?;
        writeln!(output, "{}", answer_text(&answer))?;
        writeln!(output, "{}", rule)?;

        if answer.is_ok() {
            let result = evaluator.evaluate(&question, &answer).await;
            write!(output, "{}", Report(&result))?;
        }

        write!(output, "\nContinue? (y/n): ")?;
        output.flush()?;
        let reply = match lines.next() {
            Some(reply) => reply?,
            None => break,
        };
        if !reply.trim().eq_ignore_ascii_case("y") {
            break;
        }
    }

    Ok(())
}
