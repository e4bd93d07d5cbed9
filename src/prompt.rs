use std::io::{self, BufRead, Write};

/// Print `label`, read one line, return it trimmed. EOF reads as empty.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> io::Result<String> {
    write!(output, "{}", label)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// `(y/N)` question; only `y`/`Y` counts as yes.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<bool> {
    let answer = ask(input, output, &format!("{} (y/N): ", question))?;
    Ok(answer.eq_ignore_ascii_case("y"))
}
