//! Command implementations.

pub mod products;
pub mod users;

use std::io::{self, BufRead, Write};

use catalogix_core::{ProductInputError, UserInputError};
use catalogix_frontend::api::ApiError;
use catalogix_frontend::listing::Confirmation;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Registration input was rejected before sending.
    #[error("Invalid user: {0}")]
    InvalidUser(#[from] UserInputError),

    /// Product input was rejected before sending.
    #[error("Invalid product: {0}")]
    InvalidProduct(#[from] ProductInputError),

    /// Reading the prompt answer or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Ask `prompt` on stderr unless `yes` was given.
fn confirm(prompt: &str, yes: bool) -> Result<Confirmation, CliError> {
    if yes {
        return Ok(Confirmation::Accepted);
    }
    confirm_with(prompt, &mut io::stdin().lock(), &mut io::stderr())
}

fn confirm_with(
    prompt: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Confirmation, CliError> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("y") {
        return Ok(Confirmation::Accepted);
    }
    Ok(Confirmation::from_form(Some(answer)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn answer(input: &str) -> Confirmation {
        let mut output = Vec::new();
        let confirmation = confirm_with("Delete this user?", &mut input.as_bytes(), &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Delete this user? [y/N] ");
        confirmation
    }

    #[test]
    fn test_confirm_accepts_yes() {
        assert_eq!(answer("y\n"), Confirmation::Accepted);
        assert_eq!(answer("YES\n"), Confirmation::Accepted);
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        assert_eq!(answer("\n"), Confirmation::Declined);
        assert_eq!(answer("nope\n"), Confirmation::Declined);
        assert_eq!(answer(""), Confirmation::Declined);
    }

    #[test]
    fn test_yes_flag_skips_prompt() {
        assert_eq!(confirm("Delete this user?", true).unwrap(), Confirmation::Accepted);
    }
}
