//! Paragraph-gap classification of reference tokens.
//!
//! N-grams that straddle a blank line in the reference never occur in the
//! generated text's linear token stream, so tokens near such gaps are marked
//! and their misses are shown softened.

use crate::error::{Error, Result};

use super::{Border, Token};

/// Mark hard and soft borders on positioned reference tokens.
///
/// A token is a hard border when its predecessor or successor sits more than
/// one line away. A token that is not hard becomes soft when a hard border
/// lies within `n - 1` positions on either side. Existing marks are reset.
pub fn classify_borders(tokens: &mut [Token], n: usize) -> Result<()> {
    if n == 0 {
        return Err(Error::InvalidWindow(n));
    }
    if tokens.is_empty() {
        return Err(Error::Precondition(
            "cannot classify borders of an empty token sequence".into(),
        ));
    }

    let lines = tokens
        .iter()
        .enumerate()
        .map(|(i, t)| {
            t.line.ok_or_else(|| {
                Error::Precondition(format!(
                    "token {} ('{}') has no line position; borders need positioned tokens",
                    i, t.text
                ))
            })
        })
        .collect::<Result<Vec<usize>>>()?;

    let jump = |a: usize, b: usize| lines[b].saturating_sub(lines[a]) > 1;
    let hard: Vec<bool> = (0..tokens.len())
        .map(|i| (i + 1 < tokens.len() && jump(i, i + 1)) || (i > 0 && jump(i - 1, i)))
        .collect();

    let reach = n - 1;
    for (i, token) in tokens.iter_mut().enumerate() {
        token.border = if hard[i] {
            Border::Hard
        } else {
            let lo = i.saturating_sub(reach);
            let hi = (i + reach).min(hard.len() - 1);
            if hard[lo..=hi].iter().any(|&h| h) {
                Border::Soft
            } else {
                Border::Interior
            }
        };
    }
    Ok(())
}
