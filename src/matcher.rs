use crate::token::Token;

/// Finds the closing parenthesis matching an opener that has already been
/// consumed. `tokens` starts right after that opener.
///
/// Returns the index of the closer within `tokens`, or `None` when the group
/// is never closed.
pub fn matching_close_index(tokens: &[Token]) -> Option<usize> {
    let mut open = 0usize;

    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::LeftParen => open += 1,
            Token::RightParen if open == 0 => return Some(index),
            Token::RightParen => open -= 1,
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;

    fn after_opener(input: &str) -> Vec<Token> {
        let tokens = tokenize(input).unwrap();
        assert_eq!(tokens.first(), Some(&Token::LeftParen));
        tokens[1..].to_vec()
    }

    #[test]
    fn finds_immediate_closer() {
        assert_eq!(matching_close_index(&after_opener("()")), Some(0));
    }

    #[test]
    fn finds_closer_of_flat_group() {
        assert_eq!(matching_close_index(&after_opener("(1+2)*3")), Some(3));
    }

    #[test]
    fn skips_nested_groups() {
        // ( ( 1 + ( 2 ) ) ) + 1
        //   0 1 2 3 4 5 6 7
        assert_eq!(matching_close_index(&after_opener("((1+(2)))+1")), Some(7));
    }

    #[test]
    fn skips_sibling_groups() {
        // ( ( 1 ) * ( 2 ) ) * 3
        //   0 1 2 3 4 5 6 7
        assert_eq!(matching_close_index(&after_opener("((1)*(2))*3")), Some(7));
    }

    #[test]
    fn unbalanced_has_no_match() {
        assert_eq!(matching_close_index(&after_opener("(1+1")), None);
        assert_eq!(matching_close_index(&after_opener("((1+1)")), None);
        assert_eq!(matching_close_index(&[]), None);
    }

    #[test]
    fn returned_index_has_no_outstanding_openers() {
        let tokens = after_opener("((1)+((2)*3))-(4)");
        let index = matching_close_index(&tokens).unwrap();
        let opens = tokens[..index]
            .iter()
            .filter(|t| **t == Token::LeftParen)
            .count();
        let closes = tokens[..index]
            .iter()
            .filter(|t| **t == Token::RightParen)
            .count();
        assert_eq!(opens, closes);
        assert_eq!(tokens[index], Token::RightParen);
    }
}
