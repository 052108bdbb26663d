use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{i32 as int, one_of, space0, space1, u32 as uint},
    combinator::{all_consuming, map, opt},
    error::ParseError,
    multi::separated_list0,
    number::complete::double,
    sequence::delimited,
};

pub fn integers<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, Vec<i32>, E> {
    delimited(space0, separated_list0(space1, int), space0).parse(i)
}

pub fn unsigned<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, Vec<u32>, E> {
    delimited(space0, separated_list0(space1, uint), space0).parse(i)
}

pub fn reals<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, Vec<f64>, E> {
    delimited(space0, separated_list0(space1, alt((non_finite, double))), space0).parse(i)
}

/// `nan` and `inf`/`infinity` in any case, with an optional sign, as printed
/// by C's `%f`.
fn non_finite<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, f64, E> {
    map(
        (
            opt(one_of("+-")),
            alt((
                tag_no_case("nan"),
                tag_no_case("infinity"),
                tag_no_case("inf"),
            )),
        ),
        |(sign, word): (Option<char>, &str)| {
            let value = if word.eq_ignore_ascii_case("nan") {
                f64::NAN
            } else {
                f64::INFINITY
            };
            if sign == Some('-') { -value } else { value }
        },
    )
    .parse(i)
}

/// Run a token list parser over the whole of `input`.
///
/// On failure, returns the whitespace-delimited token the parser stopped in.
pub fn all_tokens<'a, T, F>(input: &'a str, parser: F) -> Result<Vec<T>, String>
where
    F: Parser<&'a str, Output = Vec<T>, Error = nom::error::Error<&'a str>>,
{
    match all_consuming(parser).parse(input) {
        Ok((_, tokens)) => Ok(tokens),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(token_at(input, e.input)),
        Err(nom::Err::Incomplete(_)) => Err(input.trim().to_string()),
    }
}

fn token_at(input: &str, rest: &str) -> String {
    let pos = input.len() - rest.len();
    let start = input[..pos]
        .rfind(char::is_whitespace)
        .map(|i| i + 1)
        .unwrap_or(0);
    let end = input[pos..]
        .find(char::is_whitespace)
        .map(|i| pos + i)
        .unwrap_or(input.len());
    input[start..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::{all_tokens, integers, reals, unsigned};

    #[test]
    fn integer_list() {
        assert_eq!(
            integers::<nom::error::Error<&str>>(" 1 -2\t30  "),
            Ok(("", vec![1, -2, 30]))
        );
        assert_eq!(all_tokens("", integers), Ok(vec![]));
    }

    #[test]
    fn real_list() {
        assert_eq!(
            all_tokens("523.000000 1.5 -0.25 7", reals),
            Ok(vec![523.0, 1.5, -0.25, 7.0])
        );
    }

    #[test]
    fn signed_non_finite() {
        let values = all_tokens("-inf +inf inf INFINITY -Infinity", reals).unwrap();
        assert_eq!(
            values,
            vec![
                f64::NEG_INFINITY,
                f64::INFINITY,
                f64::INFINITY,
                f64::INFINITY,
                f64::NEG_INFINITY
            ]
        );

        let values = all_tokens("-nan nan +NaN 2.5", reals).unwrap();
        assert!(values[0].is_nan() && values[0].is_sign_negative());
        assert!(values[1].is_nan() && values[1].is_sign_positive());
        assert!(values[2].is_nan());
        assert_eq!(values[3], 2.5);

        assert_eq!(all_tokens("1 info", reals), Err("info".to_string()));
        assert_eq!(all_tokens("1 -nanx", reals), Err("-nanx".to_string()));
    }

    #[test]
    fn offending_token() {
        assert_eq!(all_tokens("1 2x 3", integers), Err("2x".to_string()));
        assert_eq!(all_tokens("1 2 x", integers), Err("x".to_string()));
        assert_eq!(all_tokens("4 5.5", integers), Err("5.5".to_string()));
        assert_eq!(all_tokens("4 -1", unsigned), Err("-1".to_string()));
        assert_eq!(all_tokens("1.0 abc", reals), Err("abc".to_string()));
    }
}
