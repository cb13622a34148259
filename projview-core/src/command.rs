/// Text commands for parameter edits, e.g. `scale.x=1.5; rotation.z=3.1`
use nom::{
    branch::alt,
    character::complete::{alpha1, char, multispace0, multispace1, one_of},
    combinator::{all_consuming, map, opt},
    multi::separated_list1,
    number::complete::float,
    sequence::{delimited, tuple},
    IResult,
};

use crate::error::{Error, Result};
use crate::params::{Axis, AxisGroup, ParamEdit};

struct RawEdit<'a> {
    group: &'a str,
    axis: &'a str,
    value: f32,
}

/// Parse one or more `group.axis=value` assignments.
///
/// Assignments are separated by `;`, `,` or whitespace. Group and axis names
/// are case-insensitive and accept the aliases understood by [`AxisGroup`].
pub fn parse_commands(input: &str) -> Result<Vec<ParamEdit>> {
    if input.trim().is_empty() {
        return Err(Error::Command("empty command".to_string()));
    }

    let raw = match command_list(input) {
        Ok((_, raw)) => raw,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(Error::Command(format!(
                "expected `group.axis=value` at `{}`",
                snippet(e.input)
            )));
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(Error::Command("incomplete input".to_string()));
        }
    };

    raw.into_iter()
        .map(|r| {
            Ok(ParamEdit::new(
                r.group.parse::<AxisGroup>()?,
                r.axis.parse::<Axis>()?,
                r.value,
            ))
        })
        .collect()
}

fn command_list(input: &str) -> IResult<&str, Vec<RawEdit<'_>>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(separator, assignment),
        tuple((multispace0, opt(one_of(";,")), multispace0)),
    ))(input)
}

fn assignment(input: &str) -> IResult<&str, RawEdit<'_>> {
    let (input, group) = alpha1(input)?;
    let (input, _) = char('.')(input)?;
    let (input, axis) = alpha1(input)?;
    let (input, _) = delimited(multispace0, char('='), multispace0)(input)?;
    let (input, value) = float(input)?;
    Ok((input, RawEdit { group, axis, value }))
}

fn separator(input: &str) -> IResult<&str, ()> {
    alt((
        map(delimited(multispace0, one_of(";,"), multispace0), |_| ()),
        map(multispace1, |_| ()),
    ))(input)
}

fn snippet(rest: &str) -> &str {
    match rest.char_indices().nth(16) {
        Some((end, _)) => &rest[..end],
        None => rest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_assignment() {
        let edits = parse_commands("scale.x=1.5").unwrap();
        assert_eq!(edits, vec![ParamEdit::new(AxisGroup::Scale, Axis::X, 1.5)]);
    }

    #[test]
    fn test_multiple_assignments() {
        let edits = parse_commands(" t.y = -2.5; rotation.Z=3, s.z=0.1 position.x=4 ;").unwrap();
        assert_eq!(
            edits,
            vec![
                ParamEdit::new(AxisGroup::Translation, Axis::Y, -2.5),
                ParamEdit::new(AxisGroup::Rotation, Axis::Z, 3.0),
                ParamEdit::new(AxisGroup::Scale, Axis::Z, 0.1),
                ParamEdit::new(AxisGroup::Translation, Axis::X, 4.0),
            ]
        );
    }

    #[test]
    fn test_non_finite_values() {
        let edits = parse_commands("scale.x=nan; t.z=inf").unwrap();
        assert!(edits[0].value.is_nan());
        assert_eq!(edits[1].value, f32::INFINITY);
    }

    #[test]
    fn test_unknown_names() {
        assert!(matches!(parse_commands("skew.x=1"), Err(Error::UnknownGroup(g)) if g == "skew"));
        assert!(matches!(parse_commands("scale.w=1"), Err(Error::UnknownAxis(a)) if a == "w"));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(parse_commands(""), Err(Error::Command(_))));
        assert!(matches!(parse_commands("scale.x"), Err(Error::Command(_))));
        assert!(matches!(parse_commands("scale.x=abc"), Err(Error::Command(_))));
        assert!(matches!(parse_commands("scale.x=1 junk"), Err(Error::Command(_))));
    }
}
