use nalgebra::Point3;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Expected three comma-separated values for {what}, got '{raw}'.")]
    WrongArity { what: &'static str, raw: String },

    #[error("Component '{component}' of {what} is not a valid value.")]
    InvalidComponent {
        what: &'static str,
        component: String,
    },

    #[error("Component '{component}' of {what} must be a finite number.")]
    NonFinite {
        what: &'static str,
        component: String,
    },
}

/// Splits `"a,b,c"` into three parsed values. Whitespace around components is ignored.
pub fn parse_triplet<T: FromStr>(raw: &str, what: &'static str) -> Result<[T; 3], ParseError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [a, b, c] = *parts.as_slice() else {
        return Err(ParseError::WrongArity {
            what,
            raw: raw.to_string(),
        });
    };
    let parse = |component: &str| {
        component
            .parse::<T>()
            .map_err(|_| ParseError::InvalidComponent {
                what,
                component: component.to_string(),
            })
    };
    Ok([parse(a)?, parse(b)?, parse(c)?])
}

pub fn parse_point(raw: &str, what: &'static str) -> Result<Point3<f64>, ParseError> {
    let values: [f64; 3] = parse_triplet(raw, what)?;
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(ParseError::NonFinite {
            what,
            component: bad.to_string(),
        });
    }
    Ok(Point3::new(values[0], values[1], values[2]))
}
