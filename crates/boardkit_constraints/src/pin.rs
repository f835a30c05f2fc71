//! Physical pin expressions and the pin-id grammar seam.

use serde::Serialize;
use std::fmt;

use crate::error::ConstraintError;

/// Signal direction of a pin as seen from the FPGA fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Driven by the board, read by the design.
    In,
    /// Driven by the design.
    Out,
    /// Bidirectional.
    InOut,
}

impl Direction {
    /// Returns the short form used in listings ("i", "o", "io").
    pub fn short(&self) -> &'static str {
        match self {
            Direction::In => "i",
            Direction::Out => "o",
            Direction::InOut => "io",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

/// The physical shape of a pin expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinShape {
    /// One pin.
    Single(String),
    /// Several pins forming an ordered bus, least significant first.
    Bus(Vec<String>),
    /// A differential pair.
    DiffPair {
        /// Positive leg.
        p: String,
        /// Negative leg.
        n: String,
    },
}

/// The pins of a resource or subsignal, with direction and polarity.
///
/// Tokens are either physical pin ids (`"R20"`) or connector references of
/// the form `<connector>_<number>:<label>`, which the registry resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinExpression {
    shape: PinShape,
    dir: Direction,
    invert: bool,
}

impl PinExpression {
    /// Builds a pin expression from a token sequence.
    ///
    /// One token yields [`PinShape::Single`]; more than one yields an ordered
    /// [`PinShape::Bus`]. An empty sequence, or a token that is blank or
    /// contains whitespace, is a format error.
    pub fn from_tokens<I, S>(
        tokens: I,
        dir: Direction,
        invert: bool,
    ) -> Result<Self, ConstraintError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.into();
            check_token_shape(&token)?;
            ids.push(token);
        }
        let shape = match ids.len() {
            0 => {
                return Err(ConstraintError::Format {
                    token: String::new(),
                    reason: "pin list is empty".to_string(),
                })
            }
            1 => PinShape::Single(ids.remove(0)),
            _ => PinShape::Bus(ids),
        };
        Ok(Self { shape, dir, invert })
    }

    /// Builds a differential pair from its positive and negative legs.
    pub fn diff_pair(
        p: impl Into<String>,
        n: impl Into<String>,
        dir: Direction,
        invert: bool,
    ) -> Result<Self, ConstraintError> {
        let (p, n) = (p.into(), n.into());
        check_token_shape(&p)?;
        check_token_shape(&n)?;
        if p == n {
            return Err(ConstraintError::Format {
                token: p,
                reason: "differential pair legs must be distinct".to_string(),
            });
        }
        Ok(Self {
            shape: PinShape::DiffPair { p, n },
            dir,
            invert,
        })
    }

    /// Returns the shape of this expression.
    pub fn shape(&self) -> &PinShape {
        &self.shape
    }

    /// Returns the signal direction.
    pub fn dir(&self) -> Direction {
        self.dir
    }

    /// Returns `true` when the signal is active-low.
    pub fn invert(&self) -> bool {
        self.invert
    }

    /// Returns `true` for a differential pair.
    pub fn is_differential(&self) -> bool {
        matches!(self.shape, PinShape::DiffPair { .. })
    }

    /// Returns the logical width in bits (a differential pair is one bit).
    pub fn width(&self) -> usize {
        match &self.shape {
            PinShape::Single(_) | PinShape::DiffPair { .. } => 1,
            PinShape::Bus(ids) => ids.len(),
        }
    }

    /// Returns every pin token in order; a differential pair yields `p` then `n`.
    pub fn tokens(&self) -> Vec<&str> {
        match &self.shape {
            PinShape::Single(id) => vec![id.as_str()],
            PinShape::Bus(ids) => ids.iter().map(String::as_str).collect(),
            PinShape::DiffPair { p, n } => vec![p.as_str(), n.as_str()],
        }
    }

    /// Returns the first pin token, where a clock constraint attaches.
    pub fn primary(&self) -> &str {
        match &self.shape {
            PinShape::Single(id) => id,
            PinShape::Bus(ids) => &ids[0],
            PinShape::DiffPair { p, .. } => p,
        }
    }
}

impl fmt::Display for PinExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.shape {
            PinShape::Single(id) => write!(f, "{id}")?,
            PinShape::Bus(ids) => write!(f, "[{}]", ids.join(" "))?,
            PinShape::DiffPair { p, n } => write!(f, "{p}/{n}")?,
        }
        write!(f, " ({}{})", self.dir, if self.invert { ", inverted" } else { "" })
    }
}

fn check_token_shape(token: &str) -> Result<(), ConstraintError> {
    if token.is_empty() {
        return Err(ConstraintError::Format {
            token: String::new(),
            reason: "pin name is empty".to_string(),
        });
    }
    if token.chars().any(char::is_whitespace) {
        return Err(ConstraintError::Format {
            token: token.to_string(),
            reason: "pin name contains whitespace".to_string(),
        });
    }
    Ok(())
}

/// Active-high pins from a whitespace-separated list.
pub fn pins(list: &str, dir: Direction) -> Result<PinExpression, ConstraintError> {
    PinExpression::from_tokens(list.split_whitespace(), dir, false)
}

/// Active-low pins from a whitespace-separated list.
pub fn pins_n(list: &str, dir: Direction) -> Result<PinExpression, ConstraintError> {
    PinExpression::from_tokens(list.split_whitespace(), dir, true)
}

/// A differential pair from its two legs.
pub fn diff_pair(p: &str, n: &str, dir: Direction) -> Result<PinExpression, ConstraintError> {
    PinExpression::diff_pair(p, n, dir, false)
}

/// Splits a connector reference `<name>_<number>:<label>` into its parts.
///
/// Returns `None` for plain physical pin ids.
pub fn parse_connector_ref(token: &str) -> Option<(&str, u32, &str)> {
    let (connector, label) = token.split_once(':')?;
    let (name, number) = connector.rsplit_once('_')?;
    let number = number.parse().ok()?;
    if name.is_empty() || label.is_empty() {
        return None;
    }
    Some((name, number, label))
}

/// Decides which strings are valid physical pin ids for a device package.
///
/// The exact grammar belongs to the silicon vendor; the registry only asks
/// this trait before accepting a resource.
pub trait PinGrammar: fmt::Debug {
    /// Returns `Err(reason)` when `id` is not a valid pin of the package.
    fn check(&self, id: &str) -> Result<(), String>;
}

/// Accepts any non-empty pin id without whitespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnyPin;

impl PinGrammar for AnyPin {
    fn check(&self, _id: &str) -> Result<(), String> {
        Ok(())
    }
}

/// JEDEC ball-grid naming: one or two row letters followed by a column number.
///
/// Row letters skip I, O, Q, S, X and Z, and columns start at 1, so `A1`,
/// `R20` and `AB24` are accepted while `I3`, `A0` and `PIN_A1` are not.
#[derive(Debug, Default, Clone, Copy)]
pub struct BgaGrid;

const SKIPPED_ROWS: &[char] = &['I', 'O', 'Q', 'S', 'X', 'Z'];

impl PinGrammar for BgaGrid {
    fn check(&self, id: &str) -> Result<(), String> {
        let split = id.find(|c: char| c.is_ascii_digit()).unwrap_or(id.len());
        let (row, column) = id.split_at(split);

        if row.is_empty() || row.len() > 2 {
            return Err("expected one or two row letters".to_string());
        }
        if let Some(c) = row
            .chars()
            .find(|c| !c.is_ascii_uppercase() || SKIPPED_ROWS.contains(c))
        {
            return Err(format!("'{c}' is not a ball-grid row letter"));
        }
        if column.is_empty() || !column.chars().all(|c| c.is_ascii_digit()) {
            return Err("expected a column number after the row".to_string());
        }
        if column.starts_with('0') {
            return Err("column numbers start at 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_token() {
        let p = pins("R20", Direction::In).unwrap();
        assert_eq!(p.shape(), &PinShape::Single("R20".to_string()));
        assert_eq!(p.width(), 1);
        assert!(!p.invert());
    }

    #[test]
    fn bus_preserves_order() {
        let p = pins("L7 K6 D8", Direction::Out).unwrap();
        assert_eq!(p.tokens(), vec!["L7", "K6", "D8"]);
        assert_eq!(p.width(), 3);
        assert_eq!(p.primary(), "L7");
    }

    #[test]
    fn empty_list_is_format_error() {
        let err = pins("   ", Direction::Out).unwrap_err();
        assert!(matches!(err, ConstraintError::Format { .. }));
    }

    #[test]
    fn whitespace_in_token_rejected() {
        let err = PinExpression::from_tokens(["A 1"], Direction::In, false).unwrap_err();
        assert!(matches!(err, ConstraintError::Format { token, .. } if token == "A 1"));
    }

    #[test]
    fn active_low() {
        let p = pins_n("AB24", Direction::In).unwrap();
        assert!(p.invert());
    }

    #[test]
    fn diff_pair_two_distinct_legs() {
        let p = diff_pair("U12", "V12", Direction::In).unwrap();
        assert!(p.is_differential());
        assert_eq!(p.tokens(), vec!["U12", "V12"]);
        assert_eq!(p.width(), 1);

        let err = diff_pair("U12", "U12", Direction::In).unwrap_err();
        assert!(matches!(err, ConstraintError::Format { .. }));
    }

    #[test]
    fn display() {
        assert_eq!(pins("A1 A2", Direction::Out).unwrap().to_string(), "[A1 A2] (o)");
        assert_eq!(
            diff_pair("U12", "V12", Direction::In).unwrap().to_string(),
            "U12/V12 (i)"
        );
        assert_eq!(
            pins_n("AB24", Direction::In).unwrap().to_string(),
            "AB24 (i, inverted)"
        );
    }

    #[test]
    fn connector_refs() {
        assert_eq!(parse_connector_ref("gpio_0:3"), Some(("gpio", 0, "3")));
        assert_eq!(parse_connector_ref("hsmc_rx_1:D5"), Some(("hsmc_rx", 1, "D5")));
        assert_eq!(parse_connector_ref("R20"), None);
        assert_eq!(parse_connector_ref("gpio:3"), None);
        assert_eq!(parse_connector_ref("gpio_0:"), None);
    }

    #[test]
    fn bga_grid_accepts_board_pins() {
        for id in ["A1", "R20", "AB24", "AE10", "Y15", "AF24"] {
            assert!(BgaGrid.check(id).is_ok(), "{id} should be valid");
        }
    }

    #[test]
    fn bga_grid_rejects_malformed() {
        for id in ["I3", "A0", "PIN_A1", "ABC1", "12", "A", "AO7", "a1"] {
            assert!(BgaGrid.check(id).is_err(), "{id} should be rejected");
        }
    }
}
