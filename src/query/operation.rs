//! Operation codes for query cells
//!
//! Every cell carries a packed 16-bit code made of three independent groups:
//!
//! - bits 0-5: comparison kind (masked with [`COMPARISON_MASK`])
//! - bits 6-7: combination (intersection / union)
//! - bit 8: the "all" sentinel
//! - bits 9-10: ordering (desc = 0x400, asc = 0x600)
//!
//! The enums below are the working representation. The packed form is kept
//! because its numeric values are part of the public contract, and its decode
//! order is fixed: bit patterns overlap (asc contains desc, like contains
//! unlike and equal, ...), so the more specific pattern is always tested first.

use std::fmt;

use super::errors::{QueryError, QueryResult};

/// Mask selecting the comparison-kind bits
pub const COMPARISON_MASK: u16 = 0x3F;
/// Intersection combination bit
pub const INTERSECTION: u16 = 0x040;
/// Union combination bit
pub const UNION: u16 = 0x080;
/// Sentinel "all documents" code
pub const ALL: u16 = 0x100;
/// Ascending order code
pub const ORDER_ASC: u16 = 0x600;
/// Descending order code
pub const ORDER_DESC: u16 = 0x400;

/// Comparison kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Unequal,
    Equal,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// Substring or token match, strings only
    Like,
    /// Neither token nor substring match, strings only
    Unlike,
    /// Member value is one of a list (`in`)
    Contains,
    /// Member value is none of a list
    Exclude,
}

impl Comparison {
    /// All comparisons in decode priority order
    pub const DECODE_ORDER: [Comparison; 10] = [
        Comparison::Like,
        Comparison::Unlike,
        Comparison::Contains,
        Comparison::Exclude,
        Comparison::GreaterEqual,
        Comparison::Greater,
        Comparison::LessEqual,
        Comparison::Less,
        Comparison::Equal,
        Comparison::Unequal,
    ];

    /// Returns the packed comparison bits
    pub fn bits(&self) -> u16 {
        match self {
            Comparison::Unequal => 0x000,
            Comparison::Equal => 0x001,
            Comparison::Less => 0x002,
            Comparison::LessEqual => 0x003,
            Comparison::Greater => 0x004,
            Comparison::GreaterEqual => 0x005,
            Comparison::Unlike => 0x010,
            Comparison::Like => 0x011,
            Comparison::Exclude => 0x020,
            Comparison::Contains => 0x021,
        }
    }

    /// Returns the builder keyword for this comparison
    pub fn keyword(&self) -> &'static str {
        match self {
            Comparison::Unequal => "unequal",
            Comparison::Equal => "equal",
            Comparison::Less => "less",
            Comparison::LessEqual => "less_equal",
            Comparison::Greater => "greater",
            Comparison::GreaterEqual => "greater_equal",
            Comparison::Like => "like",
            Comparison::Unlike => "unlike",
            Comparison::Contains => "contains",
            Comparison::Exclude => "exclude",
        }
    }

    /// Parses a builder keyword
    pub fn from_keyword(keyword: &str) -> QueryResult<Self> {
        Self::DECODE_ORDER
            .iter()
            .copied()
            .find(|c| c.keyword() == keyword)
            .ok_or_else(|| QueryError::syntax(format!("unknown comparison keyword '{}'", keyword)))
    }

    /// Decodes the comparison kind of a packed code.
    ///
    /// First match in [`Comparison::DECODE_ORDER`] wins. `Unequal` has no
    /// bits of its own, so it is the fallback for anything left over.
    pub fn decode(code: u16) -> Self {
        let bits = code & COMPARISON_MASK;
        Self::DECODE_ORDER
            .iter()
            .copied()
            .find(|c| bits & c.bits() == c.bits())
            .unwrap_or(Comparison::Unequal)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// How a cell combines with its siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combination {
    /// Required (AND)
    Intersect,
    /// Alternative (OR)
    Union,
}

impl Combination {
    pub fn bits(&self) -> u16 {
        match self {
            Combination::Intersect => INTERSECTION,
            Combination::Union => UNION,
        }
    }
}

/// Sort direction of an order cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn bits(&self) -> u16 {
        match self {
            SortDirection::Asc => ORDER_ASC,
            SortDirection::Desc => ORDER_DESC,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Where documents without the member are placed
    pub fn missing(&self) -> &'static str {
        match self {
            SortDirection::Asc => "_first",
            SortDirection::Desc => "_last",
        }
    }
}

/// A packed operation code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperationCode(pub u16);

impl OperationCode {
    /// Code of the sentinel cell
    pub const ALL: OperationCode = OperationCode(ALL);

    /// Packs a comparison leaf code
    pub fn comparison_leaf(combination: Combination, comparison: Comparison) -> Self {
        OperationCode(combination.bits() | comparison.bits())
    }

    /// Packs a sub-tree code
    pub fn group(combination: Combination) -> Self {
        OperationCode(combination.bits())
    }

    /// Packs an order code
    pub fn order(direction: SortDirection) -> Self {
        OperationCode(direction.bits())
    }

    pub fn bits(&self) -> u16 {
        self.0
    }

    /// Decoded comparison kind
    pub fn comparison(&self) -> Comparison {
        Comparison::decode(self.0)
    }

    /// Decoded combination, intersection tested first
    pub fn combination(&self) -> Option<Combination> {
        if self.0 & INTERSECTION == INTERSECTION {
            Some(Combination::Intersect)
        } else if self.0 & UNION == UNION {
            Some(Combination::Union)
        } else {
            None
        }
    }

    /// Decoded sort direction, ascending tested first
    pub fn direction(&self) -> Option<SortDirection> {
        if self.0 & ORDER_ASC == ORDER_ASC {
            Some(SortDirection::Asc)
        } else if self.0 & ORDER_DESC == ORDER_DESC {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    pub fn is_all(&self) -> bool {
        self.0 & ALL == ALL
    }
}

impl fmt::Display for OperationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(COMPARISON_MASK, 0x3F);
        assert_eq!(Comparison::Unequal.bits(), 0x000);
        assert_eq!(Comparison::Equal.bits(), 0x001);
        assert_eq!(Comparison::Less.bits(), 0x002);
        assert_eq!(Comparison::LessEqual.bits(), 0x003);
        assert_eq!(Comparison::Greater.bits(), 0x004);
        assert_eq!(Comparison::GreaterEqual.bits(), 0x005);
        assert_eq!(Comparison::Like.bits(), 0x011);
        assert_eq!(Comparison::Unlike.bits(), 0x010);
        assert_eq!(Comparison::Contains.bits(), 0x021);
        assert_eq!(Comparison::Exclude.bits(), 0x020);
        assert_eq!(INTERSECTION, 0x040);
        assert_eq!(UNION, 0x080);
        assert_eq!(ALL, 0x100);
        assert_eq!(ORDER_ASC, 0x600);
        assert_eq!(ORDER_DESC, 0x400);
    }

    #[test]
    fn test_decode_every_comparison() {
        for comparison in Comparison::DECODE_ORDER {
            let code = OperationCode::comparison_leaf(Combination::Intersect, comparison);
            assert_eq!(code.comparison(), comparison);
            assert_eq!(code.combination(), Some(Combination::Intersect));

            let code = OperationCode::comparison_leaf(Combination::Union, comparison);
            assert_eq!(code.comparison(), comparison);
            assert_eq!(code.combination(), Some(Combination::Union));
        }
    }

    #[test]
    fn test_decode_priority() {
        // like must never be read as unlike
        assert_eq!(Comparison::decode(0x011), Comparison::Like);
        // only bit 0x01 left is equal, nothing left is unequal
        assert_eq!(Comparison::decode(0x001), Comparison::Equal);
        assert_eq!(Comparison::decode(0x000), Comparison::Unequal);
        assert_eq!(Comparison::decode(INTERSECTION), Comparison::Unequal);
        // contains wins over exclude and equal
        assert_eq!(Comparison::decode(0x021), Comparison::Contains);
        // combination bits are masked away
        assert_eq!(Comparison::decode(UNION | 0x005), Comparison::GreaterEqual);
    }

    #[test]
    fn test_direction_decode_prefers_asc() {
        assert_eq!(OperationCode(ORDER_ASC).direction(), Some(SortDirection::Asc));
        assert_eq!(OperationCode(ORDER_DESC).direction(), Some(SortDirection::Desc));
        assert_eq!(OperationCode::ALL.direction(), None);
        assert!(OperationCode::ALL.is_all());
        assert_eq!(OperationCode::ALL.combination(), None);
    }

    #[test]
    fn test_from_keyword() {
        assert_eq!(Comparison::from_keyword("less_equal").unwrap(), Comparison::LessEqual);
        assert_eq!(Comparison::from_keyword("exclude").unwrap(), Comparison::Exclude);

        let err = Comparison::from_keyword("good").unwrap_err();
        assert_eq!(err.code(), "DOCQUERY_QUERY_SYNTAX");
    }

    #[test]
    fn test_keyword_round_trip() {
        for comparison in Comparison::DECODE_ORDER {
            assert_eq!(Comparison::from_keyword(comparison.keyword()).unwrap(), comparison);
        }
    }
}
