//! Value types shared by every layer: squares, colours, pieces and moves.
//!
//! All of these are small `Copy` values with structural equality. A
//! [`Move`] generated twice compares and hashes equal, so collecting
//! moves into a `HashSet` deduplicates them for free.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PositionError;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A square on the board, 1-based: `row` is the rank, `column` the file.
///
/// A `Position` is always on the board. [`Position::new`] panics when
/// handed coordinates outside 1..=8 (callers are expected to pass
/// validated values), while [`Position::try_new`] and
/// [`Position::offset`] return `None` and are what move generators use
/// when a ray walks off the edge.
///
/// On the wire a position is its algebraic name (`"e4"`), via
/// `#[serde(try_from = "String", into = "String")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    row: u8,
    column: u8,
}

impl Position {
    /// Lowest valid row or column.
    pub const MIN: u8 = 1;
    /// Highest valid row or column.
    pub const MAX: u8 = 8;

    /// Creates a position from 1-based coordinates.
    ///
    /// # Panics
    /// Panics if either coordinate is outside 1..=8. An out-of-range
    /// square is a bug in the caller, not a recoverable condition.
    pub fn new(row: u8, column: u8) -> Self {
        assert!(
            (Self::MIN..=Self::MAX).contains(&row)
                && (Self::MIN..=Self::MAX).contains(&column),
            "position out of bounds: row {row}, column {column}"
        );
        Self { row, column }
    }

    /// Creates a position, or `None` if it would be off the board.
    pub fn try_new(row: i8, column: i8) -> Option<Self> {
        let range = Self::MIN as i8..=Self::MAX as i8;
        if range.contains(&row) && range.contains(&column) {
            Some(Self {
                row: row as u8,
                column: column as u8,
            })
        } else {
            None
        }
    }

    /// The rank, 1..=8.
    pub fn row(self) -> u8 {
        self.row
    }

    /// The file as a number, 1..=8 (a = 1).
    pub fn column(self) -> u8 {
        self.column
    }

    /// The square `d_row` ranks and `d_column` files away, if on the board.
    pub fn offset(self, d_row: i8, d_column: i8) -> Option<Self> {
        Self::try_new(self.row as i8 + d_row, self.column as i8 + d_column)
    }

    /// Every square, rank 1 first, files a to h within a rank.
    pub fn all() -> impl Iterator<Item = Position> {
        (Self::MIN..=Self::MAX).flat_map(|row| {
            (Self::MIN..=Self::MAX).map(move |column| Position { row, column })
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.column - 1) as char;
        write!(f, "{file}{}", self.row)
    }
}

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PositionError::InvalidSquare(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        Ok(Self {
            row: rank - b'0',
            column: file - b'a' + 1,
        })
    }
}

impl TryFrom<String> for Position {
    type Error = PositionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// One of the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Row direction this side's pawns advance in.
    pub fn forward(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Row this side's pawns start on (and may double-step from).
    pub fn pawn_start_row(self) -> u8 {
        match self {
            Self::White => 2,
            Self::Black => 7,
        }
    }

    /// Row on which this side's pawns promote.
    pub fn promotion_row(self) -> u8 {
        match self {
            Self::White => 8,
            Self::Black => 1,
        }
    }

    /// Row holding this side's pieces in the initial setup.
    pub fn back_row(self) -> u8 {
        self.opponent().promotion_row()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "white"),
            Self::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType / Piece
// ---------------------------------------------------------------------------

/// The six kinds of chess piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// Every kind, in declaration order. Indexes the generator table.
    pub const ALL: [PieceType; 6] = [
        Self::King,
        Self::Queen,
        Self::Rook,
        Self::Bishop,
        Self::Knight,
        Self::Pawn,
    ];

    /// The kinds a pawn may promote to.
    pub const PROMOTIONS: [PieceType; 4] =
        [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];

    /// Returns `true` if a pawn may promote to this kind.
    pub fn is_promotion_target(self) -> bool {
        Self::PROMOTIONS.contains(&self)
    }

    /// Position in [`PieceType::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Lowercase letter used in move notation (`q`, `r`, `b`, `n`, ...).
    pub fn letter(self) -> char {
        match self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.letter() == c.to_ascii_lowercase())
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::King => "king",
            Self::Queen => "queen",
            Self::Rook => "rook",
            Self::Bishop => "bishop",
            Self::Knight => "knight",
            Self::Pawn => "pawn",
        };
        f.write_str(name)
    }
}

/// A piece: its kind and the side it belongs to.
///
/// Serializes as `{ "type": "QUEEN", "color": "WHITE" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "type")]
    pub kind: PieceType,
    pub color: Color,
}

impl Piece {
    pub fn new(color: Color, kind: PieceType) -> Self {
        Self { kind, color }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// A move from one square to another, with an optional promotion.
///
/// `promotion` is only ever set on a pawn move onto its last rank. On
/// the wire it is omitted when absent:
/// `{ "from": "e7", "to": "e8", "promotion": "QUEEN" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PieceType>,
}

impl Move {
    /// A plain move with no promotion.
    pub fn new(from: Position, to: Position) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// A pawn move that promotes to `kind`.
    pub fn promoting(from: Position, to: Position, kind: PieceType) -> Self {
        Self {
            from,
            to,
            promotion: Some(kind),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

/// Parses coordinate notation: `"e2e4"`, or `"e7e8q"` for a promotion.
impl FromStr for Move {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PositionError::InvalidMove(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(invalid());
        }
        let from: Position = s[0..2].parse().map_err(|_| invalid())?;
        let to: Position = s[2..4].parse().map_err(|_| invalid())?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => Some(
                PieceType::from_letter(c)
                    .filter(|kind| kind.is_promotion_target())
                    .ok_or_else(invalid)?,
            ),
        };
        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parse_and_display() {
        let pos: Position = "e4".parse().unwrap();
        assert_eq!(pos.row(), 4);
        assert_eq!(pos.column(), 5);
        assert_eq!(pos.to_string(), "e4");
        assert_eq!(Position::new(1, 1).to_string(), "a1");
        assert_eq!(Position::new(8, 8).to_string(), "h8");
    }

    #[test]
    fn test_position_parse_rejects_off_board() {
        assert!("i1".parse::<Position>().is_err());
        assert!("a9".parse::<Position>().is_err());
        assert!("a0".parse::<Position>().is_err());
        assert!("e".parse::<Position>().is_err());
        assert!("e44".parse::<Position>().is_err());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_position_new_out_of_range_panics() {
        let _ = Position::new(0, 3);
    }

    #[test]
    fn test_position_offset_stops_at_edge() {
        let a1 = Position::new(1, 1);
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(0, -1), None);
        assert_eq!(a1.offset(1, 1), Some(Position::new(2, 2)));
    }

    #[test]
    fn test_position_all_covers_sixty_four_squares() {
        assert_eq!(Position::all().count(), 64);
        assert_eq!(Position::all().next(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_position_serializes_as_algebraic_string() {
        let json = serde_json::to_string(&Position::new(2, 5)).unwrap();
        assert_eq!(json, "\"e2\"");
        let back: Position = serde_json::from_str("\"h7\"").unwrap();
        assert_eq!(back, Position::new(7, 8));
        assert!(serde_json::from_str::<Position>("\"z9\"").is_err());
    }

    #[test]
    fn test_color_helpers() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::White.pawn_start_row(), 2);
        assert_eq!(Color::Black.pawn_start_row(), 7);
        assert_eq!(Color::White.promotion_row(), 8);
        assert_eq!(Color::Black.back_row(), 8);
        assert_eq!(
            serde_json::to_string(&Color::Black).unwrap(),
            "\"BLACK\""
        );
    }

    #[test]
    fn test_piece_json_shape() {
        let piece = Piece::new(Color::White, PieceType::Queen);
        let json = serde_json::to_value(piece).unwrap();
        assert_eq!(json["type"], "QUEEN");
        assert_eq!(json["color"], "WHITE");
    }

    #[test]
    fn test_move_parse_plain_and_promotion() {
        let mv: Move = "e2e4".parse().unwrap();
        assert_eq!(mv, Move::new("e2".parse().unwrap(), "e4".parse().unwrap()));

        let promo: Move = "e7e8q".parse().unwrap();
        assert_eq!(promo.promotion, Some(PieceType::Queen));
        assert_eq!(promo.to_string(), "e7e8q");
    }

    #[test]
    fn test_move_parse_rejects_king_promotion() {
        assert!("e7e8k".parse::<Move>().is_err());
        assert!("e7e8x".parse::<Move>().is_err());
        assert!("e7".parse::<Move>().is_err());
    }

    #[test]
    fn test_move_json_omits_missing_promotion() {
        let mv: Move = "g1f3".parse().unwrap();
        let json = serde_json::to_value(mv).unwrap();
        assert_eq!(json["from"], "g1");
        assert_eq!(json["to"], "f3");
        assert!(json.get("promotion").is_none());

        let back: Move =
            serde_json::from_str(r#"{"from":"a7","to":"a8","promotion":"KNIGHT"}"#)
                .unwrap();
        assert_eq!(back.promotion, Some(PieceType::Knight));
    }
}
