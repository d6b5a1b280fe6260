//! The 8×8 board: a grid of optional pieces.
//!
//! `Board` is plain data. It knows nothing about turns or legality;
//! [`Board::move_piece`] relocates whatever is on a square, no questions
//! asked. The rule engine builds on top of it and uses scratch copies to
//! simulate moves, which is why `Board` is `Clone` and cheap to copy.

use serde::{Deserialize, Serialize};

use crate::{Color, Piece, PieceType, Position};

/// Back-rank layout from file a to file h.
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// An 8×8 grid of optional pieces.
///
/// Serialized as eight ranks (rank 1 first), each an array of eight
/// `null`-or-piece entries (file a first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// The standard starting position.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for color in [Color::White, Color::Black] {
            for (i, kind) in BACK_RANK.into_iter().enumerate() {
                let column = i as u8 + 1;
                board.place(
                    Position::new(color.back_row(), column),
                    Piece::new(color, kind),
                );
                board.place(
                    Position::new(color.pawn_start_row(), column),
                    Piece::new(color, PieceType::Pawn),
                );
            }
        }
        board
    }

    /// The piece on `pos`, if any.
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.squares[index(pos.row())][index(pos.column())]
    }

    /// Puts `piece` on `pos`, replacing whatever was there.
    pub fn place(&mut self, pos: Position, piece: Piece) {
        self.squares[index(pos.row())][index(pos.column())] = Some(piece);
    }

    /// Clears `pos`, returning the piece that was on it.
    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        self.squares[index(pos.row())][index(pos.column())].take()
    }

    /// Moves whatever is on `from` to `to`, unconditionally.
    ///
    /// Anything on `to` is overwritten. Moving from an empty square
    /// clears `to`.
    pub fn move_piece(&mut self, from: Position, to: Position) {
        let piece = self.remove(from);
        self.squares[index(to.row())][index(to.column())] = piece;
    }

    /// Every occupied square together with its piece.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all()
            .filter_map(|pos| self.piece_at(pos).map(|piece| (pos, piece)))
    }

    /// Where `color`'s king stands, if it has one.
    pub fn king_position(&self, color: Color) -> Option<Position> {
        let king = Piece::new(color, PieceType::King);
        self.pieces()
            .find(|(_, piece)| *piece == king)
            .map(|(pos, _)| pos)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

/// Converts a 1-based coordinate into an array index. `Position`
/// guarantees 1..=8, so this never goes out of bounds.
fn index(coordinate: u8) -> usize {
    usize::from(coordinate - 1)
}
