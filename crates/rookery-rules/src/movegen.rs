//! Pseudo-legal move generation.
//!
//! A pseudo-legal move follows the piece's movement pattern and respects
//! board occupancy, but ignores whether it leaves the mover's own king
//! in check. Filtering that out is the rule engine's job.
//!
//! Each piece family implements [`MoveGenerator`]. [`generator_for`]
//! picks the implementation for a [`PieceType`] from a static table, so
//! callers never branch on the piece kind themselves.

use std::collections::HashSet;

use crate::{Board, Color, Move, PieceType, Position};

/// Computes the pseudo-legal moves of one piece.
///
/// `Send + Sync` because the table below is a `static` shared by every
/// match actor.
pub trait MoveGenerator: Send + Sync {
    /// Adds the moves of the `color` piece standing on `from` to `moves`.
    fn generate(
        &self,
        board: &Board,
        from: Position,
        color: Color,
        moves: &mut HashSet<Move>,
    );
}

// ---------------------------------------------------------------------------
// Leapers: king and knight
// ---------------------------------------------------------------------------

/// A piece that jumps to a fixed set of offsets.
pub struct Leaper {
    offsets: &'static [(i8, i8)],
}

const KING_OFFSETS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, -1),
    (2, 1),
    (1, -2),
    (1, 2),
    (-1, -2),
    (-1, 2),
    (-2, -1),
    (-2, 1),
];

impl MoveGenerator for Leaper {
    fn generate(
        &self,
        board: &Board,
        from: Position,
        color: Color,
        moves: &mut HashSet<Move>,
    ) {
        for &(d_row, d_column) in self.offsets {
            let Some(to) = from.offset(d_row, d_column) else {
                continue;
            };
            match board.piece_at(to) {
                Some(occupant) if occupant.color == color => {}
                _ => {
                    moves.insert(Move::new(from, to));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Sliders: bishop, rook, queen
// ---------------------------------------------------------------------------

/// A piece that slides along rays until blocked.
pub struct Slider {
    directions: &'static [(i8, i8)],
}

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

impl MoveGenerator for Slider {
    fn generate(
        &self,
        board: &Board,
        from: Position,
        color: Color,
        moves: &mut HashSet<Move>,
    ) {
        for &(d_row, d_column) in self.directions {
            let mut current = from;
            while let Some(to) = current.offset(d_row, d_column) {
                match board.piece_at(to) {
                    None => {
                        moves.insert(Move::new(from, to));
                    }
                    Some(occupant) => {
                        if occupant.color != color {
                            moves.insert(Move::new(from, to));
                        }
                        break;
                    }
                }
                current = to;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pawn
// ---------------------------------------------------------------------------

/// Pawn pushes, double steps, diagonal captures and promotions.
///
/// En passant is not generated.
pub struct PawnMoves;

impl PawnMoves {
    /// Inserts `from → to`, expanded into one move per promotion kind
    /// when `to` is on the promotion rank.
    fn push(color: Color, from: Position, to: Position, moves: &mut HashSet<Move>) {
        if to.row() == color.promotion_row() {
            for kind in PieceType::PROMOTIONS {
                moves.insert(Move::promoting(from, to, kind));
            }
        } else {
            moves.insert(Move::new(from, to));
        }
    }
}

impl MoveGenerator for PawnMoves {
    fn generate(
        &self,
        board: &Board,
        from: Position,
        color: Color,
        moves: &mut HashSet<Move>,
    ) {
        let forward = color.forward();

        if let Some(one) = from.offset(forward, 0) {
            if board.piece_at(one).is_none() {
                Self::push(color, from, one, moves);

                if from.row() == color.pawn_start_row() {
                    if let Some(two) = one.offset(forward, 0) {
                        if board.piece_at(two).is_none() {
                            moves.insert(Move::new(from, two));
                        }
                    }
                }
            }
        }

        for d_column in [-1, 1] {
            let Some(to) = from.offset(forward, d_column) else {
                continue;
            };
            if matches!(board.piece_at(to), Some(target) if target.color != color) {
                Self::push(color, from, to, moves);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Lookup table
// ---------------------------------------------------------------------------

static KING: Leaper = Leaper {
    offsets: &KING_OFFSETS,
};
static KNIGHT: Leaper = Leaper {
    offsets: &KNIGHT_OFFSETS,
};
static BISHOP: Slider = Slider {
    directions: &DIAGONAL,
};
static ROOK: Slider = Slider {
    directions: &ORTHOGONAL,
};
static QUEEN: Slider = Slider {
    directions: &ALL_DIRECTIONS,
};
static PAWN: PawnMoves = PawnMoves;

/// Generators indexed in [`PieceType::ALL`] order.
static GENERATORS: [&dyn MoveGenerator; 6] =
    [&KING, &QUEEN, &ROOK, &BISHOP, &KNIGHT, &PAWN];

/// The generator for a piece kind.
pub fn generator_for(kind: PieceType) -> &'static dyn MoveGenerator {
    GENERATORS[kind.index()]
}

/// All pseudo-legal moves of the piece on `position`.
///
/// Returns an empty set when the square is empty.
pub fn pseudo_legal_moves(board: &Board, position: Position) -> HashSet<Move> {
    let mut moves = HashSet::new();
    if let Some(piece) = board.piece_at(position) {
        generator_for(piece.kind).generate(board, position, piece.color, &mut moves);
    }
    moves
}
