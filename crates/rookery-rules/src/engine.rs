//! Rule engine: legal moves, check, checkmate and stalemate.
//!
//! Legality is decided by simulation. Every pseudo-legal move is played
//! on a scratch copy of the board and kept only if the mover's king is
//! not attacked afterwards. That one rule covers pins, moving into check
//! and failing to answer a check.
//!
//! Every function here is total: a board without a king of the queried
//! colour simply reports "not in check".

use std::collections::HashSet;

use crate::movegen::pseudo_legal_moves;
use crate::{Board, Color, GameStatus, Move, Piece, Position};

/// Returns `true` if `color`'s king is attacked by any opposing piece.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(king) = board.king_position(color) else {
        return false;
    };
    is_attacked(board, king, color.opponent())
}

/// Returns `true` if any `attacker` piece has a pseudo-legal move onto
/// `target`.
pub fn is_attacked(board: &Board, target: Position, attacker: Color) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == attacker)
        .any(|(pos, _)| {
            pseudo_legal_moves(board, pos)
                .iter()
                .any(|mv| mv.to == target)
        })
}

/// The legal moves of the `color` piece on `position`.
///
/// Empty if the square is empty or holds an opposing piece.
pub fn legal_moves(board: &Board, position: Position, color: Color) -> HashSet<Move> {
    match board.piece_at(position) {
        Some(piece) if piece.color == color => {}
        _ => return HashSet::new(),
    }

    pseudo_legal_moves(board, position)
        .into_iter()
        .filter(|mv| {
            let mut scratch = board.clone();
            apply_unchecked(&mut scratch, *mv);
            !is_in_check(&scratch, color)
        })
        .collect()
}

/// Every legal move available to `color`.
pub fn all_legal_moves(board: &Board, color: Color) -> HashSet<Move> {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == color)
        .flat_map(|(pos, _)| legal_moves(board, pos, color))
        .collect()
}

/// Returns `true` if `color` has at least one legal move.
pub fn has_any_legal_move(board: &Board, color: Color) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == color)
        .any(|(pos, _)| !legal_moves(board, pos, color).is_empty())
}

/// Classifies the position for the side to move.
pub fn status(board: &Board, color: Color, in_check: bool) -> GameStatus {
    match (has_any_legal_move(board, color), in_check) {
        (false, true) => GameStatus::Checkmate,
        (false, false) => GameStatus::Stalemate,
        (true, true) => GameStatus::Check,
        (true, false) => GameStatus::InProgress,
    }
}

/// Plays `mv` on `board` without any validation.
///
/// Clears the destination, relocates the piece and, for a promotion,
/// swaps it for a piece of the requested kind in the mover's colour.
pub(crate) fn apply_unchecked(board: &mut Board, mv: Move) {
    board.remove(mv.to);
    board.move_piece(mv.from, mv.to);
    if let Some(kind) = mv.promotion {
        if let Some(moved) = board.piece_at(mv.to) {
            board.place(mv.to, Piece::new(moved.color, kind));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::pseudo_legal_moves;
    use crate::PieceType;

    fn sq(name: &str) -> Position {
        name.parse().unwrap()
    }

    fn put(board: &mut Board, name: &str, color: Color, kind: PieceType) {
        board.place(sq(name), Piece::new(color, kind));
    }

    #[test]
    fn test_is_in_check_missing_king_is_false() {
        let mut board = Board::empty();
        put(&mut board, "a1", Color::Black, PieceType::Queen);
        assert!(!is_in_check(&board, Color::White));
    }

    #[test]
    fn test_is_in_check_by_knight() {
        let mut board = Board::empty();
        put(&mut board, "e1", Color::White, PieceType::King);
        put(&mut board, "f3", Color::Black, PieceType::Knight);
        assert!(is_in_check(&board, Color::White));
        assert!(!is_in_check(&board, Color::Black));
    }

    #[test]
    fn test_is_in_check_blocked_ray() {
        let mut board = Board::empty();
        put(&mut board, "e1", Color::White, PieceType::King);
        put(&mut board, "e8", Color::Black, PieceType::Rook);
        assert!(is_in_check(&board, Color::White));

        put(&mut board, "e4", Color::White, PieceType::Bishop);
        assert!(!is_in_check(&board, Color::White));
    }

    #[test]
    fn test_pawn_attacks_diagonally_not_forward() {
        let mut board = Board::empty();
        put(&mut board, "e4", Color::White, PieceType::King);
        put(&mut board, "e5", Color::Black, PieceType::Pawn);
        assert!(!is_in_check(&board, Color::White));

        put(&mut board, "d5", Color::Black, PieceType::Pawn);
        assert!(is_in_check(&board, Color::White));
    }

    #[test]
    fn test_pinned_piece_cannot_leave_the_line() {
        let mut board = Board::empty();
        put(&mut board, "e1", Color::White, PieceType::King);
        put(&mut board, "e2", Color::White, PieceType::Knight);
        put(&mut board, "e8", Color::Black, PieceType::Rook);

        assert!(!pseudo_legal_moves(&board, sq("e2")).is_empty());
        assert!(legal_moves(&board, sq("e2"), Color::White).is_empty());
    }

    #[test]
    fn test_pinned_rook_may_slide_along_the_pin() {
        let mut board = Board::empty();
        put(&mut board, "e1", Color::White, PieceType::King);
        put(&mut board, "e2", Color::White, PieceType::Rook);
        put(&mut board, "e8", Color::Black, PieceType::Rook);

        let moves = legal_moves(&board, sq("e2"), Color::White);

        assert_eq!(moves.len(), 6); // e3..e7 and the capture on e8
        assert!(moves.iter().all(|m| m.to.column() == 5));
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        let mut board = Board::empty();
        put(&mut board, "e1", Color::White, PieceType::King);
        put(&mut board, "d8", Color::Black, PieceType::Rook);

        let moves = legal_moves(&board, sq("e1"), Color::White);

        assert!(moves.iter().all(|m| m.to.column() != 4));
        assert_eq!(moves.len(), 3); // e2, f1, f2
    }

    #[test]
    fn test_legal_moves_wrong_color_is_empty() {
        let board = Board::standard();
        assert!(legal_moves(&board, sq("e2"), Color::Black).is_empty());
        assert!(legal_moves(&board, sq("e4"), Color::White).is_empty());
    }

    #[test]
    fn test_legal_moves_are_subset_of_pseudo_legal_and_safe() {
        let mut board = Board::empty();
        put(&mut board, "g1", Color::White, PieceType::King);
        put(&mut board, "f2", Color::White, PieceType::Pawn);
        put(&mut board, "d4", Color::White, PieceType::Bishop);
        put(&mut board, "c5", Color::Black, PieceType::Bishop);
        put(&mut board, "g8", Color::Black, PieceType::King);
        put(&mut board, "g3", Color::Black, PieceType::Knight);

        for (pos, piece) in board.pieces() {
            let pseudo = pseudo_legal_moves(&board, pos);
            for mv in legal_moves(&board, pos, piece.color) {
                assert!(pseudo.contains(&mv));
                let mut after = board.clone();
                apply_unchecked(&mut after, mv);
                assert!(!is_in_check(&after, piece.color), "{mv} leaves king in check");
            }
        }
    }

    #[test]
    fn test_starting_position_has_twenty_moves() {
        assert_eq!(all_legal_moves(&Board::standard(), Color::White).len(), 20);
        assert_eq!(all_legal_moves(&Board::standard(), Color::Black).len(), 20);
    }

    #[test]
    fn test_status_checkmate_king_h1_queen_h8() {
        let mut board = Board::empty();
        put(&mut board, "h1", Color::White, PieceType::King);
        put(&mut board, "h8", Color::Black, PieceType::Queen);
        put(&mut board, "g8", Color::Black, PieceType::Rook);
        put(&mut board, "a8", Color::Black, PieceType::King);

        let in_check = is_in_check(&board, Color::White);

        assert!(in_check);
        assert!(!has_any_legal_move(&board, Color::White));
        assert_eq!(status(&board, Color::White, in_check), GameStatus::Checkmate);
    }

    #[test]
    fn test_status_stalemate_king_a8() {
        let mut board = Board::empty();
        put(&mut board, "a8", Color::Black, PieceType::King);
        put(&mut board, "b6", Color::White, PieceType::Queen);
        put(&mut board, "h1", Color::White, PieceType::King);

        let in_check = is_in_check(&board, Color::Black);

        assert!(!in_check);
        assert_eq!(status(&board, Color::Black, in_check), GameStatus::Stalemate);
    }

    #[test]
    fn test_status_check_with_escape() {
        let mut board = Board::empty();
        put(&mut board, "e1", Color::White, PieceType::King);
        put(&mut board, "e8", Color::Black, PieceType::Rook);
        assert_eq!(
            status(&board, Color::White, is_in_check(&board, Color::White)),
            GameStatus::Check
        );
    }

    #[test]
    fn test_apply_unchecked_promotion_keeps_mover_color() {
        let mut board = Board::empty();
        put(&mut board, "a2", Color::Black, PieceType::Pawn);
        apply_unchecked(&mut board, Move::promoting(sq("a2"), sq("a1"), PieceType::Knight));
        assert_eq!(
            board.piece_at(sq("a1")),
            Some(Piece::new(Color::Black, PieceType::Knight))
        );
        assert_eq!(board.piece_at(sq("a2")), None);
    }
}
