//! Integration tests: full game records travelling through the engine.
//!
//! Each test drives the public surface end to end — parse a record in
//! one of the accepted dialects, edit or link the resulting tree, and
//! re-export — checking the pieces agree with each other rather than
//! any single module in isolation.

use xiangqi_core::export::{to_dhtmlxq, to_iccs_pgn, to_text};
use xiangqi_core::{
    parse_record, Direction, GameMetadata, GameResult, MoveTree, NodeId, Square, STARTING_FEN,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sq(row: u8, col: u8) -> Square {
    Square::new(row, col)
}

fn notations(tree: &MoveTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|c| tree.node(*c).and_then(|n| n.notation().map(String::from)))
        .collect()
}

/// The classic central-cannon opening, annotated, as a human would paste
/// it from a book or a forum post.
const ANNOTATED_GAME: &str = "\
棋局標題：中炮對屏風馬
紅方：甲
黑方：乙
結果：紅勝

1. 炮二平五 馬8進7
2. 傌二進三 {穩固右翼} 車9平8
3. 俥一平二";

// ---------------------------------------------------------------------------
// Text dialects
// ---------------------------------------------------------------------------

#[test]
fn test_annotated_text_game_parses_completely() {
    let game = parse_record(ANNOTATED_GAME).expect("game should parse");
    assert!(!game.truncated);
    assert_eq!(game.metadata.title, "中炮對屏風馬");
    assert_eq!(game.metadata.result, GameResult::Red);

    let line = game.tree.main_line();
    assert_eq!(line.len(), 6); // root + 5 plies
    let third = game.tree.node(line[3]).unwrap();
    assert_eq!(third.notation(), Some("傌二進三"));
    assert_eq!(third.comment, "穩固右翼");
}

#[test]
fn test_mixed_dialects_in_one_record() {
    // Coordinate, WXF and localized tokens describing the same opening.
    let game = parse_record("h2e2 N8+7 傌二進三").expect("mixed record should parse");
    let line = game.tree.main_line();
    assert_eq!(line.len(), 4);
    assert_eq!(game.tree.node(line[1]).unwrap().notation(), Some("炮二平五"));
    assert_eq!(game.tree.node(line[2]).unwrap().notation(), Some("馬8進7"));
    assert_eq!(game.tree.node(line[3]).unwrap().notation(), Some("傌二進三"));
}

#[test]
fn test_text_and_pgn_exports_reimport_to_the_same_line() {
    let game = parse_record(ANNOTATED_GAME).unwrap();

    let text = to_text(&game.tree, &game.metadata);
    let from_text = parse_record(&text).unwrap();

    let pgn = to_iccs_pgn(&game.tree, &game.metadata);
    let from_pgn = parse_record(&pgn).unwrap();

    let original: Vec<_> = game
        .tree
        .main_line()
        .iter()
        .filter_map(|id| game.tree.node(*id).and_then(|n| n.notation().map(String::from)))
        .collect();
    let via_text: Vec<_> = from_text
        .tree
        .main_line()
        .iter()
        .filter_map(|id| from_text.tree.node(*id).and_then(|n| n.notation().map(String::from)))
        .collect();
    let via_pgn: Vec<_> = from_pgn
        .tree
        .main_line()
        .iter()
        .filter_map(|id| from_pgn.tree.node(*id).and_then(|n| n.notation().map(String::from)))
        .collect();

    assert_eq!(original, via_text);
    assert_eq!(original, via_pgn);
    assert_eq!(from_pgn.metadata.result, GameResult::Red);
}

// ---------------------------------------------------------------------------
// Bracket-tag records with variations
// ---------------------------------------------------------------------------

#[test]
fn test_dhtmlxq_fork_lands_on_the_forked_node() {
    // A variation forking at ply 2: after red's first move, black has
    // two recorded replies.
    let record = "[DhtmlXQ]\n\
                  [DhtmlXQ_movelist]77471022[/DhtmlXQ_movelist]\n\
                  [DhtmlXQ_move_0_2_2]7062[/DhtmlXQ_move_0_2_2]\n\
                  [/DhtmlXQ]";
    let game = parse_record(record).unwrap();

    let root_children = game.tree.children(game.tree.root_id());
    assert_eq!(root_children.len(), 1);
    assert_eq!(
        notations(&game.tree, root_children[0]),
        vec!["馬2進3", "馬8進7"]
    );
}

#[test]
fn test_edited_tree_survives_a_dhtmlxq_round_trip() {
    // Build a studied tree by hand: main line plus a sideline, comments,
    // and a reordered variation slate.
    let tree = MoveTree::new();
    let root = tree.root_id();
    let (tree, a) = tree.append_move(root, sq(7, 7), sq(7, 4)).unwrap();
    let (tree, b) = tree.append_move(a, sq(0, 1), sq(2, 2)).unwrap();
    let (tree, _c) = tree.append_move(b, sq(9, 7), sq(7, 6)).unwrap();
    let (tree, alt) = tree.append_move(a, sq(0, 7), sq(2, 6)).unwrap();
    let tree = tree.set_comment(alt, "另一路").unwrap();
    let tree = tree.reorder_sibling(alt, Direction::Up).unwrap();

    let record = to_dhtmlxq(&tree, &GameMetadata::default());
    let restored = parse_record(&record).unwrap();

    let first = restored.tree.children(restored.tree.root_id())[0];
    // The reordered slate came back in its edited order.
    assert_eq!(
        notations(&restored.tree, first),
        vec!["馬8進7", "馬2進3"]
    );
    let new_alt = restored.tree.children(first)[0];
    assert_eq!(restored.tree.node(new_alt).unwrap().comment, "另一路");
    // The deeper continuation survived under the other branch.
    let main_reply = restored.tree.children(first)[1];
    assert_eq!(
        notations(&restored.tree, main_reply),
        vec!["傌二進三"]
    );
}

// ---------------------------------------------------------------------------
// Transposition linking across an imported record
// ---------------------------------------------------------------------------

#[test]
fn test_linking_an_imported_transposition_shares_continuations() {
    // Two move orders into the same position; only one knows the reply.
    let tree = MoveTree::new();
    let root = tree.root_id();
    let (tree, x1) = tree.append_move(root, sq(7, 7), sq(7, 4)).unwrap();
    let (tree, x2) = tree.append_move(x1, sq(0, 1), sq(2, 2)).unwrap();
    let (tree, x3) = tree.append_move(x2, sq(9, 7), sq(7, 6)).unwrap();
    let (tree, _) = tree.append_move(x3, sq(0, 7), sq(2, 6)).unwrap();
    let (tree, y1) = tree.append_move(root, sq(9, 7), sq(7, 6)).unwrap();
    let (tree, y2) = tree.append_move(y1, sq(0, 1), sq(2, 2)).unwrap();
    let (tree, y3) = tree.append_move(y2, sq(7, 7), sq(7, 4)).unwrap();

    let (linked, report) = tree.link_transpositions(y3).unwrap();
    assert_eq!(report.positions, 2);
    assert_eq!(report.copied_branches, 1);
    assert_eq!(notations(&linked, y3), vec!["馬8進7"]);

    // The linked tree still serializes and reimports cleanly.
    let record = to_dhtmlxq(&linked, &GameMetadata::default());
    let restored = parse_record(&record).unwrap();
    assert!(!restored.truncated);
    assert_eq!(restored.tree.len(), linked.len());
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn test_json_persistence_preserves_an_imported_game() {
    let game = parse_record(ANNOTATED_GAME).unwrap();
    let json = game.tree.to_json().unwrap();
    let restored = MoveTree::from_json(&json).unwrap();

    assert_eq!(restored.len(), game.tree.len());
    assert_eq!(restored.main_line(), game.tree.main_line());
    assert_eq!(
        restored.node(restored.root_id()).unwrap().fen,
        STARTING_FEN
    );
}
