//! Game serialization to the interchange formats the importer reads
//! back: the bracket-tagged DhtmlXQ record (full variation tree), plain
//! localized text, ICCS coordinate PGN, and the engine position string.

use std::collections::VecDeque;
use std::fmt::Write as _;

use crate::board::{Board, Color, PieceKind, Square};
use crate::error::EngineError;
use crate::fen::STARTING_FEN;
use crate::game_data::{GameMetadata, GameResult};
use crate::tree::{MoveTree, NodeId};

struct PendingBranch {
    head: NodeId,
    ply: usize,
    source: usize,
}

/// Serialize the whole tree, variations included, as a DhtmlXQ record.
/// The main line is branch 0; every other branch becomes a move fragment
/// tagged with its source branch and fork ply.
pub fn to_dhtmlxq(tree: &MoveTree, metadata: &GameMetadata) -> String {
    let root = tree.node_or_root(tree.root_id());

    let mut queue: VecDeque<PendingBranch> = VecDeque::new();
    let mut comments: Vec<(usize, usize, String)> = Vec::new();
    let main = emit_line(tree, tree.root_id(), 0, 0, &mut queue, &mut comments);

    let mut fragments = String::new();
    let mut branch_counter = 1;
    while let Some(pending) = queue.pop_front() {
        let branch = branch_counter;
        branch_counter += 1;
        let digits = emit_line(
            tree,
            pending.head,
            pending.ply,
            branch,
            &mut queue,
            &mut comments,
        );
        let _ = writeln!(
            fragments,
            "[DhtmlXQ_move_{src}_{ply}_{branch}]{digits}[/DhtmlXQ_move_{src}_{ply}_{branch}]",
            src = pending.source,
            ply = pending.ply,
        );
    }

    let mut out = String::new();
    out.push_str("[DhtmlXQ]\n");
    push_tag(&mut out, "DhtmlXQ_title", &metadata.title);
    push_tag(&mut out, "DhtmlXQ_event", &metadata.event);
    push_tag(&mut out, "DhtmlXQ_date", &metadata.date);
    push_tag(&mut out, "DhtmlXQ_red", &metadata.red_name);
    push_tag(&mut out, "DhtmlXQ_black", &metadata.black_name);
    push_tag(&mut out, "DhtmlXQ_result", metadata.result.label());
    push_tag(&mut out, "DhtmlXQ_fen", &root.fen);
    push_tag(&mut out, "DhtmlXQ_binit", &binit_layout(&root.board));
    push_tag(&mut out, "DhtmlXQ_movelist", &main);
    out.push_str(&fragments);
    for (branch, ply, text) in comments {
        let escaped = text.replace('\n', "||");
        if branch == 0 {
            let _ = writeln!(
                out,
                "[DhtmlXQ_comment{ply}]{escaped}[/DhtmlXQ_comment{ply}]"
            );
        } else {
            let _ = writeln!(
                out,
                "[DhtmlXQ_comment{branch}_{ply}]{escaped}[/DhtmlXQ_comment{branch}_{ply}]"
            );
        }
    }
    out.push_str("[/DhtmlXQ]\n");
    out
}

/// Walk a line from `head` following variation A, collecting move digits
/// and queuing every other sibling as a branch to emit later.
fn emit_line(
    tree: &MoveTree,
    head: NodeId,
    head_ply: usize,
    branch: usize,
    queue: &mut VecDeque<PendingBranch>,
    comments: &mut Vec<(usize, usize, String)>,
) -> String {
    let mut digits = String::new();
    let mut current = head;
    let mut ply = head_ply;
    loop {
        let Some(node) = tree.node(current) else { break };
        if let Some(mv) = &node.mv {
            let _ = write!(
                digits,
                "{}{}{}{}",
                mv.from.col, mv.from.row, mv.to.col, mv.to.row
            );
        }
        if !node.comment.is_empty() {
            comments.push((branch, ply, node.comment.clone()));
        }
        for &sibling in node.children.iter().skip(1) {
            queue.push_back(PendingBranch {
                head: sibling,
                ply: ply + 1,
                source: branch,
            });
        }
        match node.children.first() {
            Some(&child) => {
                current = child;
                ply += 1;
            }
            None => break,
        }
    }
    digits
}

fn push_tag(out: &mut String, name: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "[{name}]{value}[/{name}]");
    }
}

/// The fixed-slot layout string: 32 `(column,row)` digit pairs, red's
/// pieces in slots 0-15, `99` for a slot whose piece is off the board.
pub fn binit_layout(board: &Board) -> String {
    const SLOT_KINDS: [PieceKind; 16] = [
        PieceKind::Chariot,
        PieceKind::Horse,
        PieceKind::Elephant,
        PieceKind::Advisor,
        PieceKind::King,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Cannon,
        PieceKind::Soldier,
        PieceKind::Soldier,
        PieceKind::Soldier,
        PieceKind::Soldier,
        PieceKind::Soldier,
    ];

    let mut out = String::with_capacity(64);
    for color in [Color::Red, Color::Black] {
        let mut pools: Vec<(PieceKind, VecDeque<Square>)> = Vec::new();
        for kind in [
            PieceKind::Chariot,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::King,
            PieceKind::Cannon,
            PieceKind::Soldier,
        ] {
            pools.push((kind, board.pieces_of(color, kind).into()));
        }
        for kind in SLOT_KINDS {
            let square = pools
                .iter_mut()
                .find(|(k, _)| *k == kind)
                .and_then(|(_, pool)| pool.pop_front());
            match square {
                Some(sq) => {
                    let _ = write!(out, "{}{}", sq.col, sq.row);
                }
                None => out.push_str("99"),
            }
        }
    }
    out
}

/// The main line as numbered localized text with a Chinese-labelled
/// metadata header; comments ride along in braces.
pub fn to_text(tree: &MoveTree, metadata: &GameMetadata) -> String {
    let mut out = String::new();
    push_header(&mut out, "棋局標題", &metadata.title);
    push_header(&mut out, "賽事", &metadata.event);
    push_header(&mut out, "日期", &metadata.date);
    push_header(&mut out, "紅方", &metadata.red_name);
    push_header(&mut out, "黑方", &metadata.black_name);
    push_header(&mut out, "結果", metadata.result.label());
    if !out.is_empty() {
        out.push('\n');
    }

    let mut round = 0;
    for (index, id) in tree.main_line().into_iter().skip(1).enumerate() {
        let Some(node) = tree.node(id) else { continue };
        let Some(notation) = node.notation() else { continue };
        if index % 2 == 0 {
            round += 1;
            if round > 1 {
                out.push('\n');
            }
            let _ = write!(out, "{round}. {notation}");
        } else {
            let _ = write!(out, " {notation}");
        }
        if !node.comment.is_empty() {
            let _ = write!(out, " {{{}}}", node.comment);
        }
    }
    out.push('\n');
    out
}

fn push_header(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        let _ = writeln!(out, "{label}：{value}");
    }
}

fn pgn_result(result: GameResult) -> &'static str {
    match result {
        GameResult::Red => "1-0",
        GameResult::Black => "0-1",
        GameResult::Draw => "1/2-1/2",
        GameResult::Unknown => "*",
    }
}

/// Uppercase ICCS coordinate pair, e.g. `H2-E2`.
fn iccs_pair(from: Square, to: Square) -> String {
    format!(
        "{}{}-{}{}",
        (b'A' + from.col) as char,
        9 - from.row,
        (b'A' + to.col) as char,
        9 - to.row
    )
}

/// Lowercase engine coordinate, e.g. `h2e2`.
fn engine_coord(from: Square, to: Square) -> String {
    format!(
        "{}{}{}{}",
        (b'a' + from.col) as char,
        9 - from.row,
        (b'a' + to.col) as char,
        9 - to.row
    )
}

/// The main line as a tag-header PGN in ICCS coordinate notation.
pub fn to_iccs_pgn(tree: &MoveTree, metadata: &GameMetadata) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[Game \"Chinese Chess\"]");
    if !metadata.title.is_empty() {
        let _ = writeln!(out, "[Title \"{}\"]", metadata.title);
    }
    if !metadata.event.is_empty() {
        let _ = writeln!(out, "[Event \"{}\"]", metadata.event);
    }
    if !metadata.date.is_empty() {
        let _ = writeln!(out, "[Date \"{}\"]", metadata.date);
    }
    if !metadata.red_name.is_empty() {
        let _ = writeln!(out, "[Red \"{}\"]", metadata.red_name);
    }
    if !metadata.black_name.is_empty() {
        let _ = writeln!(out, "[Black \"{}\"]", metadata.black_name);
    }
    let _ = writeln!(out, "[Result \"{}\"]", pgn_result(metadata.result));
    let root_fen = &tree.node_or_root(tree.root_id()).fen;
    if root_fen != STARTING_FEN {
        let _ = writeln!(out, "[FEN \"{root_fen}\"]");
    }
    out.push('\n');

    let mut first = true;
    for (index, id) in tree.main_line().into_iter().skip(1).enumerate() {
        let Some(mv) = tree.node(id).and_then(|n| n.mv.as_ref()) else {
            continue;
        };
        if index % 2 == 0 {
            if !first {
                out.push(' ');
            }
            let _ = write!(out, "{}. {}", index / 2 + 1, iccs_pair(mv.from, mv.to));
        } else {
            let _ = write!(out, " {}", iccs_pair(mv.from, mv.to));
        }
        first = false;
    }
    if !first {
        out.push(' ');
    }
    out.push_str(pgn_result(metadata.result));
    out.push('\n');
    out
}

/// The UCCI-style position command for the line ending at `at`: the
/// start position plus every coordinate move leading to the node.
pub fn to_engine_position(tree: &MoveTree, at: NodeId) -> Result<String, EngineError> {
    let path = tree
        .path_to_root(at)
        .ok_or(EngineError::NodeNotFound(at))?;
    let root_fen = &tree.node_or_root(tree.root_id()).fen;

    let mut out = format!("position fen {root_fen}");
    let mut wrote_moves = false;
    for id in path.into_iter().skip(1) {
        let Some(mv) = tree.node(id).and_then(|n| n.mv.as_ref()) else {
            continue;
        };
        if !wrote_moves {
            out.push_str(" moves");
            wrote_moves = true;
        }
        out.push(' ');
        out.push_str(&engine_coord(mv.from, mv.to));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::parse_record;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col)
    }

    /// Main line 炮二平五 馬2進3 with a black sideline 馬8進7.
    fn forked_tree() -> MoveTree {
        let tree = MoveTree::new();
        let (tree, a) = tree.append_move(tree.root_id(), sq(7, 7), sq(7, 4)).unwrap();
        let (tree, b) = tree.append_move(a, sq(0, 1), sq(2, 2)).unwrap();
        let (tree, _) = tree.append_move(a, sq(0, 7), sq(2, 6)).unwrap();
        // Re-prefer the main reply; the sideline stays as variation B.
        let (tree, _) = tree.append_move(a, sq(0, 1), sq(2, 2)).unwrap();
        tree.set_comment(b, "屏風馬").unwrap()
    }

    fn notations(tree: &MoveTree, id: NodeId) -> Vec<String> {
        tree.children(id)
            .iter()
            .filter_map(|c| tree.node(*c).and_then(|n| n.notation().map(String::from)))
            .collect()
    }

    #[test]
    fn test_dhtmlxq_round_trips_variations_and_comments() {
        let tree = forked_tree();
        let record = to_dhtmlxq(&tree, &GameMetadata::default());
        let game = parse_record(&record).unwrap();
        assert!(!game.truncated);

        let restored = &game.tree;
        let first = restored.children(restored.root_id())[0];
        assert_eq!(restored.node(first).unwrap().notation(), Some("炮二平五"));
        assert_eq!(notations(restored, first), vec!["馬2進3", "馬8進7"]);

        let main_reply = restored.children(first)[0];
        assert_eq!(restored.node(main_reply).unwrap().comment, "屏風馬");
    }

    #[test]
    fn test_dhtmlxq_round_trips_metadata() {
        let metadata = GameMetadata {
            title: "測試局".into(),
            red_name: "甲".into(),
            black_name: "乙".into(),
            result: GameResult::Draw,
            ..GameMetadata::default()
        };
        let record = to_dhtmlxq(&MoveTree::new(), &metadata);
        let game = parse_record(&record).unwrap();
        assert_eq!(game.metadata.title, "測試局");
        assert_eq!(game.metadata.red_name, "甲");
        assert_eq!(game.metadata.black_name, "乙");
        assert_eq!(game.metadata.result, GameResult::Draw);
    }

    #[test]
    fn test_binit_layout_marks_captured_slots() {
        let mut board = Board::initial();
        // Remove one red cannon.
        board.set(sq(7, 1), None);
        let layout = binit_layout(&board);
        assert_eq!(layout.len(), 64);
        // Slot 9 is the first red cannon: only (7,7) remains.
        assert_eq!(&layout[18..20], "77");
        // Slot 10, the second cannon, is empty.
        assert_eq!(&layout[20..22], "99");
    }

    #[test]
    fn test_text_export_is_reimportable() {
        let tree = forked_tree();
        let metadata = GameMetadata {
            title: "五七炮".into(),
            result: GameResult::Red,
            ..GameMetadata::default()
        };
        let text = to_text(&tree, &metadata);
        assert!(text.contains("棋局標題：五七炮"));
        assert!(text.contains("1. 炮二平五 馬2進3 {屏風馬}"));

        let game = parse_record(&text).unwrap();
        assert_eq!(game.metadata.title, "五七炮");
        assert_eq!(game.metadata.result, GameResult::Red);
        let line = game.tree.main_line();
        assert_eq!(line.len(), 3);
        assert_eq!(game.tree.node(line[2]).unwrap().comment, "屏風馬");
    }

    #[test]
    fn test_iccs_pgn_round_trips_main_line() {
        let tree = forked_tree();
        let metadata = GameMetadata {
            result: GameResult::Black,
            ..GameMetadata::default()
        };
        let pgn = to_iccs_pgn(&tree, &metadata);
        assert!(pgn.contains("[Result \"0-1\"]"));
        assert!(pgn.contains("1. H2-E2 B9-C7"));

        let game = parse_record(&pgn).unwrap();
        let line = game.tree.main_line();
        assert_eq!(line.len(), 3);
        assert_eq!(game.tree.node(line[1]).unwrap().notation(), Some("炮二平五"));
        assert_eq!(game.metadata.result, GameResult::Black);
    }

    #[test]
    fn test_engine_position_lists_path_moves() {
        let tree = MoveTree::new();
        let (tree, a) = tree.append_move(tree.root_id(), sq(7, 7), sq(7, 4)).unwrap();
        let (tree, b) = tree.append_move(a, sq(0, 1), sq(2, 2)).unwrap();

        let cmd = to_engine_position(&tree, b).unwrap();
        assert_eq!(cmd, format!("position fen {STARTING_FEN} moves h2e2 b9c7"));

        let at_root = to_engine_position(&tree, tree.root_id()).unwrap();
        assert_eq!(at_root, format!("position fen {STARTING_FEN}"));
    }
}
