//! Notation parser. Four dialects are accepted and auto-detected:
//! plain coordinates (`h2e2`), piece-symbol WXF (`C2.5`), localized
//! text (`炮二平五`, `前馬退四`), and the bracket-tagged DhtmlXQ record
//! format, which carries variations and builds the tree directly.
//!
//! Parsing is lenient: a token that matches no grammar, or cannot be
//! disambiguated on the current board, is skipped. Only a board-state
//! desync (a stated origin square turning out empty) stops the parse,
//! and even then everything parsed so far is returned.

use std::collections::{HashMap, VecDeque};

use regex::Regex;
use tracing::{debug, warn};

use crate::board::{Board, Color, PieceKind, Square, COLS};
use crate::error::EngineError;
use crate::fen::{decode_fen, STARTING_FEN};
use crate::game_data::{GameMetadata, GameResult, ParsedMove};
use crate::notation::{digit_value, file_to_col, localized_notation, piece_kind_from_glyph};
use crate::tree::{MoveTree, NodeId};

#[derive(Debug, Clone)]
pub struct ParsedGame {
    pub metadata: GameMetadata,
    pub tree: MoveTree,
    /// True when parsing stopped early at a desynchronized token.
    pub truncated: bool,
}

/// Positional qualifier used when several same-kind pieces share a file.
/// Front/back are relative to the mover's own forward direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    Front,
    Middle,
    Back,
}

#[derive(Debug, Clone, Copy)]
enum Selector {
    /// Own-side file number, 1-9.
    File(u8),
    Position(Qualifier),
}

#[derive(Debug, Clone, Copy)]
enum MoveDir {
    Level,
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy)]
struct LocalizedMove {
    kind: PieceKind,
    selector: Selector,
    dir: MoveDir,
    value: u8,
}

/// Parse an externally authored game record in any supported dialect.
pub fn parse_record(text: &str) -> Result<ParsedGame, EngineError> {
    if text.contains("[DhtmlXQ") {
        parse_dhtmlxq(text)
    } else {
        parse_text_notation(text)
    }
}

// ---------------------------------------------------------------------------
// Plain-text dialects (coordinate, piece-symbol, localized)
// ---------------------------------------------------------------------------

fn parse_text_notation(text: &str) -> Result<ParsedGame, EngineError> {
    let metadata = extract_metadata(text);

    let mut fen = STARTING_FEN.to_string();
    let mut explicit_start = false;
    let tag_fen = Regex::new(r#"(?i)\[FEN\s+"([^"]+)"\]"#).unwrap();
    let bare_fen = Regex::new(r"(?i)fen[串：:\s]+([rnbakcpRNBAKCP1-9/]+ [wb])").unwrap();
    if let Some(caps) = tag_fen.captures(text) {
        fen = caps[1].to_string();
        explicit_start = true;
    } else if let Some(caps) = bare_fen.captures(text) {
        fen = format!("{} - - 0 1", &caps[1]);
        explicit_start = true;
    }
    let (start_board, start_turn) = decode_fen(&fen)?;

    // Lift comment blocks out before normalization mangles their text.
    let body = Regex::new(r"\[[^\]]*\]").unwrap().replace_all(text, " ");
    let mut comments: Vec<String> = Vec::new();
    let plain_comment = Regex::new(r"(?s)\{(.*?)\}").unwrap();
    let body = plain_comment.replace_all(&body, |caps: &regex::Captures| {
        if caps[0].starts_with("{#") {
            return caps[0].to_string();
        }
        comments.push(caps[1].trim().to_string());
        format!(" __COMMENT_{}__ ", comments.len() - 1)
    });
    let tagged_comment = Regex::new(r"(?s)\{#(.*?)#\}").unwrap();
    let body = tagged_comment.replace_all(&body, |caps: &regex::Captures| {
        comments.push(caps[1].trim().to_string());
        format!(" __COMMENT_{}__ ", comments.len() - 1)
    });

    let normalized = normalize_text(&body);

    let token_re = Regex::new(
        r"(?i)[a-i][0-9]-?[a-i][0-9]|[RCNHPKABES][1-9][+.\-][1-9]|(?:[\x{4e00}-\x{9fa5}]{2}|[\x{4e00}-\x{9fa5}][0-9])[進进退平][0-9一二三四五六七八九]|__COMMENT_\d+__",
    )
    .unwrap();

    let mut board = start_board.clone();
    let mut turn = start_turn;
    let mut moves: Vec<ParsedMove> = Vec::new();
    let mut truncated = false;

    for found in token_re.find_iter(&normalized) {
        let token = found.as_str();

        if let Some(idx) = comment_placeholder_index(token) {
            if let (Some(last), Some(text)) = (moves.last_mut(), comments.get(idx)) {
                if !last.comment.is_empty() {
                    last.comment.push(' ');
                }
                last.comment.push_str(text);
            }
            continue;
        }

        let resolved = if is_coordinate_token(token) {
            parse_coordinate_token(token)
        } else if token.starts_with(|c: char| c.is_ascii_alphabetic()) {
            parse_symbol_token(token, &board, turn)
        } else {
            parse_localized_token(token, &board, turn)
        };
        let Some((from, to)) = resolved else {
            debug!(token, "skipping unresolvable notation token");
            continue;
        };
        let Some(piece) = board.get(from) else {
            warn!(token, "origin square is empty, stopping parse early");
            truncated = true;
            break;
        };

        let notation = if token.chars().any(|c| ('\u{4e00}'..='\u{9fa5}').contains(&c)) {
            token.to_string()
        } else {
            localized_notation(from, to, piece)
        };
        moves.push(ParsedMove {
            from,
            to,
            notation,
            comment: String::new(),
        });
        board = board.apply(from, to);
        turn = turn.opponent();
    }

    if moves.is_empty() && !explicit_start {
        return Err(EngineError::Unparseable);
    }
    let tree = MoveTree::from_moves(start_board, start_turn, &moves);
    Ok(ParsedGame {
        metadata,
        tree,
        truncated,
    })
}

/// Fold full-width characters and glyph variants, strip round-number
/// prefixes and list punctuation. The WXF dot operator survives because
/// only dots following a standalone number are treated as numbering.
pub(crate) fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let mapped = match ch {
            '０'..='９' | 'Ａ'..='Ｚ' => {
                char::from_u32(ch as u32 - 0xFEE0).unwrap_or(ch)
            }
            '－' | '—' | '–' | '↔' => '-',
            '　' => ' ',
            '进' => '進',
            '后' => '後',
            '马' => '馬',
            '车' => '車',
            _ => ch,
        };
        out.push(mapped);
    }
    let out = Regex::new(r"(?:^|\s)\d+\.\s*")
        .unwrap()
        .replace_all(&out, " ");
    let out = Regex::new(r"第[一二三四五六七八九十\d]+步[：:]")
        .unwrap()
        .replace_all(&out, " ");
    let out = Regex::new(r"[，,。、；;：:]").unwrap().replace_all(&out, " ");
    out.into_owned()
}

fn comment_placeholder_index(token: &str) -> Option<usize> {
    token
        .strip_prefix("__COMMENT_")?
        .strip_suffix("__")?
        .parse()
        .ok()
}

fn is_coordinate_token(token: &str) -> bool {
    let chars: Vec<char> = token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    chars.len() == 4
        && matches!(chars[0].to_ascii_lowercase(), 'a'..='i')
        && chars[1].is_ascii_digit()
        && matches!(chars[2].to_ascii_lowercase(), 'a'..='i')
        && chars[3].is_ascii_digit()
}

/// `<file><rank><file><rank>`: file a-i left-to-right, rank counted from
/// black's back row, so `h2e2` is (7,7) -> (7,4).
fn parse_coordinate_token(token: &str) -> Option<(Square, Square)> {
    let chars: Vec<char> = token
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if chars.len() != 4 {
        return None;
    }
    let col_of = |c: char| -> Option<u8> {
        let c = c.to_ascii_lowercase();
        if ('a'..='i').contains(&c) {
            Some(c as u8 - b'a')
        } else {
            None
        }
    };
    let row_of = |c: char| -> Option<u8> { c.to_digit(10).map(|d| 9 - d as u8) };
    Some((
        Square::new(row_of(chars[1])?, col_of(chars[0])?),
        Square::new(row_of(chars[3])?, col_of(chars[2])?),
    ))
}

/// WXF piece-symbol form: letter, own-side file, `+`/`-`/`.`, value.
fn parse_symbol_token(token: &str, board: &Board, turn: Color) -> Option<(Square, Square)> {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 4 {
        return None;
    }
    let kind = piece_kind_from_glyph(chars[0])?;
    let file = chars[1].to_digit(10)? as u8;
    let dir = match chars[2] {
        '.' => MoveDir::Level,
        '+' => MoveDir::Forward,
        '-' => MoveDir::Backward,
        _ => return None,
    };
    let value = chars[3].to_digit(10)? as u8;
    resolve_localized(
        board,
        turn,
        LocalizedMove {
            kind,
            selector: Selector::File(file),
            dir,
            value,
        },
    )
}

fn parse_localized_token(token: &str, board: &Board, turn: Color) -> Option<(Square, Square)> {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() < 4 {
        return None;
    }
    let (selector, name) = match chars[0] {
        '前' => (Selector::Position(Qualifier::Front), chars[1]),
        '中' => (Selector::Position(Qualifier::Middle), chars[1]),
        '後' | '后' => (Selector::Position(Qualifier::Back), chars[1]),
        _ => (Selector::File(digit_value(chars[1])?), chars[0]),
    };
    let kind = piece_kind_from_glyph(name)?;
    let dir = match chars[2] {
        '平' => MoveDir::Level,
        '進' | '进' => MoveDir::Forward,
        '退' => MoveDir::Backward,
        _ => return None,
    };
    let value = digit_value(chars[3])?;
    resolve_localized(
        board,
        turn,
        LocalizedMove {
            kind,
            selector,
            dir,
            value,
        },
    )
}

/// Among pieces that share a file, pick the one a positional qualifier
/// names. Front/back are mirrored between the sides: red's "back" piece
/// sits on the higher row, black's on the lower.
pub fn resolve_qualifier(
    candidates: &[Square],
    side: Color,
    qualifier: Qualifier,
) -> Option<Square> {
    for col in 0..COLS as u8 {
        let mut in_col: Vec<Square> = candidates.iter().copied().filter(|s| s.col == col).collect();
        if in_col.len() < 2 {
            continue;
        }
        in_col.sort_by_key(|s| s.row);
        let picked = match (qualifier, side) {
            (Qualifier::Front, Color::Red) | (Qualifier::Back, Color::Black) => {
                in_col.first().copied()
            }
            (Qualifier::Back, Color::Red) | (Qualifier::Front, Color::Black) => {
                in_col.last().copied()
            }
            (Qualifier::Middle, _) => in_col.get(1).copied(),
        };
        if picked.is_some() {
            return picked;
        }
    }
    None
}

fn resolve_localized(board: &Board, turn: Color, token: LocalizedMove) -> Option<(Square, Square)> {
    let mut candidates = board.pieces_of(turn, token.kind);

    match token.selector {
        Selector::Position(qualifier) => {
            let square = resolve_qualifier(&candidates, turn, qualifier)?;
            candidates = vec![square];
        }
        Selector::File(file) => {
            if !(1..=9).contains(&file) {
                return None;
            }
            let col = file_to_col(file, turn);
            candidates.retain(|s| s.col == col);
        }
    }
    if candidates.is_empty() {
        return None;
    }
    // Several unqualified pieces on one file: the front-most is meant.
    candidates.sort_by_key(|s| {
        if turn.is_red() {
            s.row as i32
        } else {
            -(s.row as i32)
        }
    });
    let from = candidates[0];

    let mut to_row = from.row as i32;
    let mut to_col = from.col as i32;
    match token.dir {
        MoveDir::Level => {
            if !(1..=9).contains(&token.value) {
                return None;
            }
            to_col = file_to_col(token.value, turn) as i32;
        }
        MoveDir::Forward | MoveDir::Backward => {
            let forward = matches!(token.dir, MoveDir::Forward);
            let sign: i32 = match (turn, forward) {
                (Color::Red, true) | (Color::Black, false) => -1,
                _ => 1,
            };
            if token.kind.is_linear() {
                to_row += token.value as i32 * sign;
            } else {
                if !(1..=9).contains(&token.value) {
                    return None;
                }
                to_col = file_to_col(token.value, turn) as i32;
                let dc = (to_col - from.col as i32).abs();
                let dr = match token.kind {
                    PieceKind::Horse => {
                        if dc == 2 {
                            1
                        } else {
                            2
                        }
                    }
                    PieceKind::Elephant => 2,
                    _ => 1,
                };
                to_row += dr * sign;
            }
        }
    }
    if !Square::in_bounds(to_row, to_col) {
        return None;
    }
    Some((from, Square::new(to_row as u8, to_col as u8)))
}

// ---------------------------------------------------------------------------
// Metadata extraction
// ---------------------------------------------------------------------------

fn extract_first(text: &str, patterns: &[&str]) -> String {
    for pattern in patterns {
        let Ok(re) = Regex::new(pattern) else { continue };
        if let Some(caps) = re.captures(text) {
            if let Some(m) = caps.get(1) {
                let value = m.as_str().trim();
                if !value.is_empty() {
                    return value.to_string();
                }
            }
        }
    }
    String::new()
}

fn extract_metadata(text: &str) -> GameMetadata {
    let title = extract_first(
        text,
        &[
            r"[棋局标標題题]+[：:][ \t]*([^\r\n]+)",
            r"对局名称[：:][ \t]*([^\r\n]+)",
            r#"(?i)\[Title\s+"(.+?)"\]"#,
            r#"(?i)\[Game\s+"(.+?)"\]"#,
        ],
    );
    let event = extract_first(
        text,
        &[
            r"[赛賽]事[名称稱]*[：:][ \t]*([^\r\n]+)",
            r#"(?i)\[Event\s+"(.+?)"\]"#,
        ],
    );
    let date = extract_first(
        text,
        &[
            r"日期[：:][ \t]*([^\r\n]+)",
            r#"(?i)\[Date\s+"(.+?)"\]"#,
            r"(\d{4}[.\-/年]\d{1,2}[.\-/月]\d{1,2})",
        ],
    );
    let red_name = extract_first(
        text,
        &[
            r"[红紅]方[名称稱]*[：:][ \t]*([^\r\n]+)",
            r#"(?i)\[Red\s+"(.+?)"\]"#,
        ],
    );
    let black_name = extract_first(
        text,
        &[
            r"黑方[名称稱]*[：:][ \t]*([^\r\n]+)",
            r#"(?i)\[Black\s+"(.+?)"\]"#,
        ],
    );
    let result = normalize_result(&extract_first(
        text,
        &[
            r"[对對]局[结結]果[：:][ \t]*([^\r\n]+)",
            r"[结結]果[：:][ \t]*([^\r\n]+)",
            r#"(?i)\[Result\s+"(.+?)"\]"#,
        ],
    ));

    GameMetadata {
        title,
        event,
        date,
        result,
        red_name,
        black_name,
    }
}

fn normalize_result(raw: &str) -> GameResult {
    if raw.is_empty() {
        GameResult::Unknown
    } else if Regex::new(r"红胜|紅勝|先[胜勝]|1-0").unwrap().is_match(raw) {
        GameResult::Red
    } else if Regex::new(r"黑胜|黑勝|先[负負]|[后後][胜勝]|0-1")
        .unwrap()
        .is_match(raw)
    {
        GameResult::Black
    } else if Regex::new(r"和|平|1/2").unwrap().is_match(raw) {
        GameResult::Draw
    } else {
        GameResult::Unknown
    }
}

// ---------------------------------------------------------------------------
// Bracket-tagged DhtmlXQ dialect
// ---------------------------------------------------------------------------

struct SkelNode {
    /// Origin column, origin row, destination column, destination row.
    mv: Option<[u8; 4]>,
    branch: usize,
    comment: String,
    children: Vec<usize>,
}

struct Fragment {
    source: usize,
    ply: usize,
    branch: usize,
    content: String,
}

fn tag_value(text: &str, name: &str) -> String {
    let Ok(re) = Regex::new(&format!(r"(?is)\[{name}\](.*?)\[/{name}\]")) else {
        return String::new();
    };
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn move_digits(content: &str) -> Vec<u8> {
    content
        .chars()
        .filter_map(|c| c.to_digit(10).map(|d| d as u8))
        .collect()
}

fn parse_dhtmlxq(text: &str) -> Result<ParsedGame, EngineError> {
    let metadata = GameMetadata {
        title: tag_value(text, "DhtmlXQ_title"),
        event: tag_value(text, "DhtmlXQ_event"),
        date: tag_value(text, "DhtmlXQ_date"),
        result: normalize_result(&tag_value(text, "DhtmlXQ_result")),
        red_name: tag_value(text, "DhtmlXQ_red"),
        black_name: tag_value(text, "DhtmlXQ_black"),
    };

    let primary = move_digits(&tag_value(text, "DhtmlXQ_movelist"));
    // Which side owns the first 16 layout slots is inferred from where
    // the first move starts: the mover's pieces sit on the high rows.
    let red_slots_first = primary.len() >= 4 && primary[1] > 4;

    let fen_tag = tag_value(text, "DhtmlXQ_fen");
    let binit = tag_value(text, "DhtmlXQ_binit");
    let (start_board, start_turn, has_position) = if !fen_tag.is_empty() {
        let (board, turn) = decode_fen(&fen_tag)?;
        (board, turn, true)
    } else if let Some(board) = binit_board(&binit, red_slots_first) {
        (board, Color::Red, true)
    } else {
        let (board, turn) = decode_fen(STARTING_FEN)?;
        (board, turn, false)
    };
    if primary.is_empty() && !has_position {
        return Err(EngineError::Unparseable);
    }

    // Skeleton pass: indices into `skel`, plus a ply -> nodes map used to
    // attach variation fragments and comments.
    let mut skel: Vec<SkelNode> = vec![SkelNode {
        mv: None,
        branch: 0,
        comment: String::new(),
        children: Vec::new(),
    }];
    let mut ply_map: HashMap<usize, Vec<usize>> = HashMap::new();
    ply_map.insert(0, vec![0]);

    append_line(&primary, 0, 0, 0, &mut skel, &mut ply_map);

    // Variation fragments may fork off fragments that appear later in the
    // source, so they are drained from a queue until no more attach.
    let frag_re = Regex::new(
        r"\[DhtmlXQ_move_(\d+)_(\d+)_(\d+)\]([^\[]*)\[/DhtmlXQ_move_\d+_\d+_\d+\]",
    )
    .unwrap();
    let mut pending: VecDeque<Fragment> = frag_re
        .captures_iter(text)
        .filter_map(|caps| {
            Some(Fragment {
                source: caps[1].parse().ok()?,
                ply: caps[2].parse().ok()?,
                branch: caps[3].parse().ok()?,
                content: caps[4].to_string(),
            })
        })
        .collect();

    while !pending.is_empty() {
        let mut progressed = false;
        let mut remaining = VecDeque::new();
        while let Some(fragment) = pending.pop_front() {
            let attach_ply = fragment.ply.saturating_sub(1);
            let parent = ply_map
                .get(&attach_ply)
                .and_then(|nodes| nodes.iter().copied().find(|&i| skel[i].branch == fragment.source));
            match parent {
                Some(parent) => {
                    let digits = move_digits(&fragment.content);
                    append_line(
                        &digits,
                        parent,
                        attach_ply,
                        fragment.branch,
                        &mut skel,
                        &mut ply_map,
                    );
                    progressed = true;
                }
                None => remaining.push_back(fragment),
            }
        }
        if !progressed {
            // Source-order fallback: attach leftovers to the last node
            // seen at their ply, as legacy records expect.
            for fragment in remaining.drain(..) {
                let attach_ply = fragment.ply.saturating_sub(1);
                match ply_map.get(&attach_ply).and_then(|n| n.last().copied()) {
                    Some(parent) => {
                        let digits = move_digits(&fragment.content);
                        append_line(
                            &digits,
                            parent,
                            attach_ply,
                            fragment.branch,
                            &mut skel,
                            &mut ply_map,
                        );
                    }
                    None => debug!(
                        ply = fragment.ply,
                        branch = fragment.branch,
                        "dropping unattachable variation fragment"
                    ),
                }
            }
            break;
        }
        pending = remaining;
    }

    // Comments are keyed by (branch, ply), or just (ply) for the main line.
    let comment_re = Regex::new(
        r"(?s)\[DhtmlXQ_comment(\d+)(?:_(\d+))?\](.*?)\[/DhtmlXQ_comment\d+(?:_\d+)?\]",
    )
    .unwrap();
    for caps in comment_re.captures_iter(text) {
        let (branch, ply) = match caps.get(2) {
            Some(ply) => (
                caps[1].parse().unwrap_or(0),
                ply.as_str().parse().unwrap_or(0),
            ),
            None => (0usize, caps[1].parse().unwrap_or(0)),
        };
        let text = caps[3].trim().replace("||", "\n");
        if let Some(nodes) = ply_map.get(&ply) {
            let target = nodes
                .iter()
                .copied()
                .find(|&i| skel[i].branch == branch)
                .or_else(|| nodes.first().copied());
            if let Some(target) = target {
                skel[target].comment = text;
            }
        }
    }

    // Hydrate the skeleton into real nodes by replaying boards.
    let mut tree = MoveTree::with_start(start_board, start_turn);
    let mut truncated = false;
    let root_comment = skel[0].comment.clone();
    if !root_comment.is_empty() {
        tree = tree.set_comment(tree.root_id(), &root_comment)?;
    }
    let root = tree.root_id();
    hydrate(&mut tree, &skel, 0, root, &mut truncated);

    Ok(ParsedGame {
        metadata,
        tree,
        truncated,
    })
}

fn append_line(
    digits: &[u8],
    parent: usize,
    start_ply: usize,
    branch: usize,
    skel: &mut Vec<SkelNode>,
    ply_map: &mut HashMap<usize, Vec<usize>>,
) {
    let mut current = parent;
    let mut ply = start_ply;
    for chunk in digits.chunks(4) {
        if chunk.len() < 4 {
            break;
        }
        ply += 1;
        let index = skel.len();
        skel.push(SkelNode {
            mv: Some([chunk[0], chunk[1], chunk[2], chunk[3]]),
            branch,
            comment: String::new(),
            children: Vec::new(),
        });
        skel[current].children.push(index);
        ply_map.entry(ply).or_default().push(index);
        current = index;
    }
}

fn hydrate(
    tree: &mut MoveTree,
    skel: &[SkelNode],
    skel_index: usize,
    node: NodeId,
    truncated: &mut bool,
) {
    for &child_index in &skel[skel_index].children {
        let child = &skel[child_index];
        let Some([c1, r1, c2, r2]) = child.mv else { continue };
        if c1 >= 9 || c2 >= 9 {
            debug!("skipping out-of-board move digits");
            continue;
        }
        let from = Square::new(r1, c1);
        let to = Square::new(r2, c2);
        let origin_occupied = tree
            .node(node)
            .is_some_and(|n| n.board.get(from).is_some());
        if !origin_occupied {
            warn!(ply_branch = child.branch, "desynchronized variation move, pruning");
            *truncated = true;
            continue;
        }
        let id = tree.add_child(node, from, to, None);
        if !child.comment.is_empty() {
            if let Some(n) = tree.nodes.get_mut(&id) {
                n.comment = child.comment.clone();
            }
        }
        hydrate(tree, skel, child_index, id, truncated);
    }
    // Playback defaults to variation A everywhere.
    if let Some(n) = tree.nodes.get_mut(&node) {
        n.preferred_child = n.children.first().copied();
    }
}

/// Decode the fixed-slot board layout: 32 coordinate pairs in the order
/// chariots, horses, elephants, advisors, king, cannons, soldiers for
/// each side; `99` marks a captured piece.
fn binit_board(binit: &str, red_slots_first: bool) -> Option<Board> {
    if binit.len() != 64 {
        return None;
    }
    let digits = move_digits(binit);
    if digits.len() != 64 {
        return None;
    }
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
    let (first, second) = if red_slots_first {
        (Color::Red, Color::Black)
    } else {
        (Color::Black, Color::Red)
    };

    let mut board = Board::empty();
    for slot in 0..32 {
        let col = digits[slot * 2];
        let row = digits[slot * 2 + 1];
        if col >= 9 || row >= 10 {
            continue; // captured slot
        }
        let color = if slot < 16 { first } else { second };
        let kind = SLOT_KINDS[slot % 16];
        board.set(
            Square::new(row, col),
            Some(crate::board::Piece::new(kind, color)),
        );
    }
    Some(board)
}
